//! Capability traits for handling errors without naming the concrete type

use crate::ErrorCode;

/// Errors that carry a classification code.
pub trait Coder {
    /// The classification code
    fn error_code(&self) -> &ErrorCode;
}

/// Errors that can say whether the failed operation may be retried.
pub trait RetryIndicator {
    /// Whether retrying the operation may succeed
    fn is_retryable(&self) -> bool;
}

/// Errors with a message that is safe to show to end users.
pub trait UserFacing {
    /// Message to show end users
    fn user_message(&self) -> &str;
}
