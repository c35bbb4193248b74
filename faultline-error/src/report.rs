//! Structured logging of errors through `tracing`

use crate::{chain, Error, RetryIndicator, Severity, UserFacing};
use tracing::Level;

impl Severity {
    /// Log level an error of this severity is reported at
    pub fn level(&self) -> Level {
        match self {
            Severity::Critical | Severity::Error => Level::ERROR,
            Severity::Warning => Level::WARN,
            Severity::Info => Level::INFO,
        }
    }
}

impl Error {
    /// Emit this error as a single `tracing` event.
    ///
    /// The level follows [`Severity::level`]. The code, severity, retry flag
    /// and user message become event fields; the root cause is attached when
    /// the error wraps another one. No subscriber is installed here.
    pub fn report(&self) {
        let root = self
            .cause()
            .map(|cause| chain::root_cause(cause).to_string())
            .unwrap_or_default();
        let code = self.code().as_str();
        let severity = self.severity().as_str();
        let retryable = self.is_retryable();
        let user_message = self.user_message();
        let stack = self.stacktrace().is_some_and(|stack| !stack.is_empty());
        let message = self.message();

        macro_rules! emit {
            ($level:expr) => {
                tracing::event!(
                    $level,
                    code,
                    severity,
                    retryable,
                    user_message,
                    cause = root.as_str(),
                    stack,
                    "{}",
                    message
                )
            };
        }

        // event! needs a constant level, so spell out Severity::level here
        match self.severity() {
            Severity::Critical | Severity::Error => emit!(Level::ERROR),
            Severity::Warning => emit!(Level::WARN),
            Severity::Info => emit!(Level::INFO),
        }
    }
}
