//! The main Error type for faultline

use crate::stacktrace::{self, Stacktrace};
use crate::{Coder, ErrorCode, RetryIndicator, Severity, UserFacing};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Structured context attached to an error
pub type Context = BTreeMap<String, Value>;

/// A structured error value.
///
/// Besides the code and technical message, an error carries:
/// - `field` / `value`: which input triggered a validation failure
/// - `context`: free-form key/value metadata for debugging
/// - `timestamp`: when the error was created
/// - `cause`: the wrapped error (if any)
/// - `severity`: advisory importance, `error` by default
/// - `stack`: a call-stack snapshot, captured by [`Error::wrap`]
/// - `user_message`: text safe to show to end users
/// - `retryable`: whether the failed operation may be retried
///
/// Builder methods take the error by value and hand the same error back, so
/// a chain of calls mutates one instance.
///
/// # Example
///
/// ```rust
/// use faultline_error::{Error, RetryIndicator, Severity, UserFacing};
///
/// let err = Error::new("DATABASE_ERROR", "connection pool exhausted")
///     .with_user_message("The service is busy, please try again")
///     .with_context("pool_size", 16)
///     .with_warning_severity()
///     .as_retryable();
///
/// assert_eq!(err.severity(), Severity::Warning);
/// assert!(err.is_retryable());
/// assert_eq!(err.user_message(), "The service is busy, please try again");
/// ```
///
/// Once an error has been handed to another thread it should be treated as
/// read-only. Mutation needs ownership or `&mut`, so there is no locking.
pub struct Error {
    code: ErrorCode,
    message: String,
    field: Option<String>,
    value: Option<String>,
    context: Option<Context>,
    timestamp: DateTime<Utc>,
    cause: Option<anyhow::Error>,
    severity: Severity,
    stack: Option<Stacktrace>,
    user_message: Option<String>,
    retryable: bool,
}

impl Error {
    /// Create a new error with the given code and message.
    ///
    /// Empty or whitespace-only codes are replaced with
    /// [`ErrorCode::UNKNOWN`].
    pub fn new(code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        Self {
            code: code.into().normalize(),
            message: message.into(),
            field: None,
            value: None,
            context: None,
            timestamp: Utc::now(),
            cause: None,
            severity: Severity::Error,
            stack: None,
            user_message: None,
            retryable: false,
        }
    }

    /// Create a validation error naming the offending field and its value.
    ///
    /// The value is stored as given, an empty string included.
    pub fn with_field(
        code: impl Into<ErrorCode>,
        message: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let mut err = Self::new(code, message);
        err.field = Some(field.into());
        err.value = Some(value.into());
        err
    }

    /// Create an error that takes ownership of a ready-made context map.
    pub fn with_context_map(
        code: impl Into<ErrorCode>,
        message: impl Into<String>,
        context: Context,
    ) -> Self {
        let mut err = Self::new(code, message);
        err.context = Some(context);
        err
    }

    /// Wrap an existing error with a new code and message, capturing the
    /// call stack of the caller.
    ///
    /// ```rust
    /// use faultline_error::Error;
    ///
    /// let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
    /// let err = Error::wrap(io, "STORAGE_ERROR", "failed to persist order");
    ///
    /// assert_eq!(err.to_string(), "[STORAGE_ERROR]: failed to persist order");
    /// assert!(err.cause().is_some());
    /// ```
    #[inline(never)]
    pub fn wrap(
        cause: impl Into<anyhow::Error>,
        code: impl Into<ErrorCode>,
        message: impl Into<String>,
    ) -> Self {
        Self::wrapped(cause.into(), code, message, Stacktrace::capture(1))
    }

    pub(crate) fn wrapped(
        cause: anyhow::Error,
        code: impl Into<ErrorCode>,
        message: impl Into<String>,
        stack: Stacktrace,
    ) -> Self {
        let mut err = Self::new(code, message);
        err.cause = Some(cause);
        err.context = Some(Context::new());
        err.stack = Some(stack);
        err
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Get the error code
    pub fn code(&self) -> &ErrorCode {
        &self.code
    }

    /// Get the technical message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the field that failed validation
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Get the offending value of the failed field
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Get the context map, `None` if nothing was ever attached
    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    /// Look up a single context entry
    pub fn context_value(&self, key: &str) -> Option<&Value> {
        self.context.as_ref().and_then(|ctx| ctx.get(key))
    }

    /// Mutable access to the context map, allocating it if absent
    pub fn context_mut(&mut self) -> &mut Context {
        self.context.get_or_insert_with(Context::new)
    }

    /// Get the creation time
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Get the severity
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the captured stack snapshot (if any)
    pub fn stacktrace(&self) -> Option<&Stacktrace> {
        self.stack.as_ref()
    }

    /// Get the explicitly set user message, without falling back
    pub fn user_message_raw(&self) -> Option<&str> {
        self.user_message.as_deref()
    }

    /// Get the immediate cause (if any)
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Take the immediate cause out of this error
    pub fn into_cause(self) -> Option<anyhow::Error> {
        self.cause
    }

    /// Rendered stack text, empty when no stack was captured
    pub fn stack_text(&self) -> String {
        stacktrace::render_opt(self.stack.as_ref())
    }

    // =========================================================================
    // Builders (chainable)
    // =========================================================================

    /// Set the message shown to end users
    pub fn with_user_message(mut self, message: impl Into<String>) -> Self {
        self.user_message = Some(message.into());
        self
    }

    /// Add or overwrite a context entry.
    ///
    /// The map is allocated on first use. Non-finite floats become `null`
    /// through `serde_json::Value`'s conversions; use
    /// [`try_with_context`](Self::try_with_context) to reject them instead.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context_mut().insert(key.into(), value.into());
        self
    }

    /// Add a context entry from any serializable value.
    ///
    /// Fails if `value` cannot be represented as JSON, including NaN and
    /// infinite floats anywhere inside it.
    pub fn try_with_context<T: Serialize>(
        mut self,
        key: impl Into<String>,
        value: T,
    ) -> Result<Self, serde_json::Error> {
        crate::finite::ensure_finite(&value)?;
        let value = serde_json::to_value(value)?;
        self.context_mut().insert(key.into(), value);
        Ok(self)
    }

    /// Mark as retryable
    pub fn as_retryable(mut self) -> Self {
        self.retryable = true;
        self
    }

    /// Set the severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the severity to critical
    pub fn with_critical_severity(self) -> Self {
        self.with_severity(Severity::Critical)
    }

    /// Set the severity to warning
    pub fn with_warning_severity(self) -> Self {
        self.with_severity(Severity::Warning)
    }

    /// Set the severity to info
    pub fn with_info_severity(self) -> Self {
        self.with_severity(Severity::Info)
    }

    /// Attach a stack snapshot captured elsewhere
    pub fn with_stacktrace(mut self, stack: Stacktrace) -> Self {
        self.stack = Some(stack);
        self
    }

    /// Capture the caller's stack and attach it
    #[inline(never)]
    pub fn capture_stacktrace(mut self) -> Self {
        self.stack = Some(Stacktrace::capture(1));
        self
    }

    /// Set the cause.
    ///
    /// # Panics (debug only)
    /// Panics in debug mode if a cause was already set.
    pub fn with_cause(mut self, cause: impl Into<anyhow::Error>) -> Self {
        debug_assert!(self.cause.is_none(), "cause already set");
        self.cause = Some(cause.into());
        self
    }

    // =========================================================================
    // Matching
    // =========================================================================

    /// Identity match: true when `target` is a faultline error with the same
    /// code. Foreign errors and `None` never match.
    pub fn matches(&self, target: Option<&(dyn std::error::Error + 'static)>) -> bool {
        target
            .and_then(|target| target.downcast_ref::<Error>())
            .is_some_and(|target| target.code == self.code)
    }

    /// Find the first error of type `T` in the cause chain.
    ///
    /// The search starts at the cause and never matches `self`, so an error
    /// without a cause yields `None` even for `T = Error`. Use
    /// [`find`](crate::find) to include the receiver.
    pub fn find_cause<T: std::error::Error + 'static>(&self) -> Option<&T> {
        let cause = self.cause()?;
        crate::find::<T>(cause)
    }
}

// =============================================================================
// Capability traits
// =============================================================================

impl Coder for Error {
    fn error_code(&self) -> &ErrorCode {
        &self.code
    }
}

impl RetryIndicator for Error {
    fn is_retryable(&self) -> bool {
        self.retryable
    }
}

impl UserFacing for Error {
    fn user_message(&self) -> &str {
        match self.user_message.as_deref() {
            Some(msg) if !msg.is_empty() => msg,
            _ => &self.message,
        }
    }
}

// =============================================================================
// Display - "[CODE]: message"
// =============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]: {}", self.code, self.message)
    }
}

// =============================================================================
// Debug - verbose, multi-line format for debugging
// =============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] ({}) at {}", self.code, self.severity, self.timestamp.to_rfc3339())?;

        if !self.message.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Message: {}", self.message)?;
        }

        if let Some(user_message) = &self.user_message {
            writeln!(f, "    User message: {}", user_message)?;
        }

        if let Some(field) = &self.field {
            writeln!(f, "    Field: {} = {:?}", field, self.value.as_deref().unwrap_or_default())?;
        }

        if self.retryable {
            writeln!(f, "    Retryable: true")?;
        }

        if let Some(context) = self.context.as_ref().filter(|ctx| !ctx.is_empty()) {
            writeln!(f)?;
            writeln!(f, "    Context:")?;
            for (key, value) in context {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if let Some(cause) = &self.cause {
            writeln!(f)?;
            writeln!(f, "    Cause: {:?}", cause)?;
        }

        let stack = self.stack_text();
        if !stack.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Stack:")?;
            for line in stack.lines() {
                writeln!(f, "        {}", line)?;
            }
        }

        Ok(())
    }
}

// =============================================================================
// std::error::Error implementation
// =============================================================================

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_ref().map(|e| &**e as &(dyn std::error::Error + 'static))
    }
}

// =============================================================================
// Convenient From implementations
// =============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => "NOT_FOUND",
            std::io::ErrorKind::PermissionDenied => "PERMISSION_DENIED",
            _ => "IO_ERROR",
        };
        let message = err.to_string();
        Error::new(code, message).with_cause(err)
    }
}
