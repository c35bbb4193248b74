//! # faultline-error
//!
//! Structured error values for services and libraries.
//!
//! ## Design Philosophy
//!
//! - **ErrorCode**: Know what went wrong (e.g. `VALIDATION_ERROR`)
//! - **Severity**: Know how much it matters (critical, error, warning, info)
//! - **Retryable**: Know whether trying again makes sense
//! - **User message**: Show end users something safe, keep the technical text for logs
//! - **Context & stack**: Locate the cause with key/value metadata and a call-stack snapshot
//! - **Cause**: Wrap underlying errors, native or foreign, and walk the chain later
//!
//! ## Usage
//!
//! ```rust
//! use faultline_error::{has_code, root_cause, Error, ErrorCode};
//!
//! const VALIDATION: ErrorCode = ErrorCode::from_static("VALIDATION_ERROR");
//! const SIGNUP: ErrorCode = ErrorCode::from_static("SIGNUP_FAILED");
//!
//! fn validate(email: &str) -> faultline_error::Result<()> {
//!     if email.is_empty() {
//!         return Err(Error::with_field(VALIDATION, "email is required", "email", email)
//!             .with_user_message("Please provide an email address")
//!             .with_warning_severity());
//!     }
//!     Ok(())
//! }
//!
//! let err = validate("").map_err(|e| Error::wrap(e, SIGNUP, "signup rejected")).unwrap_err();
//!
//! assert_eq!(err.to_string(), "[SIGNUP_FAILED]: signup rejected");
//! assert!(has_code(&err, VALIDATION));
//! assert_eq!(root_cause(&err).to_string(), "[VALIDATION_ERROR]: email is required");
//!
//! let json = err.to_json().unwrap();
//! assert!(json.contains("\"field\":\"email\""));
//! ```
//!
//! ## Principles
//!
//! - Constructors never fail: empty or whitespace-only codes become `UNKNOWN_ERROR`
//! - Builder methods consume and return the same error, so chained calls mutate one value
//! - Chain helpers only rely on `std::error::Error::source`, so they work across foreign errors
//! - Stacks are captured by `wrap` only and resolved lazily when rendered
//!
//! ## Features
//!
//! - `stacktrace` (default): capture call stacks with the `backtrace` crate.
//!   Without it, snapshots are always empty.

mod chain;
mod code;
mod error;
mod finite;
mod json;
mod report;
mod severity;
pub mod stacktrace;
mod traits;

pub use chain::{chain, chain_matches, find, has_code, root_cause, unwrap, wrap, Chain};
pub use code::ErrorCode;
pub use error::{Context, Error};
pub use severity::{ParseSeverityError, Severity};
pub use stacktrace::Stacktrace;
pub use traits::{Coder, RetryIndicator, UserFacing};

/// Result type alias using faultline Error
pub type Result<T> = std::result::Result<T, Error>;
