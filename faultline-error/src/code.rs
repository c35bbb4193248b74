//! Error codes for faultline errors

use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// A short classification string identifying what went wrong.
///
/// Codes are meant to be declared once as constants by the application and
/// matched on later, either directly or via [`has_code`](crate::has_code).
///
/// Codes convert from `&'static str`, `String`, `&String` and
/// `Cow<'static, str>`. A borrowed `&str` with a shorter lifetime needs an
/// explicit `.to_string()`.
///
/// ```rust
/// use faultline_error::ErrorCode;
///
/// const VALIDATION: ErrorCode = ErrorCode::from_static("VALIDATION_ERROR");
/// assert_eq!(VALIDATION.as_str(), "VALIDATION_ERROR");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorCode(Cow<'static, str>);

impl ErrorCode {
    /// Sentinel substituted for empty or whitespace-only codes
    pub const UNKNOWN: ErrorCode = ErrorCode::from_static("UNKNOWN_ERROR");

    /// Create a code from a static string, usable in `const` items.
    ///
    /// No normalization happens here; constructors of [`Error`](crate::Error)
    /// normalize when the code is attached.
    pub const fn from_static(code: &'static str) -> Self {
        Self(Cow::Borrowed(code))
    }

    /// Returns the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A code is valid when it has at least one character other than
    /// space, tab, newline or carriage return.
    pub fn is_valid(&self) -> bool {
        !self.0.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
    }

    /// Replace an invalid code with [`ErrorCode::UNKNOWN`].
    pub(crate) fn normalize(self) -> Self {
        if self.is_valid() {
            self
        } else {
            Self::UNKNOWN
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ErrorCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for ErrorCode {
    fn from(code: &'static str) -> Self {
        Self(Cow::Borrowed(code))
    }
}

impl From<&String> for ErrorCode {
    fn from(code: &String) -> Self {
        Self(Cow::Owned(code.clone()))
    }
}

impl From<Cow<'static, str>> for ErrorCode {
    fn from(code: Cow<'static, str>) -> Self {
        Self(code)
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        Self(Cow::Owned(code))
    }
}

impl PartialEq<str> for ErrorCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ErrorCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_display() {
        assert_eq!(ErrorCode::from("DATABASE_ERROR").to_string(), "DATABASE_ERROR");
        assert_eq!(ErrorCode::UNKNOWN.to_string(), "UNKNOWN_ERROR");
    }

    #[test]
    fn test_is_valid() {
        assert!(ErrorCode::from("X").is_valid());
        assert!(ErrorCode::from(" padded ").is_valid());
        assert!(!ErrorCode::from("").is_valid());
        assert!(!ErrorCode::from(" \t\r\n").is_valid());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(ErrorCode::from("   ").normalize(), ErrorCode::UNKNOWN);
        assert_eq!(ErrorCode::from(String::from("OK")).normalize(), "OK");
    }

    #[test]
    fn test_from_borrowed_and_cow() {
        let dynamic = format!("{}_ERROR", "QUOTA");
        assert_eq!(ErrorCode::from(&dynamic), "QUOTA_ERROR");
        assert_eq!(ErrorCode::from(Cow::Owned(dynamic.clone())), "QUOTA_ERROR");
        assert_eq!(ErrorCode::from(Cow::Borrowed("QUOTA_ERROR")), "QUOTA_ERROR");
        assert_eq!(crate::Error::new(&dynamic, "over quota").code(), "QUOTA_ERROR");
    }

    #[test]
    fn test_owned_and_static_compare_equal() {
        const AUTH: ErrorCode = ErrorCode::from_static("AUTH_ERROR");
        assert_eq!(AUTH, ErrorCode::from("AUTH_ERROR".to_string()));
    }
}
