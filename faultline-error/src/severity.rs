//! Severity levels for faultline errors

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Advisory classification of how important an error is.
///
/// The vocabulary is closed: `critical`, `error`, `warning` and `info`.
/// New errors start at [`Severity::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Severe failure that requires immediate attention
    Critical,

    /// Standard application error
    #[default]
    Error,

    /// Non-critical issue that should be noted
    Warning,

    /// Informational
    Info,
}

impl Severity {
    /// Returns the severity as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when parsing a string that is not one of the four severities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized severity '{0}', expected one of critical, error, warning, info")]
pub struct ParseSeverityError(String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Critical.to_string(), "critical");
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::default(), Severity::Error);
    }

    #[test]
    fn test_parse() {
        assert_eq!("info".parse::<Severity>(), Ok(Severity::Info));
        assert_eq!("CRITICAL".parse::<Severity>(), Ok(Severity::Critical));

        let err = "fatal".parse::<Severity>().unwrap_err();
        assert!(err.to_string().contains("fatal"));
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }
}
