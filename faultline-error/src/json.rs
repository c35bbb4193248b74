//! JSON projection of errors
//!
//! Keys, in order: `code`, `message`, `field`, `value`, `context`,
//! `timestamp`, `cause`, `severity`, `stack`, `user_msg`, `retryable`.
//! Empty optional fields are left out, and so is `retryable` when false.
//! The stack is written as rendered text, not raw frame addresses.

use crate::Error;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("code", self.code())?;
        map.serialize_entry("message", self.message())?;

        if let Some(field) = self.field().filter(|f| !f.is_empty()) {
            map.serialize_entry("field", field)?;
        }
        if let Some(value) = self.value().filter(|v| !v.is_empty()) {
            map.serialize_entry("value", value)?;
        }
        if let Some(context) = self.context().filter(|ctx| !ctx.is_empty()) {
            map.serialize_entry("context", context)?;
        }

        map.serialize_entry("timestamp", &self.timestamp())?;

        if let Some(cause) = self.cause() {
            match cause.downcast_ref::<Error>() {
                Some(inner) => map.serialize_entry("cause", inner)?,
                None => map.serialize_entry("cause", &cause.to_string())?,
            }
        }

        map.serialize_entry("severity", &self.severity())?;

        let stack = self.stack_text();
        if !stack.is_empty() {
            map.serialize_entry("stack", &stack)?;
        }
        if let Some(user_message) = self.user_message_raw().filter(|m| !m.is_empty()) {
            map.serialize_entry("user_msg", user_message)?;
        }
        if crate::RetryIndicator::is_retryable(self) {
            map.serialize_entry("retryable", &true)?;
        }

        map.end()
    }
}

impl Error {
    /// Serialize to a compact JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize to an indented JSON string
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Serialize to a `serde_json::Value`
    pub fn to_json_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}
