//! Typed device identifier.
//!
//! Device ids are opaque strings assigned by whoever provisioned the house
//! database. They are never generated in-process, so the newtype only wraps
//! and compares.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a [`Device`](crate::device::Device).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(String);

impl DeviceId {
    /// Wrap an identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for DeviceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_expose_inner_string_through_as_str() {
        let id = DeviceId::new("a2f8690f-2b3a-43cd-90b8-9deea98b42a7");
        assert_eq!(id.as_str(), "a2f8690f-2b3a-43cd-90b8-9deea98b42a7");
    }

    #[test]
    fn should_roundtrip_through_display() {
        let id = DeviceId::new("dev-1");
        assert_eq!(DeviceId::from(id.to_string()), id);
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let id = DeviceId::new("dev-1");
        let json = serde_json::to_string(&id).unwrap();
        let parsed: DeviceId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
