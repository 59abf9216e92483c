//! Host-loadable machine settings.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Settings that do not depend on the state and event types.
///
/// Every field has a default, so a host can deserialize this from a partial
/// config document.
///
/// # Example
///
/// ```rust
/// use lockstep::builder::MachineOptions;
///
/// let options: MachineOptions =
///     serde_json::from_str(r#"{ "log_capacity": 64, "label": "door" }"#).unwrap();
/// assert_eq!(options.log_capacity.map(|c| c.get()), Some(64));
/// assert_eq!(options.label.as_deref(), Some("door"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineOptions {
    /// Maximum retained transitions; `None` keeps the full history
    pub log_capacity: Option<NonZeroUsize>,
    /// Name carried in log events
    pub label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let options: MachineOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, MachineOptions::default());
        assert!(options.log_capacity.is_none());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let result: Result<MachineOptions, _> = serde_json::from_str(r#"{ "log_capacity": 0 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn options_roundtrip() {
        let options = MachineOptions {
            log_capacity: NonZeroUsize::new(8),
            label: Some("turnstile".into()),
        };
        let json = serde_json::to_string(&options).unwrap();
        let deserialized: MachineOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(options, deserialized);
    }
}
