//! Switch requests accepted by the relay API

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Accepted value for switching a relay on
pub const SWITCH_ON: &str = "on";

/// Accepted value for switching a relay off
pub const SWITCH_OFF: &str = "off";

/// Error for a switch request carrying an unknown switch value
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SwitchError {
    #[error("switch must be: 'on' or 'off'; body:{body}")]
    InvalidSwitch { body: String },
}

/// Target position of a relay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    /// Wire name of the switch value
    pub fn as_str(&self) -> &'static str {
        match self {
            Switch::On => SWITCH_ON,
            Switch::Off => SWITCH_OFF,
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, Switch::On)
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /relay`
///
/// The switch value is kept as a plain string so that an unknown value can be
/// echoed back verbatim in the validation error. A missing or `null` switch
/// reads as the empty string and fails validation like any other value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchRequest {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub switch: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl SwitchRequest {
    pub fn new(id: i64, switch: impl Into<String>) -> Self {
        Self {
            id,
            switch: switch.into(),
        }
    }

    /// Validate the switch value. Matching is exact and case-sensitive.
    pub fn validate(&self) -> Result<Switch, SwitchError> {
        match self.switch.as_str() {
            SWITCH_ON => Ok(Switch::On),
            SWITCH_OFF => Ok(Switch::Off),
            _ => Err(SwitchError::InvalidSwitch {
                body: serde_json::to_string(self).unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_on_and_off() {
        assert_eq!(SwitchRequest::new(0, "on").validate(), Ok(Switch::On));
        assert_eq!(SwitchRequest::new(15, "off").validate(), Ok(Switch::Off));
    }

    #[test]
    fn test_rejects_other_values() {
        for value in ["", "ON", "Off", " on", "true", "1", "banana"] {
            let result = SwitchRequest::new(3, value).validate();
            assert!(result.is_err(), "accepted {:?}", value);
        }
    }

    #[test]
    fn test_error_names_accepted_values_and_echoes_body() {
        let err = SwitchRequest::new(3, "banana").validate().unwrap_err();
        let message = err.to_string();
        assert_eq!(
            message,
            r#"switch must be: 'on' or 'off'; body:{"id":3,"switch":"banana"}"#
        );
    }

    #[test]
    fn test_empty_switch_message() {
        let err = SwitchRequest::new(1, "").validate().unwrap_err();
        assert!(err.to_string().contains(r#"{"id":1,"switch":""}"#));
    }

    #[test]
    fn test_missing_or_null_switch_is_invalid() {
        for body in [r#"{"id":3}"#, r#"{"id":3,"switch":null}"#] {
            let request: SwitchRequest = serde_json::from_str(body).unwrap();
            assert_eq!(request, SwitchRequest::new(3, ""));
            let err = request.validate().unwrap_err();
            assert_eq!(
                err.to_string(),
                r#"switch must be: 'on' or 'off'; body:{"id":3,"switch":""}"#
            );
        }
    }

    #[test]
    fn test_non_string_switch_is_rejected() {
        assert!(serde_json::from_str::<SwitchRequest>(r#"{"id":3,"switch":1}"#).is_err());
    }

    #[test]
    fn test_switch_display() {
        assert_eq!(Switch::On.to_string(), "on");
        assert_eq!(Switch::Off.to_string(), "off");
        assert!(Switch::On.is_on());
        assert!(!Switch::Off.is_on());
    }
}
