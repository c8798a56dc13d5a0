//! Configuration schema types
//!
//! Types deserialized from the YAML settings file and the resolved
//! settings handed to the session.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::clock;
use crate::error::ConfigError;
use crate::phase::Durations;

/// A duration as written in YAML: either a bare number of minutes or a
/// human duration string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    /// Whole minutes (`work: 25`)
    Minutes(u64),
    /// Human duration (`work: 25m`, `work: "1h 30m"`)
    Text(String),
}

impl DurationValue {
    /// Resolves to whole seconds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the value is zero,
    /// unparseable, or not a whole number of seconds.
    pub fn to_seconds(&self, field: &str) -> Result<u64, ConfigError> {
        match self {
            Self::Minutes(minutes) => minutes
                .checked_mul(60)
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigError::invalid_duration(field, minutes.to_string())),
            Self::Text(text) => clock::parse_duration(field, text),
        }
    }
}

/// Root of the YAML settings file. Every key is optional.
///
/// ```yaml
/// work: 25m
/// short_break: 5m
/// long_break: 15m
/// auto_continue: false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    /// Work phase length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work: Option<DurationValue>,

    /// Short break length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_break: Option<DurationValue>,

    /// Long break length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_break: Option<DurationValue>,

    /// Restart the countdown automatically after a phase expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_continue: Option<bool>,
}

/// Values supplied on the command line (or their environment fallbacks).
///
/// These take precedence over the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// `--work`
    pub work: Option<String>,
    /// `--short-break`
    pub short_break: Option<String>,
    /// `--long-break`
    pub long_break: Option<String>,
    /// `--auto-continue`
    pub auto_continue: bool,
}

/// Effective settings for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Validated phase durations
    pub durations: Durations,
    /// Restart the countdown automatically after expiry
    pub auto_continue: bool,
    /// Settings file the values were read from, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            durations: Durations::default(),
            auto_continue: false,
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let yaml = "work: 50m\nshort_break: 10m\nlong_break: 30m\nauto_continue: true\n";
        let config: FileConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.work, Some(DurationValue::Text("50m".to_owned())));
        assert_eq!(config.auto_continue, Some(true));
    }

    #[test]
    fn test_bare_number_is_minutes() {
        let config: FileConfig = serde_yaml::from_str("work: 45\n").unwrap();
        assert_eq!(config.work, Some(DurationValue::Minutes(45)));
        assert_eq!(config.work.unwrap().to_seconds("work").unwrap(), 2700);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: Result<FileConfig, _> = serde_yaml::from_str("pomodoros: 4\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_minutes_rejected() {
        assert!(DurationValue::Minutes(0).to_seconds("work").is_err());
    }

    #[test]
    fn test_negative_number_rejected() {
        let result: Result<FileConfig, _> = serde_yaml::from_str("work: -5\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_serialize() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["durations"]["work"], 1500);
        assert_eq!(json["durations"]["short_break"], 300);
        assert_eq!(json["durations"]["long_break"], 900);
        assert_eq!(json["auto_continue"], false);
        assert!(json.get("source").is_none());
    }
}
