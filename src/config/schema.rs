use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::model::DEFAULT_MAX_POINTS;

/// Main configuration.
///
/// Example YAML:
/// ```yaml
/// data_file: /srv/house-cup/data.json
/// default_max_points: 100
/// strict_status_transitions: false
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Where records are stored (default: ~/.config/house-cup/data.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,

    /// Max points for activities created without one (default: 100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_max_points: Option<u32>,

    /// Reject status changes outside draft -> scheduled -> ongoing -> completed
    #[serde(default)]
    pub strict_status_transitions: bool,
}

impl Config {
    pub fn effective_max_points(&self) -> u32 {
        self.default_max_points.unwrap_or(DEFAULT_MAX_POINTS)
    }

    /// Validate configuration at startup.
    /// Returns all validation errors at once (not just the first).
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Some(max_points) = self.default_max_points {
            if max_points < 1 {
                errors.push("default_max_points: must be at least 1".to_string());
            }
        }

        if let Some(ref path) = self.data_file {
            if path.as_os_str().is_empty() {
                errors.push("data_file: must not be empty".to_string());
            } else if path.is_dir() {
                errors.push(format!("data_file: {} is a directory", path.display()));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.effective_max_points(), 100);
        assert!(!config.strict_status_transitions);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            data_file: Some(PathBuf::from("/tmp/cup.json")),
            default_max_points: Some(50),
            strict_status_transitions: true,
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_config_parse() {
        let yaml = "default_max_points: 75\n";
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.effective_max_points(), 75);
        assert!(config.data_file.is_none());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "max_pts: 75\n";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = Config {
            data_file: Some(PathBuf::new()),
            default_max_points: Some(0),
            strict_status_transitions: false,
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("default_max_points"));
    }
}
