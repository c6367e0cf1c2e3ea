//! Decomposition tuning.

use serde::{Deserialize, Serialize};

use crate::filter::{DEFAULT_ANOMALOUS_PREFIXES, DEFAULT_ANOMALOUS_SUFFIXES};

/// Premium share at or above which a column is reflowed as premium
pub const DEFAULT_PREMIUM_THRESHOLD: f64 = 0.3;

/// Tuning knobs for one decomposition run.
///
/// Defaults match the live tree: slave units fold into their masters, event
/// ids are filtered out, and a column flips to premium at 30% premium
/// content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecomposeConfig {
    /// Premium share at or above which a column is reflowed as premium
    pub premium_threshold: f64,
    /// Emit slave units as their own nodes instead of suppressing them
    pub process_slave_units: bool,
    /// Id suffixes of event entries to filter out
    pub anomalous_suffixes: Vec<String>,
    /// Id prefixes of event entries to filter out
    pub anomalous_prefixes: Vec<String>,
}

impl Default for DecomposeConfig {
    fn default() -> Self {
        DecomposeConfig {
            premium_threshold: DEFAULT_PREMIUM_THRESHOLD,
            process_slave_units: false,
            anomalous_suffixes: DEFAULT_ANOMALOUS_SUFFIXES
                .iter()
                .map(ToString::to_string)
                .collect(),
            anomalous_prefixes: DEFAULT_ANOMALOUS_PREFIXES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl DecomposeConfig {
    pub fn suppress_slaves(&self) -> bool {
        !self.process_slave_units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DecomposeConfig::default();
        assert!(config.suppress_slaves());
        assert!((config.premium_threshold - 0.3).abs() < 1e-9);
        assert!(config.anomalous_suffixes.iter().any(|s| s == "_race"));
        assert!(config.anomalous_prefixes.iter().any(|p| p == "ucav_"));
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: DecomposeConfig =
            serde_json::from_str(r#"{ "premium_threshold": 0.5 }"#).unwrap();
        assert!((config.premium_threshold - 0.5).abs() < 1e-9);
        assert!(config.suppress_slaves());
        assert!(!config.anomalous_suffixes.is_empty());
    }
}
