use chrono::Duration;
use serde::{Deserialize, Serialize};
use crate::constants::{DEFAULT_INTERVAL_MINUTES, DEFAULT_TIME_WINDOW_MINUTES, DEFAULT_UNDO_LEVELS};
use crate::time::iso_duration_serde;
use super::{Comfort, Distribution};

/// Defaults applied to freshly created or reset configuration records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfSettings {
    #[serde(with = "iso_duration_serde", default = "default_time_window")]
    pub default_time_window: Duration,
    #[serde(with = "iso_duration_serde", default = "default_interval")]
    pub default_interval: Duration,
    #[serde(default)]
    pub default_comfort: Comfort,
    #[serde(default)]
    pub default_constraint_distribution: Distribution,
    #[serde(default = "default_true")]
    pub use_electrical_profiles: bool,
    #[serde(default = "default_true")]
    pub use_speed_limits_for_simulation: bool,
    #[serde(default = "default_undo_levels")]
    pub undo_levels: usize,
}

fn default_time_window() -> Duration {
    Duration::minutes(DEFAULT_TIME_WINDOW_MINUTES)
}

fn default_interval() -> Duration {
    Duration::minutes(DEFAULT_INTERVAL_MINUTES)
}

fn default_true() -> bool {
    true
}

fn default_undo_levels() -> usize {
    DEFAULT_UNDO_LEVELS
}

impl Default for ConfSettings {
    fn default() -> Self {
        Self {
            default_time_window: default_time_window(),
            default_interval: default_interval(),
            default_comfort: Comfort::default(),
            default_constraint_distribution: Distribution::default(),
            use_electrical_profiles: true,
            use_speed_limits_for_simulation: true,
            undo_levels: DEFAULT_UNDO_LEVELS,
        }
    }
}

impl ConfSettings {
    /// Create new settings with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from JSON, filling in defaults for missing fields
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the pacing is not positive
    pub fn from_json(json: &str) -> Result<Self, String> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse settings: {e}"))?;

        if settings.default_interval <= Duration::zero() {
            return Err("Default interval must be positive".to_string());
        }
        if settings.default_time_window <= Duration::zero() {
            return Err("Default time window must be positive".to_string());
        }

        Ok(settings)
    }

    /// Serialize settings to JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be serialized
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("Failed to serialize settings: {e}"))
    }
}
