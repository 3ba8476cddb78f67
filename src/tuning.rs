//! Data-driven game balance
//!
//! Balance knobs carried as data so a driver can load them from JSON.
//! Defaults are the shipped values.

use serde::{Deserialize, Serialize};

use crate::consts::{HIGHLIGHT_DURATION, LAUNCH_PROBABILITY};

/// Errors from loading tuning data.
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value: {0}")]
    Invalid(&'static str),
}

/// Game balance knobs. Fields omitted from a JSON document keep their
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Base per-tick, per-candidate highlight probability factor
    pub launch_probability: f64,
    /// Countdown granted when a cell becomes highlighted (seconds)
    pub highlight_duration: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            launch_probability: LAUNCH_PROBABILITY,
            highlight_duration: HIGHLIGHT_DURATION,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file.
    pub fn from_path(path: &std::path::Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), TuningError> {
        if !(self.launch_probability > 0.0 && self.launch_probability <= 1.0) {
            return Err(TuningError::Invalid(
                "launch_probability must be in (0, 1]",
            ));
        }
        if !(self.highlight_duration > 0.0) {
            return Err(TuningError::Invalid("highlight_duration must be positive"));
        }
        Ok(())
    }
}
