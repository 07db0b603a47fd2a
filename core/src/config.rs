use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::info;

use crate::{error::ConfigError, outcome::BiasPolicy, sequencer::ScreenTiming};

/// Load a JSON configuration from disk, creating it with the provided initializer if missing.
pub fn load_or_init<T, F>(path: &Path, initializer: F) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> T,
{
    if path.exists() {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let value = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;
        Ok(value)
    } else {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let value = initializer();
        let serialized = serde_json::to_string_pretty(&value)?;
        fs::write(path, serialized)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        info!(path = %path.display(), "wrote default config");
        Ok(value)
    }
}

/// Simulated participant used for headless runs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Responses land uniformly within this many degrees of the stimulus.
    pub noise_deg: f64,
    /// Chance of turning the dial a full extra revolution.
    pub long_way_probability: f64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            noise_deg: 12.0,
            long_way_probability: 0.1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub seed: u64,
    pub trials_per_shape: usize,
    pub cardinal_directions: Vec<u16>,
    pub bias: BiasPolicy,
    pub timing: ScreenTiming,
    pub observer: ObserverConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            trials_per_shape: 30,
            cardinal_directions: vec![0, 90],
            bias: BiasPolicy::default(),
            timing: ScreenTiming::default(),
            observer: ObserverConfig::default(),
        }
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { field, value })
    }
}

fn check_degrees(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeDegrees { field, value })
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("bias.gate_probability", self.bias.gate_probability)?;
        check_probability("observer.long_way_probability", self.observer.long_way_probability)?;
        check_degrees("bias.magnitude_deg", self.bias.magnitude_deg)?;
        check_degrees("bias.max_error_deg", self.bias.max_error_deg)?;
        check_degrees("bias.cardinal_tolerance_deg", self.bias.cardinal_tolerance_deg)?;
        check_degrees("observer.noise_deg", self.observer.noise_deg)?;

        if self.cardinal_directions.is_empty() {
            return Err(ConfigError::NoCardinalDirections);
        }
        if let Some(&out_of_range) = self.cardinal_directions.iter().find(|&&deg| deg >= 180) {
            return Err(ConfigError::CardinalOutOfRange(out_of_range));
        }
        if self.trials_per_shape < self.cardinal_directions.len() {
            return Err(ConfigError::TooFewTrials {
                trials: self.trials_per_shape,
                cardinals: self.cardinal_directions.len(),
            });
        }

        Ok(())
    }
}
