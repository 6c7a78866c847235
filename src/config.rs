//! Engine configuration, loaded from JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{AlgorithmType, LifeRule, RuleError};

fn default_rule() -> String {
    LifeRule::conway().notation()
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Evaluator used by [`crate::Simulation`] and the CLI.
    #[serde(default)]
    pub algorithm: AlgorithmType,
    /// Transition rule in B/S notation.
    #[serde(default = "default_rule")]
    pub rule: String,
    #[serde(default)]
    pub naive: NaiveConfig,
    #[serde(default)]
    pub hashlife: HashLifeConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmType::default(),
            rule: default_rule(),
            naive: NaiveConfig::default(),
            hashlife: HashLifeConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

/// Naive evaluator tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NaiveConfig {
    /// Candidate count above which neighbor counting runs on the rayon pool.
    pub parallel_threshold: usize,
}

impl Default for NaiveConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 4096,
        }
    }
}

/// HashLife evaluator tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashLifeConfig {
    /// Node count above which the canonical node table is dropped between evaluations.
    pub max_nodes: usize,
}

impl Default for HashLifeConfig {
    fn default() -> Self {
        Self {
            max_nodes: 4_000_000,
        }
    }
}

/// Temporal stepping of a running simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Generations advanced per simulation step.
    pub generations_per_step: u64,
    /// Steps per second while running.
    pub target_steps_per_second: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            generations_per_step: 1,
            target_steps_per_second: 10.0,
        }
    }
}

impl EngineConfig {
    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: EngineConfig = serde_json::from_str(&text)?;
        config.validate()?;
        log::debug!("loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Parsed transition rule
    pub fn life_rule(&self) -> Result<LifeRule, ConfigError> {
        Ok(self.rule.parse()?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.life_rule()?;
        if self.simulation.generations_per_step == 0 {
            return Err(ConfigError::InvalidGenerationsPerStep);
        }
        let rate = self.simulation.target_steps_per_second;
        if rate.is_nan() || rate <= 0.0 {
            return Err(ConfigError::InvalidStepRate);
        }
        if self.hashlife.max_nodes == 0 {
            return Err(ConfigError::InvalidNodeLimit);
        }
        Ok(())
    }

    pub fn to_json(&self) -> String {
        // Plain data with string keys always serializes.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid rule: {0}")]
    Rule(#[from] RuleError),
    #[error("Generations per step must be at least 1")]
    InvalidGenerationsPerStep,
    #[error("Target steps per second must be positive")]
    InvalidStepRate,
    #[error("HashLife node limit must be non-zero")]
    InvalidNodeLimit,
}
