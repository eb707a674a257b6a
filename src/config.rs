// Configuration loading and parsing (draft.toml).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::scoring::ScoringWeights;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

/// Per-run simulation configuration.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for lottery draws. Fixed seed -> reproducible run.
    pub seed: u64,
    /// Autopick scoring weights (percentages summing to 100).
    pub weights: ScoringWeights,
    /// Regular-phase pick count after which an autonomous team finishes.
    /// Conventional target; the state machine never hard-enforces it.
    pub regular_target_picks: u32,
    /// Development-phase pick count after which an autonomous team finishes.
    pub development_target_picks: u32,
    /// Whether the driver awaits the lottery-reveal hook (animation
    /// enabled) after each resolution pass.
    pub reveal_lottery: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            seed: 1,
            weights: ScoringWeights::default(),
            regular_target_picks: 10,
            development_target_picks: 3,
            reveal_lottery: true,
        }
    }
}

// ---------------------------------------------------------------------------
// draft.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire draft.toml file.
#[derive(Debug, Clone, Deserialize)]
struct DraftFile {
    simulation: SimulationSection,
    weights: ScoringWeights,
}

#[derive(Debug, Clone, Deserialize)]
struct SimulationSection {
    seed: u64,
    regular_target_picks: u32,
    development_target_picks: u32,
    #[serde(default = "default_reveal")]
    reveal_lottery: bool,
}

fn default_reveal() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load and validate a simulation config from a TOML file.
pub fn load_config(path: &Path) -> Result<SimConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    let file: DraftFile = toml::from_str(&content).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })?;

    let config = SimConfig {
        seed: file.simulation.seed,
        weights: file.weights,
        regular_target_picks: file.simulation.regular_target_picks,
        development_target_picks: file.simulation.development_target_picks,
        reveal_lottery: file.simulation.reveal_lottery,
    };
    validate(&config)?;
    Ok(config)
}

/// Validate a config. The file loader is strict about weights; the engine
/// itself accepts off-contract weights in degraded mode.
pub fn validate(config: &SimConfig) -> Result<(), ConfigError> {
    if let Err(e) = config.weights.validate() {
        return Err(ConfigError::ValidationError {
            field: "weights".to_string(),
            message: e.to_string(),
        });
    }
    if config.regular_target_picks == 0 {
        return Err(ConfigError::ValidationError {
            field: "regular_target_picks".to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "draft-engine-config-test-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_a_valid_file() {
        let path = write_temp(
            r#"
            [simulation]
            seed = 42
            regular_target_picks = 8
            development_target_picks = 2

            [weights]
            vote = 40
            team_needs = 30
            player_rating = 20
            realism = 10
            "#,
        );
        let config = load_config(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.seed, 42);
        assert_eq!(config.regular_target_picks, 8);
        assert_eq!(config.weights.vote, 40);
        assert!(config.reveal_lottery);
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let result = load_config(Path::new("/nonexistent/draft.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn bad_weight_sum_fails_validation() {
        let mut config = SimConfig::default();
        config.weights.vote = 99;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn zero_regular_target_fails_validation() {
        let mut config = SimConfig::default();
        config.regular_target_picks = 0;
        assert!(validate(&config).is_err());
    }
}
