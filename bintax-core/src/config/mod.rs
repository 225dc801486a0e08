//! Configuration types for bintax

use crate::error::{BintaxError, BintaxResult};
use crate::types::{RankSet, CANONICAL_RANKS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Consensus voting method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ConsensusMethod {
    /// Vote on the full label tuple down to the current depth
    #[default]
    Full,
    /// Vote on the single label at the current rank, ignoring ancestors
    Rank,
}

/// Settings for a consensus/reconciliation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusConfig {
    /// Agreement threshold in percent, inclusive, in (0, 100]
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub method: ConsensusMethod,
    /// Discard placeholder-bearing candidate groups before the vote
    #[serde(default)]
    pub exclude_missing_data: bool,
    /// Ordered rank names, parent first
    #[serde(default = "default_ranks")]
    pub ranks: Vec<String>,
    /// Worker threads (0 = all available)
    #[serde(default)]
    pub threads: usize,
}

fn default_threshold() -> f64 {
    80.0
}

fn default_ranks() -> Vec<String> {
    CANONICAL_RANKS.iter().map(|r| r.to_string()).collect()
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            method: ConsensusMethod::default(),
            exclude_missing_data: false,
            ranks: default_ranks(),
            threads: 0,
        }
    }
}

impl ConsensusConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> BintaxResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| BintaxError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check threshold bounds and rank list
    pub fn validate(&self) -> BintaxResult<()> {
        if !(self.threshold > 0.0 && self.threshold <= 100.0) {
            return Err(BintaxError::InvalidThreshold {
                value: self.threshold,
            });
        }
        if self.ranks.is_empty() {
            return Err(BintaxError::InsufficientRanks);
        }
        Ok(())
    }

    /// The configured ranks as a [`RankSet`]
    pub fn rank_set(&self) -> BintaxResult<RankSet> {
        RankSet::new(self.ranks.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ConsensusConfig::default();
        assert_eq!(config.threshold, 80.0);
        assert_eq!(config.method, ConsensusMethod::Full);
        assert!(!config.exclude_missing_data);
        assert_eq!(config.ranks.len(), 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_defaults_apply() {
        let config: ConsensusConfig = toml::from_str("threshold = 90.0").unwrap();
        assert_eq!(config.threshold, 90.0);
        assert_eq!(config.method, ConsensusMethod::Full);
        assert_eq!(config.ranks.first().map(String::as_str), Some("kingdom"));
    }

    #[test]
    fn test_method_parses_lowercase() {
        let config: ConsensusConfig = toml::from_str(r#"method = "rank""#).unwrap();
        assert_eq!(config.method, ConsensusMethod::Rank);
    }

    #[test]
    fn test_threshold_bounds() {
        let mut config = ConsensusConfig {
            threshold: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        config.threshold = 100.0;
        assert!(config.validate().is_ok());
        config.threshold = 100.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_ranks_rejected() {
        let config = ConsensusConfig {
            ranks: vec![],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BintaxError::InsufficientRanks)
        ));
    }
}
