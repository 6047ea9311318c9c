//! # Engine Configuration Module
//!
//! Every tuning constant of the pitch engine lives here.
//!
//! ## Presets
//! - `EngineConfig::default()`: standard windows and tables
//! - `EngineConfig::arcade()`: forgiving timing, bigger contact zone
//! - `EngineConfig::hardcore()`: tight timing
//! - `EngineConfig::deterministic()`: no random downgrades, greedy AI (tests)
//!
//! ## Usage
//! ```rust
//! use bb_core::engine::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! let arcade = EngineConfig::arcade();
//! assert!(arcade.timing.contact.foul_ms > config.timing.contact.foul_ms);
//! ```

mod contact_config;
mod learning_config;
mod outcome_config;
mod timing_config;

pub use contact_config::{ContactConfig, StrikeZoneConfig};
pub use learning_config::LearningConfig;
pub use outcome_config::{HitTable, HitTableConfig, RewardConfig};
pub use timing_config::{TimingConfig, TimingWindow};

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Full engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
#[serde(default)]
pub struct EngineConfig {
    /// Phase lengths and swing windows
    pub timing: TimingConfig,
    /// Bat contact geometry
    pub contact: ContactConfig,
    /// Strike zone rectangle
    pub strike_zone: StrikeZoneConfig,
    /// Hit-type tables
    pub hit_tables: HitTableConfig,
    /// Reward lookup
    pub rewards: RewardConfig,
    /// Q-learning parameters
    pub learning: LearningConfig,
}

impl EngineConfig {
    /// Standard play (default)
    pub fn standard() -> Self {
        Self::default()
    }

    /// Forgiving windows and a thicker bat
    pub fn arcade() -> Self {
        let mut cfg = Self::default();
        cfg.timing.contact = TimingWindow { perfect_ms: 45.0, foul_ms: 90.0 };
        cfg.timing.power = TimingWindow { perfect_ms: 30.0, foul_ms: 55.0 };
        cfg.contact.high_zone_height = 40.0;
        cfg.contact.low_zone_height = 70.0;
        cfg.hit_tables.mismatch_out_chance = 0.3;
        cfg
    }

    /// Tight windows
    pub fn hardcore() -> Self {
        let mut cfg = Self::default();
        cfg.timing.contact = TimingWindow { perfect_ms: 20.0, foul_ms: 45.0 };
        cfg.timing.power = TimingWindow { perfect_ms: 12.0, foul_ms: 25.0 };
        cfg.hit_tables.mismatch_out_chance = 0.7;
        cfg
    }

    /// For tests: no aim-mismatch downgrades and a greedy pitcher
    pub fn deterministic() -> Self {
        let mut cfg = Self::default();
        cfg.hit_tables.mismatch_out_chance = 0.0;
        cfg.learning.epsilon = 0.0;
        cfg.learning.min_epsilon = 0.0;
        cfg
    }

    pub fn validate(&self) -> Result<()> {
        self.timing
            .validate()
            .and_then(|_| self.contact.validate())
            .and_then(|_| self.strike_zone.validate())
            .and_then(|_| self.hit_tables.validate())
            .and_then(|_| self.learning.validate())
            .and_then(|_| self.rewards.validate())
            .map_err(EngineError::InvalidConfig)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            other => Err(EngineError::InvalidConfig(format!(
                "unsupported config extension: {:?}",
                other
            ))),
        }
    }

    /// JSON schema of the config file format
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(EngineConfig)
    }
}

#[inline]
pub(crate) fn at_least(v: f64, min: f64) -> bool {
    v.is_finite() && v >= min
}

#[inline]
pub(crate) fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.timing.follow_through_ms, 700.0);
        assert_eq!(cfg.timing.contact_delay_ms, 150.0);
        assert_eq!(cfg.contact.zone_width, 120.0);
        assert_eq!(cfg.contact.low_zone_height, 50.0);
        assert_eq!(cfg.contact.high_zone_height, 25.0);
        assert!((cfg.learning.alpha - 0.5).abs() < 1e-12);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid_and_ordered() {
        let standard = EngineConfig::standard();
        let arcade = EngineConfig::arcade();
        let hardcore = EngineConfig::hardcore();

        for cfg in [&standard, &arcade, &hardcore, &EngineConfig::deterministic()] {
            assert!(cfg.validate().is_ok());
        }
        assert!(arcade.timing.power.perfect_ms > standard.timing.power.perfect_ms);
        assert!(hardcore.timing.power.perfect_ms < standard.timing.power.perfect_ms);
        // Power windows stay tighter than contact windows in every preset
        for cfg in [&standard, &arcade, &hardcore] {
            assert!(cfg.timing.power.foul_ms < cfg.timing.contact.foul_ms);
        }
    }

    #[test]
    fn test_validate_rejects_unordered_tables() {
        let mut cfg = EngineConfig::default();
        cfg.hit_tables.power.double = 2.0; // below single (3.0)
        assert!(matches!(cfg.validate(), Err(EngineError::InvalidConfig(_))));

        let mut cfg = EngineConfig::default();
        cfg.timing.contact.foul_ms = 10.0; // below perfect (30.0)
        assert!(cfg.validate().is_err());

        let mut cfg = EngineConfig::default();
        cfg.contact.ball_radius = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_non_finite_reward_rejected_on_load() {
        let yaml = "rewards:\n  home_run: .nan\n";
        assert!(matches!(EngineConfig::from_yaml_str(yaml), Err(EngineError::InvalidConfig(_))));

        let yaml = "rewards:\n  strikeout: .inf\n";
        assert!(EngineConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "timing:\n  windup_ms: 500\nlearning:\n  alpha: 0.25\n";
        let cfg = EngineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.timing.windup_ms, 500.0);
        assert_eq!(cfg.timing.follow_through_ms, 700.0);
        assert_eq!(cfg.learning.alpha, 0.25);
        assert_eq!(cfg.hit_tables.contact.single, 8.0);
    }

    #[test]
    fn test_config_serialization() {
        let cfg = EngineConfig::arcade();
        let json = serde_json::to_string(&cfg).unwrap();
        let parsed = EngineConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed.timing.contact.foul_ms, cfg.timing.contact.foul_ms);
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("engine.json");
        std::fs::write(&json_path, r#"{"timing": {"windup_ms": 800}}"#).unwrap();
        assert_eq!(EngineConfig::load(&json_path).unwrap().timing.windup_ms, 800.0);

        let yaml_path = dir.path().join("engine.yml");
        let mut f = std::fs::File::create(&yaml_path).unwrap();
        writeln!(f, "hit_tables:\n  mismatch_out_chance: 0.1").unwrap();
        drop(f);
        assert_eq!(EngineConfig::load(&yaml_path).unwrap().hit_tables.mismatch_out_chance, 0.1);

        let txt_path = dir.path().join("engine.txt");
        std::fs::write(&txt_path, "").unwrap();
        assert!(EngineConfig::load(&txt_path).is_err());
    }

    #[test]
    fn test_schema_mentions_sections() {
        let schema = serde_json::to_string(&EngineConfig::json_schema()).unwrap();
        assert!(schema.contains("timing"));
        assert!(schema.contains("hit_tables"));
    }
}
