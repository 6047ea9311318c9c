//! Pitch Arsenal
//!
//! Maps pitch labels to [`PitchProfile`]s. Each profile is a small factory:
//! given the strike zone and an RNG it produces a fresh [`PitchDefinition`].
//!
//! ## Usage
//!
//! ```rust
//! use bb_core::arsenal::default_arsenal;
//! use bb_core::engine::{EngineConfig, PitchLabel};
//! use rand::SeedableRng;
//!
//! let arsenal = default_arsenal();
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
//! let pitch = arsenal.generate(PitchLabel::SLIDER, &EngineConfig::default(), &mut rng).unwrap();
//! assert_eq!(pitch.label, PitchLabel::SLIDER);
//! ```

mod profile;

pub use profile::{PitchProfile, TravelRange};

use std::path::Path;
use std::sync::OnceLock;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::config::EngineConfig;
use crate::engine::pitch::{PitchDefinition, PitchLabel};
use crate::error::{EngineError, Result};

// =============================================================================
// Embedded Data
// =============================================================================

/// Default arsenal YAML (embedded at compile time)
pub const DEFAULT_ARSENAL_YAML: &str = include_str!("../../../../data/arsenals/default.yaml");

static DEFAULT_ARSENAL: OnceLock<Arsenal> = OnceLock::new();

/// The embedded default arsenal, parsed on first use.
///
/// # Panics
///
/// Panics if the embedded YAML fails to parse (it is compiled into the
/// binary, so a normal build never hits this).
pub fn default_arsenal() -> &'static Arsenal {
    DEFAULT_ARSENAL.get_or_init(|| {
        Arsenal::from_yaml_str(DEFAULT_ARSENAL_YAML).expect("Failed to parse data/arsenals/default.yaml")
    })
}

// =============================================================================
// Arsenal
// =============================================================================

/// On-disk shape
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ArsenalFile {
    pitches: Vec<PitchProfile>,
}

/// Ordered set of pitch profiles, unique by label
#[derive(Debug, Clone, PartialEq)]
pub struct Arsenal {
    profiles: Vec<PitchProfile>,
}

impl Arsenal {
    pub fn new(profiles: Vec<PitchProfile>) -> Result<Self> {
        if profiles.is_empty() {
            return Err(EngineError::NoActions);
        }
        for (i, p) in profiles.iter().enumerate() {
            p.validate().map_err(EngineError::InvalidPitch)?;
            if profiles[..i].iter().any(|q| q.label == p.label) {
                return Err(EngineError::InvalidPitch(format!("duplicate pitch label {}", p.label)));
            }
        }
        Ok(Self { profiles })
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let file: ArsenalFile = serde_yaml::from_str(s)?;
        Self::new(file.pitches)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let file: ArsenalFile = serde_json::from_str(s)?;
        Self::new(file.pitches)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let arsenal = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text)?,
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text)?,
            other => {
                return Err(EngineError::InvalidConfig(format!(
                    "unsupported arsenal extension: {:?}",
                    other
                )))
            }
        };
        log::info!("[ARSENAL] loaded {} pitches from {}", arsenal.len(), path.display());
        Ok(arsenal)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&ArsenalFile { pitches: self.profiles.clone() })?)
    }

    /// Labels in file order (the AI's action set)
    pub fn labels(&self) -> Vec<PitchLabel> {
        self.profiles.iter().map(|p| p.label).collect()
    }

    pub fn profiles(&self) -> &[PitchProfile] {
        &self.profiles
    }

    pub fn get(&self, label: PitchLabel) -> Option<&PitchProfile> {
        self.profiles.iter().find(|p| p.label == label)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Produce a fresh pitch of type `label` aimed around the configured zone
    pub fn generate<R: Rng + ?Sized>(
        &self,
        label: PitchLabel,
        config: &EngineConfig,
        rng: &mut R,
    ) -> Result<PitchDefinition> {
        let profile = self.get(label).ok_or_else(|| EngineError::UnknownPitch(label.to_string()))?;
        let pitch = profile.generate(&config.strike_zone.rect, config.contact.ball_radius, rng);
        pitch.validate()?;
        Ok(pitch)
    }
}
