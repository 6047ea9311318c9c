//! Pitch data model
//!
//! - `PitchLabel`: compact pitch-type tag ("FF", "SL", ...)
//! - `PitchDefinition`: immutable parameters of one thrown pitch
//! - `SwingInput` / `TimingQuality`: the batter's single swing and its timing grade
//! - `Outcome`: terminal result of one pitch

use std::fmt;

use serde::{Deserialize, Serialize};

use super::config::TimingConfig;
use super::geometry::Point2;
use crate::error::{EngineError, Result};

// ============================================================================
// PitchLabel
// ============================================================================

/// Pitch-type label, 1-4 ASCII alphanumeric bytes stored inline.
///
/// `Copy` + `Hash` so it can sit inside Q-table keys without allocation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PitchLabel {
    bytes: [u8; 4],
    len: u8,
}

impl PitchLabel {
    pub const FOUR_SEAM: PitchLabel = PitchLabel::from_static("FF");
    pub const SINKER: PitchLabel = PitchLabel::from_static("SI");
    pub const SLIDER: PitchLabel = PitchLabel::from_static("SL");
    pub const CURVEBALL: PitchLabel = PitchLabel::from_static("CU");
    pub const CHANGEUP: PitchLabel = PitchLabel::from_static("CH");
    pub const CUTTER: PitchLabel = PitchLabel::from_static("FC");

    /// Build a label at compile time. Panics on an invalid literal.
    pub const fn from_static(s: &'static str) -> Self {
        let b = s.as_bytes();
        assert!(!b.is_empty() && b.len() <= 4, "pitch label must be 1-4 bytes");
        let mut bytes = [0u8; 4];
        let mut i = 0;
        while i < b.len() {
            assert!(b[i].is_ascii_alphanumeric(), "pitch label must be ASCII alphanumeric");
            bytes[i] = b[i];
            i += 1;
        }
        Self { bytes, len: b.len() as u8 }
    }

    pub fn new(s: &str) -> Result<Self> {
        let b = s.as_bytes();
        if b.is_empty() || b.len() > 4 || !b.iter().all(u8::is_ascii_alphanumeric) {
            return Err(EngineError::InvalidLabel(s.to_string()));
        }
        let mut bytes = [0u8; 4];
        bytes[..b.len()].copy_from_slice(b);
        Ok(Self { bytes, len: b.len() as u8 })
    }

    pub fn as_str(&self) -> &str {
        // Construction only admits ASCII
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or_default()
    }
}

impl fmt::Display for PitchLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for PitchLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PitchLabel({})", self.as_str())
    }
}

impl std::str::FromStr for PitchLabel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl Serialize for PitchLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PitchLabel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PitchLabel::new(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// PitchDefinition
// ============================================================================

/// Parameters of one thrown pitch
///
/// `vx`/`vy` are the *initial* velocities. The running integrator copies them
/// into its own accumulators, so a definition can be re-simulated any number
/// of times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchDefinition {
    pub label: PitchLabel,
    /// Release point (screen px)
    pub release: Point2,
    /// Initial horizontal velocity
    pub vx: f64,
    /// Initial vertical velocity
    pub vy: f64,
    /// Horizontal break (acceleration)
    pub ax: f64,
    /// Vertical break (acceleration)
    pub ay: f64,
    /// Release-to-plate travel time (ms)
    pub traveltime_ms: f64,
}

impl PitchDefinition {
    pub fn new(
        label: PitchLabel,
        release: Point2,
        vx: f64,
        vy: f64,
        ax: f64,
        ay: f64,
        traveltime_ms: f64,
    ) -> Result<Self> {
        let def = Self { label, release, vx, vy, ax, ay, traveltime_ms };
        def.validate()?;
        Ok(def)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.traveltime_ms.is_finite() && self.traveltime_ms > 0.0) {
            return Err(EngineError::InvalidPitch(format!(
                "traveltime_ms must be positive, got {}",
                self.traveltime_ms
            )));
        }
        let fields = [self.release.x, self.release.y, self.vx, self.vy, self.ax, self.ay];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::InvalidPitch(format!(
                "{}: non-finite release/velocity/break",
                self.label
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Swing
// ============================================================================

/// Swing category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwingCategory {
    /// Wider timing windows, singles-heavy payoff
    Contact,
    /// Tighter timing windows, extra-base payoff
    Power,
}

/// Vertical aim of the swing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwingAim {
    High,
    Low,
}

/// The batter's swing, captured at most once per pitch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingInput {
    pub category: SwingCategory,
    pub aim: SwingAim,
    /// Pitch-relative time the swing began (ms since `start_pitch`)
    pub timestamp_ms: f64,
    /// Cursor/bat point, when the front end tracks one. Defaults per aim otherwise.
    pub bat_point: Option<Point2>,
}

impl SwingInput {
    pub fn new(category: SwingCategory, aim: SwingAim, timestamp_ms: f64) -> Self {
        Self { category, aim, timestamp_ms, bat_point: None }
    }

    pub fn with_bat_point(mut self, bat_point: Point2) -> Self {
        self.bat_point = Some(bat_point);
        self
    }
}

/// Swing timing grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingQuality {
    None,
    Foul,
    Perfect,
}

impl TimingQuality {
    /// Grade a swing against the scripted arrival time.
    ///
    /// `|swing_time + offset - arrival|` is compared with the perfect and
    /// foul thresholds of the swing category (inclusive bounds).
    pub fn classify(
        category: SwingCategory,
        swing_time_ms: f64,
        arrival_ms: f64,
        timing: &TimingConfig,
    ) -> Self {
        let error = (swing_time_ms + timing.swing_offset_ms - arrival_ms).abs();
        let window = timing.window(category);
        if error <= window.perfect_ms {
            TimingQuality::Perfect
        } else if error <= window.foul_ms {
            TimingQuality::Foul
        } else {
            TimingQuality::None
        }
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// Terminal result of one pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Ball,
    CalledStrike,
    SwingingStrike,
    Foul,
    Flyout,
    Groundout,
    Single,
    Double,
    Triple,
    HomeRun,
}

impl Outcome {
    pub const ALL: [Outcome; 10] = [
        Outcome::Ball,
        Outcome::CalledStrike,
        Outcome::SwingingStrike,
        Outcome::Foul,
        Outcome::Flyout,
        Outcome::Groundout,
        Outcome::Single,
        Outcome::Double,
        Outcome::Triple,
        Outcome::HomeRun,
    ];

    pub fn is_hit(&self) -> bool {
        self.bases().is_some()
    }

    /// Bases awarded to the batter on a hit
    pub fn bases(&self) -> Option<u8> {
        match self {
            Outcome::Single => Some(1),
            Outcome::Double => Some(2),
            Outcome::Triple => Some(3),
            Outcome::HomeRun => Some(4),
            _ => None,
        }
    }

    pub fn is_strike(&self) -> bool {
        matches!(self, Outcome::CalledStrike | Outcome::SwingingStrike)
    }

    pub fn is_batted_out(&self) -> bool {
        matches!(self, Outcome::Flyout | Outcome::Groundout)
    }

    /// Short scoreboard text
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Ball => "BALL",
            Outcome::CalledStrike => "STRIKE",
            Outcome::SwingingStrike => "SWINGING STRIKE",
            Outcome::Foul => "FOUL",
            Outcome::Flyout => "FLYOUT",
            Outcome::Groundout => "GROUNDOUT",
            Outcome::Single => "SINGLE",
            Outcome::Double => "DOUBLE",
            Outcome::Triple => "TRIPLE",
            Outcome::HomeRun => "HOME RUN",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parsing() {
        assert_eq!(PitchLabel::new("SL").unwrap(), PitchLabel::SLIDER);
        assert_eq!(PitchLabel::new("KN").unwrap().as_str(), "KN");
        assert_eq!("FF".parse::<PitchLabel>().unwrap(), PitchLabel::FOUR_SEAM);
        assert!(PitchLabel::new("").is_err());
        assert!(PitchLabel::new("SPLIT").is_err());
        assert!(PitchLabel::new("S L").is_err());
    }

    #[test]
    fn test_label_serde_as_string() {
        let json = serde_json::to_string(&PitchLabel::CHANGEUP).unwrap();
        assert_eq!(json, "\"CH\"");
        let back: PitchLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PitchLabel::CHANGEUP);
        assert!(serde_json::from_str::<PitchLabel>("\"TOOLONG\"").is_err());
    }

    #[test]
    fn test_definition_rejects_bad_traveltime() {
        let release = Point2::new(650.0, 300.0);
        assert!(PitchDefinition::new(PitchLabel::FOUR_SEAM, release, 0.0, 40.0, 0.0, 0.0, 370.0).is_ok());
        assert!(PitchDefinition::new(PitchLabel::FOUR_SEAM, release, 0.0, 40.0, 0.0, 0.0, 0.0).is_err());
        assert!(PitchDefinition::new(PitchLabel::FOUR_SEAM, release, 0.0, 40.0, 0.0, 0.0, -1.0).is_err());
        assert!(
            PitchDefinition::new(PitchLabel::FOUR_SEAM, release, f64::NAN, 40.0, 0.0, 0.0, 370.0)
                .is_err()
        );
    }

    #[test]
    fn test_timing_windows_contact() {
        let timing = TimingConfig::default();
        let arrival = 1370.0;
        let perfect_swing = arrival - timing.swing_offset_ms;

        let grade = |dt: f64| {
            TimingQuality::classify(SwingCategory::Contact, perfect_swing + dt, arrival, &timing)
        };
        assert_eq!(grade(0.0), TimingQuality::Perfect);
        assert_eq!(grade(-30.0), TimingQuality::Perfect);
        assert_eq!(grade(45.0), TimingQuality::Foul);
        assert_eq!(grade(-60.0), TimingQuality::Foul);
        assert_eq!(grade(61.0), TimingQuality::None);
    }

    #[test]
    fn test_timing_windows_power_are_tighter() {
        let timing = TimingConfig::default();
        let arrival = 1370.0;
        let perfect_swing = arrival - timing.swing_offset_ms;

        let grade = |dt: f64| {
            TimingQuality::classify(SwingCategory::Power, perfect_swing + dt, arrival, &timing)
        };
        assert_eq!(grade(20.0), TimingQuality::Perfect);
        assert_eq!(grade(25.0), TimingQuality::Foul);
        assert_eq!(grade(-35.0), TimingQuality::Foul);
        assert_eq!(grade(45.0), TimingQuality::None);
    }

    #[test]
    fn test_outcome_helpers() {
        assert_eq!(Outcome::Double.bases(), Some(2));
        assert!(Outcome::HomeRun.is_hit());
        assert!(!Outcome::Foul.is_hit());
        assert!(Outcome::CalledStrike.is_strike());
        assert!(Outcome::Groundout.is_batted_out());
        assert_eq!(Outcome::ALL.len(), 10);
    }
}
