//! Scripted batters for headless play

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::engine::config::EngineConfig;
use crate::engine::pitch::{PitchDefinition, SwingAim, SwingCategory, SwingInput};
use crate::engine::trajectory::Position3;
use crate::engine::zone::{RectZone, ZoneClassifier};
use crate::error::{EngineError, Result};
use crate::game::GameCount;

/// What a batter gets to see of an incoming pitch
#[derive(Debug, Clone, Copy)]
pub struct PitchView<'a> {
    pub pitch: &'a PitchDefinition,
    /// Pitch-relative start of Flight (ms)
    pub windup_ms: f64,
    /// Pitch-relative scripted arrival (ms)
    pub arrival_ms: f64,
    /// Where the ball will cross the plate
    pub arrival: Position3,
    pub count: &'a GameCount,
}

/// Decides whether and when to swing at a pitch
pub trait BatterModel {
    fn decide(&mut self, view: &PitchView<'_>, config: &EngineConfig) -> Option<SwingInput>;
}

/// Never swings
#[derive(Debug, Default, Clone, Copy)]
pub struct TakeEveryPitch;

impl BatterModel for TakeEveryPitch {
    fn decide(&mut self, _view: &PitchView<'_>, _config: &EngineConfig) -> Option<SwingInput> {
        None
    }
}

/// Tendencies of the scripted batter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatterProfile {
    /// Swing probability on pitches that will be strikes (default: 0.7)
    pub swing_in_zone: f64,
    /// Swing probability on pitches out of the zone (default: 0.25)
    pub chase_rate: f64,
    /// Std-dev of swing timing error (ms, default: 35)
    pub timing_sd_ms: f64,
}

impl Default for BatterProfile {
    fn default() -> Self {
        Self { swing_in_zone: 0.7, chase_rate: 0.25, timing_sd_ms: 35.0 }
    }
}

/// Scripted batter: reads the pitch location, swings with Gaussian timing
/// error, aims at the ball's height and sells out for power when ahead
/// in the count.
#[derive(Debug, Clone)]
pub struct AutoBatter {
    profile: BatterProfile,
    timing_error: Normal<f64>,
    rng: ChaCha8Rng,
}

impl AutoBatter {
    pub fn new(profile: BatterProfile, seed: u64) -> Result<Self> {
        for (name, p) in [("swing_in_zone", profile.swing_in_zone), ("chase_rate", profile.chase_rate)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(EngineError::InvalidConfig(format!("batter.{} must be in [0, 1], got {}", name, p)));
            }
        }
        if !(profile.timing_sd_ms.is_finite() && profile.timing_sd_ms >= 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "batter.timing_sd_ms must be finite and >= 0, got {}",
                profile.timing_sd_ms
            )));
        }
        let timing_error = Normal::new(0.0, profile.timing_sd_ms)
            .map_err(|e| EngineError::InvalidConfig(format!("batter.timing_sd_ms: {}", e)))?;
        Ok(Self { profile, timing_error, rng: ChaCha8Rng::seed_from_u64(seed) })
    }

    pub fn profile(&self) -> &BatterProfile {
        &self.profile
    }
}

impl BatterModel for AutoBatter {
    fn decide(&mut self, view: &PitchView<'_>, config: &EngineConfig) -> Option<SwingInput> {
        let ball = view.arrival.xy();
        let in_zone = RectZone::from_config(&config.strike_zone).in_zone(ball, config.contact.ball_radius);
        let swing_chance = if in_zone { self.profile.swing_in_zone } else { self.profile.chase_rate };
        if !self.rng.gen_bool(swing_chance) {
            return None;
        }

        // Swings land on the ball when timed one offset ahead of arrival
        let ideal = view.arrival_ms - config.timing.swing_offset_ms;
        let timestamp = (ideal + self.timing_error.sample(&mut self.rng)).max(view.windup_ms);

        let aim = if ball.y < config.strike_zone.rect.center.y { SwingAim::High } else { SwingAim::Low };
        let category = if view.count.balls > view.count.strikes && view.count.strikes < 2 {
            SwingCategory::Power
        } else {
            SwingCategory::Contact
        };

        Some(SwingInput::new(category, aim, timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::geometry::Point2;
    use crate::engine::pitch::PitchLabel;

    fn pitch() -> PitchDefinition {
        PitchDefinition::new(PitchLabel::FOUR_SEAM, Point2::new(650.0, 300.0), 0.0, 40.0, 0.0, 0.0, 370.0)
            .unwrap()
    }

    fn view<'a>(pitch: &'a PitchDefinition, count: &'a GameCount, y: f64) -> PitchView<'a> {
        PitchView {
            pitch,
            windup_ms: 1000.0,
            arrival_ms: 1370.0,
            arrival: Position3 { x: 640.0, y, depth: 320.0 },
            count,
        }
    }

    #[test]
    fn test_always_swinging_batter_aims_at_ball_height() {
        let profile = BatterProfile { swing_in_zone: 1.0, chase_rate: 1.0, timing_sd_ms: 0.0 };
        let mut batter = AutoBatter::new(profile, 5).unwrap();
        let cfg = EngineConfig::default();
        let p = pitch();
        let count = GameCount::new();

        let high = batter.decide(&view(&p, &count, 420.0), &cfg).unwrap();
        assert_eq!(high.aim, SwingAim::High);
        assert_eq!(high.timestamp_ms, 1370.0 - cfg.timing.swing_offset_ms);

        let low = batter.decide(&view(&p, &count, 520.0), &cfg).unwrap();
        assert_eq!(low.aim, SwingAim::Low);
        assert_eq!(low.category, SwingCategory::Contact);
    }

    #[test]
    fn test_hitters_count_means_power() {
        let profile = BatterProfile { swing_in_zone: 1.0, chase_rate: 1.0, timing_sd_ms: 0.0 };
        let mut batter = AutoBatter::new(profile, 5).unwrap();
        let count = GameCount { balls: 2, strikes: 0, ..Default::default() };
        let p = pitch();
        let swing = batter.decide(&view(&p, &count, 470.0), &EngineConfig::default()).unwrap();
        assert_eq!(swing.category, SwingCategory::Power);
    }

    #[test]
    fn test_disciplined_batter_takes_balls() {
        let profile = BatterProfile { swing_in_zone: 1.0, chase_rate: 0.0, timing_sd_ms: 10.0 };
        let mut batter = AutoBatter::new(profile, 5).unwrap();
        let count = GameCount::new();
        let p = pitch();
        // Far below the zone bottom (555)
        for _ in 0..50 {
            assert!(batter.decide(&view(&p, &count, 700.0), &EngineConfig::default()).is_none());
        }
    }

    #[test]
    fn test_rejects_bad_profile() {
        let bad = BatterProfile { chase_rate: 2.0, ..Default::default() };
        assert!(AutoBatter::new(bad, 1).is_err());
        let bad = BatterProfile { timing_sd_ms: -1.0, ..Default::default() };
        assert!(AutoBatter::new(bad, 1).is_err());
    }
}
