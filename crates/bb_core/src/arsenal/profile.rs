//! Pitch profiles: the data a pitch type is generated from

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::geometry::{Point2, Rect};
use crate::engine::pitch::{PitchDefinition, PitchLabel};
use crate::engine::trajectory::velocity_for_target;

/// Closed range of travel times (ms)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelRange {
    pub min: f64,
    pub max: f64,
}

impl TravelRange {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.max > self.min {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }
}

/// How a pitch type moves and where it tends to be aimed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchProfile {
    pub label: PitchLabel,
    #[serde(default)]
    pub name: String,
    pub release: Point2,
    pub traveltime_ms: TravelRange,
    /// Horizontal acceleration per tick
    pub break_x: f64,
    /// Vertical acceleration per tick
    pub break_y: f64,
    /// Probability of aiming inside the strike zone
    pub zone_rate: f64,
    /// Max distance outside the zone for chase targets (px)
    pub chase_margin: f64,
}

impl PitchProfile {
    pub(crate) fn validate(&self) -> Result<(), String> {
        let t = self.traveltime_ms;
        if !(t.min.is_finite() && t.max.is_finite() && t.min > 0.0 && t.max >= t.min) {
            return Err(format!("{}: traveltime_ms must satisfy 0 < min <= max, got {:?}", self.label, t));
        }
        if !(0.0..=1.0).contains(&self.zone_rate) {
            return Err(format!("{}: zone_rate must be in [0, 1], got {}", self.label, self.zone_rate));
        }
        if !(self.chase_margin.is_finite() && self.chase_margin >= 0.0) {
            return Err(format!("{}: chase_margin must be >= 0, got {}", self.label, self.chase_margin));
        }
        let values = [self.release.x, self.release.y, self.break_x, self.break_y];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(format!("{}: non-finite release/break", self.label));
        }
        Ok(())
    }

    /// Sample a plate target for this pitch.
    ///
    /// In-zone targets lie inside `zone`. Chase targets sit past one edge,
    /// further out than `ball_radius` so the ball cannot clip the zone.
    pub fn sample_target<R: Rng + ?Sized>(&self, zone: &Rect, ball_radius: f64, rng: &mut R) -> Point2 {
        let half_w = zone.width / 2.0;
        let half_h = zone.height / 2.0;
        let c = zone.center;

        if rng.gen_bool(self.zone_rate) {
            return Point2::new(
                c.x + rng.gen_range(-half_w..=half_w),
                c.y + rng.gen_range(-half_h..=half_h),
            );
        }

        let gap = ball_radius + 2.0 + rng.gen_range(0.0..=self.chase_margin);
        let along_x = c.x + rng.gen_range(-half_w..=half_w);
        let along_y = c.y + rng.gen_range(-half_h..=half_h);
        match rng.gen_range(0..4u8) {
            0 => Point2::new(c.x - half_w - gap, along_y),
            1 => Point2::new(c.x + half_w + gap, along_y),
            2 => Point2::new(along_x, zone.top() - gap),
            _ => Point2::new(along_x, zone.bottom() + gap),
        }
    }

    /// Aim this pitch at `target` with the given travel time
    pub fn aim(&self, target: Point2, traveltime_ms: f64) -> PitchDefinition {
        let (vx, vy) =
            velocity_for_target(self.release, target.x, target.y, self.break_x, self.break_y, traveltime_ms);
        PitchDefinition {
            label: self.label,
            release: self.release,
            vx,
            vy,
            ax: self.break_x,
            ay: self.break_y,
            traveltime_ms,
        }
    }

    /// Sample a target and a travel time, then aim the pitch there
    pub fn generate<R: Rng + ?Sized>(&self, zone: &Rect, ball_radius: f64, rng: &mut R) -> PitchDefinition {
        let traveltime = self.traveltime_ms.sample(rng);
        let target = self.sample_target(zone, ball_radius, rng);
        log::debug!(
            "[ARSENAL] {} → target ({:.1}, {:.1}) in {:.0}ms",
            self.label,
            target.x,
            target.y,
            traveltime
        );
        self.aim(target, traveltime)
    }
}
