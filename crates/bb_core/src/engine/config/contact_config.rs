//! Contact & Strike Zone Configuration (screen-space geometry)

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::positive;
use crate::engine::geometry::{Point2, Rect};
use crate::engine::pitch::SwingAim;

/// Bat contact-zone geometry
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ContactConfig {
    /// Fixed bat pivot (hands) point (default: 560, 640)
    pub pivot: Point2,
    /// Bat point used for a high swing without cursor input (default: 640, 430)
    pub high_bat_point: Point2,
    /// Bat point used for a low swing without cursor input (default: 640, 500)
    pub low_bat_point: Point2,
    /// Contact-zone length along the bat (default: 120)
    pub zone_width: f64,
    /// Contact-zone thickness for a high swing (default: 25)
    pub high_zone_height: f64,
    /// Contact-zone thickness for a low swing (default: 50)
    pub low_zone_height: f64,
    /// Ball radius at the plate (default: 10)
    pub ball_radius: f64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            pivot: Point2::new(560.0, 640.0),
            high_bat_point: Point2::new(640.0, 430.0),
            low_bat_point: Point2::new(640.0, 500.0),
            zone_width: 120.0,
            high_zone_height: 25.0,
            low_zone_height: 50.0,
            ball_radius: 10.0,
        }
    }
}

impl ContactConfig {
    pub fn default_bat_point(&self, aim: SwingAim) -> Point2 {
        match aim {
            SwingAim::High => self.high_bat_point,
            SwingAim::Low => self.low_bat_point,
        }
    }

    pub fn zone_height(&self, aim: SwingAim) -> f64 {
        match aim {
            SwingAim::High => self.high_zone_height,
            SwingAim::Low => self.low_zone_height,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        for (name, v) in [
            ("zone_width", self.zone_width),
            ("high_zone_height", self.high_zone_height),
            ("low_zone_height", self.low_zone_height),
            ("ball_radius", self.ball_radius),
        ] {
            if !positive(v) {
                return Err(format!("contact.{} must be positive, got {}", name, v));
            }
        }
        Ok(())
    }
}

/// Strike-zone rectangle used by the geometric zone classifier
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StrikeZoneConfig {
    /// Zone rectangle (default: center 640,470 size 140x170)
    pub rect: Rect,
}

impl Default for StrikeZoneConfig {
    fn default() -> Self {
        Self { rect: Rect::new(Point2::new(640.0, 470.0), 140.0, 170.0) }
    }
}

impl StrikeZoneConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if !positive(self.rect.width) || !positive(self.rect.height) {
            return Err(format!(
                "strike_zone.rect must have positive size, got {}x{}",
                self.rect.width, self.rect.height
            ));
        }
        Ok(())
    }
}
