//! Strike-zone classification
//!
//! The ball/strike call treats the classifier as an opaque binary oracle.
//! `RectZone` is the geometric implementation: the ball is in the zone when
//! any part of it overlaps the zone rectangle.

use super::config::StrikeZoneConfig;
use super::geometry::{circle_hits_rect, Point2, Rect};

/// In-zone / out-of-zone oracle for the final ball position
pub trait ZoneClassifier {
    fn in_zone(&self, ball: Point2, radius: f64) -> bool;
}

/// Rectangle strike zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectZone {
    pub rect: Rect,
}

impl RectZone {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    pub fn from_config(cfg: &StrikeZoneConfig) -> Self {
        Self::new(cfg.rect)
    }
}

impl ZoneClassifier for RectZone {
    fn in_zone(&self, ball: Point2, radius: f64) -> bool {
        circle_hits_rect(ball, radius, &self.rect)
    }
}

impl<F> ZoneClassifier for F
where
    F: Fn(Point2, f64) -> bool,
{
    fn in_zone(&self, ball: Point2, radius: f64) -> bool {
        self(ball, radius)
    }
}
