//! Timing Configuration (phase lengths and swing windows)

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{at_least, positive};
use crate::engine::pitch::SwingCategory;

/// Perfect/foul thresholds of one swing category (ms, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimingWindow {
    pub perfect_ms: f64,
    pub foul_ms: f64,
}

/// Pitch phase lengths and swing timing windows
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TimingConfig {
    // === Phases ===
    /// Windup length before release (default: 1000)
    pub windup_ms: f64,
    /// Follow-through / contact animation length (default: 700)
    pub follow_through_ms: f64,

    // === Swing ===
    /// Delay from swing start to bat-ball contact check (default: 150)
    pub contact_delay_ms: f64,
    /// Offset added to the swing time before grading it (default: 150)
    pub swing_offset_ms: f64,
    /// Contact swing windows (default: 30 / 60)
    pub contact: TimingWindow,
    /// Power swing windows (default: 20 / 35)
    pub power: TimingWindow,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            windup_ms: 1000.0,
            follow_through_ms: 700.0,

            contact_delay_ms: 150.0,
            swing_offset_ms: 150.0,
            contact: TimingWindow { perfect_ms: 30.0, foul_ms: 60.0 },
            power: TimingWindow { perfect_ms: 20.0, foul_ms: 35.0 },
        }
    }
}

impl TimingConfig {
    pub fn window(&self, category: SwingCategory) -> TimingWindow {
        match category {
            SwingCategory::Contact => self.contact,
            SwingCategory::Power => self.power,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if !at_least(self.windup_ms, 0.0) {
            return Err(format!("timing.windup_ms must be >= 0, got {}", self.windup_ms));
        }
        if !positive(self.follow_through_ms) {
            return Err(format!(
                "timing.follow_through_ms must be positive, got {}",
                self.follow_through_ms
            ));
        }
        if !at_least(self.contact_delay_ms, 0.0) || !self.swing_offset_ms.is_finite() {
            return Err("timing.contact_delay_ms / swing_offset_ms out of range".to_string());
        }
        for (name, w) in [("contact", self.contact), ("power", self.power)] {
            if !at_least(w.perfect_ms, 0.0) || !at_least(w.foul_ms, w.perfect_ms) {
                return Err(format!(
                    "timing.{} window must satisfy 0 <= perfect <= foul, got {} / {}",
                    name, w.perfect_ms, w.foul_ms
                ));
            }
        }
        Ok(())
    }
}
