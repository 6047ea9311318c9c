//! Outcome Configuration (hit tables and reward lookup)
//!
//! The hit tables are literal thresholds on a 0-10 roll. They are data, not
//! derived from any formula.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::at_least;
use crate::engine::pitch::{Outcome, SwingCategory};

/// Upper bounds of the single/double/triple bands on a [0, 10) roll.
/// Anything at or above `triple` is a home run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HitTable {
    pub single: f64,
    pub double: f64,
    pub triple: f64,
}

impl HitTable {
    pub const ROLL_MAX: f64 = 10.0;

    pub fn outcome_for(&self, roll: f64) -> Outcome {
        if roll < self.single {
            Outcome::Single
        } else if roll < self.double {
            Outcome::Double
        } else if roll < self.triple {
            Outcome::Triple
        } else {
            Outcome::HomeRun
        }
    }

    fn is_ordered(&self) -> bool {
        at_least(self.single, 0.0)
            && at_least(self.double, self.single)
            && at_least(self.triple, self.double)
            && at_least(Self::ROLL_MAX, self.triple)
    }
}

/// Hit-type distributions per swing category
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct HitTableConfig {
    /// Contact swing table (default: 8 / 9.5 / 9.8)
    pub contact: HitTable,
    /// Power swing table (default: 3 / 6.5 / 7.5)
    pub power: HitTable,
    /// Chance a perfect hit becomes an out when swing aim and ball height disagree (default: 0.5)
    pub mismatch_out_chance: f64,
}

impl Default for HitTableConfig {
    fn default() -> Self {
        Self {
            contact: HitTable { single: 8.0, double: 9.5, triple: 9.8 },
            power: HitTable { single: 3.0, double: 6.5, triple: 7.5 },
            mismatch_out_chance: 0.5,
        }
    }
}

impl HitTableConfig {
    pub fn table(&self, category: SwingCategory) -> &HitTable {
        match category {
            SwingCategory::Contact => &self.contact,
            SwingCategory::Power => &self.power,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if !self.contact.is_ordered() || !self.power.is_ordered() {
            return Err("hit_tables: thresholds must be ordered within [0, 10]".to_string());
        }
        if !(at_least(self.mismatch_out_chance, 0.0) && at_least(1.0, self.mismatch_out_chance)) {
            return Err(format!(
                "hit_tables.mismatch_out_chance must be in [0, 1], got {}",
                self.mismatch_out_chance
            ));
        }
        Ok(())
    }
}

/// Reward lookup (pitcher perspective: batter-favorable events are negative)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RewardConfig {
    /// Strikeout (default: 2.0)
    pub strikeout: f64,
    /// Flyout / groundout (default: 1.0)
    pub out: f64,
    /// Called or swinging strike short of strike three (default: 0.5)
    pub strike: f64,
    /// Foul that added a strike (default: 0.25)
    pub foul_strike: f64,
    /// Foul with two strikes (default: 0.0)
    pub foul_no_strike: f64,
    /// Ball short of ball four (default: -0.25)
    pub ball: f64,
    /// Walk (default: -1.0)
    pub walk: f64,
    /// Single (default: -1.5)
    pub single: f64,
    /// Double (default: -2.0)
    pub double: f64,
    /// Triple (default: -2.5)
    pub triple: f64,
    /// Home run (default: -3.0)
    pub home_run: f64,
    /// Added per run that scores on the play (default: -0.5)
    pub per_run: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            strikeout: 2.0,
            out: 1.0,
            strike: 0.5,
            foul_strike: 0.25,
            foul_no_strike: 0.0,
            ball: -0.25,
            walk: -1.0,
            single: -1.5,
            double: -2.0,
            triple: -2.5,
            home_run: -3.0,
            per_run: -0.5,
        }
    }
}

impl RewardConfig {
    fn entries(&self) -> [(&'static str, f64); 12] {
        [
            ("strikeout", self.strikeout),
            ("out", self.out),
            ("strike", self.strike),
            ("foul_strike", self.foul_strike),
            ("foul_no_strike", self.foul_no_strike),
            ("ball", self.ball),
            ("walk", self.walk),
            ("single", self.single),
            ("double", self.double),
            ("triple", self.triple),
            ("home_run", self.home_run),
            ("per_run", self.per_run),
        ]
    }

    /// Every reward must be finite; a NaN would poison the Q-table.
    pub(crate) fn validate(&self) -> Result<(), String> {
        match self.entries().into_iter().find(|(_, v)| !v.is_finite()) {
            Some((name, v)) => Err(format!("rewards.{} must be finite, got {}", name, v)),
            None => Ok(()),
        }
    }
}
