//! Learning Configuration (Q-learning pitcher)

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::at_least;

/// Q-learning parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LearningConfig {
    /// Learning rate (default: 0.5)
    pub alpha: f64,
    /// Exploration rate at session start (default: 0.2)
    pub epsilon: f64,
    /// Multiplicative epsilon decay per pitch (default: 0.999)
    pub epsilon_decay: f64,
    /// Epsilon floor (default: 0.02)
    pub min_epsilon: f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self { alpha: 0.5, epsilon: 0.2, epsilon_decay: 0.999, min_epsilon: 0.02 }
    }
}

impl LearningConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        let unit = |v: f64| at_least(v, 0.0) && at_least(1.0, v);
        if !unit(self.alpha) || !unit(self.epsilon) || !unit(self.epsilon_decay) || !unit(self.min_epsilon) {
            return Err("learning: alpha, epsilon, epsilon_decay, min_epsilon must be in [0, 1]".to_string());
        }
        Ok(())
    }
}
