//! ε-greedy Q-learning pitch selection

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::q_table::{GameStateKey, QTable};
use crate::engine::config::LearningConfig;
use crate::engine::pitch::PitchLabel;
use crate::error::{EngineError, Result};

/// Chooses pitches from a fixed action set and learns from rewards
#[derive(Debug, Clone)]
pub struct PitchSelector {
    table: QTable,
    actions: Vec<PitchLabel>,
    alpha: f64,
    epsilon: f64,
    epsilon_decay: f64,
    min_epsilon: f64,
    rng: ChaCha8Rng,
}

impl PitchSelector {
    pub fn new(actions: Vec<PitchLabel>, learning: &LearningConfig, seed: u64) -> Self {
        Self {
            table: QTable::new(),
            actions,
            alpha: learning.alpha,
            epsilon: learning.epsilon,
            epsilon_decay: learning.epsilon_decay,
            min_epsilon: learning.min_epsilon,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn with_table(mut self, table: QTable) -> Self {
        self.table = table;
        self
    }

    pub fn actions(&self) -> &[PitchLabel] {
        &self.actions
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
    }

    /// Multiply ε by the decay factor, never below the floor
    pub fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.epsilon_decay).max(self.min_epsilon);
    }

    /// ε-greedy choice with the selector's current ε
    pub fn choose(&mut self, state: &GameStateKey) -> Result<PitchLabel> {
        let epsilon = self.epsilon;
        self.choose_action(state, epsilon)
    }

    /// With probability `epsilon` pick uniformly at random, otherwise pick the
    /// highest Q-value, breaking ties uniformly among the maximizers.
    pub fn choose_action(&mut self, state: &GameStateKey, epsilon: f64) -> Result<PitchLabel> {
        if self.actions.is_empty() {
            return Err(EngineError::NoActions);
        }

        if epsilon > 0.0 && self.rng.gen::<f64>() < epsilon {
            let choice = *self.actions.choose(&mut self.rng).ok_or(EngineError::NoActions)?;
            log::debug!("[AI] explore → {}", choice);
            return Ok(choice);
        }

        let best = self.table.max_value(state, &self.actions);
        let maximizers: Vec<PitchLabel> = self
            .actions
            .iter()
            .copied()
            .filter(|&a| self.table.get(state, a) == best)
            .collect();
        let choice = *maximizers.choose(&mut self.rng).ok_or(EngineError::NoActions)?;
        log::debug!("[AI] exploit → {} (Q={:.3}, ties={})", choice, best, maximizers.len());
        Ok(choice)
    }

    /// `Q[old, action] += alpha * (reward + max_a Q[new, a] - Q[old, action])`
    pub fn update(&mut self, old_state: GameStateKey, action: PitchLabel, new_state: GameStateKey, reward: f64) {
        let best_future = self.table.max_value(&new_state, &self.actions);
        let alpha = self.alpha;
        let slot = self.table.entry(old_state, action);
        let old = *slot;
        *slot = old + alpha * (reward + best_future - old);
        log::trace!("[AI] Q[{:?}, {}] {:.3} → {:.3}", old_state, action, old, *slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(strikes: u8) -> GameStateKey {
        GameStateKey { outs: 0, strikes, balls: 0, runners: 0, hits_allowed: 0, score: 0 }
    }

    fn selector() -> PitchSelector {
        PitchSelector::new(
            vec![PitchLabel::FOUR_SEAM, PitchLabel::SLIDER, PitchLabel::CHANGEUP],
            &LearningConfig::default(),
            42,
        )
    }

    #[test]
    fn test_greedy_picks_dominant_entry() {
        let mut table = QTable::new();
        table.set(state(1), PitchLabel::SLIDER, 3.0);
        table.set(state(1), PitchLabel::FOUR_SEAM, -1.0);
        let mut ai = selector().with_table(table);
        for _ in 0..20 {
            assert_eq!(ai.choose_action(&state(1), 0.0).unwrap(), PitchLabel::SLIDER);
        }
    }

    #[test]
    fn test_ties_are_broken_among_maximizers_only() {
        let mut ai = selector();
        let mut table = QTable::new();
        table.set(state(0), PitchLabel::CHANGEUP, -1.0);
        ai = ai.with_table(table);

        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            seen.insert(ai.choose_action(&state(0), 0.0).unwrap());
        }
        assert!(seen.contains(&PitchLabel::FOUR_SEAM));
        assert!(seen.contains(&PitchLabel::SLIDER));
        assert!(!seen.contains(&PitchLabel::CHANGEUP));
    }

    #[test]
    fn test_full_exploration_covers_all_actions() {
        let mut ai = selector();
        let mut table = QTable::new();
        table.set(state(0), PitchLabel::SLIDER, 10.0);
        ai = ai.with_table(table);

        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..300 {
            seen.insert(ai.choose_action(&state(0), 1.0).unwrap());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_empty_action_set_is_error() {
        let mut ai = PitchSelector::new(vec![], &LearningConfig::default(), 1);
        assert!(matches!(ai.choose_action(&state(0), 0.0), Err(EngineError::NoActions)));
    }

    #[test]
    fn test_update_rule() {
        let mut ai = selector();
        ai.update(state(0), PitchLabel::FOUR_SEAM, state(1), 1.0);
        // 0 + 0.5 * (1 + 0 - 0)
        assert_eq!(ai.table().get(&state(0), PitchLabel::FOUR_SEAM), 0.5);

        ai.update(state(1), PitchLabel::SLIDER, state(2), 2.0);
        ai.update(state(0), PitchLabel::FOUR_SEAM, state(1), 1.0);
        // best_future = Q[s1, SL] = 1.0; 0.5 + 0.5 * (1 + 1 - 0.5)
        assert_eq!(ai.table().get(&state(0), PitchLabel::FOUR_SEAM), 1.25);
    }

    #[test]
    fn test_constant_reward_converges_monotonically() {
        let mut ai = selector();
        let terminal = state(2);
        let mut prev = 0.0;
        for _ in 0..40 {
            ai.update(state(0), PitchLabel::CHANGEUP, terminal, -1.5);
            let q = ai.table().get(&state(0), PitchLabel::CHANGEUP);
            assert!(q <= prev);
            assert!(q >= -1.5);
            prev = q;
        }
        assert!((prev + 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_epsilon_decay_floor() {
        let mut ai = selector();
        for _ in 0..10_000 {
            ai.decay_epsilon();
        }
        assert_eq!(ai.epsilon(), LearningConfig::default().min_epsilon);
    }
}
