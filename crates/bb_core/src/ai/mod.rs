//! Pitch-selection AI
//!
//! Tabular Q-learning over (count state, pitch label) with ε-greedy choice.

pub mod q_table;
pub mod selector;

pub use q_table::{GameStateKey, QEntry, QTable};
pub use selector::PitchSelector;
