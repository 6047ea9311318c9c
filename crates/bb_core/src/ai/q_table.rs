//! Tabular Q-values keyed by (game state, pitch label)

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::engine::pitch::PitchLabel;
use crate::game::GameCount;

/// `(outs, strikes, balls, runners_on_base_count, hits_allowed, score)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameStateKey {
    pub outs: u8,
    pub strikes: u8,
    pub balls: u8,
    pub runners: u8,
    pub hits_allowed: u32,
    pub score: u32,
}

impl From<&GameCount> for GameStateKey {
    fn from(count: &GameCount) -> Self {
        Self {
            outs: count.outs,
            strikes: count.strikes,
            balls: count.balls,
            runners: count.bases.runners(),
            hits_allowed: count.hits_allowed,
            score: count.score,
        }
    }
}

/// One serialized table entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QEntry {
    pub state: GameStateKey,
    pub action: PitchLabel,
    pub value: f64,
}

/// Q-table with default-zero reads.
///
/// Grows for the whole session; nothing is evicted.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    values: FxHashMap<(GameStateKey, PitchLabel), f64>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Q-value, 0.0 for unseen pairs
    pub fn get(&self, state: &GameStateKey, action: PitchLabel) -> f64 {
        self.values.get(&(*state, action)).copied().unwrap_or(0.0)
    }

    /// Mutable slot, created at 0.0 on first access
    pub fn entry(&mut self, state: GameStateKey, action: PitchLabel) -> &mut f64 {
        self.values.entry((state, action)).or_insert(0.0)
    }

    pub fn set(&mut self, state: GameStateKey, action: PitchLabel, value: f64) {
        self.values.insert((state, action), value);
    }

    /// Largest Q-value over `actions` in `state` (0.0 when `actions` is empty)
    pub fn max_value(&self, state: &GameStateKey, actions: &[PitchLabel]) -> f64 {
        actions
            .iter()
            .map(|&a| self.get(state, a))
            .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))))
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries sorted by key, for stable snapshots
    pub fn entries(&self) -> Vec<QEntry> {
        let mut out: Vec<QEntry> = self
            .values
            .iter()
            .map(|(&(state, action), &value)| QEntry { state, action, value })
            .collect();
        out.sort_by(|a, b| (a.state, a.action).cmp(&(b.state, b.action)));
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries())
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        let entries: Vec<QEntry> = serde_json::from_str(s)?;
        Ok(entries.into_iter().collect())
    }
}

impl FromIterator<QEntry> for QTable {
    fn from_iter<I: IntoIterator<Item = QEntry>>(iter: I) -> Self {
        let mut table = QTable::new();
        for e in iter {
            table.set(e.state, e.action, e.value);
        }
        table
    }
}
