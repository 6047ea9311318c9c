//! Game count: balls, strikes, outs, baserunners, score

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base occupancy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bases {
    pub first: bool,
    pub second: bool,
    pub third: bool,
}

impl Bases {
    pub fn runners(&self) -> u8 {
        self.first as u8 + self.second as u8 + self.third as u8
    }

    pub fn is_empty(&self) -> bool {
        self.runners() == 0
    }

    /// Walk: put the batter on first, pushing only forced runners.
    /// Returns runs scored.
    pub fn force_advance(&mut self) -> u32 {
        let mut runs = 0;
        if self.first {
            if self.second {
                if self.third {
                    runs += 1;
                }
                self.third = true;
            }
            self.second = true;
        }
        self.first = true;
        runs
    }

    /// Hit worth `bases` (1-4): every runner moves `bases` ahead, then the
    /// batter takes the matching base (or scores on a home run).
    /// Returns runs scored, batter included.
    pub fn advance_all(&mut self, bases: u8) -> u32 {
        let bases = bases.clamp(1, 4) as usize;
        let occupied = [self.first, self.second, self.third];
        let mut next = [false; 3];
        let mut runs = 0;

        for (idx, &on) in occupied.iter().enumerate() {
            if !on {
                continue;
            }
            let target = idx + bases;
            if target >= 3 {
                runs += 1;
            } else {
                next[target] = true;
            }
        }

        if bases >= 4 {
            runs += 1;
        } else {
            next[bases - 1] = true;
        }

        self.first = next[0];
        self.second = next[1];
        self.third = next[2];
        runs
    }

    pub fn clear(&mut self) {
        *self = Bases::default();
    }
}

/// Persistent count for the current half-inning
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCount {
    /// 0-3 after resolution
    pub balls: u8,
    /// 0-2 after resolution
    pub strikes: u8,
    /// 0-3; three ends the half-inning
    pub outs: u8,
    pub bases: Bases,
    /// Runs scored by the batting side
    pub score: u32,
    pub hits_allowed: u32,
}

impl GameCount {
    pub const MAX_BALLS: u8 = 4;
    pub const MAX_STRIKES: u8 = 3;
    pub const MAX_OUTS: u8 = 3;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn half_inning_over(&self) -> bool {
        self.outs >= Self::MAX_OUTS
    }

    /// Reset for the next half-inning. Score and hits allowed carry over.
    pub fn start_half_inning(&mut self) {
        self.balls = 0;
        self.strikes = 0;
        self.outs = 0;
        self.bases.clear();
    }

    pub(crate) fn reset_batter(&mut self) {
        self.balls = 0;
        self.strikes = 0;
    }

    pub fn scoreboard_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GameCount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let base = |on: bool, name: &'static str| if on { name } else { "-" };
        write!(
            f,
            "B {} S {} O {} | {} {} {} | R {} H {}",
            self.balls,
            self.strikes,
            self.outs,
            base(self.bases.first, "1B"),
            base(self.bases.second, "2B"),
            base(self.bases.third, "3B"),
            self.score,
            self.hits_allowed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bases(first: bool, second: bool, third: bool) -> Bases {
        Bases { first, second, third }
    }

    #[test]
    fn test_force_advance_only_pushes_forced_runners() {
        let mut b = bases(false, true, false);
        assert_eq!(b.force_advance(), 0);
        assert_eq!(b, bases(true, true, false));

        let mut b = bases(true, false, true);
        assert_eq!(b.force_advance(), 0);
        assert_eq!(b, bases(true, true, true));

        let mut b = bases(true, true, true);
        assert_eq!(b.force_advance(), 1);
        assert_eq!(b, bases(true, true, true));
    }

    #[test]
    fn test_single_moves_everyone_one_base() {
        let mut b = bases(true, false, true);
        assert_eq!(b.advance_all(1), 1);
        assert_eq!(b, bases(true, true, false));
    }

    #[test]
    fn test_double_and_triple() {
        let mut b = bases(true, true, false);
        assert_eq!(b.advance_all(2), 1);
        assert_eq!(b, bases(false, true, true));

        let mut b = bases(true, false, false);
        assert_eq!(b.advance_all(3), 1);
        assert_eq!(b, bases(false, false, true));
    }

    #[test]
    fn test_grand_slam() {
        let mut b = bases(true, true, true);
        assert_eq!(b.advance_all(4), 4);
        assert!(b.is_empty());
    }

    #[test]
    fn test_start_half_inning_keeps_score() {
        let mut count = GameCount { outs: 3, score: 2, hits_allowed: 5, ..Default::default() };
        count.bases.first = true;
        assert!(count.half_inning_over());
        count.start_half_inning();
        assert_eq!(count.outs, 0);
        assert!(count.bases.is_empty());
        assert_eq!(count.score, 2);
        assert_eq!(count.hits_allowed, 5);
    }

    #[test]
    fn test_scoreboard_text() {
        let mut count = GameCount { balls: 2, strikes: 1, outs: 1, score: 3, hits_allowed: 4, ..Default::default() };
        count.bases.third = true;
        assert_eq!(count.scoreboard_text(), "B 2 S 1 O 1 | - - 3B | R 3 H 4");
    }
}
