//! Outcome Resolver
//!
//! Maps a terminal pitch [`Outcome`] onto the count, bases and score, and
//! produces the pitcher's reward for it.
//!
//! - Ball: fourth ball is a walk (forced runners advance, count resets)
//! - Called/swinging strike, foul with < 2 strikes: third strike is a strikeout
//! - Foul with 2 strikes: nothing changes
//! - Flyout/groundout: one out, count resets, runners hold
//! - Hits: runners advance by the hit's bases, batter takes his base

use serde::{Deserialize, Serialize};

use super::count::GameCount;
use crate::engine::config::RewardConfig;
use crate::engine::pitch::Outcome;

/// What the pitch meant for the plate appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlateEvent {
    Ball,
    Walk,
    Strike,
    Strikeout,
    FoulStrike,
    FoulNoStrike,
    Flyout,
    Groundout,
    Single,
    Double,
    Triple,
    HomeRun,
}

impl PlateEvent {
    /// True when the plate appearance is over
    pub fn ends_at_bat(&self) -> bool {
        !matches!(
            self,
            PlateEvent::Ball | PlateEvent::Strike | PlateEvent::FoulStrike | PlateEvent::FoulNoStrike
        )
    }

    pub fn reward(&self, table: &RewardConfig) -> f64 {
        match self {
            PlateEvent::Ball => table.ball,
            PlateEvent::Walk => table.walk,
            PlateEvent::Strike => table.strike,
            PlateEvent::Strikeout => table.strikeout,
            PlateEvent::FoulStrike => table.foul_strike,
            PlateEvent::FoulNoStrike => table.foul_no_strike,
            PlateEvent::Flyout | PlateEvent::Groundout => table.out,
            PlateEvent::Single => table.single,
            PlateEvent::Double => table.double,
            PlateEvent::Triple => table.triple,
            PlateEvent::HomeRun => table.home_run,
        }
    }
}

/// Result of resolving one outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardSignal {
    pub outcome: Outcome,
    pub event: PlateEvent,
    pub runs_scored: u32,
    pub half_inning_over: bool,
    /// Pitcher-perspective reward
    pub reward: f64,
}

/// Applies outcomes to a [`GameCount`] with a given reward table
#[derive(Debug, Clone, Default)]
pub struct OutcomeResolver {
    rewards: RewardConfig,
}

impl OutcomeResolver {
    pub fn new(rewards: RewardConfig) -> Self {
        Self { rewards }
    }

    pub fn rewards(&self) -> &RewardConfig {
        &self.rewards
    }

    pub fn resolve(&self, outcome: Outcome, count: &mut GameCount) -> RewardSignal {
        if count.half_inning_over() {
            log::warn!("[COUNT] resolving {} after the third out, starting a new half-inning", outcome);
            count.start_half_inning();
        }

        let mut runs = 0;
        let event = match outcome {
            Outcome::Ball => {
                count.balls += 1;
                if count.balls >= GameCount::MAX_BALLS {
                    runs = count.bases.force_advance();
                    count.reset_batter();
                    PlateEvent::Walk
                } else {
                    PlateEvent::Ball
                }
            }
            Outcome::CalledStrike | Outcome::SwingingStrike => add_strike(count, PlateEvent::Strike),
            Outcome::Foul => {
                if count.strikes < GameCount::MAX_STRIKES - 1 {
                    add_strike(count, PlateEvent::FoulStrike)
                } else {
                    PlateEvent::FoulNoStrike
                }
            }
            Outcome::Flyout | Outcome::Groundout => {
                count.outs += 1;
                count.reset_batter();
                if outcome == Outcome::Flyout {
                    PlateEvent::Flyout
                } else {
                    PlateEvent::Groundout
                }
            }
            Outcome::Single | Outcome::Double | Outcome::Triple | Outcome::HomeRun => {
                let bases = outcome.bases().unwrap_or(1);
                runs = count.bases.advance_all(bases);
                count.hits_allowed += 1;
                count.reset_batter();
                match bases {
                    1 => PlateEvent::Single,
                    2 => PlateEvent::Double,
                    3 => PlateEvent::Triple,
                    _ => PlateEvent::HomeRun,
                }
            }
        };

        count.score += runs;
        let half_inning_over = count.half_inning_over();
        let reward = event.reward(&self.rewards) + self.rewards.per_run * runs as f64;

        match event {
            PlateEvent::Walk | PlateEvent::Strikeout => log::info!("[COUNT] {:?} → {}", event, count),
            _ if runs > 0 => log::info!("[COUNT] {:?}, {} run(s) score → {}", event, runs, count),
            _ => log::debug!("[COUNT] {:?} → {}", event, count),
        }
        if half_inning_over {
            log::info!("[COUNT] three outs, half-inning over (R {} H {})", count.score, count.hits_allowed);
        }

        RewardSignal { outcome, event, runs_scored: runs, half_inning_over, reward }
    }
}

fn add_strike(count: &mut GameCount, event: PlateEvent) -> PlateEvent {
    count.strikes += 1;
    if count.strikes >= GameCount::MAX_STRIKES {
        count.outs += 1;
        count.reset_batter();
        PlateEvent::Strikeout
    } else {
        event
    }
}

/// Resolve with the default reward table
pub fn resolve(outcome: Outcome, count: &mut GameCount) -> RewardSignal {
    OutcomeResolver::default().resolve(outcome, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ball_then_walk() {
        let mut count = GameCount::new();
        for _ in 0..3 {
            assert_eq!(resolve(Outcome::Ball, &mut count).event, PlateEvent::Ball);
        }
        assert_eq!(count.balls, 3);
        let signal = resolve(Outcome::Ball, &mut count);
        assert_eq!(signal.event, PlateEvent::Walk);
        assert_eq!((count.balls, count.strikes), (0, 0));
        assert!(count.bases.first);
        assert_eq!(signal.reward, RewardConfig::default().walk);
    }

    #[test]
    fn test_bases_loaded_walk_scores() {
        let mut count = GameCount { balls: 3, ..Default::default() };
        count.bases.first = true;
        count.bases.second = true;
        count.bases.third = true;
        let signal = resolve(Outcome::Ball, &mut count);
        assert_eq!(signal.runs_scored, 1);
        assert_eq!(count.score, 1);
        let table = RewardConfig::default();
        assert!((signal.reward - (table.walk + table.per_run)).abs() < 1e-12);
    }

    #[test]
    fn test_strikeout() {
        let mut count = GameCount { strikes: 2, balls: 1, ..Default::default() };
        let signal = resolve(Outcome::CalledStrike, &mut count);
        assert_eq!(signal.event, PlateEvent::Strikeout);
        assert_eq!(count.outs, 1);
        assert_eq!((count.balls, count.strikes), (0, 0));
        assert_eq!(signal.reward, 2.0);
    }

    #[test]
    fn test_foul_cannot_be_strike_three() {
        let mut count = GameCount::new();
        assert_eq!(resolve(Outcome::Foul, &mut count).event, PlateEvent::FoulStrike);
        assert_eq!(resolve(Outcome::Foul, &mut count).event, PlateEvent::FoulStrike);
        assert_eq!(count.strikes, 2);
        for _ in 0..5 {
            assert_eq!(resolve(Outcome::Foul, &mut count).event, PlateEvent::FoulNoStrike);
        }
        assert_eq!(count.strikes, 2);
        assert_eq!(count.outs, 0);
    }

    #[test]
    fn test_batted_outs_hold_runners() {
        let mut count = GameCount { balls: 2, strikes: 1, ..Default::default() };
        count.bases.second = true;
        let signal = resolve(Outcome::Groundout, &mut count);
        assert_eq!(signal.event, PlateEvent::Groundout);
        assert_eq!(count.outs, 1);
        assert!(count.bases.second);
        assert_eq!((count.balls, count.strikes), (0, 0));
    }

    #[test]
    fn test_home_run_clears_bases() {
        let mut count = GameCount::new();
        count.bases.first = true;
        count.bases.third = true;
        let signal = resolve(Outcome::HomeRun, &mut count);
        assert_eq!(signal.event, PlateEvent::HomeRun);
        assert_eq!(signal.runs_scored, 3);
        assert_eq!(count.score, 3);
        assert_eq!(count.hits_allowed, 1);
        assert!(count.bases.is_empty());
    }

    #[test]
    fn test_third_out_ends_half_inning() {
        let mut count = GameCount { outs: 2, ..Default::default() };
        let signal = resolve(Outcome::Flyout, &mut count);
        assert!(signal.half_inning_over);
        assert_eq!(count.outs, 3);

        // Resolving again rolls into a new half-inning first
        let signal = resolve(Outcome::Ball, &mut count);
        assert_eq!(count.outs, 0);
        assert!(!signal.half_inning_over);
        assert_eq!(count.balls, 1);
    }

    #[test]
    fn test_rewards_favor_pitcher_outcomes() {
        let table = RewardConfig::default();
        assert!(PlateEvent::Strikeout.reward(&table) > PlateEvent::Strike.reward(&table));
        assert!(PlateEvent::Walk.reward(&table) < PlateEvent::Ball.reward(&table));
        assert!(PlateEvent::HomeRun.reward(&table) < PlateEvent::Single.reward(&table));
        assert!(PlateEvent::HomeRun.ends_at_bat());
        assert!(!PlateEvent::FoulNoStrike.ends_at_bat());
    }
}
