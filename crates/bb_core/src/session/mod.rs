//! Game Session
//!
//! Ties the pieces together for one pitcher vs. a sequence of batters:
//!
//! ```text
//! begin_pitch:  GameStateKey ─► PitchSelector ─► Arsenal ─► PitchEngine::start_pitch
//! tick:         PitchEngine::tick ─► (Resolved) ─► OutcomeResolver ─► PitchSelector::update
//!                                                                  └► scoreboard + PitchRecord
//! ```
//!
//! The session owns every piece of mutable state; nothing is global.

pub mod batter;

pub use batter::{AutoBatter, BatterModel, BatterProfile, PitchView, TakeEveryPitch};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::ai::{GameStateKey, PitchSelector};
use crate::arsenal::Arsenal;
use crate::engine::config::EngineConfig;
use crate::engine::pitch::{Outcome, PitchDefinition, PitchLabel, SwingAim, SwingCategory, TimingQuality};
use crate::engine::presentation::{NullPresentation, Presentation};
use crate::engine::state_machine::{PitchEngine, PitchPhase, TickReport};
use crate::engine::timestep::TICK_MS;
use crate::engine::trajectory::arrival_position;
use crate::error::{EngineError, Result};
use crate::game::{GameCount, OutcomeResolver, PlateEvent, RewardSignal};

/// One finished pitch, as kept in the session log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchRecord {
    /// 0-based pitch number within the session
    pub index: u64,
    pub label: PitchLabel,
    pub outcome: Outcome,
    pub event: PlateEvent,
    pub reward: f64,
    pub runs_scored: u32,
    pub timing: Option<TimingQuality>,
    pub half_inning_over: bool,
    pub count_after: GameCount,
    /// Exploration rate in effect when the pitch was chosen
    pub epsilon: f64,
}

/// Pitch in flight: what the AI update needs once it resolves
#[derive(Debug, Clone, Copy)]
struct PendingPitch {
    label: PitchLabel,
    state: GameStateKey,
    epsilon: f64,
}

/// Pitcher session: count, engine, arsenal, learner and log
pub struct GameSession<P: Presentation = NullPresentation> {
    count: GameCount,
    engine: PitchEngine<P>,
    arsenal: Arsenal,
    selector: PitchSelector,
    resolver: OutcomeResolver,
    rng: ChaCha8Rng,
    pending: Option<PendingPitch>,
    log: Vec<PitchRecord>,
    half_innings_completed: u32,
}

impl GameSession<NullPresentation> {
    /// Headless session
    pub fn headless(config: EngineConfig, arsenal: Arsenal, seed: u64) -> Result<Self> {
        Self::new(config, arsenal, NullPresentation, seed)
    }
}

impl<P: Presentation> GameSession<P> {
    pub fn new(config: EngineConfig, arsenal: Arsenal, presentation: P, seed: u64) -> Result<Self> {
        let mut master = ChaCha8Rng::seed_from_u64(seed);
        let engine_seed: u64 = master.gen();
        let selector_seed: u64 = master.gen();

        let selector = PitchSelector::new(arsenal.labels(), &config.learning, selector_seed);
        let resolver = OutcomeResolver::new(config.rewards.clone());
        let engine = PitchEngine::new(config, presentation, engine_seed)?;

        log::info!("[SESSION] seed={} arsenal={:?}", seed, arsenal.labels());
        Ok(Self {
            count: GameCount::new(),
            engine,
            arsenal,
            selector,
            resolver,
            rng: master,
            pending: None,
            log: Vec::new(),
            half_innings_completed: 0,
        })
    }

    // ========== Accessors ==========

    pub fn count(&self) -> &GameCount {
        &self.count
    }

    pub fn config(&self) -> &EngineConfig {
        self.engine.config()
    }

    pub fn engine(&self) -> &PitchEngine<P> {
        &self.engine
    }

    pub fn presentation(&self) -> &P {
        self.engine.presentation()
    }

    pub fn arsenal(&self) -> &Arsenal {
        &self.arsenal
    }

    pub fn selector(&self) -> &PitchSelector {
        &self.selector
    }

    pub fn selector_mut(&mut self) -> &mut PitchSelector {
        &mut self.selector
    }

    pub fn log(&self) -> &[PitchRecord] {
        &self.log
    }

    pub fn half_innings_completed(&self) -> u32 {
        self.half_innings_completed
    }

    pub fn pitch_in_progress(&self) -> bool {
        self.pending.is_some()
    }

    // ========== Pitch lifecycle ==========

    /// Let the AI pick a pitch for the current count and throw it
    pub fn begin_pitch(&mut self) -> Result<PitchLabel> {
        self.prepare_count();
        let state = GameStateKey::from(&self.count);
        let epsilon = self.selector.epsilon();
        let label = self.selector.choose(&state)?;
        let pitch = self.arsenal.generate(label, self.engine.config(), &mut self.rng)?;
        self.throw(pitch, state, epsilon)?;
        Ok(label)
    }

    /// Throw a caller-supplied pitch. The AI still learns from its result
    /// under the definition's label.
    pub fn begin_scripted_pitch(&mut self, pitch: PitchDefinition) -> Result<()> {
        self.prepare_count();
        let state = GameStateKey::from(&self.count);
        let epsilon = self.selector.epsilon();
        self.throw(pitch, state, epsilon)
    }

    fn prepare_count(&mut self) {
        if self.count.half_inning_over() {
            self.count.start_half_inning();
            log::info!("[SESSION] new half-inning ({} completed)", self.half_innings_completed);
        }
    }

    fn throw(&mut self, pitch: PitchDefinition, state: GameStateKey, epsilon: f64) -> Result<()> {
        if self.pending.is_some() {
            log::warn!("[SESSION] new pitch thrown before the previous one resolved");
        }
        let label = pitch.label;
        self.engine.start_pitch(pitch)?;
        self.pending = Some(PendingPitch { label, state, epsilon });
        Ok(())
    }

    /// Forward the batter's swing to the running pitch
    pub fn register_swing(&mut self, category: SwingCategory, aim: SwingAim, timestamp_ms: f64) -> bool {
        self.engine.register_swing(category, aim, timestamp_ms)
    }

    /// Advance the running pitch. Returns the log record on the tick the
    /// pitch resolves.
    pub fn tick(&mut self, elapsed_ms: f64) -> Option<PitchRecord> {
        let report: TickReport = self.engine.tick(elapsed_ms)?;
        if !report.resolved {
            return None;
        }
        let summary = self.engine.take_outcome()?;
        let pending = self.pending.take()?;
        Some(self.finish(pending, summary.outcome, summary.timing))
    }

    fn finish(&mut self, pending: PendingPitch, outcome: Outcome, timing: Option<TimingQuality>) -> PitchRecord {
        let signal: RewardSignal = self.resolver.resolve(outcome, &mut self.count);
        let new_state = GameStateKey::from(&self.count);
        self.selector.update(pending.state, pending.label, new_state, signal.reward);
        self.selector.decay_epsilon();

        if signal.half_inning_over {
            self.half_innings_completed += 1;
        }
        let text = self.count.scoreboard_text();
        self.engine.presentation_mut().update_scoreboard_text(&text);

        let record = PitchRecord {
            index: self.log.len() as u64,
            label: pending.label,
            outcome,
            event: signal.event,
            reward: signal.reward,
            runs_scored: signal.runs_scored,
            timing,
            half_inning_over: signal.half_inning_over,
            count_after: self.count.clone(),
            epsilon: pending.epsilon,
        };
        log::debug!("[SESSION] #{} {} → {:?} ({:+.2})", record.index, record.label, record.event, record.reward);
        self.log.push(record.clone());
        record
    }

    // ========== Headless driver ==========

    /// Play one full pitch against `batter` on a fixed 60Hz clock
    pub fn play_pitch(&mut self, batter: &mut dyn BatterModel) -> Result<PitchRecord> {
        self.begin_pitch()?;
        self.drive_current(batter)
    }

    fn drive_current(&mut self, batter: &mut dyn BatterModel) -> Result<PitchRecord> {
        let mut swing = {
            let run = self.engine.current().ok_or_else(|| no_pitch("no pitch after start"))?;
            let view = PitchView {
                pitch: run.pitch(),
                windup_ms: run.windup_ms(),
                arrival_ms: run.arrival_ms(),
                arrival: arrival_position(run.pitch()),
                count: &self.count,
            };
            batter.decide(&view, self.engine.config())
        };

        let mut tick: u32 = 0;
        loop {
            let now = f64::from(tick) * TICK_MS;
            if let Some(s) = swing {
                if now >= s.timestamp_ms {
                    self.engine.register_swing_input(s);
                    swing = None;
                }
            }
            if let Some(record) = self.tick(now) {
                return Ok(record);
            }
            if self.engine.current().map(|r| r.phase()) == Some(PitchPhase::Resolved) {
                return Err(no_pitch("resolved pitch produced no record"));
            }
            tick += 1;
        }
    }

    /// Play until `half_innings` more half-innings have been completed
    pub fn play_half_innings(&mut self, half_innings: u32, batter: &mut dyn BatterModel) -> Result<()> {
        let target = self.half_innings_completed + half_innings;
        while self.half_innings_completed < target {
            self.play_pitch(batter)?;
        }
        log::info!(
            "[SESSION] {} half-innings done: {} pitches, R {} H {}",
            self.half_innings_completed,
            self.log.len(),
            self.count.score,
            self.count.hits_allowed
        );
        Ok(())
    }
}

fn no_pitch(msg: &str) -> EngineError {
    EngineError::SessionState(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arsenal::default_arsenal;
    use crate::engine::geometry::Point2;
    use crate::engine::presentation::RecordingPresentation;
    use crate::engine::trajectory::velocity_for_target;

    fn strike() -> PitchDefinition {
        let release = Point2::new(650.0, 300.0);
        let (vx, vy) = velocity_for_target(release, 640.0, 470.0, 0.0, 0.0, 370.0);
        PitchDefinition::new(PitchLabel::FOUR_SEAM, release, vx, vy, 0.0, 0.0, 370.0).unwrap()
    }

    fn session() -> GameSession<RecordingPresentation> {
        GameSession::new(
            EngineConfig::deterministic(),
            default_arsenal().clone(),
            RecordingPresentation::without_frames(),
            21,
        )
        .unwrap()
    }

    #[test]
    fn test_scripted_pitch_updates_count_ai_and_scoreboard() {
        let mut s = session();
        let before = GameStateKey::from(s.count());
        s.begin_scripted_pitch(strike()).unwrap();
        assert!(s.pitch_in_progress());

        assert!(s.tick(500.0).is_none());
        let record = s.tick(5_000.0).unwrap();
        assert_eq!(record.outcome, Outcome::CalledStrike);
        assert_eq!(record.event, PlateEvent::Strike);
        assert_eq!(s.count().strikes, 1);
        assert!(!s.pitch_in_progress());

        // 0 + 0.5 * (0.5 + 0 - 0)
        assert_eq!(s.selector().table().get(&before, PitchLabel::FOUR_SEAM), 0.25);
        assert_eq!(s.presentation().last_scoreboard(), Some("B 0 S 1 O 0 | - - - | R 0 H 0"));
        assert_eq!(s.log().len(), 1);

        // Outcome is only consumed once
        assert!(s.tick(6_000.0).is_none());
    }

    #[test]
    fn test_begin_pitch_uses_arsenal_labels() {
        let mut s = session();
        for _ in 0..10 {
            let label = s.begin_pitch().unwrap();
            assert!(s.arsenal().get(label).is_some());
            assert!(s.tick(10_000.0).is_some());
        }
        assert_eq!(s.log().len(), 10);
        assert!(s.log().iter().all(|r| r.timing.is_none()));
    }

    #[test]
    fn test_half_inning_rolls_over() {
        let mut s = session();
        let mut batter = AutoBatter::new(BatterProfile::default(), 3).unwrap();
        s.play_half_innings(2, &mut batter).unwrap();
        assert_eq!(s.half_innings_completed(), 2);
        assert_eq!(s.log().iter().filter(|r| r.half_inning_over).count(), 2);
        // Next pitch starts a fresh half-inning
        s.play_pitch(&mut TakeEveryPitch).unwrap();
        assert!(s.count().outs < GameCount::MAX_OUTS);
    }

    #[test]
    fn test_same_seed_same_log() {
        let run = |seed| {
            let mut s = GameSession::headless(EngineConfig::default(), default_arsenal().clone(), seed).unwrap();
            let mut batter = AutoBatter::new(BatterProfile::default(), seed).unwrap();
            s.play_half_innings(1, &mut batter).unwrap();
            s.log().to_vec()
        };
        assert_eq!(run(8), run(8));
    }
}
