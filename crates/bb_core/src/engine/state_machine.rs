//! Pitch State Machine
//!
//! Drives one pitch from windup to a single terminal [`Outcome`].
//!
//! ```text
//! Windup ──► Flight ──► ContactEvaluation ──► Resolved      (bat met ball)
//!              │  ▲            │
//!              │  └── missed ──┘
//!              └──────► FollowThrough ──────► Resolved      (ball/strike call)
//! ```
//!
//! Time is injected: `tick(elapsed_ms)` takes milliseconds since
//! `start_pitch`, so every transition is testable without a clock. A tick that
//! jumps far ahead walks through all the transitions it crossed, in order,
//! each at its scheduled boundary time.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::config::{EngineConfig, HitTable};
use super::geometry::{circle_rotated_rect_collision, Point2};
use super::pitch::{
    Outcome, PitchDefinition, SwingAim, SwingCategory, SwingInput, TimingQuality,
};
use super::presentation::{sounds, Presentation};
use super::timestep::ticks_elapsed;
use super::trajectory::{arrival_position, position_at, BallFlight, Position3};
use super::zone::{RectZone, ZoneClassifier};
use crate::error::Result;

/// Batter animation frame length (ms)
pub const ANIM_FRAME_MS: f64 = 50.0;

/// Delay between a hit and the crowd reaction cue (ms)
const CROWD_DELAY_MS: f64 = 400.0;
/// Delay between the glove pop and the umpire's call (ms)
const UMPIRE_DELAY_MS: f64 = 300.0;

// ============================================================================
// Phase / results
// ============================================================================

/// Pitch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchPhase {
    Windup,
    Flight,
    ContactEvaluation,
    FollowThrough,
    Resolved,
}

/// Bat-ball contact check result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactResult {
    /// Timed swing waiting for its contact instant
    Pending,
    /// Swung and missed; the ball keeps flying
    Missed,
    Hit,
}

/// What one `tick` observed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub phase: PitchPhase,
    pub ball: Position3,
    /// Set on the tick the outcome was decided
    pub decided: Option<Outcome>,
    /// True once the pitch is in `Resolved`
    pub resolved: bool,
}

/// Compact record of a finished pitch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchSummary {
    pub pitch: PitchDefinition,
    pub swing: Option<SwingInput>,
    pub timing: Option<TimingQuality>,
    pub contact: Option<ContactResult>,
    pub arrival: Position3,
    pub outcome: Outcome,
}

// ============================================================================
// PitchRun (per-pitch mutable state)
// ============================================================================

/// Mutable state of one pitch, created by `start_pitch` and dropped after
/// the outcome is taken.
#[derive(Debug, Clone)]
pub struct PitchRun {
    pitch: PitchDefinition,
    phase: PitchPhase,
    phase_started_ms: f64,
    windup_ms: f64,
    arrival_ms: f64,
    flight: BallFlight,
    swing: Option<SwingInput>,
    timing: Option<TimingQuality>,
    contact: Option<ContactResult>,
    contact_time_ms: Option<f64>,
    outcome: Option<Outcome>,
    /// One-shot guard: set together with `outcome`, never cleared
    results_done: bool,
    outcome_taken: bool,
}

/// Borrowed collaborators for one transition pass
struct Ctx<'a> {
    cfg: &'a EngineConfig,
    zone: &'a dyn ZoneClassifier,
    out: &'a mut dyn Presentation,
    rng: &'a mut ChaCha8Rng,
}

impl PitchRun {
    fn new(pitch: PitchDefinition, cfg: &EngineConfig) -> Self {
        let windup_ms = cfg.timing.windup_ms;
        let arrival_ms = windup_ms + pitch.traveltime_ms;
        Self {
            flight: BallFlight::from_pitch(&pitch),
            pitch,
            phase: PitchPhase::Windup,
            phase_started_ms: 0.0,
            windup_ms,
            arrival_ms,
            swing: None,
            timing: None,
            contact: None,
            contact_time_ms: None,
            outcome: None,
            results_done: false,
            outcome_taken: false,
        }
    }

    pub fn pitch(&self) -> &PitchDefinition {
        &self.pitch
    }

    pub fn phase(&self) -> PitchPhase {
        self.phase
    }

    pub fn windup_ms(&self) -> f64 {
        self.windup_ms
    }

    /// Scripted arrival time, pitch-relative (windup + travel time)
    pub fn arrival_ms(&self) -> f64 {
        self.arrival_ms
    }

    pub fn swing(&self) -> Option<&SwingInput> {
        self.swing.as_ref()
    }

    pub fn timing(&self) -> Option<TimingQuality> {
        self.timing
    }

    pub fn contact(&self) -> Option<ContactResult> {
        self.contact
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn ball(&self) -> Position3 {
        self.flight.position()
    }

    fn contact_pending(&self) -> bool {
        self.contact == Some(ContactResult::Pending)
    }

    /// Time at which nothing may still be undecided
    fn hard_deadline_ms(&self, cfg: &EngineConfig) -> f64 {
        let last_event = self.contact_time_ms.unwrap_or(self.arrival_ms).max(self.arrival_ms);
        last_event + cfg.timing.follow_through_ms
    }

    fn advance_ball(&mut self, now_ms: f64) {
        if now_ms >= self.windup_ms {
            self.flight.advance_to(ticks_elapsed(now_ms - self.windup_ms));
        }
    }

    // ------------------------------------------------------------------
    // Swing capture
    // ------------------------------------------------------------------

    fn register_swing(&mut self, swing: SwingInput, cfg: &EngineConfig) -> bool {
        if self.swing.is_some() || self.results_done {
            return false;
        }
        if !matches!(self.phase, PitchPhase::Windup | PitchPhase::Flight) {
            return false;
        }
        if !(swing.timestamp_ms >= self.windup_ms && swing.timestamp_ms < self.arrival_ms) {
            log::debug!(
                "[PITCH] swing at {:.1}ms ignored (flight window {:.1}..{:.1})",
                swing.timestamp_ms,
                self.windup_ms,
                self.arrival_ms
            );
            return false;
        }

        let timing =
            TimingQuality::classify(swing.category, swing.timestamp_ms, self.arrival_ms, &cfg.timing);
        self.swing = Some(swing);
        self.timing = Some(timing);

        if timing == TimingQuality::None {
            self.contact = Some(ContactResult::Missed);
        } else {
            self.contact = Some(ContactResult::Pending);
            self.contact_time_ms = Some(swing.timestamp_ms + cfg.timing.contact_delay_ms);
        }

        log::debug!(
            "[PITCH] {} swing {:?}/{:?} at {:.1}ms → {:?}",
            self.pitch.label,
            swing.category,
            swing.aim,
            swing.timestamp_ms,
            timing
        );
        true
    }

    // ------------------------------------------------------------------
    // Transitions (one per phase)
    // ------------------------------------------------------------------

    fn windup_transition(&self, now_ms: f64) -> Option<(PitchPhase, f64)> {
        (now_ms >= self.windup_ms).then_some((PitchPhase::Flight, self.windup_ms))
    }

    fn flight_transition(&self, now_ms: f64) -> Option<(PitchPhase, f64)> {
        if self.contact_pending() {
            let contact_time = self.contact_time_ms.unwrap_or(self.arrival_ms);
            return (now_ms >= contact_time).then_some((PitchPhase::ContactEvaluation, contact_time));
        }
        // A missed swing can return here after its contact instant; the call
        // then happens no earlier than that instant.
        let call_time = self.arrival_ms.max(self.phase_started_ms);
        (now_ms >= call_time).then_some((PitchPhase::FollowThrough, call_time))
    }

    fn contact_transition(&self, now_ms: f64, cfg: &EngineConfig) -> Option<(PitchPhase, f64)> {
        match self.contact {
            Some(ContactResult::Missed) => Some((PitchPhase::Flight, self.phase_started_ms)),
            _ => {
                let end = self.phase_started_ms + cfg.timing.follow_through_ms;
                (now_ms >= end).then_some((PitchPhase::Resolved, end))
            }
        }
    }

    fn follow_through_transition(&self, now_ms: f64, cfg: &EngineConfig) -> Option<(PitchPhase, f64)> {
        let end = self.phase_started_ms + cfg.timing.follow_through_ms;
        (now_ms >= end).then_some((PitchPhase::Resolved, end))
    }

    fn enter(&mut self, phase: PitchPhase, at_ms: f64, ctx: &mut Ctx<'_>) {
        log::debug!("[PITCH] {:?} → {:?} at {:.1}ms", self.phase, phase, at_ms);
        let from = self.phase;
        self.phase = phase;
        self.phase_started_ms = at_ms;

        match phase {
            PitchPhase::Windup => {}
            PitchPhase::Flight => {
                if from == PitchPhase::Windup {
                    ctx.out.play_sound(sounds::PITCH_RELEASE);
                }
            }
            PitchPhase::ContactEvaluation => self.evaluate_contact(at_ms, ctx),
            PitchPhase::FollowThrough => self.make_call(ctx),
            PitchPhase::Resolved => {
                if !self.results_done || self.outcome.is_none() {
                    contract_violation("pitch reached Resolved without an outcome");
                    self.make_call(ctx);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Terminal branches
    // ------------------------------------------------------------------

    /// Bat-ball test at the fixed post-swing delay
    fn evaluate_contact(&mut self, contact_time_ms: f64, ctx: &mut Ctx<'_>) {
        let Some(swing) = self.swing else {
            contract_violation("contact evaluation without a swing");
            self.contact = Some(ContactResult::Missed);
            return;
        };
        let timing = self.timing.unwrap_or(TimingQuality::None);

        let ball = position_at(&self.pitch, contact_time_ms - self.windup_ms);
        let contact_cfg = &ctx.cfg.contact;
        let bat = swing.bat_point.unwrap_or_else(|| contact_cfg.default_bat_point(swing.aim));
        let angle = contact_cfg.pivot.angle_to(&bat);

        let hit = circle_rotated_rect_collision(
            ball.x,
            ball.y,
            contact_cfg.ball_radius,
            bat.x,
            bat.y,
            contact_cfg.zone_width,
            contact_cfg.zone_height(swing.aim),
            angle,
        );

        if !hit {
            log::debug!("[PITCH] swung through at ({:.1}, {:.1})", ball.x, ball.y);
            self.contact = Some(ContactResult::Missed);
            return;
        }

        self.contact = Some(ContactResult::Hit);
        let outcome = match timing {
            TimingQuality::Perfect => self.roll_hit(swing, ball.xy(), ctx),
            // Classified swings only reach here with Foul or Perfect timing
            TimingQuality::Foul | TimingQuality::None => Outcome::Foul,
        };

        if outcome == Outcome::Foul {
            ctx.out.play_sound(sounds::FOUL_TIP);
        } else {
            ctx.out.play_sound(sounds::BAT_CRACK);
            let crowd = if outcome.is_hit() { sounds::CROWD_CHEER } else { sounds::CROWD_GROAN };
            ctx.out.schedule_sound(crowd, CROWD_DELAY_MS);
        }
        self.set_outcome(outcome);
    }

    /// Hit-type roll for a perfectly timed contact, with the aim-mismatch downgrade
    fn roll_hit(&self, swing: SwingInput, ball: Point2, ctx: &mut Ctx<'_>) -> Outcome {
        let tables = &ctx.cfg.hit_tables;
        let roll = ctx.rng.gen_range(0.0..HitTable::ROLL_MAX);
        let hit = tables.table(swing.category).outcome_for(roll);

        // Screen y grows downward
        let ball_high = ball.y < ctx.cfg.strike_zone.rect.center.y;
        let mismatch_out = match (swing.aim, ball_high) {
            (SwingAim::Low, true) => Some(Outcome::Flyout),
            (SwingAim::High, false) => Some(Outcome::Groundout),
            _ => None,
        };

        match mismatch_out {
            Some(out) if ctx.rng.gen::<f64>() < tables.mismatch_out_chance => {
                log::debug!("[PITCH] {:?} roll {:.2} downgraded to {:?}", hit, roll, out);
                out
            }
            _ => {
                log::debug!("[PITCH] {:?} swing roll {:.2} → {:?}", swing.category, roll, hit);
                hit
            }
        }
    }

    /// Ball/strike call at the plate
    fn make_call(&mut self, ctx: &mut Ctx<'_>) {
        if self.results_done {
            return;
        }
        let outcome = if self.swing.is_some() {
            Outcome::SwingingStrike
        } else {
            let ball = arrival_position(&self.pitch);
            if ctx.zone.in_zone(ball.xy(), ctx.cfg.contact.ball_radius) {
                Outcome::CalledStrike
            } else {
                Outcome::Ball
            }
        };

        ctx.out.play_sound(sounds::GLOVE_POP);
        let umpire = if outcome == Outcome::Ball { sounds::UMPIRE_BALL } else { sounds::UMPIRE_STRIKE };
        ctx.out.schedule_sound(umpire, UMPIRE_DELAY_MS);
        self.set_outcome(outcome);
    }

    fn set_outcome(&mut self, outcome: Outcome) {
        if self.results_done {
            contract_violation("outcome already set for this pitch");
            return;
        }
        log::info!("[PITCH] {} → {}", self.pitch.label, outcome);
        self.outcome = Some(outcome);
        self.results_done = true;
    }

    fn summary(&self) -> Option<PitchSummary> {
        Some(PitchSummary {
            pitch: self.pitch.clone(),
            swing: self.swing,
            timing: self.timing,
            contact: self.contact,
            arrival: arrival_position(&self.pitch),
            outcome: self.outcome?,
        })
    }
}

/// Broken phase table: fatal in development builds, logged otherwise.
fn contract_violation(msg: &str) {
    if cfg!(any(debug_assertions, feature = "strict_contracts")) {
        panic!("pitch state machine contract violated: {}", msg);
    }
    log::error!("pitch state machine contract violated: {}", msg);
}

// ============================================================================
// PitchEngine
// ============================================================================

/// Runs pitches and forwards presentation side effects to `P`.
pub struct PitchEngine<P: Presentation> {
    config: EngineConfig,
    zone: Box<dyn ZoneClassifier>,
    presentation: P,
    rng: ChaCha8Rng,
    run: Option<PitchRun>,
}

impl<P: Presentation> PitchEngine<P> {
    /// Engine with the geometric strike zone from `config`
    pub fn new(config: EngineConfig, presentation: P, seed: u64) -> Result<Self> {
        let zone = Box::new(RectZone::from_config(&config.strike_zone));
        Self::with_zone(config, zone, presentation, seed)
    }

    /// Engine with a custom strike-zone oracle
    pub fn with_zone(
        config: EngineConfig,
        zone: Box<dyn ZoneClassifier>,
        presentation: P,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, zone, presentation, rng: ChaCha8Rng::seed_from_u64(seed), run: None })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    pub fn current(&self) -> Option<&PitchRun> {
        self.run.as_ref()
    }

    /// True while a pitch is running or its outcome has not been taken
    pub fn is_busy(&self) -> bool {
        self.run.as_ref().is_some_and(|r| !r.outcome_taken)
    }

    /// Begin a new pitch at pitch-relative time 0
    pub fn start_pitch(&mut self, pitch: PitchDefinition) -> Result<()> {
        pitch.validate()?;
        if let Some(prev) = &self.run {
            if !prev.outcome_taken {
                log::warn!(
                    "[PITCH] discarding unfinished {} pitch in {:?}",
                    prev.pitch.label,
                    prev.phase
                );
            }
        }
        log::debug!(
            "[PITCH] start {} travel={:.0}ms v=({:.2}, {:.2}) a=({:.4}, {:.4})",
            pitch.label,
            pitch.traveltime_ms,
            pitch.vx,
            pitch.vy,
            pitch.ax,
            pitch.ay
        );
        self.run = Some(PitchRun::new(pitch, &self.config));
        Ok(())
    }

    /// Register the batter's swing. Returns whether it was accepted.
    ///
    /// Only the first swing during Flight counts; anything else is ignored.
    pub fn register_swing(&mut self, category: SwingCategory, aim: SwingAim, timestamp_ms: f64) -> bool {
        self.register_swing_input(SwingInput::new(category, aim, timestamp_ms))
    }

    /// Register a swing that carries a cursor/bat point
    pub fn register_swing_input(&mut self, swing: SwingInput) -> bool {
        let Some(run) = self.run.as_mut() else {
            return false;
        };
        let accepted = run.register_swing(swing, &self.config);
        if accepted {
            self.presentation.play_sound(sounds::SWING);
        }
        accepted
    }

    /// Advance the current pitch to `elapsed_ms` (ms since `start_pitch`)
    pub fn tick(&mut self, elapsed_ms: f64) -> Option<TickReport> {
        let Self { config, zone, presentation, rng, run } = self;
        let run = run.as_mut()?;
        let mut ctx = Ctx { cfg: config, zone: &**zone, out: presentation, rng };

        let had_outcome = run.results_done;
        run.advance_ball(elapsed_ms);

        loop {
            let next = match run.phase {
                PitchPhase::Windup => run.windup_transition(elapsed_ms),
                PitchPhase::Flight => run.flight_transition(elapsed_ms),
                PitchPhase::ContactEvaluation => run.contact_transition(elapsed_ms, ctx.cfg),
                PitchPhase::FollowThrough => run.follow_through_transition(elapsed_ms, ctx.cfg),
                PitchPhase::Resolved => None,
            };
            match next {
                Some((phase, at_ms)) => run.enter(phase, at_ms, &mut ctx),
                None => break,
            }
        }

        if run.outcome.is_none() && elapsed_ms > run.hard_deadline_ms(ctx.cfg) {
            log::warn!(
                "[PITCH] {} undecided past {:.1}ms, forcing a call",
                run.pitch.label,
                run.hard_deadline_ms(ctx.cfg)
            );
            run.make_call(&mut ctx);
            run.phase = PitchPhase::Resolved;
        }

        if run.phase != PitchPhase::Resolved {
            let offset = ((elapsed_ms - run.phase_started_ms).max(0.0) / ANIM_FRAME_MS) as u32;
            ctx.out.draw_batter_frame(run.phase, offset);
        }

        Some(TickReport {
            phase: run.phase,
            ball: run.ball(),
            decided: if had_outcome { None } else { run.outcome },
            resolved: run.phase == PitchPhase::Resolved,
        })
    }

    /// Read the outcome of a resolved pitch. Yields it exactly once.
    pub fn take_outcome(&mut self) -> Option<PitchSummary> {
        let run = self.run.as_mut()?;
        if run.phase != PitchPhase::Resolved || run.outcome_taken {
            return None;
        }
        run.outcome_taken = true;
        run.summary()
    }
}

// ============================================================================
// Tests
// ============================================================================
