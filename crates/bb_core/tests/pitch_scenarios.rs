//! End-to-end pitch scenarios: engine → resolver → AI

use bb_core::ai::{GameStateKey, PitchSelector, QTable};
use bb_core::engine::config::LearningConfig;
use bb_core::engine::geometry::Point2;
use bb_core::engine::presentation::{sounds, RecordingPresentation};
use bb_core::engine::state_machine::PitchEngine;
use bb_core::engine::timestep::TICK_MS;
use bb_core::engine::trajectory::velocity_for_target;
use bb_core::game::{GameCount, OutcomeResolver, PlateEvent};
use bb_core::{
    default_arsenal, EngineConfig, GameSession, Outcome, PitchDefinition, PitchLabel, SwingAim, SwingCategory,
    TimingQuality,
};

const RELEASE: Point2 = Point2::new(650.0, 300.0);

fn pitch_to(tx: f64, ty: f64) -> PitchDefinition {
    let (vx, vy) = velocity_for_target(RELEASE, tx, ty, 0.0, 0.0, 370.0);
    PitchDefinition::new(PitchLabel::FOUR_SEAM, RELEASE, vx, vy, 0.0, 0.0, 370.0).unwrap()
}

fn engine() -> PitchEngine<RecordingPresentation> {
    PitchEngine::new(EngineConfig::deterministic(), RecordingPresentation::without_frames(), 2024).unwrap()
}

/// Tick at 60Hz until the pitch resolves
fn play_out(engine: &mut PitchEngine<RecordingPresentation>, from_ms: f64) -> Outcome {
    let mut t = from_ms;
    loop {
        if engine.tick(t).is_some_and(|r| r.resolved) {
            return engine.take_outcome().unwrap().outcome;
        }
        t += TICK_MS;
        assert!(t < 10_000.0, "pitch never resolved");
    }
}

#[test]
fn called_strike_in_zone_adds_a_strike() {
    let mut e = engine();
    e.start_pitch(pitch_to(640.0, 470.0)).unwrap();
    let outcome = play_out(&mut e, 0.0);
    assert_eq!(outcome, Outcome::CalledStrike);

    let mut count = GameCount::new();
    let signal = OutcomeResolver::default().resolve(outcome, &mut count);
    assert_eq!(signal.event, PlateEvent::Strike);
    assert_eq!(count.strikes, 1);
}

#[test]
fn called_third_strike_is_strikeout() {
    let mut e = engine();
    e.start_pitch(pitch_to(640.0, 470.0)).unwrap();
    let outcome = play_out(&mut e, 0.0);

    let mut count = GameCount { strikes: 2, balls: 1, ..Default::default() };
    let signal = OutcomeResolver::default().resolve(outcome, &mut count);
    assert_eq!(signal.event, PlateEvent::Strikeout);
    assert_eq!(count.outs, 1);
    assert_eq!((count.balls, count.strikes), (0, 0));
}

/// "Registered at arrival ±10ms" is measured where the bat meets the ball:
/// timing error is `|swing_time + swing_offset - arrival|`, so the keypress
/// lands one swing offset (150ms) ahead of arrival. A keypress at arrival
/// itself is outside the flight window and is ignored.
#[test]
fn perfect_swing_meets_ball_within_10ms_of_arrival_is_a_hit() {
    let config = EngineConfig::deterministic();
    for delta in [-10.0, 0.0, 10.0] {
        let mut session = GameSession::new(
            config.clone(),
            default_arsenal().clone(),
            RecordingPresentation::without_frames(),
            77,
        )
        .unwrap();
        session.begin_scripted_pitch(pitch_to(640.0, 510.0)).unwrap();

        let arrival = session.engine().current().unwrap().arrival_ms();
        // The bat meets the ball one swing offset after the keypress
        let swing_at = arrival - config.timing.swing_offset_ms + delta;
        assert!(session.tick(swing_at).is_none());
        assert!(session.register_swing(SwingCategory::Contact, SwingAim::Low, swing_at));
        assert_eq!(
            session.engine().current().unwrap().timing(),
            Some(TimingQuality::Perfect)
        );

        let mut t = swing_at;
        let record = loop {
            t += TICK_MS;
            if let Some(record) = session.tick(t) {
                break record;
            }
        };
        assert!(record.outcome.is_hit(), "delta {}: got {:?}", delta, record.outcome);
        assert_eq!((session.count().balls, session.count().strikes), (0, 0));
        assert_eq!(session.count().hits_allowed, 1);
        assert!(session.presentation().sounds_played().contains(&sounds::BAT_CRACK));
    }
}

#[test]
fn fourth_ball_walks_and_forces_runner() {
    let mut e = engine();
    e.start_pitch(pitch_to(820.0, 300.0)).unwrap();
    let outcome = play_out(&mut e, 0.0);
    assert_eq!(outcome, Outcome::Ball);

    let mut count = GameCount { balls: 3, ..Default::default() };
    count.bases.first = true;
    let signal = OutcomeResolver::default().resolve(outcome, &mut count);
    assert_eq!(signal.event, PlateEvent::Walk);
    assert!(count.bases.first);
    assert!(count.bases.second);
    assert!(!count.bases.third);
    assert_eq!(signal.runs_scored, 0);
    assert_eq!(count.balls, 0);
}

#[test]
fn greedy_choice_returns_dominant_action() {
    let state = GameStateKey::from(&GameCount { strikes: 1, balls: 2, ..Default::default() });
    let mut table = QTable::new();
    table.set(state, PitchLabel::CURVEBALL, 1.75);
    table.set(state, PitchLabel::FOUR_SEAM, 0.5);
    table.set(state, PitchLabel::SLIDER, -0.25);

    let mut ai = PitchSelector::new(default_arsenal().labels(), &LearningConfig::default(), 9).with_table(table);
    for _ in 0..50 {
        assert_eq!(ai.choose_action(&state, 0.0).unwrap(), PitchLabel::CURVEBALL);
    }
}

#[test]
fn session_learns_from_every_pitch() {
    let mut session = GameSession::new(
        EngineConfig::deterministic(),
        default_arsenal().clone(),
        RecordingPresentation::without_frames(),
        5,
    )
    .unwrap();

    let start = GameStateKey::from(session.count());
    session.begin_scripted_pitch(pitch_to(820.0, 300.0)).unwrap();
    let record = session.tick(10_000.0).unwrap();
    assert_eq!(record.event, PlateEvent::Ball);
    assert_eq!(record.count_after.balls, 1);

    // 0 + 0.5 * (-0.25 + 0 - 0)
    let q = session.selector().table().get(&start, PitchLabel::FOUR_SEAM);
    assert!((q + 0.125).abs() < 1e-12);
    assert_eq!(session.presentation().last_scoreboard(), Some("B 1 S 0 O 0 | - - - | R 0 H 0"));
}
