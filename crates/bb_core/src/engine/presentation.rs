//! Outbound presentation calls (engine → renderer/audio/HUD)
//!
//! The engine fires these as side effects at phase transitions and never
//! reads anything back. Rendering, audio and widgets live outside this crate.

use serde::{Deserialize, Serialize};

use super::state_machine::PitchPhase;

/// Sound cue names
pub mod sounds {
    pub const PITCH_RELEASE: &str = "pitch_release";
    pub const SWING: &str = "swing";
    pub const BAT_CRACK: &str = "bat_crack";
    pub const FOUL_TIP: &str = "foul_tip";
    pub const GLOVE_POP: &str = "glove_pop";
    pub const UMPIRE_STRIKE: &str = "umpire_strike";
    pub const UMPIRE_BALL: &str = "umpire_ball";
    pub const CROWD_CHEER: &str = "crowd_cheer";
    pub const CROWD_GROAN: &str = "crowd_groan";
}

/// Presentation sink
pub trait Presentation {
    /// Draw the batter animation frame `offset` of `phase`
    fn draw_batter_frame(&mut self, phase: PitchPhase, offset: u32);
    fn play_sound(&mut self, name: &str);
    fn schedule_sound(&mut self, name: &str, delay_ms: f64);
    fn update_scoreboard_text(&mut self, text: &str);
}

/// Discards every call
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresentation;

impl Presentation for NullPresentation {
    fn draw_batter_frame(&mut self, _phase: PitchPhase, _offset: u32) {}
    fn play_sound(&mut self, _name: &str) {}
    fn schedule_sound(&mut self, _name: &str, _delay_ms: f64) {}
    fn update_scoreboard_text(&mut self, _text: &str) {}
}

/// One recorded presentation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum PresentationCall {
    DrawBatterFrame { phase: PitchPhase, offset: u32 },
    PlaySound { name: String },
    ScheduleSound { name: String, delay_ms: f64 },
    UpdateScoreboard { text: String },
}

/// Records calls in order (tests, headless runs)
#[derive(Debug, Default, Clone)]
pub struct RecordingPresentation {
    pub calls: Vec<PresentationCall>,
    /// Skip batter frames, which dominate the log otherwise
    pub skip_frames: bool,
}

impl RecordingPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_frames() -> Self {
        Self { calls: Vec::new(), skip_frames: true }
    }

    /// Names of every sound played immediately, in order
    pub fn sounds_played(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PresentationCall::PlaySound { name } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last_scoreboard(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            PresentationCall::UpdateScoreboard { text } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Presentation for RecordingPresentation {
    fn draw_batter_frame(&mut self, phase: PitchPhase, offset: u32) {
        if !self.skip_frames {
            self.calls.push(PresentationCall::DrawBatterFrame { phase, offset });
        }
    }

    fn play_sound(&mut self, name: &str) {
        self.calls.push(PresentationCall::PlaySound { name: name.to_string() });
    }

    fn schedule_sound(&mut self, name: &str, delay_ms: f64) {
        self.calls.push(PresentationCall::ScheduleSound { name: name.to_string(), delay_ms });
    }

    fn update_scoreboard_text(&mut self, text: &str) {
        self.calls.push(PresentationCall::UpdateScoreboard { text: text.to_string() });
    }
}
