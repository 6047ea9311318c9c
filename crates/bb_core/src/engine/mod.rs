//! Pitch Resolution Engine
//!
//! - `geometry`: circle vs (rotated) rectangle tests
//! - `trajectory`: perspective Euler integrator and inverse aim solver
//! - `pitch`: pitch/swing/outcome data model
//! - `state_machine`: Windup → Flight → Contact/Follow-Through → Resolved
//! - `zone`: strike-zone oracle
//! - `presentation`: outbound render/audio/HUD calls
//! - `config`: tuning constants and presets

pub mod config;
pub mod geometry;
pub mod pitch;
pub mod presentation;
pub mod state_machine;
pub mod timestep;
pub mod trajectory;
pub mod zone;

pub use config::EngineConfig;
pub use geometry::{circle_rect_collision, circle_rotated_rect_collision, Point2, Rect};
pub use pitch::{
    Outcome, PitchDefinition, PitchLabel, SwingAim, SwingCategory, SwingInput, TimingQuality,
};
pub use presentation::{NullPresentation, Presentation, PresentationCall, RecordingPresentation};
pub use state_machine::{ContactResult, PitchEngine, PitchPhase, PitchRun, PitchSummary, TickReport};
pub use trajectory::{arrival_position, position_at, velocity_for_target, BallFlight, Position3};
pub use zone::{RectZone, ZoneClassifier};
