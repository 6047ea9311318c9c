//! # bb_core - Baseball Pitch Resolution Engine
//!
//! Resolves a single pitch from release to outcome and learns which pitch to
//! throw in which count.
//!
//! ## Features
//! - Perspective trajectory model with an inverse aim solver
//! - Explicit pitch state machine driven by injected time
//! - Count/bases/score resolution with pitcher rewards
//! - Tabular Q-learning pitch selection
//! - Deterministic sessions (same seed = same log)

// Doc formatting lints - purely cosmetic
#![allow(clippy::doc_lazy_continuation)]
// Physics and geometry helpers take many scalar parameters
#![allow(clippy::too_many_arguments)]
// Struct initialization pattern used intentionally in presets
#![allow(clippy::field_reassign_with_default)]

pub mod ai;
pub mod api;
pub mod arsenal;
pub mod engine;
pub mod error;
pub mod game;
pub mod session;

pub use ai::{GameStateKey, PitchSelector, QTable};
pub use api::{run_session, simulate_session_json, SessionRequest, SessionResponse};
pub use arsenal::{default_arsenal, Arsenal, PitchProfile};
pub use engine::{
    EngineConfig, Outcome, PitchDefinition, PitchEngine, PitchLabel, PitchPhase, SwingAim,
    SwingCategory, TimingQuality,
};
pub use error::{EngineError, Result};
pub use game::{resolve, GameCount, OutcomeResolver, PlateEvent, RewardSignal};
pub use session::{AutoBatter, BatterModel, BatterProfile, GameSession, PitchRecord};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
