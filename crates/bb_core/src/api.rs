//! JSON API: run a seeded headless session from a request document

use serde::{Deserialize, Serialize};

use crate::ai::QEntry;
use crate::arsenal::{default_arsenal, Arsenal, PitchProfile};
use crate::engine::config::EngineConfig;
use crate::error::Result;
use crate::game::GameCount;
use crate::session::{AutoBatter, BatterProfile, GameSession, PitchRecord};

pub const SCHEMA_VERSION: u8 = 1;

fn default_half_innings() -> u32 {
    1
}

/// Session request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRequest {
    #[serde(default)]
    pub schema_version: u8,
    pub seed: u64,
    #[serde(default = "default_half_innings")]
    pub half_innings: u32,
    #[serde(default)]
    pub config: Option<EngineConfig>,
    /// Replaces the default arsenal when present
    #[serde(default)]
    pub arsenal: Option<Vec<PitchProfile>>,
    #[serde(default)]
    pub batter: Option<BatterProfile>,
    /// Overrides the configured starting ε
    #[serde(default)]
    pub epsilon: Option<f64>,
}

/// Session result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub schema_version: u8,
    pub seed: u64,
    pub half_innings: u32,
    pub final_count: GameCount,
    pub pitches: Vec<PitchRecord>,
    pub q_table: Vec<QEntry>,
}

/// Run the requested session and collect its log and learned Q-table
pub fn run_session(request: &SessionRequest) -> Result<SessionResponse> {
    let config = request.config.clone().unwrap_or_default();
    config.validate()?;
    let arsenal = match &request.arsenal {
        Some(profiles) => Arsenal::new(profiles.clone())?,
        None => default_arsenal().clone(),
    };

    let mut session = GameSession::headless(config, arsenal, request.seed)?;
    if let Some(eps) = request.epsilon {
        session.selector_mut().set_epsilon(eps);
    }
    let mut batter = AutoBatter::new(request.batter.unwrap_or_default(), request.seed.wrapping_add(1))?;
    session.play_half_innings(request.half_innings, &mut batter)?;

    Ok(SessionResponse {
        schema_version: SCHEMA_VERSION,
        seed: request.seed,
        half_innings: request.half_innings,
        final_count: session.count().clone(),
        pitches: session.log().to_vec(),
        q_table: session.selector().table().entries(),
    })
}

/// JSON in, JSON out
pub fn simulate_session_json(request_json: &str) -> Result<String> {
    let request: SessionRequest = serde_json::from_str(request_json)?;
    let response = run_session(&request)?;
    Ok(serde_json::to_string(&response)?)
}
