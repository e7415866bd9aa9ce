//! JSON request/response surface.
//!
//! A request carries a schema version, the seed and two rosters. The
//! response is the decided result plus the full box score, with the
//! play-by-play log attached on demand. Recording the log does not
//! consume randomness, so a response with events matches the response
//! without them stat for stat.

use serde::{Deserialize, Serialize};

use crate::engine::GameEngine;
use crate::error::{EngineError, Result};
use crate::models::box_score::BoxScore;
use crate::models::events::{EventSink, GameEvent, NoopSink, RecordingSink, Side};
use crate::models::roster::{build_team, TeamData};

pub const SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRequest {
    pub schema_version: u8,
    pub seed: u64,
    pub home_team: TeamData,
    pub away_team: TeamData,
    #[serde(default)]
    pub include_events: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameResponse {
    pub schema_version: u8,
    pub seed: u64,
    pub winner: Side,
    pub home_score: u32,
    pub away_score: u32,
    pub overtimes: u8,
    pub box_score: BoxScore,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<GameEvent>>,
}

pub fn simulate_game(request: &GameRequest) -> Result<GameResponse> {
    if request.schema_version != SCHEMA_VERSION {
        return Err(EngineError::UnsupportedSchemaVersion(request.schema_version));
    }
    let home = build_team(&request.home_team)?;
    let away = build_team(&request.away_team)?;

    let mut recording = RecordingSink::default();
    let mut noop = NoopSink;
    let sink: &mut dyn EventSink = if request.include_events {
        &mut recording
    } else {
        &mut noop
    };
    let outcome = GameEngine::new(home, away, request.seed, sink).simulate();

    Ok(GameResponse {
        schema_version: SCHEMA_VERSION,
        seed: request.seed,
        winner: outcome.winner,
        home_score: outcome.home_score,
        away_score: outcome.away_score,
        overtimes: outcome.overtimes,
        box_score: outcome.box_score,
        events: request.include_events.then_some(recording.events),
    })
}

/// String-in/string-out entry point for embedding hosts.
pub fn simulate_game_json(request_json: &str) -> Result<String> {
    let request: GameRequest = serde_json::from_str(request_json)?;
    let response = simulate_game(&request)?;
    Ok(serde_json::to_string(&response)?)
}
