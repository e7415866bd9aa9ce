//! # bb_core - Deterministic Basketball Game Simulation Engine
//!
//! Possession-by-possession simulation of one basketball game with a
//! JSON API for embedding hosts.
//!
//! ## Features
//! - 100% deterministic simulation (same seed = same box score)
//! - Weighted lineup model: ball handlers, defenders, rebounders and
//!   assists all drawn from rating-based bands
//! - Substitution manager: rotation windows, foul trouble, injuries,
//!   garbage time
//! - Observational event sink for play-by-play consumers

pub mod api;
pub mod engine;
pub mod error;
pub mod models;

pub use api::{simulate_game, simulate_game_json, GameRequest, GameResponse, SCHEMA_VERSION};
pub use engine::possession::{PossessionOutcome, Resolution};
pub use engine::{GameEngine, GameOutcome};
pub use error::{EngineError, Result};
pub use models::{
    BoxScore, EventKind, EventSink, GameEvent, NoopSink, Player, PlayerData, Position, Ratings,
    RecordingSink, RotationTier, ShotProfile, Side, Team, TeamBoxScore, TeamData,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
