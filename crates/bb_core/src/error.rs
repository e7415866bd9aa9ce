use thiserror::Error;

/// Fatal errors raised while validating input or serializing results.
///
/// The simulation itself never fails once a game starts: degenerate
/// rosters are handled inside the engine (players stay on court past
/// their limits, with a warning log).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchemaVersion(u8),
    #[error("Invalid roster for {team}: {reason}")]
    InvalidRoster { team: String, reason: String },
    #[error("Roster for {team} has no starter at {position}")]
    MissingStarter { team: String, position: &'static str },
    #[error("Rating out of range for {player}: {field} = {value}")]
    InvalidRating { player: String, field: &'static str, value: u8 },
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() {
            EngineError::DeserializationError(err.to_string())
        } else {
            EngineError::SerializationError(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
