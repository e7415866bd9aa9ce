pub mod box_score;
pub mod events;
pub mod player;
pub mod roster;
pub mod team;

pub use box_score::{BoxScore, TeamBoxScore};
pub use events::{EventKind, EventSink, GameEvent, NoopSink, RecordingSink, Side};
pub use player::{DunkerGrade, Player, Position, Ratings, RotationTier, ShotProfile, StatLine};
pub use roster::{PlayerData, TeamData};
pub use team::Team;
