//! Play-by-play event stream.
//!
//! Events are purely observational: sinks receive a borrowed event and
//! cannot feed anything back into the simulation, so attaching or
//! detaching a sink never changes a result.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// A held ball; `retained` tells whether the offense kept it.
    JumpBall { retained: bool },
    Turnover,
    Steal { fast_break_points: u32 },
    OffensiveFoul,
    DefensiveFoul { bonus: bool },
    FlagrantFoul,
    ShotMade {
        distance_ft: u8,
        points: u32,
        assisted_by: Option<u16>,
    },
    ShotMissed { distance_ft: u8 },
    Block { out_of_bounds: bool },
    FreeThrow { made: bool, attempt: u8, total: u8 },
    Rebound { offensive: bool },
    OutOfBounds,
    Substitution { incoming: u16 },
    Injury,
    FoulOut,
    PeriodEnd,
    OvertimeStart { number: u8 },
    GameEnd,
}

/// One entry in the play-by-play stream. `player` is the roster index
/// within `side`; for substitutions it is the outgoing player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub period: u8,
    /// Seconds remaining in the period when the event occurred.
    pub clock_seconds: u32,
    pub side: Side,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<u16>,
    #[serde(flatten)]
    pub kind: EventKind,
}

pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

/// Discards every event. The default sink for headless simulation.
pub struct NoopSink;

impl EventSink for NoopSink {
    fn on_event(&mut self, _event: &GameEvent) {}
}

/// Buffers every event in memory for replay-style consumers.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<GameEvent>,
}

impl EventSink for RecordingSink {
    fn on_event(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }
}
