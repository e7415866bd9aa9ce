use serde::{Deserialize, Serialize};

/// The five classic lineup slots. Lineups are fixed-size arrays indexed
/// by `Position::index()` so that iteration order is always C, PF, SF,
/// SG, PG regardless of input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    C,
    PF,
    SF,
    SG,
    PG,
}

impl Position {
    pub const ALL: [Position; 5] = [
        Position::C,
        Position::PF,
        Position::SF,
        Position::SG,
        Position::PG,
    ];

    pub fn index(self) -> usize {
        match self {
            Position::C => 0,
            Position::PF => 1,
            Position::SF => 2,
            Position::SG => 3,
            Position::PG => 4,
        }
    }

    pub fn from_index(index: usize) -> Position {
        Position::ALL[index % 5]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Position::C => "C",
            Position::PF => "PF",
            Position::SF => "SF",
            Position::SG => "SG",
            Position::PG => "PG",
        }
    }
}

/// Shot-distance archetype. Drives the distance distribution in
/// `engine::shooting::shot_distance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotProfile {
    AllRound,
    Inside,
    MidRange,
    InsideOutside,
    Outside,
}

/// How often a player finishes close shots with a dunk. Derived once
/// at roster load from the two dunk ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DunkerGrade {
    Rare,
    Normal,
    Elite,
}

impl DunkerGrade {
    pub fn from_ratings(standing_dunk: u8, driving_dunk: u8) -> DunkerGrade {
        let sum = standing_dunk as u16 + driving_dunk as u16;
        if sum >= 160 || standing_dunk >= 90 || driving_dunk >= 90 {
            DunkerGrade::Elite
        } else if sum <= 60 {
            DunkerGrade::Rare
        } else {
            DunkerGrade::Normal
        }
    }
}

/// Rotation tier assigned in the roster. Starters open the game, the
/// bench covers scheduled rest windows, the deep bench only plays
/// garbage time or emergencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationTier {
    Starter,
    Bench,
    DeepBench,
}

/// Static skill ratings, 0-99 except where noted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Ratings {
    pub overall: u8,
    pub inside: u8,
    pub mid_range: u8,
    pub three: u8,
    pub layup: u8,
    pub standing_dunk: u8,
    pub driving_dunk: u8,
    /// Free-throw percentage, 0-100.
    pub free_throw: u8,
    pub playmaking: u8,
    pub offensive_rebound: u8,
    pub defensive_rebound: u8,
    pub interior_defense: u8,
    pub perimeter_defense: u8,
    pub steal: u8,
    pub block: u8,
    pub athleticism: u8,
    pub draw_foul: u8,
    pub durability: u8,
    pub offensive_consistency: u8,
    pub defensive_consistency: u8,
}

impl Ratings {
    /// Composite score for ball-handler selection: overall dominates,
    /// the offensive skill spread breaks ties between similar players.
    pub fn general_score(&self) -> f64 {
        0.65 * self.overall as f64
            + 0.07
                * (self.playmaking as f64
                    + self.inside as f64
                    + self.mid_range as f64
                    + self.three as f64
                    + self.layup as f64)
    }

    /// Composite score for rebound-contest draws.
    pub fn rebound_score(&self, offensive: bool) -> f64 {
        let rebound = if offensive {
            self.offensive_rebound
        } else {
            self.defensive_rebound
        };
        0.1 * self.overall as f64 + 0.9 * rebound as f64
    }

    /// Contest rating against a shot from `distance` feet.
    pub fn contest_rating(&self, distance: u8) -> u8 {
        if distance <= 12 {
            self.interior_defense
        } else {
            self.perimeter_defense
        }
    }
}

/// Accumulated counting stats for one game.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatLine {
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    pub personal_fouls: u32,
    pub flagrant_fouls: u32,
    pub field_goals_made: u32,
    pub field_goals_attempted: u32,
    pub threes_made: u32,
    pub threes_attempted: u32,
    pub free_throws_made: u32,
    pub free_throws_attempted: u32,
    pub seconds_played: u32,
}

/// One player with his in-game mutable state.
#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub position: Position,
    pub shot_profile: ShotProfile,
    pub dunker_grade: DunkerGrade,
    pub rotation: RotationTier,
    pub clutch_performer: bool,
    pub ratings: Ratings,
    pub stats: StatLine,
    pub on_court: bool,
    /// Cleared on foul-out, flagrant ejection or injury. An ineligible
    /// player never returns in this game.
    pub eligible: bool,
    /// Seconds of the current on-court stint, reset on every swap.
    pub stint_seconds: u32,
}

impl Player {
    /// Stars are strictly above the star cutoff rating.
    pub fn is_star(&self) -> bool {
        self.ratings.overall > crate::engine::constants::selection::STAR_RATING
    }
}
