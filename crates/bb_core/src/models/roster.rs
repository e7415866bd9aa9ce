//! Roster input schema and its conversion into in-game [`Team`] state.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::models::player::{
    DunkerGrade, Player, Position, Ratings, RotationTier, ShotProfile, StatLine,
};
use crate::models::team::Team;

/// One player as supplied in a game request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerData {
    pub name: String,
    pub position: Position,
    pub shot_profile: ShotProfile,
    pub rotation: RotationTier,
    #[serde(default)]
    pub clutch_performer: bool,
    #[serde(flatten)]
    pub ratings: Ratings,
}

/// One team as supplied in a game request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamData {
    pub name: String,
    pub players: Vec<PlayerData>,
}

fn check_ratings(player: &PlayerData) -> Result<()> {
    let r = &player.ratings;
    // free_throw is a percentage on a 0-100 scale, not a 0-99 skill
    // rating; a perfect shooter is valid input.
    if r.free_throw > 100 {
        return Err(EngineError::InvalidRating {
            player: player.name.clone(),
            field: "free_throw",
            value: r.free_throw,
        });
    }
    let fields: [(&'static str, u8); 19] = [
        ("overall", r.overall),
        ("inside", r.inside),
        ("mid_range", r.mid_range),
        ("three", r.three),
        ("layup", r.layup),
        ("standing_dunk", r.standing_dunk),
        ("driving_dunk", r.driving_dunk),
        ("playmaking", r.playmaking),
        ("offensive_rebound", r.offensive_rebound),
        ("defensive_rebound", r.defensive_rebound),
        ("interior_defense", r.interior_defense),
        ("perimeter_defense", r.perimeter_defense),
        ("steal", r.steal),
        ("block", r.block),
        ("athleticism", r.athleticism),
        ("draw_foul", r.draw_foul),
        ("durability", r.durability),
        ("offensive_consistency", r.offensive_consistency),
        ("defensive_consistency", r.defensive_consistency),
    ];
    for (field, value) in fields {
        if value > 99 {
            return Err(EngineError::InvalidRating {
                player: player.name.clone(),
                field,
                value,
            });
        }
    }
    Ok(())
}

/// Validate a roster and build the in-game team state.
///
/// A roster needs exactly one starter per lineup slot. Bench and deep
/// bench are optional per slot; candidate lists are ordered best
/// overall first so substitution lookups stay deterministic.
pub fn build_team(data: &TeamData) -> Result<Team> {
    let invalid = |reason: String| EngineError::InvalidRoster {
        team: data.name.clone(),
        reason,
    };

    if data.name.trim().is_empty() {
        return Err(invalid("team name is empty".to_string()));
    }

    let mut players = Vec::with_capacity(data.players.len());
    let mut starters: [Option<usize>; 5] = [None; 5];
    let mut bench: [Vec<usize>; 5] = Default::default();
    let mut deep_bench: [Vec<usize>; 5] = Default::default();

    for (index, entry) in data.players.iter().enumerate() {
        check_ratings(entry)?;
        let slot = entry.position.index();
        match entry.rotation {
            RotationTier::Starter => {
                if starters[slot].is_some() {
                    return Err(invalid(format!(
                        "duplicate starter at {}",
                        entry.position.as_str()
                    )));
                }
                starters[slot] = Some(index);
            }
            RotationTier::Bench => bench[slot].push(index),
            RotationTier::DeepBench => deep_bench[slot].push(index),
        }
        players.push(Player {
            name: entry.name.clone(),
            position: entry.position,
            shot_profile: entry.shot_profile,
            dunker_grade: DunkerGrade::from_ratings(
                entry.ratings.standing_dunk,
                entry.ratings.driving_dunk,
            ),
            rotation: entry.rotation,
            clutch_performer: entry.clutch_performer,
            ratings: entry.ratings,
            stats: StatLine::default(),
            on_court: entry.rotation == RotationTier::Starter,
            eligible: true,
            stint_seconds: 0,
        });
    }

    let mut resolved = [0usize; 5];
    for pos in Position::ALL {
        match starters[pos.index()] {
            Some(index) => resolved[pos.index()] = index,
            None => {
                return Err(EngineError::MissingStarter {
                    team: data.name.clone(),
                    position: pos.as_str(),
                });
            }
        }
    }

    let by_overall_desc = |players: &[Player], list: &mut Vec<usize>| {
        list.sort_by(|&a, &b| {
            players[b]
                .ratings
                .overall
                .cmp(&players[a].ratings.overall)
                .then(a.cmp(&b))
        });
    };
    for slot in 0..5 {
        by_overall_desc(&players, &mut bench[slot]);
        by_overall_desc(&players, &mut deep_bench[slot]);
    }

    Ok(Team {
        name: data.name.clone(),
        players,
        starters: resolved,
        bench,
        deep_bench,
        score: 0,
        quarter_fouls: 0,
        quarter_scores: Vec::new(),
    })
}
