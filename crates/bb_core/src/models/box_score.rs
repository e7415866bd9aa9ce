use serde::Serialize;

use crate::models::player::Position;
use crate::models::team::Team;

/// Shooting percentage in 0..=100. Zero attempts is 0.0, not NaN.
pub fn percentage(made: u32, attempted: u32) -> f64 {
    if attempted == 0 {
        0.0
    } else {
        made as f64 * 100.0 / attempted as f64
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerLine {
    pub name: String,
    pub position: Position,
    pub seconds_played: u32,
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
    pub field_goal_pct: f64,
    pub threes_made: u32,
    pub threes_attempted: u32,
    pub three_pct: f64,
    pub free_throws_made: u32,
    pub free_throws_attempted: u32,
    pub free_throw_pct: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamTotals {
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    pub personal_fouls: u32,
    pub field_goals_made: u32,
    pub field_goals_attempted: u32,
    pub field_goal_pct: f64,
    pub threes_made: u32,
    pub threes_attempted: u32,
    pub three_pct: f64,
    pub free_throws_made: u32,
    pub free_throws_attempted: u32,
    pub free_throw_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamBoxScore {
    pub team: String,
    pub score: u32,
    /// Points per completed period, regulation quarters then overtimes.
    pub quarter_scores: Vec<u32>,
    pub totals: TeamTotals,
    pub players: Vec<PlayerLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoxScore {
    pub home: TeamBoxScore,
    pub away: TeamBoxScore,
}

impl TeamBoxScore {
    pub fn from_team(team: &Team) -> TeamBoxScore {
        let mut totals = TeamTotals::default();
        let players = team
            .players
            .iter()
            .map(|p| {
                let s = &p.stats;
                totals.points += s.points;
                totals.rebounds += s.rebounds;
                totals.assists += s.assists;
                totals.steals += s.steals;
                totals.blocks += s.blocks;
                totals.turnovers += s.turnovers;
                totals.personal_fouls += s.personal_fouls;
                totals.field_goals_made += s.field_goals_made;
                totals.field_goals_attempted += s.field_goals_attempted;
                totals.threes_made += s.threes_made;
                totals.threes_attempted += s.threes_attempted;
                totals.free_throws_made += s.free_throws_made;
                totals.free_throws_attempted += s.free_throws_attempted;
                PlayerLine {
                    name: p.name.clone(),
                    position: p.position,
                    seconds_played: s.seconds_played,
                    points: s.points,
                    rebounds: s.rebounds,
                    assists: s.assists,
                    steals: s.steals,
                    blocks: s.blocks,
                    turnovers: s.turnovers,
                    personal_fouls: s.personal_fouls,
                    flagrant_fouls: s.flagrant_fouls,
                    field_goals_made: s.field_goals_made,
                    field_goals_attempted: s.field_goals_attempted,
                    field_goal_pct: percentage(s.field_goals_made, s.field_goals_attempted),
                    threes_made: s.threes_made,
                    threes_attempted: s.threes_attempted,
                    three_pct: percentage(s.threes_made, s.threes_attempted),
                    free_throws_made: s.free_throws_made,
                    free_throws_attempted: s.free_throws_attempted,
                    free_throw_pct: percentage(s.free_throws_made, s.free_throws_attempted),
                }
            })
            .collect();
        totals.field_goal_pct = percentage(totals.field_goals_made, totals.field_goals_attempted);
        totals.three_pct = percentage(totals.threes_made, totals.threes_attempted);
        totals.free_throw_pct =
            percentage(totals.free_throws_made, totals.free_throws_attempted);
        TeamBoxScore {
            team: team.name.clone(),
            score: team.score,
            quarter_scores: team.quarter_scores.clone(),
            totals,
            players,
        }
    }
}
