//! Game Runner CLI
//!
//! Loads two roster JSON files, simulates one seeded game and prints
//! the result with a full box score.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use bb_core::models::box_score::TeamBoxScore;
use bb_core::{simulate_game, GameRequest, Side, TeamData, SCHEMA_VERSION};

#[derive(Parser)]
#[command(name = "bb_cli")]
#[command(about = "Simulate one basketball game from two roster files", long_about = None)]
struct Cli {
    /// Home roster JSON file path
    #[arg(long)]
    home: PathBuf,

    /// Away roster JSON file path
    #[arg(long)]
    away: PathBuf,

    /// Simulation seed (same seed = same game)
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Print the play-by-play event log before the box score
    #[arg(long, default_value = "false")]
    events: bool,
}

fn load_roster(path: &PathBuf) -> Result<TeamData> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading roster file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("parsing roster file {}", path.display()))
}

fn print_team(team: &TeamBoxScore) {
    println!("\n{} - {} pts (quarters: {:?})", team.team, team.score, team.quarter_scores);
    println!(
        "{:<22} {:>4} {:>4} {:>4} {:>4} {:>4} {:>4} {:>3} {:>9} {:>7} {:>7}",
        "PLAYER", "MIN", "PTS", "REB", "AST", "STL", "BLK", "PF", "FG", "3PT", "FT"
    );
    for line in &team.players {
        if line.seconds_played == 0 {
            continue;
        }
        println!(
            "{:<22} {:>4} {:>4} {:>4} {:>4} {:>4} {:>4} {:>3} {:>4}/{:<4} {:>3}/{:<3} {:>3}/{:<3}",
            format!("{} ({})", line.name, line.position.as_str()),
            line.seconds_played / 60,
            line.points,
            line.rebounds,
            line.assists,
            line.steals,
            line.blocks,
            line.personal_fouls,
            line.field_goals_made,
            line.field_goals_attempted,
            line.threes_made,
            line.threes_attempted,
            line.free_throws_made,
            line.free_throws_attempted,
        );
    }
    let t = &team.totals;
    println!(
        "TOTAL: {} pts, {} reb, {} ast, FG {}/{} ({:.1}%), 3PT {}/{} ({:.1}%), FT {}/{} ({:.1}%)",
        t.points,
        t.rebounds,
        t.assists,
        t.field_goals_made,
        t.field_goals_attempted,
        t.field_goal_pct,
        t.threes_made,
        t.threes_attempted,
        t.three_pct,
        t.free_throws_made,
        t.free_throws_attempted,
        t.free_throw_pct,
    );
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let request = GameRequest {
        schema_version: SCHEMA_VERSION,
        seed: cli.seed,
        home_team: load_roster(&cli.home)?,
        away_team: load_roster(&cli.away)?,
        include_events: cli.events,
    };
    info!(
        "simulating {} vs {} with seed {}",
        request.home_team.name, request.away_team.name, request.seed
    );

    let response = simulate_game(&request).context("simulation failed")?;

    if let Some(events) = &response.events {
        for event in events {
            println!(
                "[Q{} {:>2}:{:02}] {}",
                event.period,
                event.clock_seconds / 60,
                event.clock_seconds % 60,
                serde_json::to_string(&event.kind)?,
            );
        }
    }

    let winner = match response.winner {
        Side::Home => &response.box_score.home.team,
        Side::Away => &response.box_score.away.team,
    };
    println!(
        "\nFINAL: {} {} - {} {}{}",
        response.box_score.home.team,
        response.home_score,
        response.away_score,
        response.box_score.away.team,
        match response.overtimes {
            0 => String::new(),
            n => format!(" ({} OT)", n),
        },
    );
    println!("Winner: {}", winner);

    print_team(&response.box_score.home);
    print_team(&response.box_score.away);
    Ok(())
}
