//! Weighted participant selection within a lineup.
//!
//! Every pick walks cumulative probability bands in lineup order
//! (C, PF, SF, SG, PG). The point guard is always the unconditional
//! fallback arm, so whatever probability mass the first four bands do
//! not cover lands on him. That asymmetry is deliberate and part of
//! the engine's tuning; do not "fix" it by normalizing the weights.

use rand::Rng;

use super::constants::{assist, selection};
use crate::models::player::Player;

/// What a lineup draw is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    General,
    OffensiveRebound,
    DefensiveRebound,
    Playmaking,
}

fn criterion_score(player: &Player, criterion: Criterion) -> f64 {
    match criterion {
        Criterion::General => player.ratings.general_score(),
        Criterion::OffensiveRebound => player.ratings.rebound_score(true),
        Criterion::DefensiveRebound => player.ratings.rebound_score(false),
        Criterion::Playmaking => player.ratings.playmaking as f64,
    }
}

/// Per-slot selection weight: floored at zero so players far below the
/// lineup average are never picked.
pub fn slot_weight(score: f64, lineup_average: f64) -> f64 {
    (selection::WEIGHT_SCALE * (selection::WEIGHT_BASE + score - lineup_average)).max(0.0)
}

/// Draw one of five lineup slots from cumulative weight bands on a
/// `1..=1000` roll. Slots C through SG claim their bands in order; any
/// leftover roll range falls to the PG slot.
pub fn weighted_slot<R: Rng>(rng: &mut R, scores: &[f64; 5]) -> usize {
    let average = scores.iter().sum::<f64>() / 5.0;
    let roll = rng.gen_range(1..=selection::PICK_ROLL_MAX) as f64;
    let mut cumulative = 0.0;
    for slot in 0..4 {
        cumulative += slot_weight(scores[slot], average);
        if roll <= cumulative {
            return slot;
        }
    }
    4
}

/// Pick the slot that initiates the possession.
pub fn choose_ball_handler<R: Rng>(rng: &mut R, lineup: &[&Player; 5]) -> usize {
    let scores = lineup.map(|p| criterion_score(p, Criterion::General));
    weighted_slot(rng, &scores)
}

/// Pick one slot for a rebound-contest draw.
pub fn choose_rebounder<R: Rng>(rng: &mut R, lineup: &[&Player; 5], offensive: bool) -> usize {
    let criterion = if offensive {
        Criterion::OffensiveRebound
    } else {
        Criterion::DefensiveRebound
    };
    let scores = lineup.map(|p| criterion_score(p, criterion));
    weighted_slot(rng, &scores)
}

/// Pick the defending slot for a given handler slot: usually the
/// positional matchup, otherwise an even split over the other four
/// slots in lineup order.
pub fn choose_defender<R: Rng>(rng: &mut R, handler_slot: usize) -> usize {
    let roll = rng.gen_range(1..=100u32);
    if roll <= selection::DEFENDER_SAME_SLOT {
        return handler_slot;
    }
    let band = (roll - selection::DEFENDER_SAME_SLOT - 1) / selection::DEFENDER_BAND;
    let mut others = (0..5).filter(|&slot| slot != handler_slot);
    // band is 0..4 by construction
    others.nth(band as usize).unwrap_or(handler_slot)
}

/// Decide whether a made basket was assisted and by which slot.
///
/// One roll splits the decision in two. In the direct-credit band the
/// best playmaker among the four teammates either takes the assist
/// (always on the low tier, otherwise only with elite playmaking) or
/// nobody does. Above the band the shot is assisted with high
/// probability (less often for stars, who create their own looks) and
/// the passer is drawn weighted by playmaking.
pub fn choose_assister<R: Rng>(
    rng: &mut R,
    lineup: &[&Player; 5],
    shooter_slot: usize,
) -> Option<usize> {
    let top_slot = (0..5)
        .filter(|&slot| slot != shooter_slot)
        .max_by(|&a, &b| {
            lineup[a]
                .ratings
                .playmaking
                .cmp(&lineup[b].ratings.playmaking)
                .then(b.cmp(&a))
        })?;
    let top_playmaking = lineup[top_slot].ratings.playmaking;

    let direct = rng.gen_range(1..=100u32);
    if direct <= assist::DIRECT_ROLL {
        if direct <= assist::SECOND_ROLL || top_playmaking >= assist::DIRECT_MIN_PLAYMAKING {
            return Some(top_slot);
        }
        return None;
    }

    let assisted_cut = if lineup[shooter_slot].is_star() {
        assist::STAR_SHOOTER
    } else {
        assist::ROLE_SHOOTER
    };
    if rng.gen_range(1..=100u32) > assisted_cut {
        return None;
    }

    // Re-roll the playmaking draw until it lands off the shooter. With
    // ratings capped at 99 every other slot keeps a positive weight, so
    // this terminates.
    let scores = lineup.map(|p| criterion_score(p, Criterion::Playmaking));
    loop {
        let slot = weighted_slot(rng, &scores);
        if slot != shooter_slot {
            return Some(slot);
        }
    }
}
