//! Shot generation and the make-probability pipeline, plus the
//! steal/block/foul-draw threshold checks. Everything here is a pure
//! function of ratings and rolls; game state stays in the engine.

use rand::Rng;

use super::constants::{fouls, loose_ball, shooting};
use crate::models::player::{DunkerGrade, Ratings, ShotProfile};

/// Distance band of an attempt, in feet from the rim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceBand {
    Close,
    Mid,
    Three,
}

impl DistanceBand {
    pub fn of(distance: u8) -> DistanceBand {
        if distance <= shooting::CLOSE_MAX_FT {
            DistanceBand::Close
        } else if distance < shooting::THREE_MIN_FT {
            DistanceBand::Mid
        } else {
            DistanceBand::Three
        }
    }

    pub fn points(self) -> u32 {
        match self {
            DistanceBand::Three => 3,
            _ => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotMovement {
    Dunk,
    Layup,
    Jumper,
}

/// First tier whose cutoff the rating reaches, else 1.0. Tier tables
/// are ordered highest cutoff first.
pub fn tier_multiplier(rating: u8, tiers: &[(u8, f64)]) -> f64 {
    for &(cutoff, multiplier) in tiers {
        if rating >= cutoff {
            return multiplier;
        }
    }
    1.0
}

/// Draw a shot distance in feet for the shooter's archetype, then
/// apply the deep-three pull-back.
pub fn shot_distance<R: Rng>(rng: &mut R, profile: ShotProfile) -> u8 {
    let mut distance = match profile {
        ShotProfile::AllRound => rng.gen_range(1..=shooting::THREE_MAX_FT),
        ShotProfile::Inside => rng.gen_range(1..=shooting::CLOSE_MAX_FT),
        ShotProfile::MidRange => {
            let mut d = rng.gen_range(1..=26u8);
            if d >= shooting::MID_MIN_FT && rng.gen_range(1..=100u32) <= 30 {
                d -= 12;
            }
            d
        }
        ShotProfile::InsideOutside => match rng.gen_range(1..=100u32) {
            1..=40 => rng.gen_range(1..=shooting::CLOSE_MAX_FT),
            41..=55 => rng.gen_range(shooting::MID_MIN_FT..=shooting::MID_MAX_FT),
            _ => rng.gen_range(shooting::THREE_MIN_FT..=shooting::THREE_MAX_FT),
        },
        ShotProfile::Outside => match rng.gen_range(1..=100u32) {
            1..=20 => rng.gen_range(1..=shooting::CLOSE_MAX_FT),
            21..=40 => rng.gen_range(shooting::MID_MIN_FT..=shooting::MID_MAX_FT),
            _ => rng.gen_range(shooting::THREE_MIN_FT..=shooting::THREE_MAX_FT),
        },
    };
    if distance >= shooting::DEEP_THREE_FT
        && rng.gen_range(1..=100u32) <= shooting::DEEP_PULL_BACK
    {
        distance -= shooting::DEEP_PULL_BACK_FT;
    }
    distance
}

/// How a close attempt is finished. Anything beyond the restricted
/// area is a jumper.
pub fn finishing_move<R: Rng>(rng: &mut R, grade: DunkerGrade, distance: u8) -> ShotMovement {
    if distance > shooting::CLOSE_MAX_FT {
        return ShotMovement::Jumper;
    }
    let (dunk_cut, layup_cut) = match grade {
        DunkerGrade::Rare => shooting::FINISH_RARE,
        DunkerGrade::Normal => shooting::FINISH_NORMAL,
        DunkerGrade::Elite => shooting::FINISH_ELITE,
    };
    match rng.gen_range(1..=100u32) {
        roll if roll <= dunk_cut => ShotMovement::Dunk,
        roll if roll <= layup_cut => ShotMovement::Layup,
        _ => ShotMovement::Jumper,
    }
}

/// Base make percentage for a shot from `distance` feet, before any
/// player modifiers.
pub fn base_percentage(distance: u8) -> f64 {
    let d = distance as f64;
    if distance <= shooting::MID_SPLIT_FT {
        shooting::CLOSE_SLOPE * d + shooting::CLOSE_INTERCEPT
    } else if distance <= shooting::MID_MAX_FT {
        d + shooting::SHORT_MID_INTERCEPT
    } else {
        shooting::THREE_CURVE * (d - shooting::THREE_VERTEX_FT).powi(2) + shooting::THREE_PEAK
    }
}

/// One defense-density roll: how open the look turned out to be.
/// Stars are smothered less and find open looks more.
pub fn defense_density<R: Rng>(rng: &mut R, shooter_is_star: bool) -> f64 {
    let (smothered, open) = if shooter_is_star {
        shooting::DENSITY_STAR
    } else {
        shooting::DENSITY_ROLE
    };
    let roll = rng.gen_range(1..=100u32);
    if roll <= smothered {
        -shooting::DENSITY_SWING
    } else if roll > open {
        shooting::DENSITY_SWING
    } else {
        0.0
    }
}

/// Everything the make-probability pipeline needs about one attempt.
pub struct ShotAttempt<'a> {
    pub shooter: &'a Ratings,
    pub defender: &'a Ratings,
    pub distance: u8,
    pub movement: ShotMovement,
    /// Best playmaking rating among the shooter's four teammates.
    pub teammate_playmaking: u8,
    pub shooter_is_star: bool,
    pub clutch_performer: bool,
    /// Fourth quarter or overtime with the game within five.
    pub clutch_pressure: bool,
}

/// Final make percentage for one attempt. The density swing is drawn
/// separately so the rest stays a pure function.
pub fn shot_percentage(attempt: &ShotAttempt, density: f64) -> f64 {
    let band = DistanceBand::of(attempt.distance);
    let mut pct = base_percentage(attempt.distance);

    pct = match attempt.movement {
        ShotMovement::Dunk => pct * shooting::DUNK_SCALE,
        ShotMovement::Layup => pct + shooting::SKILL_COEFF * attempt.shooter.layup as f64,
        ShotMovement::Jumper => {
            let skill = match band {
                DistanceBand::Close => attempt.shooter.inside,
                DistanceBand::Mid => attempt.shooter.mid_range,
                DistanceBand::Three => attempt.shooter.three,
            };
            pct + shooting::SKILL_COEFF * (skill as f64 - shooting::JUMPER_SKILL_BASE)
        }
    };

    let contest = attempt.defender.contest_rating(attempt.distance) as f64;
    pct -= shooting::CONTEST_COEFF * (contest - shooting::CONTEST_BASE);

    pct += density;

    let delta = shooting::CONSISTENCY_COEFF
        * (attempt.shooter.offensive_consistency as f64
            - attempt.defender.defensive_consistency as f64);
    pct += delta.clamp(-shooting::CONSISTENCY_CAP, shooting::CONSISTENCY_CAP);

    for &(cutoff, bonus) in &shooting::PLAYMAKING_TIERS {
        if attempt.teammate_playmaking >= cutoff {
            pct += bonus;
            break;
        }
    }

    pct += (attempt.shooter.athleticism as f64 - attempt.defender.athleticism as f64)
        / shooting::ATHLETICISM_DIVISOR;

    pct *= tier_multiplier(attempt.shooter.overall, &shooting::OVERALL_TIERS);

    if attempt.clutch_pressure && !attempt.clutch_performer {
        pct *= shooting::CLUTCH_PENALTY;
    }
    pct
}

/// Make check: percentage scaled by 100 against a 1..=10000 roll.
pub fn shot_makes<R: Rng>(rng: &mut R, percentage: f64) -> bool {
    let roll = rng.gen_range(1..=shooting::MAKE_ROLL_MAX) as i32;
    roll < (shooting::MAKE_SCALE * percentage) as i32
}

/// Steal attempt by the on-ball defender.
pub fn steal_check<R: Rng>(rng: &mut R, defender: &Ratings) -> bool {
    let threshold = (loose_ball::STEAL_BASE
        + loose_ball::STEAL_RATING_SCALE * defender.steal as f64
        + defender.athleticism as f64)
        * tier_multiplier(defender.steal, &loose_ball::STEAL_TIERS);
    rng.gen_range(1..=100u32) as f64 * loose_ball::STEAL_ROLL_SCALE <= threshold
}

/// Block attempt by the contesting defender.
pub fn block_check<R: Rng>(rng: &mut R, defender: &Ratings) -> bool {
    let threshold = (shooting::BLOCK_BASE
        + shooting::BLOCK_RATING_SCALE * defender.block as f64
        + defender.athleticism as f64)
        * tier_multiplier(defender.block, &shooting::BLOCK_TIERS);
    rng.gen_range(1..=100u32) as f64 * shooting::BLOCK_ROLL_SCALE <= threshold
}

/// Threshold for drawing a shooting foul, against a 1..=10000 roll.
/// `and_one` applies the made-shot bases.
pub fn foul_draw_threshold(distance: u8, draw_foul: u8, star: bool, and_one: bool) -> f64 {
    let band = match DistanceBand::of(distance) {
        DistanceBand::Close => 0,
        DistanceBand::Mid => 1,
        DistanceBand::Three => 2,
    };
    let base = if and_one {
        fouls::AND_ONE_BASE[band]
    } else {
        fouls::MISS_BASE[band]
    };
    let mut coeff = 0.0;
    for &(cutoff, c) in &fouls::DRAW_COEFF_TIERS {
        if draw_foul >= cutoff {
            coeff = c;
            break;
        }
    }
    let mut threshold = base * (100.0 + coeff * draw_foul as f64);
    if star {
        threshold *= fouls::STAR_DRAW_SCALE;
    }
    threshold
}

pub fn draws_foul<R: Rng>(rng: &mut R, threshold: f64) -> bool {
    (rng.gen_range(1..=fouls::DRAW_ROLL_MAX) as f64) < threshold
}

/// One free throw.
pub fn free_throw_makes<R: Rng>(rng: &mut R, free_throw: u8) -> bool {
    rng.gen_range(1..=fouls::FT_ROLL_MAX) < fouls::FT_RATING_SCALE * free_throw as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn flat_ratings(value: u8) -> Ratings {
        Ratings {
            overall: value,
            inside: value,
            mid_range: value,
            three: value,
            layup: value,
            free_throw: value,
            playmaking: value,
            interior_defense: value,
            perimeter_defense: value,
            steal: value,
            block: value,
            athleticism: value,
            offensive_consistency: value,
            defensive_consistency: value,
            ..Ratings::default()
        }
    }

    #[test]
    fn test_base_percentage_bands() {
        assert!((base_percentage(1) - 37.8).abs() < 1e-9);
        assert!((base_percentage(10) - 36.0).abs() < 1e-9);
        assert!((base_percentage(20) - 34.0).abs() < 1e-9);
        assert!((base_percentage(21) - 29.0).abs() < 1e-9);
        assert!((base_percentage(22) - 30.0).abs() < 1e-9);
        // Quadratic falloff beyond the arc, peaking at 42.
        assert!((base_percentage(23) - 42.0).abs() < 1e-9);
        let deep = base_percentage(32);
        assert!(deep < base_percentage(26));
        assert!((deep - (42.0 - 31.0 / 81.0 * 81.0)).abs() < 1e-9);
    }

    #[test]
    fn test_distance_band_edges() {
        assert_eq!(DistanceBand::of(12), DistanceBand::Close);
        assert_eq!(DistanceBand::of(13), DistanceBand::Mid);
        assert_eq!(DistanceBand::of(22), DistanceBand::Mid);
        assert_eq!(DistanceBand::of(23), DistanceBand::Three);
        assert_eq!(DistanceBand::of(23).points(), 3);
        assert_eq!(DistanceBand::of(5).points(), 2);
    }

    #[test]
    fn test_tier_multiplier_boundaries() {
        use super::super::constants::shooting as c;
        assert_eq!(tier_multiplier(82, &c::OVERALL_TIERS), 1.0);
        assert_eq!(tier_multiplier(83, &c::OVERALL_TIERS), 1.03);
        assert_eq!(tier_multiplier(89, &c::OVERALL_TIERS), 1.06);
        assert_eq!(tier_multiplier(93, &c::OVERALL_TIERS), 1.09);
        assert_eq!(tier_multiplier(99, &c::OVERALL_TIERS), 1.12);
    }

    #[test]
    fn test_shot_distance_respects_archetype_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        for _ in 0..10_000 {
            let d = shot_distance(&mut rng, ShotProfile::Inside);
            assert!((1..=12).contains(&d), "inside {}", d);
            let d = shot_distance(&mut rng, ShotProfile::AllRound);
            assert!((1..=35).contains(&d), "all_round {}", d);
            let d = shot_distance(&mut rng, ShotProfile::Outside);
            assert!((1..=35).contains(&d), "outside {}", d);
        }
    }

    #[test]
    fn test_deep_threes_mostly_pulled_back() {
        let mut rng = ChaCha8Rng::seed_from_u64(37);
        let mut at_or_beyond_28 = 0u32;
        let mut threes = 0u32;
        for _ in 0..100_000 {
            let d = shot_distance(&mut rng, ShotProfile::Outside);
            if d >= 23 {
                threes += 1;
                if d >= 28 {
                    at_or_beyond_28 += 1;
                }
            }
        }
        // Without the pull-back 28+ would be 8/13 of all threes. Only
        // 20% of the 28..=30 draws survive at depth while 31+ draws
        // stay deep either way: 0.2*3/13 + 5/13.
        let share = at_or_beyond_28 as f64 / threes as f64;
        assert!((share - 0.4308).abs() < 0.015, "share {}", share);
    }

    #[test]
    fn test_finishing_move_beyond_paint_is_jumper() {
        let mut rng = ChaCha8Rng::seed_from_u64(41);
        for _ in 0..1000 {
            assert_eq!(finishing_move(&mut rng, DunkerGrade::Elite, 13), ShotMovement::Jumper);
        }
    }

    #[test]
    fn test_elite_dunkers_dunk_more() {
        let dunk_share = |grade: DunkerGrade| {
            let mut rng = ChaCha8Rng::seed_from_u64(43);
            let draws = 50_000;
            let mut dunks = 0u32;
            for _ in 0..draws {
                if finishing_move(&mut rng, grade, 5) == ShotMovement::Dunk {
                    dunks += 1;
                }
            }
            dunks as f64 / draws as f64
        };
        let rare = dunk_share(DunkerGrade::Rare);
        let elite = dunk_share(DunkerGrade::Elite);
        assert!((rare - 0.10).abs() < 0.01, "rare {}", rare);
        assert!((elite - 0.30).abs() < 0.01, "elite {}", elite);
    }

    #[test]
    fn test_dunk_multiplies_layup_adds() {
        let shooter = flat_ratings(70);
        let defender = flat_ratings(70);
        let attempt = |movement| ShotAttempt {
            shooter: &shooter,
            defender: &defender,
            distance: 4,
            movement,
            teammate_playmaking: 70,
            shooter_is_star: false,
            clutch_performer: false,
            clutch_pressure: false,
        };
        let dunk = shot_percentage(&attempt(ShotMovement::Dunk), 0.0);
        let layup = shot_percentage(&attempt(ShotMovement::Layup), 0.0);
        let jumper = shot_percentage(&attempt(ShotMovement::Jumper), 0.0);
        assert!(dunk > layup && layup > jumper);
    }

    #[test]
    fn test_clutch_penalty_only_under_pressure_without_flag() {
        let shooter = flat_ratings(70);
        let defender = flat_ratings(70);
        let attempt = |pressure: bool, performer: bool| {
            let a = ShotAttempt {
                shooter: &shooter,
                defender: &defender,
                distance: 15,
                movement: ShotMovement::Jumper,
                teammate_playmaking: 70,
                shooter_is_star: false,
                clutch_performer: performer,
                clutch_pressure: pressure,
            };
            shot_percentage(&a, 0.0)
        };
        let calm = attempt(false, false);
        let squeezed = attempt(true, false);
        let ice = attempt(true, true);
        assert!((squeezed - calm * 0.8).abs() < 1e-9);
        assert_eq!(ice, calm);
    }

    #[test]
    fn test_playmaking_bonus_tiers() {
        let shooter = flat_ratings(70);
        let defender = flat_ratings(70);
        let with_playmaking = |pm: u8| {
            let a = ShotAttempt {
                shooter: &shooter,
                defender: &defender,
                distance: 15,
                movement: ShotMovement::Jumper,
                teammate_playmaking: pm,
                shooter_is_star: false,
                clutch_performer: false,
                clutch_pressure: false,
            };
            shot_percentage(&a, 0.0)
        };
        let base = with_playmaking(0);
        assert!((with_playmaking(83) - base - 1.0).abs() < 1e-9);
        assert!((with_playmaking(87) - base - 2.0).abs() < 1e-9);
        assert!((with_playmaking(93) - base - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_steal_rate_statistical_band() {
        // steal 95, athleticism 99: threshold (420+475+99)*1.5 = 1491,
        // so rolls 1..=24 succeed, a 24% rate.
        let defender = Ratings { steal: 95, athleticism: 99, ..Ratings::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(47);
        let draws = 100_000;
        let mut stolen = 0u32;
        for _ in 0..draws {
            if steal_check(&mut rng, &defender) {
                stolen += 1;
            }
        }
        let rate = stolen as f64 / draws as f64;
        assert!((rate - 0.24).abs() < 0.012, "rate {}", rate);
    }

    #[test]
    fn test_block_rate_orders_by_rating() {
        let rate = |block: u8| {
            let defender = Ratings { block, athleticism: 80, ..Ratings::default() };
            let mut rng = ChaCha8Rng::seed_from_u64(53);
            let draws = 50_000;
            let mut blocks = 0u32;
            for _ in 0..draws {
                if block_check(&mut rng, &defender) {
                    blocks += 1;
                }
            }
            blocks as f64 / draws as f64
        };
        let low = rate(40);
        let high = rate(95);
        assert!(low < high, "low {} high {}", low, high);
        assert!(low > 0.0 && high < 1.0);
    }

    #[test]
    fn test_foul_draw_threshold_shape() {
        // Close misses draw far more fouls than three-point misses.
        let close = foul_draw_threshold(5, 80, false, false);
        let three = foul_draw_threshold(25, 80, false, false);
        assert!(close > three);
        // And-ones are rarer than shooting fouls on misses.
        assert!(foul_draw_threshold(5, 80, false, true) < close);
        // Stars draw twice the whistles.
        assert!((foul_draw_threshold(5, 80, true, false) - 2.0 * close).abs() < 1e-9);
        // Coefficient tiers kick in at 85 and 94.
        let t84 = foul_draw_threshold(5, 84, false, false);
        let t85 = foul_draw_threshold(5, 85, false, false);
        assert!((t84 - 10.0 * (100.0 + 2.1 * 84.0)).abs() < 1e-9);
        assert!((t85 - 10.0 * (100.0 + 2.3 * 85.0)).abs() < 1e-9);
    }

    #[test]
    fn test_free_throw_rate_tracks_rating() {
        let rate = |ft: u8| {
            let mut rng = ChaCha8Rng::seed_from_u64(59);
            let draws = 50_000;
            let mut made = 0u32;
            for _ in 0..draws {
                if free_throw_makes(&mut rng, ft) {
                    made += 1;
                }
            }
            made as f64 / draws as f64
        };
        assert!((rate(90) - 0.9).abs() < 0.01);
        assert!((rate(50) - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_defense_density_star_sees_more_open_looks() {
        let open_share = |star: bool| {
            let mut rng = ChaCha8Rng::seed_from_u64(61);
            let draws = 50_000;
            let mut open = 0u32;
            for _ in 0..draws {
                if defense_density(&mut rng, star) > 0.0 {
                    open += 1;
                }
            }
            open as f64 / draws as f64
        };
        let star = open_share(true);
        let role = open_share(false);
        assert!((star - 0.40).abs() < 0.01, "star {}", star);
        assert!((role - 0.35).abs() < 0.01, "role {}", role);
    }

    #[test]
    fn test_negative_percentage_never_makes() {
        let mut rng = ChaCha8Rng::seed_from_u64(67);
        for _ in 0..10_000 {
            assert!(!shot_makes(&mut rng, -5.0));
        }
    }
}
