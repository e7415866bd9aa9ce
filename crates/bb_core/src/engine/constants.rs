//! Tuning constants for the possession engine, grouped by concern.
//!
//! Percent-style constants are thresholds on an inclusive `1..=N` roll
//! unless noted otherwise; the roll ceiling lives next to them.

/// Weighted player-selection model.
pub mod selection {
    /// Players strictly above this overall count as stars.
    pub const STAR_RATING: u8 = 85;

    /// Weight shape: `max(0, SCALE * (BASE + score - lineup_avg))`.
    pub const WEIGHT_BASE: f64 = 20.0;
    pub const WEIGHT_SCALE: f64 = 10.0;

    /// Ceiling of the cumulative-band roll over the first four slots;
    /// any leftover mass lands on the point guard.
    pub const PICK_ROLL_MAX: u32 = 1000;

    /// Defender matchups: same slot, then 10-point bands over the
    /// remaining four slots in lineup order.
    pub const DEFENDER_SAME_SLOT: u32 = 60;
    pub const DEFENDER_BAND: u32 = 10;
}

/// Assist crediting after a made shot.
pub mod assist {
    /// Direct-credit band for the best passer among the shooter's four
    /// teammates. Rolls at or under SECOND_ROLL always credit him; the
    /// rest of the band requires elite playmaking and otherwise awards
    /// no assist at all.
    pub const DIRECT_ROLL: u32 = 40;
    pub const DIRECT_MIN_PLAYMAKING: u8 = 87;
    pub const SECOND_ROLL: u32 = 18;

    /// Above the direct band: chance the basket was assisted at all,
    /// by shooter stardom.
    pub const STAR_SHOOTER: u32 = 70;
    pub const ROLE_SHOOTER: u32 = 95;
}

/// Turnovers, steals and jump balls at the start of a possession.
pub mod loose_ball {
    pub const JUMP_BALL: u32 = 1;
    /// Of jump balls, how many are genuinely contested; the rest stay
    /// with the offense.
    pub const JUMP_BALL_CONTESTED: u32 = 60;

    pub const TURNOVER_ROLL_MAX: u32 = 200;
    pub const TURNOVER: u32 = 5;

    /// Steal check: `roll(1..=100) * 60 <= threshold` where
    /// `threshold = (BASE + 5 * steal + athleticism) * tier_multiplier`.
    pub const STEAL_ROLL_SCALE: f64 = 60.0;
    pub const STEAL_BASE: f64 = 420.0;
    pub const STEAL_RATING_SCALE: f64 = 5.0;
    pub const STEAL_TIERS: [(u8, f64); 4] = [(95, 1.5), (92, 1.4), (87, 1.3), (83, 1.15)];

    /// After a steal: share of possessions with no fast break at all,
    /// and the finisher split when there is one.
    pub const NO_FAST_BREAK: u32 = 30;
    pub const STEALER_FINISHES: u32 = 52;
}

/// Personal fouls away from the shot, shooting fouls and free throws.
pub mod fouls {
    /// On the per-possession foul roll (1..=100): 1 is an offensive
    /// foul, 2 a defensive one.
    pub const OFFENSIVE: u32 = 1;
    pub const DEFENSIVE: u32 = 2;

    /// Chance the ball-handler himself commits the offensive foul;
    /// otherwise a random teammate does.
    pub const HANDLER_COMMITS: u32 = 52;

    pub const BONUS_THRESHOLD: u8 = 5;
    pub const BONUS_FREE_THROWS: u8 = 2;
    pub const FOUL_OUT: u32 = 6;
    pub const FLAGRANT_EJECTION: u32 = 2;

    /// Shooting-foul draw: `base * (100 + coeff * draw_foul)` against a
    /// roll of 1..=10000. And-one bases apply to made shots.
    pub const DRAW_ROLL_MAX: u32 = 10_000;
    pub const AND_ONE_BASE: [f64; 3] = [5.0, 2.0, 1.0];
    pub const MISS_BASE: [f64; 3] = [10.0, 6.0, 2.0];
    pub const DRAW_COEFF_TIERS: [(u8, f64); 3] = [(94, 2.8), (85, 2.3), (0, 2.1)];
    pub const STAR_DRAW_SCALE: f64 = 2.0;

    /// Of shooting fouls on a miss, share upgraded to a flagrant.
    pub const FLAGRANT: u32 = 5;
    pub const FLAGRANT_FREE_THROWS: u8 = 2;

    /// Free throws: `roll(1..=1000) < 10 * free_throw_rating`.
    pub const FT_ROLL_MAX: u32 = 1000;
    pub const FT_RATING_SCALE: u32 = 10;
}

/// Injury checks run once per possession for every player on court.
pub mod injury {
    pub const ROLL_MAX: u32 = 20_000;
    pub const BASE: u32 = 100;
}

/// Shot distance, finishing movement and the make-probability pipeline.
pub mod shooting {
    pub const CLOSE_MAX_FT: u8 = 12;
    pub const MID_MIN_FT: u8 = 13;
    pub const MID_SPLIT_FT: u8 = 20;
    pub const MID_MAX_FT: u8 = 22;
    pub const THREE_MIN_FT: u8 = 23;
    pub const THREE_MAX_FT: u8 = 35;

    /// Deep threes get pulled back toward the arc most of the time.
    pub const DEEP_THREE_FT: u8 = 28;
    pub const DEEP_PULL_BACK: u32 = 80;
    pub const DEEP_PULL_BACK_FT: u8 = 3;

    /// Close-shot finishing bands (dunk cut, dunk+layup cut) on a
    /// 1..=100 roll, per dunker grade.
    pub const FINISH_RARE: (u32, u32) = (10, 70);
    pub const FINISH_NORMAL: (u32, u32) = (20, 70);
    pub const FINISH_ELITE: (u32, u32) = (30, 70);

    /// Base make percentage by distance band.
    pub const CLOSE_SLOPE: f64 = -0.2;
    pub const CLOSE_INTERCEPT: f64 = 38.0;
    pub const SHORT_MID_INTERCEPT: f64 = 8.0;
    pub const THREE_CURVE: f64 = -(31.0 / 81.0);
    pub const THREE_VERTEX_FT: f64 = 23.0;
    pub const THREE_PEAK: f64 = 42.0;

    pub const DUNK_SCALE: f64 = 2.5;
    pub const SKILL_COEFF: f64 = 0.2;
    pub const JUMPER_SKILL_BASE: f64 = 70.0;
    pub const CONTEST_COEFF: f64 = 0.2;
    pub const CONTEST_BASE: f64 = 41.0;

    /// Defense-density roll (1..=100): at or below the low threshold
    /// the look is smothered, above the high threshold it is open.
    pub const DENSITY_SWING: f64 = 10.0;
    pub const DENSITY_STAR: (u32, u32) = (20, 60);
    pub const DENSITY_ROLE: (u32, u32) = (25, 65);

    pub const CONSISTENCY_COEFF: f64 = 0.4;
    pub const CONSISTENCY_CAP: f64 = 2.0;

    pub const PLAYMAKING_TIERS: [(u8, f64); 3] = [(93, 3.0), (87, 2.0), (83, 1.0)];
    pub const ATHLETICISM_DIVISOR: f64 = 7.0;
    pub const OVERALL_TIERS: [(u8, f64); 4] = [(94, 1.12), (90, 1.09), (87, 1.06), (83, 1.03)];

    pub const CLUTCH_PENALTY: f64 = 0.8;
    pub const CLUTCH_MARGIN: u32 = 5;

    pub const MAKE_ROLL_MAX: u32 = 10_000;
    pub const MAKE_SCALE: f64 = 100.0;

    /// Clean misses that sail out of bounds, offense ball.
    pub const MISS_OUT_OF_BOUNDS: u32 = 3;

    /// Block check mirrors the steal shape with its own base and tiers.
    pub const BLOCK_ROLL_SCALE: f64 = 60.0;
    pub const BLOCK_BASE: f64 = 120.0;
    pub const BLOCK_RATING_SCALE: f64 = 5.0;
    pub const BLOCK_TIERS: [(u8, f64); 5] =
        [(95, 3.8), (92, 3.0), (88, 2.2), (83, 1.7), (70, 1.4)];
    pub const BLOCK_OUT_OF_BOUNDS: u32 = 40;
}

/// Rebound contest after any live miss.
pub mod rebound {
    /// Offensive-board chance when the offense wins / loses the raw
    /// rebound-score sum.
    pub const ORB_FAVORED: u32 = 15;
    pub const ORB_UNFAVORED: u32 = 10;

    /// Elite-rebounder shortcut: first player in lineup order at or
    /// above this rating takes the board outright on a 1..=100 roll.
    pub const ELITE_RATING: u8 = 88;
    pub const ELITE_DIRECT: u32 = 10;
}

/// Game clock and possession lengths, in seconds.
pub mod clock {
    pub const QUARTER_SECONDS: u32 = 720;
    pub const OVERTIME_SECONDS: u32 = 300;
    pub const REGULATION_QUARTERS: u8 = 4;

    pub const POSSESSION_MIN: u32 = 4;
    pub const POSSESSION_MAX: u32 = 24;
    pub const SECOND_CHANCE_MAX: u32 = 14;

    /// Very short draws usually stretch out, very long ones get
    /// trimmed, biasing toward half-court pace.
    pub const SHORT_DRAW: u32 = 10;
    pub const SHORT_STRETCH: u32 = 80;
    pub const SHORT_STRETCH_ADD: u32 = 8;
    pub const LONG_DRAW: u32 = 17;
    pub const LONG_TRIM: u32 = 60;
    pub const LONG_TRIM_SUB: u32 = 6;
}

/// Scheduled rotation windows, foul protection and garbage time.
pub mod rotation {
    /// Starters rest late in odd quarters, return early in even ones.
    pub const ODD_QUARTER_REST_AT: u32 = 180;
    pub const EVEN_QUARTER_RETURN_AT: u32 = 480;

    /// Personal fouls tolerated before a protective swap, by quarter;
    /// the last entry covers Q3 onward including overtime.
    pub const FOUL_PROTECT: [u32; 3] = [2, 4, 5];

    /// Garbage-time margins by Q4 clock remaining: any time, under
    /// 6 minutes, under 1 minute.
    pub const GARBAGE_ANY: u32 = 25;
    pub const GARBAGE_LATE: u32 = 18;
    pub const GARBAGE_LATE_AT: u32 = 360;
    pub const GARBAGE_FINAL: u32 = 9;
    pub const GARBAGE_FINAL_AT: u32 = 60;

    /// A comeback to this margin with enough clock left pulls the
    /// regulars back once.
    pub const REVERSAL_MARGIN: u32 = 8;
    pub const REVERSAL_AT: u32 = 300;
}
