//! Possession-by-possession game engine.
//!
//! The simulation is a single loop over possessions. Each iteration:
//!
//! 1. handles the period boundary if the clock ran out (including
//!    overtime until the score differs),
//! 2. runs substitution checks (skipped for second-chance replays),
//! 3. draws the possession length, resolves the possession through the
//!    chain in [`possession`], and
//! 4. credits elapsed seconds to the ten players on court and flips
//!    possession when the outcome says so.
//!
//! Layering mirrors the rest of the crate: `shooting` holds stateless
//! probability functions, `selection` the weighted lineup draws, and
//! this module the stateful loop. All randomness flows through one
//! `ChaCha8Rng` owned by the engine and seeded from the request, so
//! identical inputs replay identical games.

pub mod constants;
pub mod possession;
pub mod selection;
pub mod shooting;
pub mod substitutions;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::models::box_score::{BoxScore, TeamBoxScore};
use crate::models::events::{EventKind, EventSink, GameEvent, Side};
use crate::models::player::Player;
use crate::models::team::Team;
use constants::clock;

/// Final result of one simulated game. Ties cannot happen; overtime
/// periods run until the score differs.
#[derive(Debug, Clone)]
pub struct GameOutcome {
    pub winner: Side,
    pub home_score: u32,
    pub away_score: u32,
    pub overtimes: u8,
    pub box_score: BoxScore,
}

pub struct GameEngine<'s> {
    pub(crate) rng: ChaCha8Rng,
    original_seed: u64,
    pub(crate) home: Team,
    pub(crate) away: Team,
    pub(crate) home_lineup: [usize; 5],
    pub(crate) away_lineup: [usize; 5],
    pub(crate) offense: Side,
    pub(crate) period: u8,
    pub(crate) period_clock: u32,
    /// Whether this period's scheduled rotation already ran.
    pub(crate) rotation_done: bool,
    pub(crate) garbage_mode: bool,
    pub(crate) reversal_done: bool,
    sink: &'s mut dyn EventSink,
}

impl<'s> GameEngine<'s> {
    pub fn new(home: Team, away: Team, seed: u64, sink: &'s mut dyn EventSink) -> Self {
        let home_lineup = home.starters;
        let away_lineup = away.starters;
        GameEngine {
            rng: ChaCha8Rng::seed_from_u64(seed),
            original_seed: seed,
            home,
            away,
            home_lineup,
            away_lineup,
            offense: Side::Home,
            period: 1,
            period_clock: clock::QUARTER_SECONDS,
            rotation_done: false,
            garbage_mode: false,
            reversal_done: false,
            sink,
        }
    }

    pub fn seed(&self) -> u64 {
        self.original_seed
    }

    pub(crate) fn team(&self, side: Side) -> &Team {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub(crate) fn team_mut(&mut self, side: Side) -> &mut Team {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }

    pub(crate) fn lineup(&self, side: Side) -> [usize; 5] {
        match side {
            Side::Home => self.home_lineup,
            Side::Away => self.away_lineup,
        }
    }

    pub(crate) fn lineup_mut(&mut self, side: Side) -> &mut [usize; 5] {
        match side {
            Side::Home => &mut self.home_lineup,
            Side::Away => &mut self.away_lineup,
        }
    }

    pub(crate) fn lineup_players(&self, side: Side) -> [&Player; 5] {
        let team = self.team(side);
        self.lineup(side).map(|index| team.player(index))
    }

    pub(crate) fn emit(&mut self, side: Side, player: Option<usize>, kind: EventKind) {
        self.sink.on_event(&GameEvent {
            period: self.period,
            clock_seconds: self.period_clock,
            side,
            player: player.map(|p| p as u16),
            kind,
        });
    }

    /// Absolute score margin, for clutch and garbage-time checks.
    pub(crate) fn margin(&self) -> u32 {
        self.home.score.abs_diff(self.away.score)
    }

    /// Run the whole game and consume the engine.
    pub fn simulate(mut self) -> GameOutcome {
        // Opening tip.
        self.offense = if self.rng.gen_range(1..=100u32) <= 50 {
            Side::Home
        } else {
            Side::Away
        };

        let mut second_chance = false;
        loop {
            if self.period_clock == 0 {
                if self.finish_period() {
                    break;
                }
                second_chance = false;
            }
            if !second_chance {
                self.run_substitution_checks();
            }

            let ceiling = if second_chance {
                clock::SECOND_CHANCE_MAX
            } else {
                clock::POSSESSION_MAX
            };
            let elapsed = self.draw_possession_seconds(ceiling).min(self.period_clock);
            self.period_clock -= elapsed;

            let resolution = self.resolve_possession();
            self.credit_seconds(elapsed);

            second_chance = resolution.second_chance;
            if resolution.flip {
                self.offense = self.offense.other();
            }
        }

        let winner = if self.home.score > self.away.score {
            Side::Home
        } else {
            Side::Away
        };
        let overtimes = self.period.saturating_sub(clock::REGULATION_QUARTERS);
        GameOutcome {
            winner,
            home_score: self.home.score,
            away_score: self.away.score,
            overtimes,
            box_score: BoxScore {
                home: TeamBoxScore::from_team(&self.home),
                away: TeamBoxScore::from_team(&self.away),
            },
        }
    }

    /// Close the current period. Returns true when the game is over.
    pub(crate) fn finish_period(&mut self) -> bool {
        self.home.close_period();
        self.away.close_period();
        self.emit(self.offense, None, EventKind::PeriodEnd);

        if self.period >= clock::REGULATION_QUARTERS && self.home.score != self.away.score {
            self.emit(self.offense, None, EventKind::GameEnd);
            return true;
        }

        self.period += 1;
        self.rotation_done = false;
        if self.period > clock::REGULATION_QUARTERS {
            self.period_clock = clock::OVERTIME_SECONDS;
            let number = self.period - clock::REGULATION_QUARTERS;
            self.emit(self.offense, None, EventKind::OvertimeStart { number });
            self.restore_starters();
        } else {
            self.period_clock = clock::QUARTER_SECONDS;
        }
        false
    }

    /// Possession length draw, biased toward half-court pace on full
    /// possessions. Second-chance replays stay uniform.
    pub(crate) fn draw_possession_seconds(&mut self, ceiling: u32) -> u32 {
        let mut seconds = self.rng.gen_range(clock::POSSESSION_MIN..=ceiling);
        if ceiling == clock::POSSESSION_MAX {
            if seconds < clock::SHORT_DRAW {
                if self.rng.gen_range(1..=100u32) <= clock::SHORT_STRETCH {
                    seconds += clock::SHORT_STRETCH_ADD;
                }
            } else if seconds > clock::LONG_DRAW
                && self.rng.gen_range(1..=100u32) <= clock::LONG_TRIM
            {
                seconds -= clock::LONG_TRIM_SUB;
            }
        }
        seconds
    }

    fn credit_seconds(&mut self, elapsed: u32) {
        for side in [Side::Home, Side::Away] {
            let lineup = self.lineup(side);
            let team = self.team_mut(side);
            for index in lineup {
                let player = team.player_mut(index);
                player.stats.seconds_played += elapsed;
                player.stint_seconds += elapsed;
            }
        }
    }
}
