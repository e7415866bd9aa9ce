//! Substitution triggers: scheduled rotation windows, foul protection,
//! foul-outs, injuries and garbage time.
//!
//! All swaps funnel through [`GameEngine::swap_on_court`] so stint
//! bookkeeping and events stay consistent. When no eligible body is
//! left the outgoing player simply stays on the floor; a thin roster
//! is logged, never fatal.

use log::warn;

use super::constants::{fouls, rotation};
use super::GameEngine;
use crate::models::events::{EventKind, Side};

impl GameEngine<'_> {
    /// Per-possession substitution pass. Second-chance possessions
    /// skip this entirely.
    pub(crate) fn run_substitution_checks(&mut self) {
        if self.period > super::constants::clock::REGULATION_QUARTERS {
            // Overtime is starters-only; departures happen through
            // foul-outs and injuries alone.
            return;
        }
        self.check_garbage_time();
        self.check_scheduled_rotation();
    }

    fn check_scheduled_rotation(&mut self) {
        if self.rotation_done {
            return;
        }
        let odd_period = self.period % 2 == 1;
        if odd_period && self.period_clock < rotation::ODD_QUARTER_REST_AT {
            self.rest_starters(Side::Home);
            self.rest_starters(Side::Away);
            self.rotation_done = true;
        } else if !odd_period && self.period_clock < rotation::EVEN_QUARTER_RETURN_AT {
            if !self.garbage_mode {
                self.restore_starters();
            }
            self.rotation_done = true;
        }
    }

    fn check_garbage_time(&mut self) {
        if self.period != super::constants::clock::REGULATION_QUARTERS {
            return;
        }
        if self.garbage_mode {
            if !self.reversal_done
                && self.margin() <= rotation::REVERSAL_MARGIN
                && self.period_clock < rotation::REVERSAL_AT
            {
                // The blowout evaporated; regulars close it out. Once
                // per game.
                self.restore_starters();
                self.garbage_mode = false;
                self.reversal_done = true;
            }
            return;
        }
        let margin = self.margin();
        let due = margin >= rotation::GARBAGE_ANY
            || (margin >= rotation::GARBAGE_LATE && self.period_clock < rotation::GARBAGE_LATE_AT)
            || (margin >= rotation::GARBAGE_FINAL
                && self.period_clock < rotation::GARBAGE_FINAL_AT);
        if due {
            self.empty_the_bench(Side::Home);
            self.empty_the_bench(Side::Away);
            self.garbage_mode = true;
        }
    }

    /// Send resting starters out for their bench cover.
    fn rest_starters(&mut self, side: Side) {
        for slot in 0..5 {
            let current = self.lineup(side)[slot];
            if current != self.team(side).starters[slot] {
                continue;
            }
            self.replace_on_court(side, slot);
        }
    }

    /// Bring every eligible starter back onto the floor, both teams.
    pub(crate) fn restore_starters(&mut self) {
        for side in [Side::Home, Side::Away] {
            for slot in 0..5 {
                let starter = self.team(side).starters[slot];
                let current = self.lineup(side)[slot];
                if current == starter {
                    continue;
                }
                let starter_ready = {
                    let p = self.team(side).player(starter);
                    p.eligible && !p.on_court
                };
                if starter_ready {
                    self.swap_on_court(side, slot, starter);
                }
            }
        }
    }

    /// Garbage-time bulk swap: deepest available body per slot.
    fn empty_the_bench(&mut self, side: Side) {
        for slot in 0..5 {
            let candidate = {
                let team = self.team(side);
                let available = |index: &&usize| {
                    let p = team.player(**index);
                    p.eligible && !p.on_court
                };
                team.deep_bench[slot]
                    .iter()
                    .find(available)
                    .or_else(|| team.bench[slot].iter().find(available))
                    .copied()
            };
            if let Some(incoming) = candidate {
                self.swap_on_court(side, slot, incoming);
            }
        }
    }

    /// Foul-out and foul-protection checks after any personal or
    /// flagrant foul.
    pub(crate) fn after_personal_foul(&mut self, side: Side, index: usize) {
        let (personal, flagrant, on_court) = {
            let p = self.team(side).player(index);
            (p.stats.personal_fouls, p.stats.flagrant_fouls, p.on_court)
        };
        if personal >= fouls::FOUL_OUT || flagrant >= fouls::FLAGRANT_EJECTION {
            self.team_mut(side).player_mut(index).eligible = false;
            self.emit(side, Some(index), EventKind::FoulOut);
            if on_court {
                if let Some(slot) = self.slot_of(side, index) {
                    self.replace_on_court(side, slot);
                }
            }
            return;
        }
        // Early-game foul trouble benches starters; the threshold
        // loosens as the game goes on.
        if !on_court {
            return;
        }
        let protect = match self.period {
            1 => rotation::FOUL_PROTECT[0],
            2 => rotation::FOUL_PROTECT[1],
            _ => rotation::FOUL_PROTECT[2],
        };
        let is_starter = self.team(side).starters.contains(&index);
        if is_starter && personal >= protect {
            if let Some(slot) = self.slot_of(side, index) {
                self.replace_on_court(side, slot);
            }
        }
    }

    pub(crate) fn slot_of(&self, side: Side, index: usize) -> Option<usize> {
        self.lineup(side).iter().position(|&i| i == index)
    }

    /// Replace whoever holds `slot` with the best available candidate.
    /// With nobody left the player stays on, logged and legal.
    pub(crate) fn replace_on_court(&mut self, side: Side, slot: usize) {
        match self.team(side).substitute_for(slot) {
            Some(incoming) => self.swap_on_court(side, slot, incoming),
            None => {
                let outgoing = self.lineup(side)[slot];
                warn!(
                    "no eligible substitute for {} ({}), staying on court",
                    self.team(side).player(outgoing).name,
                    self.team(side).name,
                );
            }
        }
    }

    pub(crate) fn swap_on_court(&mut self, side: Side, slot: usize, incoming: usize) {
        let outgoing = self.lineup(side)[slot];
        {
            let team = self.team_mut(side);
            let out = team.player_mut(outgoing);
            out.on_court = false;
            out.stint_seconds = 0;
            let inc = team.player_mut(incoming);
            inc.on_court = true;
            inc.stint_seconds = 0;
        }
        self.lineup_mut(side)[slot] = incoming;
        self.emit(
            side,
            Some(outgoing),
            EventKind::Substitution { incoming: incoming as u16 },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::test_team;
    use crate::models::NoopSink;

    fn engine<'s>(sink: &'s mut NoopSink) -> GameEngine<'s> {
        GameEngine::new(test_team("Home", 80), test_team("Away", 78), 5, sink)
    }

    #[test]
    fn test_foul_out_is_permanent() {
        let mut sink = NoopSink;
        let mut e = engine(&mut sink);
        let starter = e.home.starters[0];
        e.home.player_mut(starter).stats.personal_fouls = fouls::FOUL_OUT;
        e.after_personal_foul(Side::Home, starter);

        let player = e.home.player(starter);
        assert!(!player.eligible);
        assert!(!player.on_court);
        assert_ne!(e.home_lineup[0], starter);

        // Neither the scheduled return nor a garbage reversal may
        // bring him back.
        e.restore_starters();
        assert_ne!(e.home_lineup[0], starter);
    }

    #[test]
    fn test_two_flagrants_eject() {
        let mut sink = NoopSink;
        let mut e = engine(&mut sink);
        let starter = e.away.starters[2];
        e.away.player_mut(starter).stats.flagrant_fouls = fouls::FLAGRANT_EJECTION;
        e.after_personal_foul(Side::Away, starter);
        assert!(!e.away.player(starter).eligible);
        assert_ne!(e.away_lineup[2], starter);
    }

    #[test]
    fn test_first_quarter_foul_protection() {
        let mut sink = NoopSink;
        let mut e = engine(&mut sink);
        let starter = e.home.starters[3];
        e.home.player_mut(starter).stats.personal_fouls = 2;
        e.after_personal_foul(Side::Home, starter);
        // Protected, not disqualified.
        assert!(e.home.player(starter).eligible);
        assert!(!e.home.player(starter).on_court);
        assert_ne!(e.home_lineup[3], starter);
    }

    #[test]
    fn test_third_quarter_tolerates_more_fouls() {
        let mut sink = NoopSink;
        let mut e = engine(&mut sink);
        e.period = 3;
        let starter = e.home.starters[3];
        e.home.player_mut(starter).stats.personal_fouls = 4;
        e.after_personal_foul(Side::Home, starter);
        assert_eq!(e.home_lineup[3], starter);
        e.home.player_mut(starter).stats.personal_fouls = 5;
        e.after_personal_foul(Side::Home, starter);
        assert_ne!(e.home_lineup[3], starter);
    }

    #[test]
    fn test_scheduled_rotation_cycle() {
        let mut sink = NoopSink;
        let mut e = engine(&mut sink);
        // Late in Q1 the starters sit.
        e.period_clock = rotation::ODD_QUARTER_REST_AT - 1;
        e.run_substitution_checks();
        assert!(e.rotation_done);
        for slot in 0..5 {
            assert_ne!(e.home_lineup[slot], e.home.starters[slot]);
        }
        // Early in Q2 they return.
        e.period = 2;
        e.rotation_done = false;
        e.period_clock = rotation::EVEN_QUARTER_RETURN_AT - 1;
        e.run_substitution_checks();
        for slot in 0..5 {
            assert_eq!(e.home_lineup[slot], e.home.starters[slot]);
            assert_eq!(e.away_lineup[slot], e.away.starters[slot]);
        }
    }

    #[test]
    fn test_rotation_runs_once_per_quarter() {
        let mut sink = NoopSink;
        let mut e = engine(&mut sink);
        e.period_clock = 100;
        e.run_substitution_checks();
        let after_first = e.home_lineup;
        e.run_substitution_checks();
        assert_eq!(e.home_lineup, after_first);
    }

    #[test]
    fn test_garbage_time_and_reversal() {
        let mut sink = NoopSink;
        let mut e = engine(&mut sink);
        e.period = 4;
        e.period_clock = 600;
        e.home.score = 110;
        e.away.score = 80;
        e.run_substitution_checks();
        assert!(e.garbage_mode);
        for slot in 0..5 {
            assert_ne!(e.home_lineup[slot], e.home.starters[slot]);
            assert_ne!(e.away_lineup[slot], e.away.starters[slot]);
        }

        // The deep bench bleeds the lead; regulars come back once.
        e.away.score = 104;
        e.period_clock = 250;
        e.run_substitution_checks();
        assert!(!e.garbage_mode);
        assert!(e.reversal_done);
        for slot in 0..5 {
            assert_eq!(e.home_lineup[slot], e.home.starters[slot]);
        }
    }

    #[test]
    fn test_degenerate_roster_stays_on_court() {
        let mut sink = NoopSink;
        let mut e = engine(&mut sink);
        for index in 0..e.home.players.len() {
            if !e.home.player(index).on_court {
                e.home.player_mut(index).eligible = false;
            }
        }
        let current = e.home_lineup[1];
        e.replace_on_court(Side::Home, 1);
        assert_eq!(e.home_lineup[1], current);
        assert!(e.home.player(current).on_court);
    }

    #[test]
    fn test_swap_resets_stint_seconds() {
        let mut sink = NoopSink;
        let mut e = engine(&mut sink);
        let outgoing = e.home_lineup[4];
        e.home.player_mut(outgoing).stint_seconds = 300;
        let incoming = e.home.bench[4][0];
        e.swap_on_court(Side::Home, 4, incoming);
        assert_eq!(e.home.player(outgoing).stint_seconds, 0);
        assert_eq!(e.home.player(incoming).stint_seconds, 0);
        assert!(e.home.player(incoming).on_court);
        assert!(!e.home.player(outgoing).on_court);
    }
}
