use crate::models::player::Player;

/// One team's in-game state. Players are stored in a flat `Vec` and
/// referenced by index everywhere; `starters`, `bench` and `deep_bench`
/// partition those indices by lineup slot.
#[derive(Debug, Clone)]
pub struct Team {
    pub name: String,
    pub players: Vec<Player>,
    /// Opening lineup, indexed by `Position::index()`.
    pub starters: [usize; 5],
    /// Bench candidates per slot, best overall first.
    pub bench: [Vec<usize>; 5],
    /// Garbage-time candidates per slot, best overall first.
    pub deep_bench: [Vec<usize>; 5],
    pub score: u32,
    /// Team fouls in the current period; resets at every break.
    pub quarter_fouls: u8,
    /// Points scored in each completed period, regulation then overtime.
    pub quarter_scores: Vec<u32>,
}

impl Team {
    pub fn player(&self, index: usize) -> &Player {
        &self.players[index]
    }

    pub fn player_mut(&mut self, index: usize) -> &mut Player {
        &mut self.players[index]
    }

    pub fn add_points(&mut self, points: u32) {
        self.score += points;
    }

    /// Record the points scored since the previous period boundary.
    pub fn close_period(&mut self) {
        let recorded: u32 = self.quarter_scores.iter().sum();
        self.quarter_scores.push(self.score - recorded);
        self.quarter_fouls = 0;
    }

    pub fn in_bonus(&self) -> bool {
        self.quarter_fouls >= crate::engine::constants::fouls::BONUS_THRESHOLD
    }

    /// Best available replacement for `slot`: same-slot bench first,
    /// then same-slot deep bench, then any other slot in lineup order.
    /// Players already on court or no longer eligible are skipped.
    pub fn substitute_for(&self, slot: usize) -> Option<usize> {
        let available = |index: &&usize| {
            let p = self.player(**index);
            p.eligible && !p.on_court
        };
        if let Some(&index) = self.bench[slot].iter().find(available) {
            return Some(index);
        }
        if let Some(&index) = self.deep_bench[slot].iter().find(available) {
            return Some(index);
        }
        for other in 0..5 {
            if other == slot {
                continue;
            }
            if let Some(&index) = self.bench[other].iter().find(available) {
                return Some(index);
            }
            if let Some(&index) = self.deep_bench[other].iter().find(available) {
                return Some(index);
            }
        }
        None
    }
}
