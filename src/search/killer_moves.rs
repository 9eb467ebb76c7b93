//! Killer-move table: two quiet moves per search depth that recently caused
//! a beta cutoff. Pure ordering hint; never affects correctness.

use crate::game_state::chess_types::Move;

pub const KILLERS_PER_DEPTH: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct KillerMoves {
    slots: Vec<[Option<Move>; KILLERS_PER_DEPTH]>,
}

impl KillerMoves {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `mv` at `depth`; the newest killer goes first, the older one shifts down.
    pub fn record(&mut self, depth: u8, mv: &Move) {
        let depth = depth as usize;
        if self.slots.len() <= depth {
            self.slots.resize(depth + 1, [None, None]);
        }
        let slot = &mut self.slots[depth];
        if slot[0].as_ref() == Some(mv) {
            return;
        }
        slot.swap(0, 1);
        slot[0] = Some(mv.coords());
    }

    pub fn is_killer(&self, depth: u8, mv: &Move) -> bool {
        self.slots
            .get(depth as usize)
            .is_some_and(|slot| slot.iter().flatten().any(|killer| killer == mv))
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
