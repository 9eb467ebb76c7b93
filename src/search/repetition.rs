//! Per-move repetition counter.
//!
//! Counts how often each move (by coordinates and mover color) has been
//! played. The game session records real moves; search records and unrecords
//! hypothetical ones on a private copy so deeper repetitions are penalized too.

use std::collections::HashMap;

use crate::game_state::chess_types::{Color, Move};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepetitionCounts {
    counts: HashMap<(Move, Color), u32>,
}

impl RepetitionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, mv: &Move, color: Color) {
        *self.counts.entry((mv.coords(), color)).or_insert(0) += 1;
    }

    /// Reverse one `record`. Entries that drop to zero are removed.
    pub fn unrecord(&mut self, mv: &Move, color: Color) {
        let key = (mv.coords(), color);
        if let Some(count) = self.counts.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&key);
            }
        }
    }

    pub fn count(&self, mv: &Move, color: Color) -> u32 {
        self.counts.get(&(mv.coords(), color)).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Move, Color, u32)> + '_ {
        self.counts.iter().map(|((mv, color), n)| (mv, *color, *n))
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}
