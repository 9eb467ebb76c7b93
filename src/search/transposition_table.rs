//! Transposition table keyed by `PositionKey`.
//!
//! Entries are overwritten on every store, never merged. The table is flushed
//! wholesale once it reaches its capacity so a long game cannot grow it
//! without bound.

use std::collections::HashMap;

use crate::game_state::chess_types::Move;
use crate::search::position_key::PositionKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// Search failed high; the true score is at least `score`.
    Lower,
    /// Search failed low; the true score is at most `score`.
    Upper,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TTEntry {
    pub depth: u8,
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

impl TTEntry {
    /// Score usable for a `depth` search inside `(alpha, beta)`, if any.
    ///
    /// A shallower entry never answers a deeper query.
    pub fn usable_score(&self, depth: u8, alpha: i32, beta: i32) -> Option<i32> {
        if self.depth < depth {
            return None;
        }
        match self.bound {
            Bound::Exact => Some(self.score),
            Bound::Lower if self.score >= beta => Some(self.score),
            Bound::Upper if self.score <= alpha => Some(self.score),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
    pub flushes: u64,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: HashMap<PositionKey, TTEntry>,
    capacity: usize,
    stats: TTStats,
}

impl TranspositionTable {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity.min(1 << 16)),
            capacity,
            stats: TTStats::default(),
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = TTStats::default();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    pub fn probe(&mut self, key: &PositionKey) -> Option<&TTEntry> {
        self.stats.probes += 1;
        let hit = self.entries.get(key);
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    pub fn store(&mut self, key: PositionKey, entry: TTEntry) {
        self.stats.stores += 1;
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            tracing::debug!(entries = self.entries.len(), "transposition table full; flushing");
            self.entries.clear();
            self.stats.flushes += 1;
        }
        self.entries.insert(key, entry);
    }
}

#[cfg(test)]
mod tests {
    use super::{Bound, TTEntry, TranspositionTable};
    use crate::game_state::chess_types::*;
    use crate::search::position_key::PositionKey;

    fn entry(depth: u8, score: i32, bound: Bound) -> TTEntry {
        TTEntry {
            depth,
            score,
            bound,
            best_move: Some(Move::new(Square::new(6, 4), Square::new(4, 4))),
        }
    }

    #[test]
    fn stored_entry_is_found_again() {
        let mut tt = TranspositionTable::with_capacity(16);
        let key = PositionKey::of(&Position::starting());
        tt.store(key.clone(), entry(5, 42, Bound::Exact));
        let got = tt.probe(&key).expect("entry should exist");
        assert_eq!(got.depth, 5);
        assert_eq!(got.score, 42);
        assert_eq!(tt.stats().hits, 1);
    }

    #[test]
    fn stores_overwrite_even_with_less_depth() {
        let mut tt = TranspositionTable::with_capacity(16);
        let key = PositionKey::of(&Position::starting());
        tt.store(key.clone(), entry(6, 1, Bound::Exact));
        tt.store(key.clone(), entry(2, 9, Bound::Lower));
        let got = tt.probe(&key).expect("exists");
        assert_eq!((got.depth, got.score), (2, 9));
    }

    #[test]
    fn shallow_or_out_of_window_entries_are_not_usable() {
        let exact = entry(3, 50, Bound::Exact);
        assert_eq!(exact.usable_score(3, -100, 100), Some(50));
        assert_eq!(exact.usable_score(4, -100, 100), None);

        let lower = entry(3, 50, Bound::Lower);
        assert_eq!(lower.usable_score(2, -100, 40), Some(50));
        assert_eq!(lower.usable_score(2, -100, 100), None);

        let upper = entry(3, -50, Bound::Upper);
        assert_eq!(upper.usable_score(1, -40, 100), Some(-50));
        assert_eq!(upper.usable_score(1, -60, 100), None);
    }

    #[test]
    fn full_table_is_flushed() {
        let mut tt = TranspositionTable::with_capacity(1);
        let start = PositionKey::of(&Position::starting());
        let empty = PositionKey::of(&Position::empty());
        tt.store(start.clone(), entry(1, 0, Bound::Exact));
        tt.store(empty.clone(), entry(1, 0, Bound::Exact));
        assert_eq!(tt.len(), 1);
        assert!(tt.probe(&start).is_none());
        assert!(tt.probe(&empty).is_some());
        assert_eq!(tt.stats().flushes, 1);
    }
}
