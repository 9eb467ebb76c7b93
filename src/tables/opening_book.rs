//! Opening book loaded from a tab-separated table of move sequences.
//!
//! Each row lists coordinate moves from the initial position (`e2e4 e7e5 ...`)
//! and an optional weight. Rows are replayed and every position along the
//! way is indexed by its `PositionKey`, so transpositions between lines
//! share their candidates.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rand::Rng;

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_legal;
use crate::search::position_key::PositionKey;
use crate::utils::algebraic::parse_coordinate_move;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMove {
    pub mv: Move,
    pub weight: u32,
}

#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    by_key: HashMap<PositionKey, Vec<BookMove>>,
}

impl OpeningBook {
    /// Load `tables/openings.tsv` when present, otherwise the embedded table.
    pub fn load_default() -> Self {
        let path = "tables/openings.tsv";
        if Path::new(path).exists() {
            match Self::from_tsv_path(path) {
                Ok(book) => return book,
                Err(err) => tracing::warn!(%err, path, "ignoring unreadable opening book"),
            }
        }
        Self::embedded()
    }

    pub fn embedded() -> Self {
        Self::from_tsv_str(include_str!("data/opening_book.tsv")).unwrap_or_else(|err| {
            tracing::error!(%err, "embedded opening book failed to load");
            Self::default()
        })
    }

    pub fn from_tsv_path(path: impl AsRef<Path>) -> ChessResult<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .map_err(|e| ChessError::InvalidBook(format!("failed reading {}: {e}", path.display())))?;
        Self::from_tsv_str(&data)
    }

    pub fn from_tsv_str(tsv: &str) -> ChessResult<Self> {
        let mut lines = tsv.lines().filter(|line| !line.trim().is_empty());
        let header = lines
            .next()
            .ok_or_else(|| ChessError::InvalidBook("opening TSV is empty".to_owned()))?;

        let mut sequence_idx = None;
        let mut weight_idx = None;
        for (i, name) in header.split('\t').enumerate() {
            match name.trim().to_ascii_lowercase().as_str() {
                "uci" | "moves" => sequence_idx = sequence_idx.or(Some(i)),
                "weight" | "count" => weight_idx = Some(i),
                _ => {}
            }
        }
        let sequence_idx = sequence_idx.ok_or_else(|| {
            ChessError::InvalidBook("opening TSV needs a 'uci' or 'moves' column".to_owned())
        })?;

        let mut weights: HashMap<PositionKey, HashMap<Move, u32>> = HashMap::new();

        for line in lines {
            let fields: Vec<&str> = line.split('\t').collect();
            let sequence = fields
                .get(sequence_idx)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| ChessError::InvalidBook(format!("row without moves: '{line}'")))?;

            let row_weight = weight_idx
                .and_then(|idx| fields.get(idx))
                .and_then(|w| w.trim().parse::<u32>().ok())
                .unwrap_or(1)
                .max(1);

            let mut position = Position::starting();
            for token in sequence.split_whitespace() {
                let mv = parse_coordinate_move(token)
                    .ok()
                    .filter(|mv| is_legal(&position, mv, position.side_to_move))
                    .ok_or_else(|| {
                        ChessError::InvalidBook(format!("illegal move '{token}' in row '{line}'"))
                    })?;

                let entry = weights
                    .entry(PositionKey::of(&position))
                    .or_default()
                    .entry(mv.clone())
                    .or_insert(0);
                *entry = entry.saturating_add(row_weight);

                apply_move(&mut position, &mv)?;
                if position.pending_promotion.is_some() {
                    break;
                }
            }
        }

        let by_key = weights
            .into_iter()
            .map(|(key, moves)| {
                let mut row: Vec<BookMove> = moves
                    .into_iter()
                    .map(|(mv, weight)| BookMove { mv, weight })
                    .collect();
                // Heaviest first; coordinates break ties so lookups are deterministic.
                row.sort_by(|a, b| {
                    b.weight
                        .cmp(&a.weight)
                        .then_with(|| (a.mv.from, a.mv.to).cmp(&(b.mv.from, b.mv.to)))
                });
                (key, row)
            })
            .collect();

        Ok(Self { by_key })
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn moves_for(&self, position: &Position) -> Option<&[BookMove]> {
        self.by_key
            .get(&PositionKey::of(position))
            .map(|v| v.as_slice())
    }

    /// The heaviest book move for `position`.
    pub fn recommended_move(&self, position: &Position) -> Option<&Move> {
        self.moves_for(position)?.first().map(|m| &m.mv)
    }

    /// A book move drawn with probability proportional to its weight.
    pub fn choose_weighted_move<R: Rng + ?Sized>(
        &self,
        position: &Position,
        rng: &mut R,
    ) -> Option<&Move> {
        let moves = self.moves_for(position)?;
        let total_weight: u64 = moves.iter().map(|m| u64::from(m.weight)).sum();
        if total_weight == 0 {
            return moves.first().map(|m| &m.mv);
        }

        let mut pick = rng.random_range(0..total_weight);
        for m in moves {
            let w = u64::from(m.weight);
            if pick < w {
                return Some(&m.mv);
            }
            pick -= w;
        }
        moves.first().map(|m| &m.mv)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::OpeningBook;
    use crate::game_state::chess_types::Position;
    use crate::move_generation::legal_move_apply::apply_move;
    use crate::utils::algebraic::parse_coordinate_move;

    #[test]
    fn opening_book_parses_and_indexes_start_position() {
        let tsv =
            "eco\tname\tuci\tweight\nC20\tKing Pawn\te2e4 e7e5\t5\nD00\tQueen Pawn\td2d4 d7d5\t3\n";
        let book = OpeningBook::from_tsv_str(tsv).expect("book should parse");
        let start = Position::starting();
        let row = book.moves_for(&start).expect("start position should be indexed");
        assert_eq!(row.len(), 2);
        assert_eq!(
            book.recommended_move(&start),
            Some(&parse_coordinate_move("e2e4").expect("parses"))
        );

        let mut after_e4 = start;
        apply_move(&mut after_e4, &parse_coordinate_move("e2e4").expect("parses")).expect("applies");
        assert_eq!(
            book.recommended_move(&after_e4),
            Some(&parse_coordinate_move("e7e5").expect("parses"))
        );
    }

    #[test]
    fn weights_accumulate_across_rows() {
        let tsv = "uci\tweight\ne2e4 e7e5\t1\ne2e4 c7c5\t1\nd2d4\t1\n";
        let book = OpeningBook::from_tsv_str(tsv).expect("book should parse");
        let row = book.moves_for(&Position::starting()).expect("indexed");
        assert_eq!(row[0].weight, 2);
        assert_eq!(row[0].mv, parse_coordinate_move("e2e4").expect("parses"));
    }

    #[test]
    fn weighted_choice_is_a_book_move() {
        let tsv = "uci\tweight\ne2e4 e7e5\t4\nd2d4 d7d5\t1\n";
        let book = OpeningBook::from_tsv_str(tsv).expect("book should parse");
        let start = Position::starting();
        let mut rng = StdRng::seed_from_u64(7);
        let mv = book.choose_weighted_move(&start, &mut rng).expect("book should choose");
        assert!(book.moves_for(&start).expect("indexed").iter().any(|m| &m.mv == mv));
    }

    #[test]
    fn rejects_illegal_rows_and_missing_columns() {
        assert!(OpeningBook::from_tsv_str("uci\ne2e5\n").is_err());
        assert!(OpeningBook::from_tsv_str("name\tweight\nfoo\t1\n").is_err());
        assert!(OpeningBook::from_tsv_str("").is_err());
    }

    #[test]
    fn embedded_book_covers_the_start_position() {
        let book = OpeningBook::embedded();
        assert!(!book.is_empty());
        assert!(book.recommended_move(&Position::starting()).is_some());
    }
}
