//! Per-piece movement patterns producing lazy candidate destinations.
//!
//! Every piece kind maps to one of two shapes: a leaper that tries a fixed
//! list of offsets once, or a slider that walks rays until the board edge or
//! the first occupied square (which is yielded, so captures stay candidates).
//! Candidates are geometric only; the legality filter decides which survive.
//! Pawn and king step lists include the special cases (double push, diagonal
//! captures, castling jumps) so the generator can treat all kinds uniformly.

use crate::game_state::chess_types::*;

pub const KNIGHT_STEPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// King neighbours followed by the two castling jumps.
const KING_CANDIDATE_STEPS: [(i8, i8); 10] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 2),
    (0, -2),
];

pub const BISHOP_RAYS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
pub const ROOK_RAYS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
pub const QUEEN_RAYS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
];

const WHITE_PAWN_STEPS: [(i8, i8); 4] = [(-1, 0), (-2, 0), (-1, -1), (-1, 1)];
const BLACK_PAWN_STEPS: [(i8, i8); 4] = [(1, 0), (2, 0), (1, -1), (1, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementPattern {
    /// Fixed offsets, each tried once.
    Leaper(&'static [(i8, i8)]),
    /// Rays walked until the edge or the first occupied square, inclusive.
    Slider(&'static [(i8, i8)]),
}

impl MovementPattern {
    pub const fn for_piece(piece: Piece) -> Self {
        match piece.kind {
            PieceKind::Pawn => match piece.color {
                Color::White => MovementPattern::Leaper(&WHITE_PAWN_STEPS),
                Color::Black => MovementPattern::Leaper(&BLACK_PAWN_STEPS),
            },
            PieceKind::Knight => MovementPattern::Leaper(&KNIGHT_STEPS),
            PieceKind::King => MovementPattern::Leaper(&KING_CANDIDATE_STEPS),
            PieceKind::Bishop => MovementPattern::Slider(&BISHOP_RAYS),
            PieceKind::Rook => MovementPattern::Slider(&ROOK_RAYS),
            PieceKind::Queen => MovementPattern::Slider(&QUEEN_RAYS),
        }
    }

    pub fn destinations(self, position: &Position, from: Square) -> Destinations<'_> {
        let (steps, sliding) = match self {
            MovementPattern::Leaper(steps) => (steps, false),
            MovementPattern::Slider(rays) => (rays, true),
        };
        Destinations {
            position,
            from,
            steps,
            sliding,
            step_idx: 0,
            distance: 0,
        }
    }
}

/// Candidate destinations for the piece standing on `from`.
///
/// Empty when the square is vacant.
pub fn candidate_destinations(position: &Position, from: Square) -> Destinations<'_> {
    match position.piece_at(from) {
        Some(piece) => MovementPattern::for_piece(piece).destinations(position, from),
        None => MovementPattern::Leaper(&[]).destinations(position, from),
    }
}

#[derive(Debug, Clone)]
pub struct Destinations<'a> {
    position: &'a Position,
    from: Square,
    steps: &'static [(i8, i8)],
    sliding: bool,
    step_idx: usize,
    distance: i8,
}

impl Iterator for Destinations<'_> {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        while let Some(&(d_row, d_col)) = self.steps.get(self.step_idx) {
            if !self.sliding {
                self.step_idx += 1;
                if let Some(sq) = self.from.offset(d_row, d_col) {
                    return Some(sq);
                }
                continue;
            }

            self.distance += 1;
            match self.from.offset(d_row * self.distance, d_col * self.distance) {
                Some(sq) => {
                    if !self.position.is_empty(sq) {
                        self.step_idx += 1;
                        self.distance = 0;
                    }
                    return Some(sq);
                }
                None => {
                    self.step_idx += 1;
                    self.distance = 0;
                }
            }
        }
        None
    }
}
