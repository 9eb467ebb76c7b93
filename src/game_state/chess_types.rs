//! Core value types shared by every subsystem.
//!
//! Squares are `(row, col)` pairs where row 0 is Black's back rank (rank 8)
//! and column 0 is the a-file. Empty squares are represented by
//! `Option<Piece>::None`.

use std::fmt;
use std::hash::{Hash, Hasher};

pub use crate::game_state::position::Position;
pub use crate::game_state::undo_state::UndoState;

use crate::game_state::chess_rules::{
    BLACK_BACK_ROW, BLACK_PAWN_START_ROW, WHITE_BACK_ROW, WHITE_PAWN_START_ROW,
};

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a single pawn push.
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn pawn_start_row(self) -> u8 {
        match self {
            Color::White => WHITE_PAWN_START_ROW,
            Color::Black => BLACK_PAWN_START_ROW,
        }
    }

    #[inline]
    pub const fn back_row(self) -> u8 {
        match self {
            Color::White => WHITE_BACK_ROW,
            Color::Black => BLACK_BACK_ROW,
        }
    }

    /// Row on which this color's pawns promote.
    #[inline]
    pub const fn promotion_row(self) -> u8 {
        self.opposite().back_row()
    }

    /// +1 for White, -1 for Black; converts per-color terms to White's view.
    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }
}

/// Piece kind (color is carried separately by `Piece`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Uppercase letter used in FEN and algebraic notation.
    #[inline]
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_letter(ch: char) -> Option<Self> {
        match ch.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Whether a pawn may be promoted to this kind.
    #[inline]
    pub const fn is_promotable(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// FEN character: uppercase for White, lowercase for Black.
    pub fn fen_char(self) -> char {
        let letter = self.kind.letter();
        match self.color {
            Color::White => letter,
            Color::Black => letter.to_ascii_lowercase(),
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Self> {
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else if ch.is_ascii_lowercase() {
            Color::Black
        } else {
            return None;
        };
        PieceKind::from_letter(ch).map(|kind| Piece::new(kind, color))
    }

    #[inline]
    pub fn is(self, kind: PieceKind, color: Color) -> bool {
        self.kind == kind && self.color == color
    }
}

/// Board coordinate. Coordinates outside `0..8` make an off-board square:
/// lookups read it as empty and legality checks reject any move touching it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    #[inline]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Checked constructor for signed coordinates; `None` when off-board.
    #[inline]
    pub fn try_new(row: i8, col: i8) -> Option<Self> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    #[inline]
    pub const fn is_on_board(self) -> bool {
        self.row < 8 && self.col < 8
    }

    #[inline]
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        if !self.is_on_board() {
            return None;
        }
        Self::try_new(self.row as i8 + d_row, self.col as i8 + d_col)
    }

    /// Iterate all 64 squares row by row, starting at a8.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square::new(row, col)))
    }

    /// File letter, `?` when off-board.
    #[inline]
    pub fn file_char(self) -> char {
        if self.col < 8 {
            char::from(b'a' + self.col)
        } else {
            '?'
        }
    }

    /// Rank digit, `?` when off-board.
    #[inline]
    pub fn rank_char(self) -> char {
        if self.row < 8 {
            char::from(b'8' - self.row)
        } else {
            '?'
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

/// Four independent castling rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        white_kingside: true,
        white_queenside: true,
        black_kingside: true,
        black_queenside: true,
    };

    pub const NONE: CastlingRights = CastlingRights {
        white_kingside: false,
        white_queenside: false,
        black_kingside: false,
        black_queenside: false,
    };

    #[inline]
    pub fn kingside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    #[inline]
    pub fn queenside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    #[inline]
    pub fn any(&self, color: Color) -> bool {
        self.kingside(color) || self.queenside(color)
    }

    pub fn set_kingside(&mut self, color: Color, value: bool) {
        match color {
            Color::White => self.white_kingside = value,
            Color::Black => self.black_kingside = value,
        }
    }

    pub fn set_queenside(&mut self, color: Color, value: bool) {
        match color {
            Color::White => self.white_queenside = value,
            Color::Black => self.black_queenside = value,
        }
    }

    pub fn revoke(&mut self, color: Color) {
        self.set_kingside(color, false);
        self.set_queenside(color, false);
    }
}

/// A move between two squares with an optional derived notation.
///
/// Equality and hashing use the coordinates only; `notation` is an
/// annotation written when the move is applied through the game session.
#[derive(Debug, Clone)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub notation: Option<String>,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            notation: None,
        }
    }

    pub fn with_notation(mut self, notation: impl Into<String>) -> Self {
        self.notation = Some(notation.into());
        self
    }

    /// Coordinate-only copy, used where the annotation must not leak (caches, tables).
    #[inline]
    pub fn coords(&self) -> Move {
        Move::new(self.from, self.to)
    }

    #[inline]
    pub fn col_delta(&self) -> i16 {
        i16::from(self.to.col) - i16::from(self.from.col)
    }

    #[inline]
    pub fn row_delta(&self) -> i16 {
        i16::from(self.to.row) - i16::from(self.from.row)
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn move_equality_ignores_notation() {
        let a = Move::new(Square::new(6, 4), Square::new(4, 4));
        let b = a.clone().with_notation("e4");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn square_display_counts_ranks_from_the_bottom() {
        assert_eq!(Square::new(7, 0).to_string(), "a1");
        assert_eq!(Square::new(0, 7).to_string(), "h8");
        assert_eq!(Square::new(4, 4).to_string(), "e4");
    }

    #[test]
    fn square_offsets_stay_on_board() {
        let a1 = Square::new(7, 0);
        assert_eq!(a1.offset(-1, 1), Some(Square::new(6, 1)));
        assert_eq!(a1.offset(1, 0), None);
        assert_eq!(a1.offset(0, -1), None);
        assert_eq!(Square::all().count(), 64);
    }

    #[test]
    fn off_board_squares_are_representable_but_inert() {
        let wide = Square::new(0, 9);
        assert!(!wide.is_on_board());
        assert!(Square::new(7, 7).is_on_board());
        assert_eq!(wide.offset(0, -2), None);
        assert_eq!(Square::new(200, 3).to_string(), "d?");
        let far = Move::new(Square::new(255, 0), Square::new(0, 255));
        assert_eq!(far.row_delta(), -255);
        assert_eq!(far.col_delta(), 255);
    }

    #[test]
    fn piece_fen_chars_round_trip_case() {
        let knight = Piece::new(PieceKind::Knight, Color::Black);
        assert_eq!(knight.fen_char(), 'n');
        assert_eq!(Piece::from_fen_char('n'), Some(knight));
        assert_eq!(Piece::from_fen_char('x'), None);
        assert_eq!(Piece::from_fen_char('3'), None);
    }

    #[test]
    fn castling_rights_revoke_one_side_only() {
        let mut rights = CastlingRights::ALL;
        rights.revoke(Color::White);
        assert!(!rights.any(Color::White));
        assert!(rights.kingside(Color::Black) && rights.queenside(Color::Black));
    }
}
