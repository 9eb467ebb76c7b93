//! Mailbox board state.
//!
//! `Position` is the substrate every other subsystem reads and mutates: an
//! 8×8 grid of optional pieces plus side to move, castling rights, the
//! en-passant target and the pending-promotion square. It performs no
//! validation; legality belongs to `move_generation::legal_move_checks` and
//! mutation during play goes through `move_generation::legal_move_apply`.
//!
//! The whole struct is `Copy` (a little over 130 bytes), which lets the
//! legality oracle try hypothetical moves on a scratch copy.

use crate::errors::ChessResult;
use crate::game_state::chess_rules::{
    BLACK_BACK_ROW, BLACK_PAWN_START_ROW, WHITE_BACK_ROW, WHITE_PAWN_START_ROW,
};
use crate::game_state::chess_types::*;
use crate::utils::fen_parser::parse_fen;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    board: [[Option<Piece>; 8]; 8],
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_target: Option<Square>,
    /// Square holding a pawn that reached the last rank and awaits a promotion choice.
    pub pending_promotion: Option<Square>,
}

impl Default for Position {
    fn default() -> Self {
        Self::empty()
    }
}

impl Position {
    /// Board with no pieces, White to move and no rights.
    pub fn empty() -> Self {
        Self {
            board: [[None; 8]; 8],
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant_target: None,
            pending_promotion: None,
        }
    }

    /// Standard starting position.
    pub fn starting() -> Self {
        let mut position = Self::empty();
        for (col, kind) in BACK_RANK.iter().enumerate() {
            let col = col as u8;
            position.set_piece(Square::new(BLACK_BACK_ROW, col), Some(Piece::new(*kind, Color::Black)));
            position.set_piece(
                Square::new(BLACK_PAWN_START_ROW, col),
                Some(Piece::new(PieceKind::Pawn, Color::Black)),
            );
            position.set_piece(
                Square::new(WHITE_PAWN_START_ROW, col),
                Some(Piece::new(PieceKind::Pawn, Color::White)),
            );
            position.set_piece(Square::new(WHITE_BACK_ROW, col), Some(Piece::new(*kind, Color::White)));
        }
        position.castling_rights = CastlingRights::ALL;
        position
    }

    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    /// Occupant of `square`; off-board squares read as empty.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board
            .get(square.row() as usize)
            .and_then(|row| row.get(square.col() as usize))
            .copied()
            .flatten()
    }

    /// Signed-coordinate lookup; off-board coordinates read as empty.
    #[inline]
    pub fn piece_at_coords(&self, row: i8, col: i8) -> Option<Piece> {
        Square::try_new(row, col).and_then(|sq| self.piece_at(sq))
    }

    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    /// Writes to off-board squares are ignored.
    #[inline]
    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        if let Some(slot) = self.slot_mut(square) {
            *slot = piece;
        }
    }

    /// Empty a square, returning whatever stood there.
    #[inline]
    pub fn clear_square(&mut self, square: Square) -> Option<Piece> {
        self.slot_mut(square).and_then(Option::take)
    }

    fn slot_mut(&mut self, square: Square) -> Option<&mut Option<Piece>> {
        self.board
            .get_mut(square.row() as usize)
            .and_then(|row| row.get_mut(square.col() as usize))
    }

    /// Occupied squares in row-major order starting at a8.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| p.is(PieceKind::King, color))
            .map(|(sq, _)| sq)
    }

    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }
}

#[cfg(test)]
mod tests {
    use super::Position;
    use crate::game_state::chess_types::*;

    #[test]
    fn starting_position_layout() {
        let position = Position::starting();
        assert_eq!(position.piece_count(), 32);
        assert_eq!(
            position.piece_at(Square::new(7, 4)),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            position.piece_at(Square::new(0, 3)),
            Some(Piece::new(PieceKind::Queen, Color::Black))
        );
        assert_eq!(position.king_square(Color::Black), Some(Square::new(0, 4)));
        assert_eq!(position.castling_rights, CastlingRights::ALL);
        assert_eq!(position.side_to_move, Color::White);
    }

    #[test]
    fn off_board_reads_are_empty() {
        let position = Position::starting();
        assert_eq!(position.piece_at_coords(-1, 0), None);
        assert_eq!(position.piece_at_coords(0, 8), None);
        assert!(position.piece_at_coords(0, 0).is_some());
    }

    #[test]
    fn clear_square_returns_previous_occupant() {
        let mut position = Position::starting();
        let e2 = Square::new(6, 4);
        assert_eq!(
            position.clear_square(e2),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );
        assert!(position.is_empty(e2));
        assert_eq!(position.clear_square(e2), None);
    }

    #[test]
    fn starting_matches_starting_fen() {
        let parsed = Position::from_fen(crate::game_state::chess_rules::STARTING_POSITION_FEN)
            .expect("starting FEN should parse");
        assert_eq!(parsed, Position::starting());
    }
}
