//! Canonical chess-rule constants.
//!
//! Row indices follow the board layout used everywhere in the crate: row 0 is
//! Black's back rank, row 7 is White's.

use crate::game_state::chess_types::PieceKind;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub const WHITE_BACK_ROW: u8 = 7;
pub const BLACK_BACK_ROW: u8 = 0;
pub const WHITE_PAWN_START_ROW: u8 = 6;
pub const BLACK_PAWN_START_ROW: u8 = 1;

pub const KING_HOME_COL: u8 = 4;
pub const KINGSIDE_ROOK_COL: u8 = 7;
pub const QUEENSIDE_ROOK_COL: u8 = 0;

/// Promotion choices in the order search tries them.
pub const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];
