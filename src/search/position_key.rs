//! Canonical textual position key.
//!
//! Placement, side to move, castling rights and en-passant target in FEN
//! field order, without clocks. Two positions share a key exactly when those
//! four components match, which is what the transposition cache and the
//! opening book index on.

use std::fmt;

use crate::game_state::chess_types::Position;
use crate::utils::fen_generator::{
    generate_board_field, generate_castling_field, generate_en_passant_field, generate_side_field,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey(String);

impl PositionKey {
    pub fn of(position: &Position) -> Self {
        PositionKey(format!(
            "{} {} {} {}",
            generate_board_field(position),
            generate_side_field(position.side_to_move),
            generate_castling_field(position.castling_rights),
            generate_en_passant_field(position.en_passant_target)
        ))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Position> for PositionKey {
    fn from(position: &Position) -> Self {
        PositionKey::of(position)
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
