//! Coordinate and short-algebraic notation helpers.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and internal
//! `(row, col)` squares, parses coordinate moves such as `e2e4`, and renders
//! the short notation recorded in a game's move history.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::*;

/// Convert algebraic notation (for example: "e4") to a square.
#[inline]
pub fn algebraic_to_square(square: &str) -> ChessResult<Square> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidSquare(square.to_owned()));
    }

    let file = bytes[0];
    let rank = bytes[1];
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::InvalidSquare(square.to_owned()));
    }

    Ok(Square::new(b'8' - rank, file - b'a'))
}

#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    square.to_string()
}

/// Parse a coordinate move such as `e2e4`. A trailing promotion letter
/// (`e7e8q`) is accepted and ignored; promotion is chosen separately.
pub fn parse_coordinate_move(text: &str) -> ChessResult<Move> {
    let text = text.trim();
    if !(4..=5).contains(&text.len()) || !text.is_ascii() {
        return Err(ChessError::InvalidSquare(text.to_owned()));
    }
    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;
    Ok(Move::new(from, to))
}

/// Short notation for `mv` as played from `position` (before the move).
///
/// Covers the piece letter, pawn-capture source file, `x` and destination,
/// or `O-O`/`O-O-O`. Promotion piece and check suffixes are appended by
/// the caller once they are known.
pub fn base_notation(position: &Position, mv: &Move) -> String {
    let Some(piece) = position.piece_at(mv.from) else {
        return mv.to_string();
    };

    if piece.kind == PieceKind::King && mv.col_delta().abs() == 2 {
        return if mv.col_delta() > 0 { "O-O" } else { "O-O-O" }.to_owned();
    }

    let capture = crate::move_generation::legal_move_checks::is_capture(position, mv);
    let mut notation = String::with_capacity(6);
    if piece.kind == PieceKind::Pawn {
        if capture {
            notation.push(mv.from.file_char());
        }
    } else {
        notation.push(piece.kind.letter());
    }
    if capture {
        notation.push('x');
    }
    notation.push_str(&mv.to.to_string());
    notation
}

/// Append `=X` for a promotion choice.
pub fn append_promotion(notation: &mut String, kind: PieceKind) {
    notation.push('=');
    notation.push(kind.letter());
}

/// Append `#` for mate or `+` for check.
pub fn append_check_suffix(notation: &mut String, gives_check: bool, gives_mate: bool) {
    if gives_mate {
        notation.push('#');
    } else if gives_check {
        notation.push('+');
    }
}
