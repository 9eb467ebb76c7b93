//! Attack and legality oracle.
//!
//! Pseudo-legal checks validate a move against the moving piece's pattern
//! and basic occupancy rules. Attack queries use attack-only rules and never
//! call back into legality filtering, which keeps `is_in_check` free of
//! mutual recursion. `is_legal` adds king safety by probing the move on a
//! scratch copy of the position.

use crate::game_state::chess_rules::{KINGSIDE_ROOK_COL, KING_HOME_COL, QUEENSIDE_ROOK_COL};
use crate::game_state::chess_types::*;

/// Every square strictly between `from` and `to` is empty.
///
/// Pure geometric walk along the line joining the two squares; returns
/// false when they do not share a rank, file or diagonal.
pub fn is_path_clear(position: &Position, from: Square, to: Square) -> bool {
    let d_row = (to.row() as i8 - from.row() as i8).signum();
    let d_col = (to.col() as i8 - from.col() as i8).signum();
    if d_row == 0 && d_col == 0 {
        return false;
    }

    let mut cursor = from.offset(d_row, d_col);
    while let Some(sq) = cursor {
        if sq == to {
            return true;
        }
        if !position.is_empty(sq) {
            return false;
        }
        cursor = sq.offset(d_row, d_col);
    }
    false
}

/// Attack-only geometry: can `piece` standing on `from` strike `target`?
///
/// Pawns attack diagonally regardless of what occupies the target.
pub fn attacks_square(position: &Position, from: Square, piece: Piece, target: Square) -> bool {
    let d_row = target.row() as i8 - from.row() as i8;
    let d_col = target.col() as i8 - from.col() as i8;
    if d_row == 0 && d_col == 0 {
        return false;
    }

    match piece.kind {
        PieceKind::Pawn => d_row == piece.color.pawn_direction() && d_col.abs() == 1,
        PieceKind::Knight => {
            (d_row.abs() == 2 && d_col.abs() == 1) || (d_row.abs() == 1 && d_col.abs() == 2)
        }
        PieceKind::Bishop => d_row.abs() == d_col.abs() && is_path_clear(position, from, target),
        PieceKind::Rook => (d_row == 0 || d_col == 0) && is_path_clear(position, from, target),
        PieceKind::Queen => {
            (d_row == 0 || d_col == 0 || d_row.abs() == d_col.abs())
                && is_path_clear(position, from, target)
        }
        PieceKind::King => d_row.abs() <= 1 && d_col.abs() <= 1,
    }
}

/// True if any piece of `by` attacks `square`.
///
/// A square occupied by one of `by`'s own pieces is never reported as
/// attacked by `by`.
pub fn is_square_attacked(position: &Position, square: Square, by: Color) -> bool {
    if position.piece_at(square).is_some_and(|p| p.color == by) {
        return false;
    }
    position
        .pieces_of(by)
        .any(|(from, piece)| attacks_square(position, from, piece, square))
}

/// Squares holding pieces of `by` that attack `square`.
pub fn attackers_of(position: &Position, square: Square, by: Color) -> Vec<Square> {
    if position.piece_at(square).is_some_and(|p| p.color == by) {
        return Vec::new();
    }
    position
        .pieces_of(by)
        .filter(|(from, piece)| attacks_square(position, *from, *piece, square))
        .map(|(from, _)| from)
        .collect()
}

/// Is `side`'s king attacked?
///
/// A missing king is logged and reported as being in check so callers treat
/// the position as lost rather than panicking.
pub fn is_in_check(position: &Position, side: Color) -> bool {
    match position.king_square(side) {
        Some(king) => is_square_attacked(position, king, side.opposite()),
        None => {
            tracing::error!("{} king not found; assuming checkmate", side.name());
            true
        }
    }
}

/// Pattern and occupancy check, ignoring whether the mover's king ends up attacked.
pub fn is_pseudo_legal(position: &Position, mv: &Move, side: Color) -> bool {
    if !mv.from.is_on_board() || !mv.to.is_on_board() {
        return false;
    }
    let Some(piece) = position.piece_at(mv.from) else {
        return false;
    };
    if piece.color != side || mv.from == mv.to {
        return false;
    }
    if let Some(target) = position.piece_at(mv.to) {
        if target.color == side || target.kind == PieceKind::King {
            return false;
        }
    }

    match piece.kind {
        PieceKind::Pawn => pawn_move_holds(position, mv, side),
        PieceKind::King => {
            let (d_row, d_col) = (mv.row_delta(), mv.col_delta());
            (d_row.abs() <= 1 && d_col.abs() <= 1) || castling_holds(position, mv, side)
        }
        _ => attacks_square(position, mv.from, piece, mv.to),
    }
}

/// Pseudo-legal and the mover's own king is safe afterwards.
pub fn is_legal(position: &Position, mv: &Move, side: Color) -> bool {
    if !is_pseudo_legal(position, mv, side) {
        return false;
    }

    let mut scratch = *position;
    let moved = scratch.clear_square(mv.from);
    if is_en_passant_capture(position, mv) {
        scratch.clear_square(Square::new(mv.from.row(), mv.to.col()));
    }
    scratch.set_piece(mv.to, moved);
    !is_in_check(&scratch, side)
}

/// A pawn moving diagonally onto the empty en-passant target.
pub fn is_en_passant_capture(position: &Position, mv: &Move) -> bool {
    position
        .piece_at(mv.from)
        .is_some_and(|p| p.kind == PieceKind::Pawn)
        && mv.from.col() != mv.to.col()
        && position.is_empty(mv.to)
        && position.en_passant_target == Some(mv.to)
}

/// Whether the move would take something, en passant included.
pub fn is_capture(position: &Position, mv: &Move) -> bool {
    position.piece_at(mv.to).is_some() || is_en_passant_capture(position, mv)
}

fn pawn_move_holds(position: &Position, mv: &Move, side: Color) -> bool {
    let direction = i16::from(side.pawn_direction());
    let (d_row, d_col) = (mv.row_delta(), mv.col_delta());
    let target = position.piece_at(mv.to);

    if d_col == 0 {
        if target.is_some() {
            return false;
        }
        if d_row == direction {
            return true;
        }
        if d_row == 2 * direction && mv.from.row() == side.pawn_start_row() {
            return mv
                .from
                .offset(side.pawn_direction(), 0)
                .is_some_and(|middle| position.is_empty(middle));
        }
        return false;
    }

    if d_col.abs() != 1 || d_row != direction {
        return false;
    }
    if target.is_some() {
        return true;
    }
    position.en_passant_target == Some(mv.to)
        && position
            .piece_at(Square::new(mv.from.row(), mv.to.col()))
            .is_some_and(|p| p.is(PieceKind::Pawn, side.opposite()))
}

fn castling_holds(position: &Position, mv: &Move, side: Color) -> bool {
    let row = side.back_row();
    if mv.from != Square::new(row, KING_HOME_COL) || mv.to.row() != row {
        return false;
    }

    let (allowed, rook_col, must_be_empty, must_be_safe): (bool, u8, &[u8], [u8; 2]) =
        match mv.to.col() {
            6 => (side_right(position, side, true), KINGSIDE_ROOK_COL, &[5, 6], [5, 6]),
            2 => (
                side_right(position, side, false),
                QUEENSIDE_ROOK_COL,
                &[1, 2, 3],
                [3, 2],
            ),
            _ => return false,
        };

    if !allowed {
        return false;
    }
    if must_be_empty
        .iter()
        .any(|&col| !position.is_empty(Square::new(row, col)))
    {
        return false;
    }
    if !position
        .piece_at(Square::new(row, rook_col))
        .is_some_and(|p| p.is(PieceKind::Rook, side))
    {
        return false;
    }
    if is_in_check(position, side) {
        return false;
    }
    let enemy = side.opposite();
    !must_be_safe
        .iter()
        .any(|&col| is_square_attacked(position, Square::new(row, col), enemy))
}

fn side_right(position: &Position, side: Color, kingside: bool) -> bool {
    if kingside {
        position.castling_rights.kingside(side)
    } else {
        position.castling_rights.queenside(side)
    }
}
