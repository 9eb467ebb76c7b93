//! Make/unmake of moves on a mutable `Position`.
//!
//! `apply_move` performs every side effect of a move (captures, en passant,
//! castling rook relocation, rights revocation, en-passant target update,
//! promotion flagging) and returns the `UndoState` that `undo_move` consumes
//! to restore the position exactly. Callers are responsible for passing
//! legal moves; only an empty source square or an off-board destination is
//! reported as an error.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::{KINGSIDE_ROOK_COL, QUEENSIDE_ROOK_COL};
use crate::game_state::chess_types::*;

pub fn apply_move(position: &mut Position, mv: &Move) -> ChessResult<UndoState> {
    if !mv.to.is_on_board() {
        return Err(ChessError::IllegalMove(mv.coords()));
    }
    let moved = position
        .piece_at(mv.from)
        .ok_or_else(|| ChessError::IllegalMove(mv.coords()))?;
    let captured = position.piece_at(mv.to);

    let undo = UndoState {
        mv: mv.coords(),
        moved_piece: moved,
        captured_piece: captured,
        prev_castling_rights: position.castling_rights,
        prev_en_passant_target: position.en_passant_target,
        prev_pending_promotion: position.pending_promotion,
    };

    update_castling_rights(position, mv, moved, captured);

    position.en_passant_target = None;
    if moved.kind == PieceKind::Pawn && mv.row_delta().abs() == 2 {
        let passed_row = (mv.from.row() + mv.to.row()) / 2;
        position.en_passant_target = Some(Square::new(passed_row, mv.from.col()));
    }

    if undo.was_en_passant() {
        position.clear_square(Square::new(mv.from.row(), mv.to.col()));
    }

    if undo.was_castling() {
        let (rook_from, rook_to) = castling_rook_squares(mv);
        let rook = position.clear_square(rook_from);
        position.set_piece(rook_to, rook);
    }

    position.clear_square(mv.from);
    position.set_piece(mv.to, Some(moved));

    position.pending_promotion =
        if moved.kind == PieceKind::Pawn && mv.to.row() == moved.color.promotion_row() {
            Some(mv.to)
        } else {
            None
        };

    position.side_to_move = moved.color.opposite();
    Ok(undo)
}

pub fn undo_move(position: &mut Position, undo: UndoState) {
    let mv = &undo.mv;
    position.set_piece(mv.from, Some(undo.moved_piece));
    position.set_piece(mv.to, undo.captured_piece);

    if undo.was_en_passant() {
        position.set_piece(
            Square::new(mv.from.row(), mv.to.col()),
            Some(Piece::new(PieceKind::Pawn, undo.moved_piece.color.opposite())),
        );
    }

    if undo.was_castling() {
        let (rook_home, rook_now) = castling_rook_squares(mv);
        let rook = position.clear_square(rook_now);
        position.set_piece(rook_home, rook);
    }

    position.castling_rights = undo.prev_castling_rights;
    position.en_passant_target = undo.prev_en_passant_target;
    position.pending_promotion = undo.prev_pending_promotion;
    position.side_to_move = undo.moved_piece.color;
}

/// Apply `mv`, run `f` on the resulting position, and always undo before returning.
pub fn with_move<R>(
    position: &mut Position,
    mv: &Move,
    f: impl FnOnce(&mut Position) -> ChessResult<R>,
) -> ChessResult<R> {
    let undo = apply_move(position, mv)?;
    let result = f(position);
    undo_move(position, undo);
    result
}

/// Replace the pending-promotion pawn with `kind`.
///
/// Returns false and leaves the position untouched when no promotion is
/// pending or `kind` is not a promotable piece.
pub fn resolve_promotion(position: &mut Position, kind: PieceKind) -> bool {
    let Some(square) = position.pending_promotion else {
        return false;
    };
    if !kind.is_promotable() {
        return false;
    }
    let Some(pawn) = position.piece_at(square) else {
        return false;
    };

    position.set_piece(square, Some(Piece::new(kind, pawn.color)));
    position.pending_promotion = None;
    true
}

/// (home square, castled square) of the rook for a two-file king move.
fn castling_rook_squares(mv: &Move) -> (Square, Square) {
    let row = mv.from.row();
    if mv.to.col() > mv.from.col() {
        (
            Square::new(row, KINGSIDE_ROOK_COL),
            Square::new(row, mv.from.col() + 1),
        )
    } else {
        (
            Square::new(row, QUEENSIDE_ROOK_COL),
            Square::new(row, mv.from.col() - 1),
        )
    }
}

fn update_castling_rights(
    position: &mut Position,
    mv: &Move,
    moved: Piece,
    captured: Option<Piece>,
) {
    let rights = &mut position.castling_rights;
    match moved.kind {
        PieceKind::King => rights.revoke(moved.color),
        PieceKind::Rook if mv.from.row() == moved.color.back_row() => {
            if mv.from.col() == QUEENSIDE_ROOK_COL {
                rights.set_queenside(moved.color, false);
            } else if mv.from.col() == KINGSIDE_ROOK_COL {
                rights.set_kingside(moved.color, false);
            }
        }
        _ => {}
    }

    // A rook taken on its home corner can no longer castle either.
    if let Some(victim) = captured {
        if victim.kind == PieceKind::Rook && mv.to.row() == victim.color.back_row() {
            if mv.to.col() == QUEENSIDE_ROOK_COL {
                rights.set_queenside(victim.color, false);
            } else if mv.to.col() == KINGSIDE_ROOK_COL {
                rights.set_kingside(victim.color, false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::algebraic::parse_coordinate_move;

    fn mv(text: &str) -> Move {
        parse_coordinate_move(text).expect("test move should parse")
    }

    fn round_trip(fen: &str, text: &str) -> Position {
        let mut position = Position::from_fen(fen).expect("FEN should parse");
        let before = position;
        let undo = apply_move(&mut position, &mv(text)).expect("move should apply");
        let after = position;
        undo_move(&mut position, undo);
        assert_eq!(position, before, "undo of {text} must restore {fen}");
        after
    }

    #[test]
    fn double_push_sets_en_passant_target() {
        let after = round_trip(
            crate::game_state::chess_rules::STARTING_POSITION_FEN,
            "e2e4",
        );
        assert_eq!(after.en_passant_target, Some(Square::new(5, 4)));
        assert_eq!(after.side_to_move, Color::Black);
        assert!(after.is_empty(Square::new(6, 4)));
    }

    #[test]
    fn en_passant_removes_the_bypassed_pawn() {
        let after = round_trip("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", "e5d6");
        assert!(after.is_empty(Square::new(3, 3)));
        assert_eq!(
            after.piece_at(Square::new(2, 3)),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );
        assert_eq!(after.en_passant_target, None);
    }

    #[test]
    fn castling_moves_rook_and_revokes_rights() {
        let after = round_trip("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1g1");
        assert_eq!(
            after.piece_at(Square::new(7, 5)),
            Some(Piece::new(PieceKind::Rook, Color::White))
        );
        assert!(after.is_empty(Square::new(7, 7)));
        assert!(!after.castling_rights.any(Color::White));
        assert!(after.castling_rights.any(Color::Black));

        let queenside = round_trip("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", "e8c8");
        assert_eq!(
            queenside.piece_at(Square::new(0, 3)),
            Some(Piece::new(PieceKind::Rook, Color::Black))
        );
    }

    #[test]
    fn rook_moves_and_captures_revoke_single_rights() {
        let after = round_trip("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "a1a8");
        assert!(!after.castling_rights.white_queenside);
        assert!(after.castling_rights.white_kingside);
        assert!(!after.castling_rights.black_queenside);
        assert!(after.castling_rights.black_kingside);
    }

    #[test]
    fn promotion_is_flagged_and_resolved() {
        let fen = "8/4P3/8/8/8/8/k7/4K3 w - - 0 1";
        let after = round_trip(fen, "e7e8");
        assert_eq!(after.pending_promotion, Some(Square::new(0, 4)));
        assert_eq!(
            after.piece_at(Square::new(0, 4)),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );

        let mut position = after;
        assert!(!resolve_promotion(&mut position, PieceKind::King));
        assert_eq!(position, after);
        assert!(resolve_promotion(&mut position, PieceKind::Queen));
        assert_eq!(
            position.piece_at(Square::new(0, 4)),
            Some(Piece::new(PieceKind::Queen, Color::White))
        );
        assert_eq!(position.pending_promotion, None);
        assert!(!resolve_promotion(&mut position, PieceKind::Queen));
    }

    #[test]
    fn undo_after_resolved_promotion_restores_the_pawn() {
        let mut position =
            Position::from_fen("3r4/4P3/8/8/8/8/k7/4K3 w - - 0 1").expect("FEN should parse");
        let before = position;
        let undo = apply_move(&mut position, &mv("e7d8")).expect("capture-promotion applies");
        assert!(resolve_promotion(&mut position, PieceKind::Knight));
        undo_move(&mut position, undo);
        assert_eq!(position, before);
    }

    #[test]
    fn with_move_always_reverts() {
        let mut position = Position::starting();
        let before = position;
        let seen = with_move(&mut position, &mv("g1f3"), |p| {
            Ok(p.piece_at(Square::new(5, 5)))
        })
        .expect("move applies");
        assert_eq!(seen, Some(Piece::new(PieceKind::Knight, Color::White)));
        assert_eq!(position, before);
    }

    #[test]
    fn empty_source_is_an_error() {
        let mut position = Position::starting();
        assert!(apply_move(&mut position, &mv("e4e5")).is_err());
        assert_eq!(position, Position::starting());
    }

    #[test]
    fn off_board_squares_are_an_error() {
        let mut position = Position::starting();
        let off_the_edge = Move::new(Square::new(6, 4), Square::new(6, 8));
        assert!(matches!(
            apply_move(&mut position, &off_the_edge),
            Err(ChessError::IllegalMove(rejected)) if rejected == off_the_edge
        ));
        let from_nowhere = Move::new(Square::new(9, 4), Square::new(5, 4));
        assert!(apply_move(&mut position, &from_nowhere).is_err());
        assert_eq!(position, Position::starting());
    }
}
