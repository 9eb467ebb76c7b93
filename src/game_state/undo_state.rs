use crate::game_state::chess_types::*;

/// Single undo record for `apply_move` / `undo_move`.
///
/// Created immediately before a move is applied and consumed exactly once by
/// the matching undo; it never outlives the search frame that created it.
#[derive(Debug, Clone)]
pub struct UndoState {
    pub mv: Move,
    /// Piece that stood on the source square before the move.
    pub moved_piece: Piece,
    /// Piece that stood on the destination square (en-passant victims are implied).
    pub captured_piece: Option<Piece>,

    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_target: Option<Square>,
    pub prev_pending_promotion: Option<Square>,
}

impl UndoState {
    /// True when the recorded move was an en-passant capture.
    #[inline]
    pub fn was_en_passant(&self) -> bool {
        self.moved_piece.kind == PieceKind::Pawn
            && self.captured_piece.is_none()
            && self.mv.from.col() != self.mv.to.col()
            && self.prev_en_passant_target == Some(self.mv.to)
    }

    #[inline]
    pub fn was_castling(&self) -> bool {
        self.moved_piece.kind == PieceKind::King && self.mv.col_delta().abs() == 2
    }
}
