//! Heuristic move ordering for alpha-beta search.
//!
//! Moves are scored once and sorted best-first. A good order only speeds up
//! pruning; it never changes the minimax value.

use std::cmp::Reverse;

use crate::errors::ChessResult;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::with_move;
use crate::move_generation::legal_move_checks::{is_en_passant_capture, is_in_check};
use crate::move_generation::legal_move_generator::has_any_legal_move;
use crate::search::board_scoring::{piece_value, OPENING_PLIES};
use crate::search::killer_moves::KillerMoves;

pub const CAPTURE_BONUS_MULTIPLIER: i32 = 100;
pub const CHECK_ORDER_BONUS: i32 = 800;
pub const MATE_ORDER_BONUS: i32 = 999_999;
pub const DEVELOPMENT_ORDER_BONUS: i32 = 50;
pub const QUEEN_CAUTION_PENALTY: i32 = 30;
pub const KILLER_ORDER_BONUS: i32 = 200;

/// Inputs for ordering one node's moves.
#[derive(Debug, Clone, Copy)]
pub struct OrderingContext<'a> {
    pub history_len: usize,
    pub depth: u8,
    pub killers: Option<&'a KillerMoves>,
    /// Best move remembered for this position; always searched first.
    pub hash_move: Option<&'a Move>,
}

/// Value of whatever `mv` captures, en passant counting as a pawn.
pub fn capture_value(position: &Position, mv: &Move) -> i32 {
    match position.piece_at(mv.to) {
        Some(target) => piece_value(target.kind),
        None if is_en_passant_capture(position, mv) => piece_value(PieceKind::Pawn),
        None => 0,
    }
}

/// Ordering score of a single move. Higher is searched earlier.
pub fn score_move(position: &mut Position, mv: &Move, context: &OrderingContext<'_>) -> ChessResult<i32> {
    if context.hash_move == Some(mv) {
        return Ok(i32::MAX);
    }

    let mut score = capture_value(position, mv) * CAPTURE_BONUS_MULTIPLIER;

    score += with_move(position, mv, |child| {
        let defender = child.side_to_move;
        Ok(if !is_in_check(child, defender) {
            0
        } else if has_any_legal_move(child, defender) {
            CHECK_ORDER_BONUS
        } else {
            MATE_ORDER_BONUS
        })
    })?;

    if context.history_len < OPENING_PLIES {
        match position.piece_at(mv.from).map(|p| p.kind) {
            Some(PieceKind::Knight | PieceKind::Bishop) => score += DEVELOPMENT_ORDER_BONUS,
            Some(PieceKind::Queen) => score -= QUEEN_CAUTION_PENALTY,
            _ => {}
        }
    }

    if context
        .killers
        .is_some_and(|killers| killers.is_killer(context.depth, mv))
    {
        score += KILLER_ORDER_BONUS;
    }

    Ok(score)
}

/// Sort `moves` best-first. Ties keep generator order.
pub fn order_moves(
    position: &mut Position,
    moves: &mut Vec<Move>,
    context: &OrderingContext<'_>,
) -> ChessResult<()> {
    let mut scored = Vec::with_capacity(moves.len());
    for mv in moves.drain(..) {
        let score = score_move(position, &mv, context)?;
        scored.push((score, mv));
    }
    scored.sort_by_key(|(score, _)| Reverse(*score));
    moves.extend(scored.into_iter().map(|(_, mv)| mv));
    Ok(())
}

/// Most valuable victim first; used for quiescence captures.
pub fn order_captures(position: &Position, moves: &mut [Move]) {
    moves.sort_by_cached_key(|mv| Reverse(capture_value(position, mv)));
}
