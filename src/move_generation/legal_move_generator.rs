//! Legal move generation.
//!
//! Walks every piece of the requested side, enumerates the geometric
//! candidates from `moves::movement_patterns`, and keeps the ones the
//! legality oracle accepts. Output order follows the board scan (a8..h1,
//! then pattern order per piece); it carries no meaning for correctness.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::{is_capture, is_legal};
use crate::moves::movement_patterns::candidate_destinations;

/// All legal moves for the side to move.
pub fn generate_legal_moves(position: &Position) -> Vec<Move> {
    generate_legal_moves_for(position, position.side_to_move)
}

pub fn generate_legal_moves_for(position: &Position, side: Color) -> Vec<Move> {
    let mut moves = Vec::with_capacity(48);
    for (from, _) in position.pieces_of(side) {
        for to in candidate_destinations(position, from) {
            let mv = Move::new(from, to);
            if is_legal(position, &mv, side) {
                moves.push(mv);
            }
        }
    }
    moves
}

/// Legal captures for the side to move, en passant included.
pub fn generate_captures(position: &Position) -> Vec<Move> {
    let side = position.side_to_move;
    let mut captures = Vec::with_capacity(16);
    for (from, _) in position.pieces_of(side) {
        for to in candidate_destinations(position, from) {
            let mv = Move::new(from, to);
            if is_capture(position, &mv) && is_legal(position, &mv, side) {
                captures.push(mv);
            }
        }
    }
    captures
}

/// Stops at the first legal move found.
pub fn has_any_legal_move(position: &Position, side: Color) -> bool {
    position.pieces_of(side).any(|(from, _)| {
        candidate_destinations(position, from).any(|to| is_legal(position, &Move::new(from, to), side))
    })
}

/// Number of legal moves for `side`, used by mobility terms.
pub fn count_legal_moves(position: &Position, side: Color) -> usize {
    position
        .pieces_of(side)
        .map(|(from, _)| {
            candidate_destinations(position, from)
                .filter(|&to| is_legal(position, &Move::new(from, to), side))
                .count()
        })
        .sum()
}
