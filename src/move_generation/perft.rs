//! Perft: exhaustive leaf counting to verify the move generator.
//!
//! A pawn reaching the last rank leaves a pending promotion behind; perft
//! resolves it to each of the four promotion pieces in turn, so every
//! promotion counts four times as in the published reference tables.

use crate::errors::ChessResult;
use crate::game_state::chess_rules::PROMOTION_KINDS;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::{resolve_promotion, with_move};
use crate::move_generation::legal_move_checks::{is_capture, is_en_passant_capture, is_in_check};
use crate::move_generation::legal_move_generator::{generate_legal_moves, has_any_legal_move};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

/// What a move does before any promotion choice is made.
#[derive(Debug, Clone, Copy)]
struct MoveKind {
    capture: bool,
    en_passant: bool,
    castle: bool,
}

impl MoveKind {
    fn of(position: &Position, mv: &Move) -> Self {
        let king_move = position
            .piece_at(mv.from)
            .is_some_and(|p| p.kind == PieceKind::King);
        Self {
            capture: is_capture(position, mv),
            en_passant: is_en_passant_capture(position, mv),
            castle: king_move && mv.col_delta().abs() == 2,
        }
    }
}

pub fn perft(position: &Position, depth: u8) -> ChessResult<PerftCounts> {
    let mut scratch = *position;
    let mut total = PerftCounts::default();
    if depth == 0 {
        total.nodes = 1;
        return Ok(total);
    }
    perft_recurse(&mut scratch, depth, &mut total)?;
    Ok(total)
}

/// Leaf count below each root move. A promoting move is listed once with
/// the leaves of all four promotion choices.
pub fn perft_divide(position: &Position, depth: u8) -> ChessResult<Vec<(Move, usize)>> {
    let mut scratch = *position;
    let mut divide = Vec::new();
    if depth == 0 {
        return Ok(divide);
    }
    for mv in generate_legal_moves(position) {
        let mut counts = PerftCounts::default();
        count_move(&mut scratch, &mv, depth, &mut counts)?;
        divide.push((mv, counts.nodes));
    }
    Ok(divide)
}

fn perft_recurse(position: &mut Position, depth: u8, counts: &mut PerftCounts) -> ChessResult<()> {
    for mv in generate_legal_moves(position) {
        count_move(position, &mv, depth, counts)?;
    }
    Ok(())
}

/// Count everything under `mv`, with `depth` including the move itself.
fn count_move(
    position: &mut Position,
    mv: &Move,
    depth: u8,
    counts: &mut PerftCounts,
) -> ChessResult<()> {
    let kind = MoveKind::of(position, mv);
    with_move(position, mv, |child| {
        if child.pending_promotion.is_none() {
            return count_child(child, kind, false, depth, counts);
        }
        for piece in PROMOTION_KINDS {
            let mut promoted = *child;
            resolve_promotion(&mut promoted, piece);
            count_child(&mut promoted, kind, true, depth, counts)?;
        }
        Ok(())
    })
}

fn count_child(
    child: &mut Position,
    kind: MoveKind,
    promoted: bool,
    depth: u8,
    counts: &mut PerftCounts,
) -> ChessResult<()> {
    if depth > 1 {
        return perft_recurse(child, depth - 1, counts);
    }

    counts.nodes += 1;
    counts.captures += usize::from(kind.capture);
    counts.en_passant += usize::from(kind.en_passant);
    counts.castles += usize::from(kind.castle);
    counts.promotions += usize::from(promoted);

    let defender = child.side_to_move;
    if is_in_check(child, defender) {
        counts.checks += 1;
        if !has_any_legal_move(child, defender) {
            counts.checkmates += 1;
        }
    }
    Ok(())
}
