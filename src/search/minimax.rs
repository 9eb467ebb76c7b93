//! Alpha-beta minimax over a mutable position.
//!
//! White maximizes and Black minimizes; scores come from the evaluator in
//! White's view, so no negation happens between plies. Every hypothetical
//! move goes through `with_move`, which guarantees the position is restored
//! on every exit path including pruning breaks and errors.

use crate::errors::ChessResult;
use crate::game_state::chess_rules::PROMOTION_KINDS;
use crate::game_state::chess_types::*;
use crate::game_state::game_status::is_insufficient_material;
use crate::move_generation::legal_move_apply::with_move;
use crate::move_generation::legal_move_checks::{is_capture, is_in_check};
use crate::move_generation::legal_move_generator::{generate_captures, generate_legal_moves};
use crate::search::board_scoring::{BoardScorer, EvaluationContext, MATE_SCORE};
use crate::search::killer_moves::KillerMoves;
use crate::search::move_ordering::{order_captures, order_moves, OrderingContext};
use crate::search::position_key::PositionKey;
use crate::search::repetition::RepetitionCounts;
use crate::search::transposition_table::{Bound, TTEntry, TranspositionTable};

/// Larger than any evaluation, used as the open search window.
pub const INFINITY: i32 = 10_000_000;
pub const DRAW_SCORE: i32 = 0;

/// Score for `side` having been checkmated `ply` plies below the root.
///
/// Closer mates score further from zero so the winner prefers them.
#[inline]
pub fn mated_score(side: Color, ply: u16) -> i32 {
    -side.sign() * (MATE_SCORE - i32::from(ply))
}

/// True for scores that can only come from a forced mate.
#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() > MATE_SCORE / 2
}

/// One search run over the caches owned by a game session.
pub struct Searcher<'a> {
    scorer: &'a dyn BoardScorer,
    transpositions: &'a mut TranspositionTable,
    killers: &'a mut KillerMoves,
    /// Private copy; search records hypothetical moves here.
    repetitions: RepetitionCounts,
    root_history_len: usize,
    quiescence_depth: u8,
    nodes: u64,
}

impl<'a> Searcher<'a> {
    pub fn new(
        scorer: &'a dyn BoardScorer,
        transpositions: &'a mut TranspositionTable,
        killers: &'a mut KillerMoves,
        repetitions: RepetitionCounts,
        root_history_len: usize,
        quiescence_depth: u8,
    ) -> Self {
        Self {
            scorer,
            transpositions,
            killers,
            repetitions,
            root_history_len,
            quiescence_depth,
            nodes: 0,
        }
    }

    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub(crate) fn killers(&self) -> &KillerMoves {
        self.killers
    }

    pub(crate) fn history_len_at(&self, ply: u16) -> usize {
        self.root_history_len + usize::from(ply)
    }

    /// Static evaluation with the repetition state of the current line.
    pub fn evaluate(&self, position: &Position, ply: u16) -> i32 {
        let context = EvaluationContext {
            history_len: self.history_len_at(ply),
            repetitions: &self.repetitions,
        };
        self.scorer.score(position, &context)
    }

    /// Alpha-beta minimax to `depth` plies, then quiescence.
    pub fn minimax(
        &mut self,
        position: &mut Position,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        ply: u16,
    ) -> ChessResult<i32> {
        if depth == 0 {
            return self.quiescence(position, self.quiescence_depth, alpha, beta, ply);
        }
        self.nodes += 1;

        if is_insufficient_material(position) {
            return Ok(DRAW_SCORE);
        }

        let side = position.side_to_move;
        let maximizing = side == Color::White;

        let key = PositionKey::of(position);
        let mut hash_move = None;
        if let Some(entry) = self.transpositions.probe(&key) {
            if let Some(score) = entry.usable_score(depth, alpha, beta) {
                return Ok(score);
            }
            hash_move = entry.best_move.clone();
        }

        let mut moves = generate_legal_moves(position);
        if moves.is_empty() {
            return Ok(if is_in_check(position, side) {
                mated_score(side, ply)
            } else {
                DRAW_SCORE
            });
        }

        let ordering = OrderingContext {
            history_len: self.history_len_at(ply),
            depth,
            killers: Some(&*self.killers),
            hash_move: hash_move.as_ref(),
        };
        order_moves(position, &mut moves, &ordering)?;

        let (alpha_in, beta_in) = (alpha, beta);
        let mut best_score = if maximizing { -INFINITY } else { INFINITY };
        let mut best_move = None;

        for mv in &moves {
            let quiet = !is_capture(position, mv);
            let (score, _) = self.explore(position, mv, move |searcher, child| {
                searcher.minimax(child, depth - 1, alpha, beta, ply + 1)
            })?;

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(mv.coords());
                }
                alpha = alpha.max(score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(mv.coords());
                }
                beta = beta.min(score);
            }

            if alpha >= beta {
                if quiet {
                    self.killers.record(depth, mv);
                }
                break;
            }
        }

        let bound = if best_score <= alpha_in {
            Bound::Upper
        } else if best_score >= beta_in {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.transpositions.store(
            key,
            TTEntry {
                depth,
                score: best_score,
                bound,
                best_move,
            },
        );
        Ok(best_score)
    }

    /// Capture-only extension below the horizon; all evasions when in check.
    pub fn quiescence(
        &mut self,
        position: &mut Position,
        remaining: u8,
        mut alpha: i32,
        mut beta: i32,
        ply: u16,
    ) -> ChessResult<i32> {
        self.nodes += 1;
        let side = position.side_to_move;
        let maximizing = side == Color::White;
        let in_check = is_in_check(position, side);

        let mut moves = if in_check {
            generate_legal_moves(position)
        } else {
            generate_captures(position)
        };
        if in_check && moves.is_empty() {
            return Ok(mated_score(side, ply));
        }

        let stand_pat = self.evaluate(position, ply);
        if remaining == 0 {
            return Ok(stand_pat);
        }

        if !in_check {
            if maximizing {
                if stand_pat >= beta {
                    return Ok(beta);
                }
                alpha = alpha.max(stand_pat);
            } else {
                if stand_pat <= alpha {
                    return Ok(alpha);
                }
                beta = beta.min(stand_pat);
            }
        }

        order_captures(position, &mut moves);
        for mv in &moves {
            let (score, _) = self.explore(position, mv, move |searcher, child| {
                searcher.quiescence(child, remaining - 1, alpha, beta, ply + 1)
            })?;

            if maximizing {
                alpha = alpha.max(score);
            } else {
                beta = beta.min(score);
            }
            if alpha >= beta {
                break;
            }
        }

        Ok(if maximizing { alpha } else { beta })
    }

    /// Play `mv`, score the child with `recurse`, and take it back.
    ///
    /// A move that reaches the last rank is expanded into all four promotion
    /// choices before recursing; the best one for the mover is returned with
    /// its kind.
    pub(crate) fn explore<F>(
        &mut self,
        position: &mut Position,
        mv: &Move,
        mut recurse: F,
    ) -> ChessResult<(i32, Option<PieceKind>)>
    where
        F: FnMut(&mut Self, &mut Position) -> ChessResult<i32>,
    {
        let mover = position.side_to_move;
        self.repetitions.record(mv, mover);

        let result = with_move(position, mv, |child| {
            let Some(square) = child.pending_promotion else {
                return recurse(self, child).map(|score| (score, None));
            };

            child.pending_promotion = None;
            let mut best: Option<(i32, PieceKind)> = None;
            for kind in PROMOTION_KINDS {
                child.set_piece(square, Some(Piece::new(kind, mover)));
                let score = recurse(self, child)?;
                let better = match best {
                    None => true,
                    Some((best_score, _)) if mover == Color::White => score > best_score,
                    Some((best_score, _)) => score < best_score,
                };
                if better {
                    best = Some((score, kind));
                }
            }
            Ok(best.map_or((DRAW_SCORE, None), |(score, kind)| (score, Some(kind))))
        });

        self.repetitions.unrecord(mv, mover);
        result
    }
}
