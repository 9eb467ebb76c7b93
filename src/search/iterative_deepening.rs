//! Iterative deepening at the root.
//!
//! Runs minimax at depths `1..=max_depth`, checking the wall clock after each
//! root move and between depths. Only fully completed depths contribute to
//! the result. Every root move within `tolerance` of the best is kept, and
//! the final pick is uniformly random among them (captures first), which
//! keeps the engine from playing the same line every game.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::errors::ChessResult;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_capture;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::search::minimax::{Searcher, INFINITY};
use crate::search::move_ordering::{order_moves, OrderingContext};

#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    pub max_depth: u8,
    pub time_limit: Duration,
    /// Root moves scoring within this margin of the best are candidates.
    pub tolerance: i32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_depth: 3,
            time_limit: Duration::from_secs(5),
            tolerance: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootCandidate {
    pub mv: Move,
    pub score: i32,
    /// Best promotion piece when the move reaches the last rank.
    pub promotion: Option<PieceKind>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub promotion: Option<PieceKind>,
    pub best_score: i32,
    pub reached_depth: u8,
    pub nodes: u64,
    /// Candidates from the deepest completed depth, best first.
    pub near_best: Vec<RootCandidate>,
}

impl Searcher<'_> {
    pub fn iterative_deepening<R: Rng + ?Sized>(
        &mut self,
        position: &mut Position,
        limits: SearchLimits,
        rng: &mut R,
    ) -> ChessResult<SearchResult> {
        let start = Instant::now();
        let side = position.side_to_move;
        let maximizing = side == Color::White;

        let mut root_moves = generate_legal_moves(position);
        let Some(fallback) = root_moves.first().cloned() else {
            return Ok(SearchResult::default());
        };

        let mut result = SearchResult::default();
        let mut previous_best: Option<Move> = None;

        for depth in 1..=limits.max_depth.max(1) {
            let ordering = OrderingContext {
                history_len: self.history_len_at(0),
                depth,
                killers: Some(self.killers()),
                hash_move: previous_best.as_ref(),
            };
            order_moves(position, &mut root_moves, &ordering)?;

            let mut scored: Vec<RootCandidate> = Vec::with_capacity(root_moves.len());
            let mut best = if maximizing { -INFINITY } else { INFINITY };
            let mut timed_out = false;

            for mv in &root_moves {
                // Widen the window by the tolerance so near-best scores stay exact.
                let (alpha, beta) = if maximizing {
                    (best.saturating_sub(limits.tolerance + 1).max(-INFINITY), INFINITY)
                } else {
                    (-INFINITY, best.saturating_add(limits.tolerance + 1).min(INFINITY))
                };
                let (score, promotion) = self.explore(position, mv, move |searcher, child| {
                    searcher.minimax(child, depth - 1, alpha, beta, 1)
                })?;

                if (maximizing && score > best) || (!maximizing && score < best) {
                    best = score;
                }
                scored.push(RootCandidate {
                    mv: mv.coords(),
                    score,
                    promotion,
                });

                if start.elapsed() > limits.time_limit {
                    timed_out = true;
                    break;
                }
            }

            if timed_out {
                tracing::debug!(depth, elapsed = ?start.elapsed(), "time limit reached mid-depth");
                break;
            }

            scored.sort_by_key(|c| if maximizing { -c.score } else { c.score });
            let best_candidate = scored[0].clone();
            scored.retain(|c| (c.score - best).abs() <= limits.tolerance);

            tracing::debug!(
                depth,
                score = best,
                best = %best_candidate.mv,
                candidates = scored.len(),
                nodes = self.nodes(),
                "completed depth"
            );

            previous_best = Some(best_candidate.mv.clone());
            result.best_move = Some(best_candidate.mv);
            result.promotion = best_candidate.promotion;
            result.best_score = best;
            result.reached_depth = depth;
            result.near_best = scored;

            if start.elapsed() > limits.time_limit {
                break;
            }
        }

        result.nodes = self.nodes();
        if result.reached_depth == 0 {
            tracing::warn!("no search depth completed; falling back to first legal move");
            result.best_move = Some(fallback);
            return Ok(result);
        }

        if let Some(pick) = pick_near_best(position, &result.near_best, rng) {
            result.best_move = Some(pick.mv.clone());
            result.promotion = pick.promotion;
            result.best_score = pick.score;
        }
        Ok(result)
    }
}

/// Uniform pick among `candidates`, restricted to captures when any exist.
fn pick_near_best<'c, R: Rng + ?Sized>(
    position: &Position,
    candidates: &'c [RootCandidate],
    rng: &mut R,
) -> Option<&'c RootCandidate> {
    let captures: Vec<&RootCandidate> = candidates
        .iter()
        .filter(|c| is_capture(position, &c.mv))
        .collect();
    let pool: Vec<&RootCandidate> = if captures.is_empty() {
        candidates.iter().collect()
    } else {
        captures
    };
    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.random_range(0..pool.len())])
}
