//! Errors used throughout the chess engine.
//!
//! `ChessError` is the single error type returned by game logic, parsing
//! utilities and the game session. Rule violations a caller can trigger
//! (illegal moves, moving while a promotion is unresolved, moving after the
//! game ended) are recoverable and carry enough context for a diagnostic.
//! Parsing variants carry the offending input.

use thiserror::Error;

use crate::game_state::chess_types::Move;

/// Unified error type for the chess engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    /// The submitted move is not legal for the side to move.
    #[error("illegal move {0}")]
    IllegalMove(Move),

    /// The game already reached a terminal state; only `reset` is accepted.
    #[error("game is over")]
    GameOver,

    /// A pawn reached the last rank and the promotion piece was not chosen yet.
    #[error("pawn promotion on {0} must be resolved first")]
    PromotionPending(String),

    /// A FEN string had a malformed field.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// A square or coordinate string could not be parsed.
    #[error("invalid square: {0}")]
    InvalidSquare(String),

    /// An opening-book table could not be read or replayed.
    #[error("invalid opening book: {0}")]
    InvalidBook(String),

    /// No legal moves are available for the side to move.
    #[error("no legal moves available")]
    NoLegalMoves,
}

pub type ChessResult<T> = Result<T, ChessError>;
