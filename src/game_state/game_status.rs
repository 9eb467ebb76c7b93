//! Game-status machine.
//!
//! Recomputed after every completed move (and every promotion resolution).
//! Terminal states stay put until the session is reset; `next_status`
//! returns the current terminal status unchanged.

use std::fmt;

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_in_check;
use crate::move_generation::legal_move_generator::has_any_legal_move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing { in_check: bool },
    Checkmate { winner: Color },
    Stalemate,
    DrawInsufficientMaterial,
    /// A king vanished from the board; only reachable from a corrupted position.
    KingCaptured { winner: Color },
}

impl Default for GameStatus {
    fn default() -> Self {
        GameStatus::Ongoing { in_check: false }
    }
}

impl GameStatus {
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Ongoing { .. })
    }

    #[inline]
    pub fn is_checkmate(self) -> bool {
        matches!(
            self,
            GameStatus::Checkmate { .. } | GameStatus::KingCaptured { .. }
        )
    }

    #[inline]
    pub fn is_stalemate(self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate | GameStatus::DrawInsufficientMaterial
        )
    }

    #[inline]
    pub fn is_in_check(self) -> bool {
        matches!(self, GameStatus::Ongoing { in_check: true })
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            GameStatus::Checkmate { winner } | GameStatus::KingCaptured { winner } => Some(winner),
            _ => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Ongoing { in_check: false } => write!(f, "ongoing"),
            GameStatus::Ongoing { in_check: true } => write!(f, "check"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {} wins", winner.name()),
            GameStatus::Stalemate => write!(f, "stalemate"),
            GameStatus::DrawInsufficientMaterial => write!(f, "draw by insufficient material"),
            GameStatus::KingCaptured { winner } => {
                write!(f, "king captured, {} wins", winner.name())
            }
        }
    }
}

/// Exactly two pieces left and both are kings.
pub fn is_insufficient_material(position: &Position) -> bool {
    let mut count = 0usize;
    for (_, piece) in position.pieces() {
        count += 1;
        if count > 2 || piece.kind != PieceKind::King {
            return false;
        }
    }
    count == 2
}

/// Status of `position` from scratch, with the side to move as the defender.
pub fn evaluate_status(position: &Position) -> GameStatus {
    for color in [Color::White, Color::Black] {
        if position.king_square(color).is_none() {
            tracing::error!("{} king missing from the board", color.name());
            return GameStatus::KingCaptured {
                winner: color.opposite(),
            };
        }
    }

    if is_insufficient_material(position) {
        return GameStatus::DrawInsufficientMaterial;
    }

    let defender = position.side_to_move;
    let in_check = is_in_check(position, defender);
    if has_any_legal_move(position, defender) {
        GameStatus::Ongoing { in_check }
    } else if in_check {
        GameStatus::Checkmate {
            winner: defender.opposite(),
        }
    } else {
        GameStatus::Stalemate
    }
}

/// Transition from `current` after a completed move. Terminal states are sticky.
pub fn next_status(current: GameStatus, position: &Position) -> GameStatus {
    if current.is_terminal() {
        return current;
    }
    evaluate_status(position)
}
