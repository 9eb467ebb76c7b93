//! Crate root module declarations for the Sloe Chess engine.
//!
//! This file exposes the rules core (position model, legality oracle, move
//! generation, game status), the search engine, the game session and the
//! notation helpers so binaries, tests and benches share stable module paths.

pub mod config;
pub mod diagnostics;
pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_status;
    pub mod position;
    pub mod undo_state;
}

pub mod moves {
    pub mod movement_patterns;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod perft;
}

pub mod search {
    pub mod board_scoring;
    pub mod iterative_deepening;
    pub mod killer_moves;
    pub mod minimax;
    pub mod move_ordering;
    pub mod position_key;
    pub mod repetition;
    pub mod transposition_table;
}

pub mod tables {
    pub mod opening_book;
}

pub mod engines {
    pub mod chess_game;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
}

pub use config::EngineConfig;
pub use engines::chess_game::ChessGame;
pub use errors::{ChessError, ChessResult};
pub use game_state::chess_types::{Color, Move, Piece, PieceKind, Position, Square};
pub use game_state::game_status::GameStatus;
