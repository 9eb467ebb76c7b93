//! Engine-vs-engine demo game.
//!
//! Run with:
//! `cargo run --release --bin self_play`
//! `cargo run --release --bin self_play -- 40`
//!
//! The optional argument caps the number of plies (default 60). Tuning comes
//! from the `SLOE_*` environment variables read by `EngineConfig::from_env`.

use sloe_chess::{ChessGame, ChessResult, EngineConfig};

fn main() -> ChessResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sloe_chess=info".into()),
        )
        .init();

    let max_plies: usize = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(60);

    let config = EngineConfig::from_env();
    tracing::info!(?config, max_plies, "starting self-play");
    let mut game = ChessGame::new(config);

    while !game.is_game_over() && game.move_history().len() < max_plies {
        let mv = game.play_engine_move()?;
        tracing::debug!(ply = game.move_history().len(), %mv, "engine move");
    }

    let moves: Vec<String> = game
        .move_history()
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| {
            let text: Vec<&str> = pair
                .iter()
                .map(|m| m.notation.as_deref().unwrap_or("?"))
                .collect();
            format!("{}. {}", i + 1, text.join(" "))
        })
        .collect();
    println!("{}", moves.join(" "));
    println!("result: {}", game.status());
    Ok(())
}
