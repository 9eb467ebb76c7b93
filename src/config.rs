//! Engine configuration with environment overrides.

use std::time::Duration;

/// Search and session tuning knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Depth used by `ChessGame::play_engine_move` when no depth is given.
    pub search_depth: u8,
    /// Soft wall-clock budget for one iterative-deepening run.
    pub time_limit: Duration,
    /// Extra capture-only plies searched below the nominal horizon.
    pub quiescence_depth: u8,
    /// The opening book is consulted while the move history is shorter than this.
    pub opening_book_plies: usize,
    /// Root moves scoring within this many centipawns of the best are candidates.
    pub near_best_tolerance: i32,
    /// Fixed RNG seed for reproducible move selection.
    pub rng_seed: Option<u64>,
    /// The transposition cache is flushed once it holds this many entries.
    pub transposition_capacity: usize,
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        EngineConfig {
            search_depth: env_parse("SLOE_SEARCH_DEPTH").unwrap_or(defaults.search_depth),
            time_limit: env_parse::<u64>("SLOE_TIME_LIMIT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.time_limit),
            quiescence_depth: env_parse("SLOE_QUIESCENCE_DEPTH")
                .unwrap_or(defaults.quiescence_depth),
            opening_book_plies: env_parse("SLOE_BOOK_PLIES").unwrap_or(defaults.opening_book_plies),
            near_best_tolerance: env_parse("SLOE_NEAR_BEST_TOLERANCE")
                .unwrap_or(defaults.near_best_tolerance),
            rng_seed: env_parse("SLOE_SEED"),
            transposition_capacity: env_parse("SLOE_TT_CAPACITY")
                .unwrap_or(defaults.transposition_capacity),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            search_depth: 3,
            time_limit: Duration::from_secs(5),
            quiescence_depth: 4,
            opening_book_plies: 10,
            near_best_tolerance: 20,
            rng_seed: None,
            transposition_capacity: 1 << 20,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
