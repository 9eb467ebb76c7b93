//! Game session: the public face of the engine.
//!
//! `ChessGame` owns the live position, the move history, the search caches
//! and the RNG. Callers submit moves, resolve promotions, and ask the engine
//! for a move; every rejected request leaves the session untouched and is
//! reported to the diagnostic sink.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::EngineConfig;
use crate::diagnostics::{DiagnosticSink, Severity, TracingSink};
use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::*;
use crate::game_state::game_status::{evaluate_status, next_status, GameStatus};
use crate::move_generation::legal_move_apply::{apply_move, resolve_promotion};
use crate::move_generation::legal_move_checks::is_legal;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::search::board_scoring::{BoardScorer, EvaluationContext, HeuristicScorer};
use crate::search::iterative_deepening::SearchLimits;
use crate::search::killer_moves::KillerMoves;
use crate::search::minimax::Searcher;
use crate::search::repetition::RepetitionCounts;
use crate::search::transposition_table::TranspositionTable;
use crate::tables::opening_book::OpeningBook;
use crate::utils::algebraic::{append_check_suffix, append_promotion, base_notation};

pub struct ChessGame {
    position: Position,
    status: GameStatus,
    history: Vec<Move>,
    repetitions: RepetitionCounts,
    transpositions: TranspositionTable,
    killers: KillerMoves,
    scorer: Box<dyn BoardScorer>,
    book: OpeningBook,
    config: EngineConfig,
    rng: StdRng,
    sink: Box<dyn DiagnosticSink>,
    suggested_promotion: Option<PieceKind>,
}

impl ChessGame {
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            position: Position::starting(),
            status: GameStatus::default(),
            history: Vec::new(),
            repetitions: RepetitionCounts::new(),
            transpositions: TranspositionTable::with_capacity(config.transposition_capacity),
            killers: KillerMoves::new(),
            scorer: Box::new(HeuristicScorer),
            book: OpeningBook::load_default(),
            config,
            rng,
            sink: Box::new(TracingSink),
            suggested_promotion: None,
        }
    }

    /// Start from an arbitrary position. The history starts empty.
    pub fn from_fen(fen: &str, config: EngineConfig) -> ChessResult<Self> {
        let position = Position::from_fen(fen)?;
        let mut game = Self::new(config);
        game.position = position;
        game.status = evaluate_status(&game.position);
        Ok(game)
    }

    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn with_scorer(mut self, scorer: impl BoardScorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    pub fn with_book(mut self, book: OpeningBook) -> Self {
        self.book = book;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position.piece_at(square)
    }

    /// Every square from a8 to h1 with its occupant.
    pub fn board(&self) -> impl Iterator<Item = (Square, Option<Piece>)> + '_ {
        Square::all().map(|square| (square, self.position.piece_at(square)))
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_in_check(&self) -> bool {
        self.status.is_in_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.status.is_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.status.is_stalemate()
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn move_history(&self) -> &[Move] {
        &self.history
    }

    /// How often each move has been played this game, per mover.
    pub fn repetitions(&self) -> &RepetitionCounts {
        &self.repetitions
    }

    /// Static score of the live position from White's view, repetition
    /// penalties of the game so far included.
    pub fn evaluate(&self) -> i32 {
        self.scorer.score(
            &self.position,
            &EvaluationContext {
                history_len: self.history.len(),
                repetitions: &self.repetitions,
            },
        )
    }

    pub fn is_promotion_pending(&self) -> bool {
        self.position.pending_promotion.is_some()
    }

    /// Promotion piece the last search preferred for its best move.
    pub fn suggested_promotion(&self) -> Option<PieceKind> {
        self.suggested_promotion
    }

    /// Legal moves for the side to move; empty once the game is over or
    /// while a promotion is unresolved.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_game_over() || self.is_promotion_pending() {
            return Vec::new();
        }
        generate_legal_moves(&self.position)
    }

    pub fn submit_move(&mut self, mv: &Move) -> ChessResult<()> {
        if self.is_game_over() {
            self.report(Severity::Error, &format!("Move {mv} rejected: the game is over"));
            return Err(ChessError::GameOver);
        }
        if let Some(square) = self.position.pending_promotion {
            self.report(
                Severity::Error,
                &format!("Move {mv} rejected: promotion on {square} is pending"),
            );
            return Err(ChessError::PromotionPending(square.to_string()));
        }

        let mover = self.position.side_to_move;
        if !is_legal(&self.position, mv, mover) {
            self.report(Severity::Error, &format!("Invalid move attempted: {mv}"));
            return Err(ChessError::IllegalMove(mv.coords()));
        }

        let notation = base_notation(&self.position, mv);
        apply_move(&mut self.position, mv)?;
        self.repetitions.record(mv, mover);
        self.history.push(mv.coords().with_notation(notation));
        self.suggested_promotion = None;

        if let Some(square) = self.position.pending_promotion {
            self.report(Severity::Info, &format!("Pawn promotion pending on {square}"));
            return Ok(());
        }
        self.finish_turn();
        Ok(())
    }

    /// Replace the pending pawn. Returns false, changing nothing, when no
    /// promotion is pending or `kind` is not a promotion piece.
    pub fn resolve_promotion(&mut self, kind: PieceKind) -> bool {
        if !resolve_promotion(&mut self.position, kind) {
            return false;
        }
        if let Some(notation) = self.history.last_mut().and_then(|m| m.notation.as_mut()) {
            append_promotion(notation, kind);
        }
        self.finish_turn();
        true
    }

    /// Best move for the side to move, searching `depth` plies.
    ///
    /// Early in the game a legal opening-book move is returned without
    /// searching. Returns `None` when the game is over, a promotion is
    /// pending, or there is no legal move.
    pub fn get_best_move(&mut self, depth: u8) -> Option<Move> {
        if self.is_game_over() || self.is_promotion_pending() {
            return None;
        }
        self.suggested_promotion = None;

        if self.history.len() < self.config.opening_book_plies {
            let side = self.position.side_to_move;
            let book_move = self
                .book
                .choose_weighted_move(&self.position, &mut self.rng)
                .filter(|mv| is_legal(&self.position, mv, side))
                .cloned();
            if let Some(mv) = book_move {
                self.report(Severity::Info, &format!("Opening book move {mv}"));
                return Some(self.annotate(mv));
            }
        }

        let limits = SearchLimits {
            max_depth: depth,
            time_limit: self.config.time_limit,
            tolerance: self.config.near_best_tolerance,
        };
        let outcome = {
            let mut scratch = self.position;
            let mut searcher = Searcher::new(
                self.scorer.as_ref(),
                &mut self.transpositions,
                &mut self.killers,
                self.repetitions.clone(),
                self.history.len(),
                self.config.quiescence_depth,
            );
            searcher.iterative_deepening(&mut scratch, limits, &mut self.rng)
        };
        match outcome {
            Ok(result) => {
                tracing::info!(
                    depth = result.reached_depth,
                    score = result.best_score,
                    nodes = result.nodes,
                    "search finished"
                );
                self.suggested_promotion = result.promotion;
                result.best_move.map(|mv| self.annotate(mv))
            }
            Err(err) => {
                self.report(Severity::Error, &format!("Search failed: {err}"));
                None
            }
        }
    }

    /// Search with the configured depth and play the result, promoting to
    /// the suggested piece (queen when none was suggested).
    pub fn play_engine_move(&mut self) -> ChessResult<Move> {
        if self.is_game_over() {
            return Err(ChessError::GameOver);
        }
        if let Some(square) = self.position.pending_promotion {
            return Err(ChessError::PromotionPending(square.to_string()));
        }

        let mv = self
            .get_best_move(self.config.search_depth)
            .ok_or(ChessError::NoLegalMoves)?;
        let promotion = self.suggested_promotion;
        self.submit_move(&mv)?;
        if self.is_promotion_pending() {
            self.resolve_promotion(promotion.unwrap_or(PieceKind::Queen));
        }
        self.history.last().cloned().ok_or(ChessError::NoLegalMoves)
    }

    /// Back to the initial position with empty history and cleared caches.
    pub fn reset(&mut self) {
        self.position = Position::starting();
        self.status = GameStatus::default();
        self.history.clear();
        self.repetitions.clear();
        self.transpositions.clear();
        self.killers.clear();
        self.suggested_promotion = None;
        self.report(Severity::Info, "New game started");
    }

    fn annotate(&self, mv: Move) -> Move {
        let notation = base_notation(&self.position, &mv);
        mv.coords().with_notation(notation)
    }

    fn finish_turn(&mut self) {
        self.status = next_status(self.status, &self.position);

        let gives_mate = matches!(self.status, GameStatus::Checkmate { .. });
        let gives_check = gives_mate || self.status.is_in_check();
        if let Some(notation) = self.history.last_mut().and_then(|m| m.notation.as_mut()) {
            append_check_suffix(notation, gives_check, gives_mate);
        }

        let side = self.position.side_to_move;
        match self.status {
            GameStatus::Ongoing { in_check: true } => {
                self.report(Severity::Warn, &format!("{} is in check!", side.name()));
            }
            GameStatus::Ongoing { in_check: false } => {}
            GameStatus::Checkmate { winner } => {
                self.report(
                    Severity::Success,
                    &format!("Checkmate! {} wins", winner.name()),
                );
            }
            GameStatus::Stalemate => self.report(Severity::Info, "Stalemate! The game is a draw"),
            GameStatus::DrawInsufficientMaterial => {
                self.report(Severity::Info, "Draw by insufficient material")
            }
            GameStatus::KingCaptured { winner } => {
                self.report(
                    Severity::Error,
                    &format!("King captured; {} wins", winner.name()),
                );
            }
        }
    }

    fn report(&mut self, severity: Severity, message: &str) {
        self.sink.record(severity, message);
    }
}

impl Default for ChessGame {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::diagnostics::MemorySink;
    use crate::utils::algebraic::parse_coordinate_move;

    fn mv(text: &str) -> Move {
        parse_coordinate_move(text).expect("test move should parse")
    }

    fn seeded() -> EngineConfig {
        EngineConfig::default()
            .with_seed(11)
            .with_time_limit(Duration::from_secs(30))
    }

    fn observed(game: ChessGame) -> (ChessGame, Arc<Mutex<MemorySink>>) {
        let sink = Arc::new(Mutex::new(MemorySink::new()));
        (game.with_sink(Arc::clone(&sink)), sink)
    }

    #[test]
    fn illegal_moves_are_rejected_without_mutation() {
        let (mut game, sink) = observed(ChessGame::new(seeded()));
        let before = *game.position();
        assert_eq!(game.submit_move(&mv("e2e5")), Err(ChessError::IllegalMove(mv("e2e5"))));
        assert_eq!(*game.position(), before);
        assert!(game.move_history().is_empty());
        let sink = sink.lock().expect("sink lock");
        assert!(sink.contains(Severity::Error, "Invalid move attempted"));
    }

    #[test]
    fn off_board_moves_are_rejected_without_panicking() {
        let (mut game, sink) = observed(ChessGame::new(seeded()));
        let before = *game.position();
        for wild in [
            Move::new(Square::new(8, 0), Square::new(5, 0)),
            Move::new(Square::new(6, 4), Square::new(6, 200)),
            Move::new(Square::new(255, 255), Square::new(0, 0)),
        ] {
            assert_eq!(game.submit_move(&wild), Err(ChessError::IllegalMove(wild.coords())));
        }
        assert_eq!(*game.position(), before);
        assert!(game.move_history().is_empty());
        assert_eq!(game.piece_at(Square::new(0, 9)), None);
        assert_eq!(game.piece_at(Square::new(9, 0)), None);
        let sink = sink.lock().expect("sink lock");
        assert!(sink.contains(Severity::Error, "Invalid move attempted: a?a3"));
    }

    #[test]
    fn history_records_notation_with_check_suffix() {
        let mut game = ChessGame::new(seeded());
        for text in ["e2e4", "f7f6", "d1h5"] {
            game.submit_move(&mv(text)).expect("legal move");
        }
        let notations: Vec<_> = game
            .move_history()
            .iter()
            .map(|m| m.notation.clone().unwrap_or_default())
            .collect();
        assert_eq!(notations, ["e4", "f6", "Qh5+"]);
        assert!(game.is_in_check());
        assert_eq!(game.side_to_move(), Color::Black);
    }

    #[test]
    fn promotion_blocks_moves_until_resolved() {
        let (mut game, sink) = observed(
            ChessGame::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1", seeded()).expect("FEN parses"),
        );
        game.submit_move(&mv("e7e8")).expect("push is legal");
        assert!(game.is_promotion_pending());
        assert!(game.legal_moves().is_empty());
        assert!(matches!(
            game.submit_move(&mv("a2a3")),
            Err(ChessError::PromotionPending(_))
        ));
        assert!(!game.resolve_promotion(PieceKind::King));

        assert!(game.resolve_promotion(PieceKind::Rook));
        assert!(!game.is_promotion_pending());
        assert_eq!(
            game.piece_at(Square::new(0, 4)),
            Some(Piece::new(PieceKind::Rook, Color::White))
        );
        assert_eq!(game.move_history()[0].notation.as_deref(), Some("e8=R"));
        assert!(!game.resolve_promotion(PieceKind::Queen));
        assert!(sink.lock().expect("sink lock").contains(Severity::Info, "promotion pending"));
    }

    #[test]
    fn checkmate_ends_the_game() {
        let (mut game, sink) = observed(ChessGame::new(seeded()));
        for text in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            game.submit_move(&mv(text)).expect("legal move");
        }
        assert!(game.is_checkmate());
        assert!(game.is_game_over());
        assert_eq!(game.status().winner(), Some(Color::Black));
        assert_eq!(game.move_history()[3].notation.as_deref(), Some("Qh4#"));
        assert_eq!(game.submit_move(&mv("a2a3")), Err(ChessError::GameOver));
        assert_eq!(game.get_best_move(2), None);
        assert!(sink.lock().expect("sink lock").contains(Severity::Success, "Black wins"));
    }

    #[test]
    fn book_moves_are_used_early() {
        let mut game = ChessGame::new(seeded()).with_book(
            OpeningBook::from_tsv_str("uci\tweight\ne2e4 e7e5\t1\n").expect("book parses"),
        );
        let best = game.get_best_move(3).expect("book move");
        assert_eq!(best, mv("e2e4"));
        assert_eq!(best.notation.as_deref(), Some("e4"));
    }

    #[test]
    fn engine_plays_and_promotes() {
        let mut game = ChessGame::from_fen(
            "8/4P3/8/8/8/8/k7/4K3 w - - 0 1",
            EngineConfig {
                search_depth: 1,
                ..seeded()
            },
        )
        .expect("FEN parses");
        let played = game.play_engine_move().expect("engine moves");
        assert_eq!(played, mv("e7e8"));
        assert_eq!(played.notation.as_deref(), Some("e8=Q"));
        assert_eq!(
            game.piece_at(Square::new(0, 4)),
            Some(Piece::new(PieceKind::Queen, Color::White))
        );
    }

    #[test]
    fn reset_restores_the_initial_position() {
        let mut game = ChessGame::new(seeded());
        game.submit_move(&mv("e2e4")).expect("legal move");
        game.reset();
        assert_eq!(*game.position(), Position::starting());
        assert!(game.move_history().is_empty());
        assert_eq!(game.status(), GameStatus::default());
        assert_eq!(game.legal_moves().len(), 20);
    }

    #[test]
    fn board_snapshot_covers_every_square() {
        let game = ChessGame::new(seeded());
        let board: Vec<_> = game.board().collect();
        assert_eq!(board.len(), 64);
        assert_eq!(board.iter().filter(|(_, p)| p.is_some()).count(), 32);
        assert_eq!(board[0], (Square::new(0, 0), Some(Piece::new(PieceKind::Rook, Color::Black))));
    }

    #[test]
    fn game_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<ChessGame>();
    }
}
