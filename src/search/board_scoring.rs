//! Pluggable board evaluation interfaces and baseline implementations.
//!
//! Search remains modular by delegating static position scoring to this trait,
//! allowing alternate heuristics to be swapped without altering search code.
//! Every scorer reports from White's point of view: positive favors White.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::{is_in_check, is_square_attacked};
use crate::move_generation::legal_move_generator::count_legal_moves;
use crate::moves::movement_patterns::KING_STEPS;
use crate::search::repetition::RepetitionCounts;

/// Score of a side that has been checkmated, before mate-distance adjustment.
pub const MATE_SCORE: i32 = 999_999;
/// Ordinary scores are clamped into `[-SCORE_CLAMP, SCORE_CLAMP]`.
pub const SCORE_CLAMP: i32 = 20_000;

pub const CHECK_BONUS: i32 = 400;
pub const KING_SAFETY_BONUS: i32 = 200;
pub const KING_PRESSURE_BONUS: i32 = 40;
pub const PROMOTION_BONUS: i32 = 1500;
pub const REPETITION_PENALTY: i32 = 4000;
/// Bound on the total repetition term; stays well clear of mate scores.
pub const REPETITION_PENALTY_CAP: i32 = MATE_SCORE / 5;
pub const OPENING_PLIES: usize = 10;
pub const ENDGAME_MATERIAL: i32 = 2000;

#[inline]
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 0,
    }
}

/// Game-level inputs a position alone cannot provide.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Plies played so far, including hypothetical plies inside search.
    pub history_len: usize,
    pub repetitions: &'a RepetitionCounts,
}

impl EvaluationContext<'_> {
    #[inline]
    pub fn is_opening(&self) -> bool {
        self.history_len < OPENING_PLIES
    }
}

pub trait BoardScorer: Send + Sync {
    /// Score from White's point of view.
    fn score(&self, position: &Position, context: &EvaluationContext<'_>) -> i32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    #[inline]
    pub fn material_balance_white_minus_black(position: &Position) -> i32 {
        position
            .pieces()
            .map(|(_, p)| p.color.sign() * piece_value(p.kind))
            .sum()
    }
}

impl BoardScorer for MaterialScorer {
    fn score(&self, position: &Position, _context: &EvaluationContext<'_>) -> i32 {
        Self::material_balance_white_minus_black(position)
    }
}

/// Full heuristic evaluation used by the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl BoardScorer for HeuristicScorer {
    fn score(&self, position: &Position, context: &EvaluationContext<'_>) -> i32 {
        let opening = context.is_opening();
        let endgame = is_endgame(position);

        let side = position.side_to_move;
        let side_moves = count_legal_moves(position, side) as i32;
        let other_moves = count_legal_moves(position, side.opposite()) as i32;
        let in_check = is_in_check(position, side);
        let mated = in_check && side_moves == 0;

        let mut score = MaterialScorer::material_balance_white_minus_black(position);

        let per_move = if opening { 30 } else { 15 };
        score += side.sign() * (side_moves - other_moves) * per_move;

        score += piece_terms(position, opening, endgame);
        score += king_terms(position, opening, endgame);
        score += pawn_structure(position);

        if in_check {
            score -= side.sign() * CHECK_BONUS;
        }
        if mated {
            score -= side.sign() * MATE_SCORE;
        }

        if !mated {
            score = score.clamp(-SCORE_CLAMP, SCORE_CLAMP);
        }
        // Applied after the clamp so material still separates heavily repeated lines.
        score + repetition_penalty(context.repetitions)
    }
}

/// Non-king material on the board drops below the endgame threshold.
pub fn is_endgame(position: &Position) -> bool {
    let material: i32 = position.pieces().map(|(_, p)| piece_value(p.kind)).sum();
    material < ENDGAME_MATERIAL
}

#[inline]
fn is_center(square: Square) -> bool {
    (3..=4).contains(&square.row()) && (3..=4).contains(&square.col())
}

/// Center control, development, rook and knight activity, passed pawns and threats.
fn piece_terms(position: &Position, opening: bool, endgame: bool) -> i32 {
    let mut score = 0;
    for (square, piece) in position.pieces() {
        let sign = piece.color.sign();

        if is_center(square) {
            score += sign * if piece.kind == PieceKind::Pawn { 30 } else { 50 };
        }

        match piece.kind {
            PieceKind::Knight | PieceKind::Bishop if opening => {
                score += sign * if square.row() == piece.color.back_row() { -50 } else { 30 };
            }
            _ => {}
        }

        match piece.kind {
            PieceKind::Rook => {
                let open_file = !(0..8u8).any(|row| {
                    position
                        .piece_at(Square::new(row, square.col()))
                        .is_some_and(|p| p.kind == PieceKind::Pawn)
                });
                if open_file {
                    score += sign * 60;
                }
                let seventh = piece.color.promotion_row() as i8 - piece.color.pawn_direction();
                if endgame && square.row() as i8 == seventh {
                    score += sign * 50;
                }
            }
            PieceKind::Knight if is_center(square) => score += sign * 40,
            PieceKind::Pawn => score += sign * pawn_advancement(position, square, piece.color),
            _ => {}
        }

        if matches!(
            piece.kind,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        ) && is_square_attacked(position, square, piece.color.opposite())
        {
            score -= sign * piece_value(piece.kind) / 2;
        }
    }
    score
}

/// Passed-pawn and near-promotion bonuses for one pawn, from its owner's view.
fn pawn_advancement(position: &Position, square: Square, color: Color) -> i32 {
    let mut bonus = 0;
    let direction = color.pawn_direction();
    let enemy = color.opposite();

    let mut passed = true;
    let mut row = square.row() as i8 + direction;
    while (0..8).contains(&row) && passed {
        for d_col in -1..=1 {
            if position
                .piece_at_coords(row, square.col() as i8 + d_col)
                .is_some_and(|p| p.is(PieceKind::Pawn, enemy))
            {
                passed = false;
            }
        }
        row += direction;
    }
    if passed {
        let advanced = (square.row() as i32 - color.back_row() as i32).abs();
        bonus += 50 + advanced * 20;
    }

    let distance = (square.row() as i32 - color.promotion_row() as i32).abs();
    if distance <= 2 {
        bonus += PROMOTION_BONUS / (distance + 1);
    }
    bonus
}

/// King placement, castling prospects, pawn shield and pressure on the enemy king.
fn king_terms(position: &Position, opening: bool, endgame: bool) -> i32 {
    let mut score = 0;
    for color in [Color::White, Color::Black] {
        let Some(king) = position.king_square(color) else {
            continue;
        };
        let sign = color.sign();

        if endgame {
            let from_center = |coord: u8| if coord <= 3 { 3 - coord } else { coord - 4 };
            let distance = from_center(king.row()).max(from_center(king.col())) as i32;
            score -= sign * distance * 20;
        } else {
            if opening && king.row() != color.back_row() {
                score -= sign * KING_SAFETY_BONUS;
            }
            if position.castling_rights.any(color) {
                score += sign * KING_SAFETY_BONUS;
            }
        }

        let shield = (-1..=1)
            .filter(|&d_col| {
                position
                    .piece_at_coords(king.row() as i8 + color.pawn_direction(), king.col() as i8 + d_col)
                    .is_some_and(|p| p.is(PieceKind::Pawn, color))
            })
            .count() as i32;
        score += sign * shield * 60;

        // Pieces of the other side crowding this king.
        let attacker = color.opposite();
        let crowding = KING_STEPS
            .iter()
            .filter_map(|&(d_row, d_col)| king.offset(d_row, d_col))
            .filter(|&sq| position.piece_at(sq).is_some_and(|p| p.color == attacker))
            .count() as i32;
        score += attacker.sign() * crowding * KING_PRESSURE_BONUS;
    }
    score
}

/// Doubled and isolated pawn penalties, each computed from its owner's view.
fn pawn_structure(position: &Position) -> i32 {
    let mut files = [[0i32; 8]; 2];
    for (square, piece) in position.pieces() {
        if piece.kind == PieceKind::Pawn {
            files[piece.color.index()][square.col() as usize] += 1;
        }
    }

    let mut score = 0;
    for color in [Color::White, Color::Black] {
        let counts = &files[color.index()];
        let mut penalty = 0;
        for col in 0..8 {
            if counts[col] > 1 {
                penalty += 50 * (counts[col] - 1);
            }
            let left = col > 0 && counts[col - 1] > 0;
            let right = col < 7 && counts[col + 1] > 0;
            if counts[col] > 0 && !left && !right {
                penalty += 40;
            }
        }
        score -= color.sign() * penalty;
    }
    score
}

/// Quadratic penalty against the color that keeps replaying the same move.
fn repetition_penalty(repetitions: &RepetitionCounts) -> i32 {
    repetitions
        .iter()
        .filter(|&(_, _, n)| n >= 2)
        .map(|(_, color, n)| {
            let excess = (n - 1) as i32;
            -color.sign() * REPETITION_PENALTY.saturating_mul(excess.saturating_mul(excess))
        })
        .fold(0i32, i32::saturating_add)
        .clamp(-REPETITION_PENALTY_CAP, REPETITION_PENALTY_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fen_generator::generate_fen;

    fn context(history_len: usize, repetitions: &RepetitionCounts) -> EvaluationContext<'_> {
        EvaluationContext {
            history_len,
            repetitions,
        }
    }

    /// Same position with colors swapped and the board flipped top to bottom.
    fn mirror(position: &Position) -> Position {
        let mut mirrored = Position::empty();
        for (square, piece) in position.pieces() {
            mirrored.set_piece(
                Square::new(7 - square.row(), square.col()),
                Some(Piece::new(piece.kind, piece.color.opposite())),
            );
        }
        mirrored.side_to_move = position.side_to_move.opposite();
        let rights = position.castling_rights;
        mirrored.castling_rights = CastlingRights {
            white_kingside: rights.black_kingside,
            white_queenside: rights.black_queenside,
            black_kingside: rights.white_kingside,
            black_queenside: rights.white_queenside,
        };
        mirrored.en_passant_target = position
            .en_passant_target
            .map(|sq| Square::new(7 - sq.row(), sq.col()));
        mirrored
    }

    #[test]
    fn starting_position_is_balanced() {
        let none = RepetitionCounts::new();
        let start = Position::starting();
        assert_eq!(HeuristicScorer.score(&start, &context(0, &none)), 0);
        assert_eq!(HeuristicScorer.score(&start, &context(20, &none)), 0);
        assert_eq!(MaterialScorer.score(&start, &context(0, &none)), 0);
    }

    #[test]
    fn material_scorer_counts_from_white() {
        let none = RepetitionCounts::new();
        let up_a_queen = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").expect("FEN should parse");
        assert_eq!(MaterialScorer.score(&up_a_queen, &context(30, &none)), 900);
        assert!(HeuristicScorer.score(&up_a_queen, &context(30, &none)) > 500);
    }

    #[test]
    fn evaluation_is_color_symmetric() {
        let none = RepetitionCounts::new();
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkb1r/pp2pppp/5n2/2pp4/3P4/2N1P3/PPP2PPP/R1BQKBNR b KQkq - 0 4",
            "8/1P6/8/8/8/8/5k2/K7 b - - 0 1",
        ] {
            let position = Position::from_fen(fen).expect("FEN should parse");
            let mirrored = mirror(&position);
            for history in [0, 40] {
                assert_eq!(
                    HeuristicScorer.score(&position, &context(history, &none)),
                    -HeuristicScorer.score(&mirrored, &context(history, &none)),
                    "asymmetric score for {} vs {}",
                    fen,
                    generate_fen(&mirrored)
                );
            }
        }
    }

    #[test]
    fn checkmate_dominates_everything() {
        let none = RepetitionCounts::new();
        let white_mated =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .expect("FEN should parse");
        assert!(HeuristicScorer.score(&white_mated, &context(4, &none)) < -MATE_SCORE + SCORE_CLAMP);
    }

    #[test]
    fn near_promotion_pawn_is_worth_more() {
        let none = RepetitionCounts::new();
        let far = Position::from_fen("4k3/8/8/8/8/8/P7/4K3 w - - 0 1").expect("FEN should parse");
        let near = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert!(
            HeuristicScorer.score(&near, &context(40, &none))
                > HeuristicScorer.score(&far, &context(40, &none)) + PROMOTION_BONUS / 2
        );
    }

    #[test]
    fn doubled_and_isolated_pawns_are_penalized() {
        let healthy = Position::from_fen("4k3/8/8/8/8/8/PP6/4K3 w - - 0 1").expect("FEN should parse");
        let doubled = Position::from_fen("4k3/8/8/8/8/P7/P7/4K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(pawn_structure(&healthy), 0);
        // One extra pawn on the a-file and an isolated a-file.
        assert_eq!(pawn_structure(&doubled), -90);
    }

    #[test]
    fn repeated_moves_depress_the_repeating_side() {
        let start = Position::starting();
        let shuffle = Move::new(Square::new(7, 6), Square::new(5, 5));
        let mut repetitions = RepetitionCounts::new();
        let base = HeuristicScorer.score(&start, &context(20, &repetitions));

        repetitions.record(&shuffle, Color::White);
        assert_eq!(HeuristicScorer.score(&start, &context(20, &repetitions)), base);

        repetitions.record(&shuffle, Color::White);
        let twice = HeuristicScorer.score(&start, &context(20, &repetitions));
        assert_eq!(twice, base - REPETITION_PENALTY);

        repetitions.record(&shuffle, Color::White);
        let thrice = HeuristicScorer.score(&start, &context(20, &repetitions));
        assert_eq!(thrice, base - 4 * REPETITION_PENALTY);

        let mut black_repeats = RepetitionCounts::new();
        for _ in 0..3 {
            black_repeats.record(&shuffle, Color::Black);
        }
        assert!(HeuristicScorer.score(&start, &context(20, &black_repeats)) > base);
    }

    #[test]
    fn material_still_counts_under_heavy_repetition() {
        let mut repetitions = RepetitionCounts::new();
        for (from, to) in [((7, 6), (5, 5)), ((5, 5), (7, 6)), ((7, 1), (5, 2))] {
            let shuffle = Move::new(Square::new(from.0, from.1), Square::new(to.0, to.1));
            for _ in 0..3 {
                repetitions.record(&shuffle, Color::White);
            }
        }
        let start = Position::starting();
        let queenless = Position::from_fen("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect("FEN should parse");

        let even = HeuristicScorer.score(&start, &context(20, &repetitions));
        let ahead = HeuristicScorer.score(&queenless, &context(20, &repetitions));
        assert_eq!(even, -12 * REPETITION_PENALTY);
        assert!(even < -SCORE_CLAMP);
        assert!(ahead > even + piece_value(PieceKind::Queen) / 2);
    }

    #[test]
    fn endless_repetition_never_reads_as_mate() {
        let shuffle = Move::new(Square::new(7, 6), Square::new(5, 5));
        let mut repetitions = RepetitionCounts::new();
        for _ in 0..40 {
            repetitions.record(&shuffle, Color::White);
        }
        let score = HeuristicScorer.score(&Position::starting(), &context(80, &repetitions));
        assert_eq!(score, -REPETITION_PENALTY_CAP);
        assert!(score.abs() < MATE_SCORE / 2);
    }
}
