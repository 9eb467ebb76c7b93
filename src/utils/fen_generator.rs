use crate::game_state::chess_types::*;

/// Full FEN for `position`. Clocks are not tracked, so they are always `0 1`.
pub fn generate_fen(position: &Position) -> String {
    format!(
        "{} {} {} {} 0 1",
        generate_board_field(position),
        generate_side_field(position.side_to_move),
        generate_castling_field(position.castling_rights),
        generate_en_passant_field(position.en_passant_target)
    )
}

pub fn generate_board_field(position: &Position) -> String {
    let mut out = String::with_capacity(72);

    for row in 0..8u8 {
        let mut empty_count = 0u8;

        for col in 0..8u8 {
            match position.piece_at(Square::new(row, col)) {
                Some(piece) => {
                    if empty_count > 0 {
                        out.push(char::from(b'0' + empty_count));
                        empty_count = 0;
                    }
                    out.push(piece.fen_char());
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }
        if row < 7 {
            out.push('/');
        }
    }

    out
}

pub fn generate_side_field(side: Color) -> &'static str {
    match side {
        Color::White => "w",
        Color::Black => "b",
    }
}

pub fn generate_castling_field(rights: CastlingRights) -> String {
    let mut out = String::with_capacity(4);
    if rights.white_kingside {
        out.push('K');
    }
    if rights.white_queenside {
        out.push('Q');
    }
    if rights.black_kingside {
        out.push('k');
    }
    if rights.black_queenside {
        out.push('q');
    }
    if out.is_empty() {
        out.push('-');
    }
    out
}

pub fn generate_en_passant_field(square: Option<Square>) -> String {
    square.map_or_else(|| "-".to_owned(), |sq| sq.to_string())
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::Position;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn starting_position_round_trips() {
        assert_eq!(generate_fen(&Position::starting()), STARTING_POSITION_FEN);
    }

    #[test]
    fn parsed_fen_regenerates() {
        let fen = "r3k2r/8/8/3pP3/8/8/8/R3K2R b Kq d6 0 1";
        let position = parse_fen(fen).expect("FEN should parse");
        assert_eq!(generate_fen(&position), fen);
    }
}
