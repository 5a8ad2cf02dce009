//! Property tests for square, move and FEN notation.

use chess_core::{FenParser, Move, PieceKind, Square};
use proptest::prelude::*;

fn any_square() -> impl Strategy<Value = Square> {
    (0u8..64).prop_filter_map("square index", Square::from_index)
}

fn any_move() -> impl Strategy<Value = Move> {
    let promotion = proptest::option::of(proptest::sample::select(vec![
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::King,
    ]));
    let normal = (any_square(), any_square(), promotion).prop_map(|(from, to, promotion)| {
        Move::Normal {
            from,
            to,
            promotion,
        }
    });
    let drop = (proptest::sample::select(PieceKind::ALL.to_vec()), any_square())
        .prop_map(|(kind, to)| Move::drop(kind, to));
    prop_oneof![normal, drop]
}

proptest! {
    #[test]
    fn square_notation_is_bijective(sq in any_square()) {
        let text = sq.to_string();
        prop_assert_eq!(text.len(), 2);
        prop_assert_eq!(text.parse::<Square>(), Ok(sq));
        let (file, rank) = sq.coords();
        prop_assert_eq!(Square::from_coords(file, rank), Some(sq));
        prop_assert_eq!(sq.index(), rank * 8 + file);
    }

    #[test]
    fn move_notation_reparses(mv in any_move()) {
        prop_assert_eq!(Move::parse(&mv.to_string()), Ok(mv));
    }

    #[test]
    fn move_parser_never_panics(s in "\\PC{0,8}") {
        let _ = Move::parse(&s);
    }

    #[test]
    fn fen_parser_never_panics(s in "[1-9pnbrqkPNBRQK~/]{0,40} [wb] [KQkq-]{1,4} [a-h1-8-]{1,2} [0-9]{1,3} [0-9]{1,3}") {
        if let Ok(parsed) = FenParser::parse(&s) {
            let again = FenParser::parse(&parsed.to_fen());
            prop_assert!(again.is_ok());
        }
    }
}

#[test]
fn startpos_survives_reparse() {
    let parsed = FenParser::parse(FenParser::STARTPOS).unwrap();
    assert_eq!(parsed.to_fen(), FenParser::STARTPOS);
}
