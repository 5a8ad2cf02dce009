//! Random playouts: structural invariants hold in every reachable position.

use chess_core::{Color, PieceKind};
use chess_variants::{Board, GameStatus, VariantKind};
use proptest::prelude::*;

fn any_variant() -> impl Strategy<Value = VariantKind> {
    proptest::sample::select(VariantKind::ALL.to_vec())
}

/// Plays up to `choices.len()` moves, picking each by index into the legal
/// move list, and checks the invariants after every move.
fn playout(kind: VariantKind, choices: &[usize]) -> Result<(), TestCaseError> {
    let mut board = Board::new(kind).unwrap();
    for &choice in choices {
        let moves = board.legal_moves();
        if moves.is_empty() {
            prop_assert!(board.is_over());
            break;
        }
        let mv = moves[choice % moves.len()];
        let status = board.play(&mv.to_string());
        prop_assert!(status.is_ok(), "{} rejected {}", kind, mv);

        // FEN survives a decode/encode cycle
        let fen = board.to_fen();
        let reloaded = Board::from_fen(kind, &fen);
        prop_assert!(reloaded.is_ok(), "{} failed to reload {}", kind, fen);
        if let Ok(reloaded) = reloaded {
            prop_assert_eq!(reloaded.to_fen(), fen);
        }

        // the piece list is the cell array
        let pieces = board.pieces();
        let mut squares: Vec<_> = pieces.iter().map(|p| p.square).collect();
        squares.dedup();
        prop_assert_eq!(squares.len(), pieces.len());
        for piece in &pieces {
            let cell = board.position().piece_at(piece.square);
            prop_assert_eq!(cell.map(|c| (c.kind, c.color)), Some((piece.kind, piece.color)));
        }

        // royal kings are never captured
        let kings = |color| {
            pieces
                .iter()
                .filter(|p| p.kind == PieceKind::King && p.color == color)
                .count()
        };
        match kind {
            VariantKind::Antichess => {}
            VariantKind::Horde => {
                prop_assert_eq!(kings(Color::White), 0);
                prop_assert_eq!(kings(Color::Black), 1);
            }
            _ => {
                prop_assert_eq!(kings(Color::White), 1);
                prop_assert_eq!(kings(Color::Black), 1);
            }
        }

        // the side that just moved never stands in check
        if board.variant() != VariantKind::Antichess {
            let mover = board.turn().opposite();
            prop_assert!(!board.position().is_king_attacked(mover));
        }

        if let Ok(GameStatus::Over(_)) = status {
            prop_assert!(board.legal_moves().is_empty());
            break;
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_playouts_keep_invariants(
        kind in any_variant(),
        choices in proptest::collection::vec(any::<usize>(), 0..60),
    ) {
        playout(kind, &choices)?;
    }

    #[test]
    fn illegal_input_never_changes_the_board(
        kind in any_variant(),
        junk in "[a-h@][1-8A-Z][a-h][1-8][qrbnk]?",
    ) {
        let mut board = Board::new(kind).unwrap();
        let before = board.to_fen();
        if board.play(&junk).is_err() {
            prop_assert_eq!(board.to_fen(), before);
            prop_assert!(board.move_history().is_empty());
        }
    }
}
