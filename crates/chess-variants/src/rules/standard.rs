//! Standard chess rules.

use super::{Variant, VariantKind};

/// Standard chess rules (FIDE).
///
/// Every [`Variant`] hook keeps its default:
/// - standard piece movement, castling, en passant and promotion
/// - moves may not leave the own king attacked
/// - checkmate, stalemate, fifty-move rule, threefold repetition and
///   insufficient material end the game
#[derive(Debug, Clone, Copy, Default)]
pub struct Standard;

impl Variant for Standard {
    fn kind(&self) -> VariantKind {
        VariantKind::Standard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::FenParser;

    #[test]
    fn initial_position() {
        let position = Standard.decode_fen(Standard.starting_fen()).unwrap();
        assert_eq!(Standard.encode_fen(&position), FenParser::STARTPOS);
        assert_eq!(Standard.legal_moves(&position).len(), 20);
    }

    #[test]
    fn pinned_piece_cannot_move() {
        // knight e2 is pinned by the rook on e8
        let position = Standard
            .decode_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1")
            .unwrap();
        let moves = Standard.legal_moves(&position);
        assert!(moves.iter().all(|m| m.from() != chess_core::Square::from_algebraic("e2")));
    }

    #[test]
    fn king_cannot_castle_into_check() {
        // g1 is covered by the bishop on c5
        let position = Standard
            .decode_fen("4k3/8/8/2b5/8/8/8/4K2R w K - 0 1")
            .unwrap();
        let moves = Standard.legal_moves(&position);
        assert!(!moves.iter().any(|m| m.to_string() == "e1g1"));
    }
}
