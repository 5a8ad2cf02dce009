//! Standard chess without castling.

use super::{Variant, VariantKind};
use crate::movegen::PieceRules;

#[derive(Debug, Clone, Copy, Default)]
pub struct NoCastling;

impl Variant for NoCastling {
    fn kind(&self) -> VariantKind {
        VariantKind::NoCastling
    }

    fn starting_fen(&self) -> &'static str {
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1"
    }

    fn piece_rules(&self) -> PieceRules {
        PieceRules {
            castling: false,
            ..PieceRules::STANDARD
        }
    }
}
