//! Torpedo: pawns may advance two squares from any rank.

use super::{Variant, VariantKind};
use crate::movegen::{DoubleStep, PieceRules};

#[derive(Debug, Clone, Copy, Default)]
pub struct Torpedo;

impl Variant for Torpedo {
    fn kind(&self) -> VariantKind {
        VariantKind::Torpedo
    }

    fn piece_rules(&self) -> PieceRules {
        PieceRules {
            double_step: DoubleStep::AnyRank,
            ..PieceRules::STANDARD
        }
    }
}
