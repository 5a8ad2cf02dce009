//! Crazyhouse: captured pieces change sides and can be dropped back on
//! the board.

use chess_core::Color;

use super::{standard_termination, Evaluation, GameResult, SetupRules, Variant, VariantKind};
use crate::material;
use crate::movegen::PieceRules;
use crate::Position;

#[derive(Debug, Clone, Copy, Default)]
pub struct Crazyhouse;

impl Variant for Crazyhouse {
    fn kind(&self) -> VariantKind {
        VariantKind::Crazyhouse
    }

    fn starting_fen(&self) -> &'static str {
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR/ w KQkq - 0 1"
    }

    fn piece_rules(&self) -> PieceRules {
        PieceRules {
            drops: true,
            ..PieceRules::STANDARD
        }
    }

    fn setup(&self) -> SetupRules {
        SetupRules {
            pockets: true,
            ..SetupRules::STANDARD
        }
    }

    /// Material is never insufficient while a pocket holds a piece.
    fn evaluate(&self, ctx: &Evaluation<'_>) -> Option<GameResult> {
        let pockets_empty = ctx.position.pockets.iter().all(|p| p.is_empty());
        standard_termination(ctx, pockets_empty)
    }

    fn can_force_mate(&self, position: &Position, color: Color) -> bool {
        !position.pockets[color.index()].is_empty() || material::can_mate(position, color)
    }
}
