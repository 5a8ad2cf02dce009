//! King of the hill: bringing the king to the centre wins.

use chess_core::{Color, PieceKind, Square};

use super::{standard_termination, Evaluation, GameResult, Variant, VariantKind, WinReason};
use crate::Position;

const HILL: [Square; 4] = [Square::D4, Square::E4, Square::D5, Square::E5];

#[derive(Debug, Clone, Copy, Default)]
pub struct KingOfTheHill;

fn on_hill(position: &Position, color: Color) -> bool {
    HILL.iter().any(|&sq| {
        position
            .piece_at(sq)
            .is_some_and(|p| p.kind == PieceKind::King && p.color == color)
    })
}

impl Variant for KingOfTheHill {
    fn kind(&self) -> VariantKind {
        VariantKind::KingOfTheHill
    }

    fn evaluate(&self, ctx: &Evaluation<'_>) -> Option<GameResult> {
        let mover = ctx.position.turn.opposite();
        for color in [mover, mover.opposite()] {
            if on_hill(ctx.position, color) {
                return Some(GameResult::win(color, WinReason::KingOfTheHill));
            }
        }
        standard_termination(ctx, false)
    }

    /// A bare king can still walk to the hill.
    fn can_force_mate(&self, position: &Position, color: Color) -> bool {
        position.king_square(color).is_some()
    }
}
