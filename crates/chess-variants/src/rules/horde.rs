//! Horde: thirty-six white pawns and no white king against a full black
//! army. Black wins by capturing every white piece.

use chess_core::Color;

use super::{standard_termination, Evaluation, GameResult, SetupRules, Variant, VariantKind, WinReason};
use crate::movegen::{DoubleStep, PieceRules};

#[derive(Debug, Clone, Copy, Default)]
pub struct Horde;

impl Variant for Horde {
    fn kind(&self) -> VariantKind {
        VariantKind::Horde
    }

    fn starting_fen(&self) -> &'static str {
        "rnbqkbnr/pppppppp/8/1PP2PP1/PPPPPPPP/PPPPPPPP/PPPPPPPP/PPPPPPPP w kq - 0 1"
    }

    fn piece_rules(&self) -> PieceRules {
        PieceRules {
            double_step: DoubleStep::HomeOrBackRank,
            ..PieceRules::STANDARD
        }
    }

    fn setup(&self) -> SetupRules {
        SetupRules {
            kings: [Some(0), Some(1)],
            back_rank_pawns: true,
            ..SetupRules::STANDARD
        }
    }

    fn evaluate(&self, ctx: &Evaluation<'_>) -> Option<GameResult> {
        if ctx.position.pieces_of(Color::White).next().is_none() {
            return Some(GameResult::win(Color::Black, WinReason::HordeDestroyed));
        }
        standard_termination(ctx, true)
    }
}
