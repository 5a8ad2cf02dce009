//! Antichess: lose all your pieces, or get stalemated, to win.
//!
//! Kings are ordinary pieces, capturing is compulsory and there is no
//! check.

use chess_core::{Color, Move, PieceKind};

use super::{standard_termination, Evaluation, GameResult, SetupRules, Variant, VariantKind, WinReason};
use crate::movegen::{DoubleStep, MoveOutcome, PieceRules};
use crate::Position;

#[derive(Debug, Clone, Copy, Default)]
pub struct Antichess;

impl Variant for Antichess {
    fn kind(&self) -> VariantKind {
        VariantKind::Antichess
    }

    fn starting_fen(&self) -> &'static str {
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1"
    }

    fn piece_rules(&self) -> PieceRules {
        PieceRules {
            castling: false,
            royal_king: false,
            drops: false,
            double_step: DoubleStep::HomeRank,
            promotions: &[
                PieceKind::Queen,
                PieceKind::Rook,
                PieceKind::Bishop,
                PieceKind::Knight,
                PieceKind::King,
            ],
        }
    }

    fn setup(&self) -> SetupRules {
        SetupRules {
            kings: [None, None],
            ..SetupRules::STANDARD
        }
    }

    /// Only captures are legal while any capture exists.
    fn filter_legal(&self, _position: &Position, candidates: Vec<(Move, MoveOutcome)>) -> Vec<Move> {
        let must_capture = candidates.iter().any(|(_, outcome)| outcome.is_capture());
        candidates
            .into_iter()
            .filter(|(_, outcome)| !must_capture || outcome.is_capture())
            .map(|(mv, _)| mv)
            .collect()
    }

    fn evaluate(&self, ctx: &Evaluation<'_>) -> Option<GameResult> {
        if ctx.legal_moves.is_empty() {
            return Some(GameResult::win(ctx.position.turn, WinReason::NoMovesLeft));
        }
        standard_termination(ctx, false)
    }

    /// Running out of pieces wins, so either side can always still win.
    fn can_force_mate(&self, _position: &Position, _color: Color) -> bool {
        true
    }
}
