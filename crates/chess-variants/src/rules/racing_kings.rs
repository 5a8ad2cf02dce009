//! Racing kings: the first king to reach the eighth rank wins.
//!
//! Checks are illegal for both sides. If white reaches the goal first,
//! black still gets one move to draw by reaching it too.

use chess_core::{Color, Move, Rank};

use super::{
    keep_safe, king_on_rank, standard_termination, DrawReason, Evaluation, GameResult, Variant,
    VariantKind, WinReason,
};
use crate::movegen::{MoveOutcome, PieceRules};
use crate::Position;

#[derive(Debug, Clone, Copy, Default)]
pub struct RacingKings;

impl RacingKings {
    /// Whether the side to move has a legal king move onto the goal rank.
    fn can_reach_goal(position: &Position, legal_moves: &[Move]) -> bool {
        let Some(king) = position.king_square(position.turn) else {
            return false;
        };
        legal_moves
            .iter()
            .any(|m| m.from() == Some(king) && m.to().rank() == Rank::R8)
    }
}

impl Variant for RacingKings {
    fn kind(&self) -> VariantKind {
        VariantKind::RacingKings
    }

    fn starting_fen(&self) -> &'static str {
        "8/8/8/8/8/8/krbnNBRK/qrbnNBRQ w - - 0 1"
    }

    fn piece_rules(&self) -> PieceRules {
        PieceRules {
            castling: false,
            ..PieceRules::STANDARD
        }
    }

    /// Neither king may be attacked after the move.
    fn filter_legal(&self, position: &Position, candidates: Vec<(Move, MoveOutcome)>) -> Vec<Move> {
        keep_safe(self.piece_rules(), position, candidates, |next| {
            !next.is_king_attacked(Color::White) && !next.is_king_attacked(Color::Black)
        })
    }

    fn evaluate(&self, ctx: &Evaluation<'_>) -> Option<GameResult> {
        let position = ctx.position;
        let white = king_on_rank(position, Color::White, Rank::R8);
        let black = king_on_rank(position, Color::Black, Rank::R8);

        match (white, black) {
            (true, true) => Some(GameResult::draw(DrawReason::RaceDrawn)),
            (false, true) => Some(GameResult::win(Color::Black, WinReason::RaceWon)),
            (true, false) => {
                if position.turn == Color::Black && Self::can_reach_goal(position, ctx.legal_moves) {
                    None
                } else {
                    Some(GameResult::win(Color::White, WinReason::RaceWon))
                }
            }
            (false, false) => standard_termination(ctx, false),
        }
    }

    fn can_force_mate(&self, position: &Position, color: Color) -> bool {
        position.king_square(color).is_some()
    }
}
