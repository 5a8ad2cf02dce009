//! Three-check: a king that has been checked three times loses.

use chess_core::Color;

use super::{standard_termination, Evaluation, GameResult, SetupRules, Variant, VariantKind, WinReason};
use crate::Position;

/// Checks that end the game.
const CHECKS_TO_LOSE: u8 = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreeCheck;

impl Variant for ThreeCheck {
    fn kind(&self) -> VariantKind {
        VariantKind::ThreeCheck
    }

    fn starting_fen(&self) -> &'static str {
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 +0+0"
    }

    fn setup(&self) -> SetupRules {
        SetupRules {
            checks: true,
            ..SetupRules::STANDARD
        }
    }

    fn after_move(&self, _before: &Position, after: &mut Position) {
        let checked = after.turn;
        if after.is_king_attacked(checked) {
            let counter = &mut after.checks[checked.index()];
            *counter = counter.saturating_add(1);
        }
    }

    fn evaluate(&self, ctx: &Evaluation<'_>) -> Option<GameResult> {
        let loser = Color::ALL
            .into_iter()
            .find(|color| ctx.position.checks[color.index()] >= CHECKS_TO_LOSE);
        if let Some(loser) = loser {
            return Some(GameResult::win(loser.opposite(), WinReason::ThreeChecks));
        }
        standard_termination(ctx, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Move;

    #[test]
    fn giving_check_counts() {
        let position = ThreeCheck
            .decode_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1 +1+0")
            .unwrap();
        let next = ThreeCheck
            .make_move(&position, Move::parse("a1a8").unwrap())
            .unwrap();
        assert_eq!(next.checks[Color::Black.index()], 2);
        assert_eq!(ThreeCheck.encode_fen(&next), "R3k3/8/8/8/8/8/8/4K3 b - - 1 1 +2+0");

        // a quiet move leaves the counters alone
        let next = ThreeCheck
            .make_move(&position, Move::parse("a1a2").unwrap())
            .unwrap();
        assert_eq!(next.checks, [0, 1]);
    }

    #[test]
    fn third_check_wins() {
        let position = ThreeCheck
            .decode_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1 +2+0")
            .unwrap();
        let next = ThreeCheck
            .make_move(&position, Move::parse("a1a8").unwrap())
            .unwrap();
        let moves = ThreeCheck.legal_moves(&next);
        let result = ThreeCheck.evaluate(&Evaluation {
            position: &next,
            legal_moves: &moves,
            repetitions: 1,
        });
        assert_eq!(result, Some(GameResult::win(Color::White, WinReason::ThreeChecks)));
    }
}
