//! A game in progress.
//!
//! [`Board`] owns the current [`Position`], the rule set chosen at
//! construction, the repetition history and an optional [`Clock`]. It is
//! mutated only through [`play`](Board::play) and the explicit game-ending
//! calls ([`resign`](Board::resign), [`offer_draw`](Board::offer_draw),
//! [`abort`](Board::abort), and the clock flag).

use std::cell::RefCell;

use chess_core::{Color, Move};
use thiserror::Error;
use tracing::{debug, info};

use crate::clock::{Clock, TimeControl};
use crate::position::{PieceView, Pocket, Position};
use crate::rules::{
    DrawReason, Evaluation, GameResult, GameStatus, SetupError, Variant, VariantKind, WinReason,
};
use crate::zobrist::ZOBRIST;

/// Error type for game operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    /// The move does not parse or is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("game has already ended")]
    GameAlreadyOver,
}

/// Legal moves are cached per (turn, full-move number, ply).
type CacheKey = (Color, u32, usize);

/// A chess game under one variant's rules.
///
/// A rejected move leaves the board unchanged. Once a result is set the
/// board is terminal.
#[derive(Debug)]
pub struct Board {
    variant: Box<dyn Variant>,
    position: Position,
    /// Zobrist keys of every position reached, the initial one included.
    history: Vec<u64>,
    moves: Vec<Move>,
    result: Option<GameResult>,
    clock: Option<Clock>,
    legal_cache: RefCell<Option<(CacheKey, Vec<Move>)>>,
}

impl Board {
    /// Creates a game from the variant's starting position.
    pub fn new(kind: VariantKind) -> Result<Self, SetupError> {
        let variant = kind.rules();
        let fen = variant.starting_fen();
        Self::with_rules(variant, fen)
    }

    /// Creates a game from an arbitrary position.
    ///
    /// The game may already be over, e.g. when the FEN is checkmate.
    pub fn from_fen(kind: VariantKind, fen: &str) -> Result<Self, SetupError> {
        Self::with_rules(kind.rules(), fen)
    }

    fn with_rules(variant: Box<dyn Variant>, fen: &str) -> Result<Self, SetupError> {
        let position = variant.decode_fen(fen)?;
        let mut board = Board {
            history: vec![ZOBRIST.key(&position)],
            variant,
            position,
            moves: Vec::new(),
            result: None,
            clock: None,
            legal_cache: RefCell::new(None),
        };
        board.evaluate();
        Ok(board)
    }

    /// Attaches a clock. It starts running on the first move.
    pub fn with_clock(mut self, control: TimeControl) -> Self {
        self.clock = Some(Clock::new(control));
        self
    }

    pub fn variant(&self) -> VariantKind {
        self.variant.kind()
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn turn(&self) -> Color {
        self.position.turn
    }

    pub fn clock(&self) -> Option<&Clock> {
        self.clock.as_ref()
    }

    fn cached_legal_moves(&self) -> Vec<Move> {
        let key = (
            self.position.turn,
            self.position.fullmove_number,
            self.moves.len(),
        );
        let mut cache = self.legal_cache.borrow_mut();
        if let Some((cached, moves)) = cache.as_ref() {
            if *cached == key {
                return moves.clone();
            }
        }
        let moves = self.variant.legal_moves(&self.position);
        *cache = Some((key, moves.clone()));
        moves
    }

    /// Legal moves for the side to move; empty once the game is over.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.result.is_some() {
            return Vec::new();
        }
        self.cached_legal_moves()
    }

    /// Returns true if `notation` is a legal move right now.
    pub fn can_play(&self, notation: &str) -> bool {
        match Move::parse(notation) {
            Ok(mv) => self.legal_moves().contains(&mv),
            Err(_) => false,
        }
    }

    /// Plays a move given in coordinate or drop notation.
    pub fn play(&mut self, notation: &str) -> Result<GameStatus, GameError> {
        if self.flag_check().is_some() {
            return Err(GameError::GameAlreadyOver);
        }

        let illegal = || GameError::IllegalMove(notation.to_string());
        let mv = Move::parse(notation).map_err(|_| illegal())?;
        if !self.cached_legal_moves().contains(&mv) {
            return Err(illegal());
        }
        let next = self.variant.make_move(&self.position, mv).ok_or_else(illegal)?;

        let mover = self.position.turn;
        self.position = next;
        self.legal_cache.get_mut().take();
        self.history.push(ZOBRIST.key(&self.position));
        self.moves.push(mv);
        if let Some(clock) = self.clock.as_mut() {
            clock.press(mover);
        }
        debug!(variant = self.variant.name(), %mv, fen = %self.to_fen(), "move played");

        self.evaluate();
        Ok(self.status())
    }

    /// Runs the termination checks, then polls the clock.
    fn evaluate(&mut self) {
        let moves = self.cached_legal_moves();
        let ctx = Evaluation {
            position: &self.position,
            legal_moves: &moves,
            repetitions: self.repetition_count(),
        };
        match self.variant.evaluate(&ctx) {
            Some(result) => self.finish(result),
            None => {
                self.flag_check();
            }
        }
    }

    fn finish(&mut self, result: GameResult) {
        self.result = Some(result);
        if let Some(clock) = self.clock.as_mut() {
            clock.stop();
        }
        info!(variant = self.variant.name(), %result, plies = self.moves.len(), "game over");
    }

    /// Polls the clock and ends the game if a flag has fallen.
    ///
    /// Returns the result if the game is over.
    pub fn flag_check(&mut self) -> Option<GameResult> {
        if self.result.is_some() {
            return self.result;
        }
        let flagged = self.clock.as_ref().and_then(Clock::flagged)?;
        let opponent = flagged.opposite();
        let result = if self.variant.can_force_mate(&self.position, opponent) {
            GameResult::win(opponent, WinReason::Timeout)
        } else {
            GameResult::draw(DrawReason::TimeoutVsInsufficientMaterial)
        };
        self.finish(result);
        self.result
    }

    fn end(&mut self, result: GameResult) -> Result<GameResult, GameError> {
        if self.flag_check().is_some() {
            return Err(GameError::GameAlreadyOver);
        }
        self.finish(result);
        Ok(result)
    }

    /// `color` resigns; the opponent wins.
    pub fn resign(&mut self, color: Color) -> Result<GameResult, GameError> {
        self.end(GameResult::win(color.opposite(), WinReason::Resignation))
    }

    /// Ends the game as a draw by agreement.
    pub fn offer_draw(&mut self) -> Result<GameResult, GameError> {
        self.end(GameResult::draw(DrawReason::Agreement))
    }

    /// Stops the game without a result.
    pub fn abort(&mut self) -> Result<GameResult, GameError> {
        self.end(GameResult::Aborted)
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    pub fn status(&self) -> GameStatus {
        match self.result {
            Some(result) => GameStatus::Over(result),
            None => GameStatus::Ongoing,
        }
    }

    pub fn to_fen(&self) -> String {
        self.variant.encode_fen(&self.position)
    }

    pub fn pieces(&self) -> Vec<PieceView> {
        self.position.pieces()
    }

    /// Moves played so far.
    pub fn move_history(&self) -> &[Move] {
        &self.moves
    }

    /// How often the current position has occurred, this time included.
    pub fn repetition_count(&self) -> usize {
        match self.history.last() {
            Some(current) => self.history.iter().filter(|&key| key == current).count(),
            None => 0,
        }
    }

    /// Returns true if the side to move has a royal king under attack.
    pub fn is_check(&self) -> bool {
        self.variant.piece_rules().royal_king && self.position.is_king_attacked(self.position.turn)
    }

    pub fn pockets(&self) -> &[Pocket; 2] {
        &self.position.pockets
    }

    /// Checks received by `color`'s king.
    pub fn checks_received(&self, color: Color) -> u8 {
        self.position.checks[color.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn new_game() {
        let board = Board::new(VariantKind::Standard).unwrap();
        assert!(!board.is_over());
        assert!(!board.is_check());
        assert_eq!(board.legal_moves().len(), 20);
        assert_eq!(board.repetition_count(), 1);
        assert_eq!(board.status(), GameStatus::Ongoing);
    }

    #[test]
    fn play_moves() {
        let mut board = Board::new(VariantKind::Standard).unwrap();
        assert_eq!(board.play("e2e4"), Ok(GameStatus::Ongoing));
        assert_eq!(board.turn(), Color::Black);
        assert_eq!(
            board.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        assert_eq!(board.move_history(), &[Move::parse("e2e4").unwrap()]);
    }

    #[test]
    fn illegal_move_leaves_board_unchanged() {
        let mut board = Board::new(VariantKind::Standard).unwrap();
        let before = board.to_fen();
        assert_eq!(
            board.play("e2e5"),
            Err(GameError::IllegalMove("e2e5".to_string()))
        );
        assert_eq!(
            board.play("nonsense"),
            Err(GameError::IllegalMove("nonsense".to_string()))
        );
        assert_eq!(board.to_fen(), before);
        assert!(board.move_history().is_empty());
        assert!(!board.can_play("e7e5"));
        assert!(board.can_play("g1f3"));
    }

    #[test]
    fn checkmate_fools_mate() {
        let mut board = Board::new(VariantKind::Standard).unwrap();
        board.play("f2f3").unwrap();
        board.play("e7e5").unwrap();
        board.play("g2g4").unwrap();
        let status = board.play("d8h4").unwrap();
        let mate = GameResult::win(Color::Black, WinReason::Checkmate);
        assert_eq!(status, GameStatus::Over(mate));
        assert!(board.is_check());
        assert!(board.legal_moves().is_empty());
        assert_eq!(board.play("a2a3"), Err(GameError::GameAlreadyOver));
    }

    #[test]
    fn game_over_from_fen() {
        let board = Board::from_fen(VariantKind::Standard, "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(board.result(), Some(GameResult::draw(DrawReason::Stalemate)));
    }

    #[test]
    fn resign_and_agree() {
        let mut board = Board::new(VariantKind::Standard).unwrap();
        assert_eq!(
            board.resign(Color::White),
            Ok(GameResult::win(Color::Black, WinReason::Resignation))
        );
        assert_eq!(board.offer_draw(), Err(GameError::GameAlreadyOver));

        let mut board = Board::new(VariantKind::Standard).unwrap();
        board.play("e2e4").unwrap();
        assert_eq!(board.offer_draw(), Ok(GameResult::draw(DrawReason::Agreement)));

        let mut board = Board::new(VariantKind::Standard).unwrap();
        assert_eq!(board.abort(), Ok(GameResult::Aborted));
        assert_eq!(board.play("e2e4"), Err(GameError::GameAlreadyOver));
    }

    #[test]
    fn threefold_repetition() {
        let mut board = Board::new(VariantKind::Standard).unwrap();
        for mv in ["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1"] {
            assert_eq!(board.play(mv), Ok(GameStatus::Ongoing), "{mv}");
        }
        assert_eq!(board.repetition_count(), 2);
        // startpos for the third time
        assert_eq!(
            board.play("f6g8"),
            Ok(GameStatus::Over(GameResult::draw(DrawReason::ThreefoldRepetition)))
        );
        assert_eq!(board.repetition_count(), 3);
    }

    #[test]
    fn cache_follows_the_position() {
        let mut board = Board::new(VariantKind::Standard).unwrap();
        let first = board.legal_moves();
        board.play("e2e4").unwrap();
        let second = board.legal_moves();
        assert_ne!(first, second);
        assert_eq!(second.len(), 20);
        assert!(second.iter().all(|m| m.from().is_some_and(|sq| sq.rank() >= chess_core::Rank::R7)));
    }

    fn sudden_death() -> TimeControl {
        TimeControl::new(Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    #[test]
    fn flag_fall_wins_for_opponent_with_material() {
        let mut board = Board::new(VariantKind::Standard)
            .unwrap()
            .with_clock(sudden_death());
        assert_eq!(board.flag_check(), None);

        // black's time starts at zero as soon as white moves
        let expected = GameResult::win(Color::White, WinReason::Timeout);
        assert_eq!(board.play("e2e4"), Ok(GameStatus::Over(expected)));
        assert_eq!(board.flag_check(), Some(expected));
        assert_eq!(board.play("e7e5"), Err(GameError::GameAlreadyOver));
        assert_eq!(board.resign(Color::Black), Err(GameError::GameAlreadyOver));
        assert!(board.legal_moves().is_empty());
        assert_eq!(board.move_history().len(), 1);

        let clock = board.clock().unwrap();
        assert_eq!(clock.active(), None);
        assert_eq!(clock.flagged(), Some(Color::Black));
    }

    #[test]
    fn flag_fall_against_bare_king_is_drawn() {
        let mut board = Board::from_fen(VariantKind::Standard, "4k3/8/8/8/8/8/8/R3K3 b - - 0 1")
            .unwrap()
            .with_clock(sudden_death());
        assert_eq!(
            board.play("e8d8"),
            Ok(GameStatus::Over(GameResult::draw(
                DrawReason::TimeoutVsInsufficientMaterial
            )))
        );
        assert_eq!(board.clock().and_then(Clock::flagged), Some(Color::White));
        assert_eq!(board.clock().and_then(Clock::active), None);
    }

    #[test]
    fn terminal_result_stops_clock() {
        let mut board = Board::new(VariantKind::Standard)
            .unwrap()
            .with_clock(TimeControl::new(Duration::from_secs(60), Duration::ZERO, Duration::ZERO));
        for mv in ["f2f3", "e7e5", "g2g4"] {
            assert_eq!(board.play(mv), Ok(GameStatus::Ongoing));
        }
        assert_eq!(board.clock().and_then(Clock::active), Some(Color::Black));
        board.play("d8h4").unwrap();
        assert!(board.is_over());
        let clock = board.clock().unwrap();
        assert_eq!(clock.active(), None);
        assert_eq!(clock.flagged(), None);
    }
}
