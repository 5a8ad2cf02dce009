//! Rule sets for chess and its variants.
//!
//! A [`Variant`] is chosen once, when a [`Board`](crate::Board) is created,
//! and the engine delegates every game-specific decision to it: the starting
//! position, how pieces move ([`PieceRules`]), which pseudo-legal moves are
//! legal, what happens after a move, and when the game ends.
//!
//! Every hook has a standard-chess default, so a variant only overrides
//! what it changes.

mod antichess;
mod crazyhouse;
mod horde;
mod king_of_the_hill;
mod no_castling;
mod racing_kings;
mod standard;
mod three_check;
mod torpedo;

pub use antichess::Antichess;
pub use crazyhouse::Crazyhouse;
pub use horde::Horde;
pub use king_of_the_hill::KingOfTheHill;
pub use no_castling::NoCastling;
pub use racing_kings::RacingKings;
pub use standard::Standard;
pub use three_check::ThreeCheck;
pub use torpedo::Torpedo;

use std::fmt;
use std::str::FromStr;

use chess_core::{Color, FenError, FenParser, Move, PieceKind, Rank};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::material;
use crate::movegen::{self, MoveOutcome, PieceRules};
use crate::Position;

/// How a side won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WinReason {
    Checkmate,
    Timeout,
    Resignation,
    /// Three checks given (three-check).
    ThreeChecks,
    /// King reached the centre (king of the hill).
    KingOfTheHill,
    /// King reached the eighth rank first (racing kings).
    RaceWon,
    /// Every white piece captured (horde).
    HordeDestroyed,
    /// The side to move has no legal moves (antichess).
    NoMovesLeft,
}

/// Why a game was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DrawReason {
    /// No legal moves but not in check.
    Stalemate,
    /// Neither side can ever mate.
    InsufficientMaterial,
    /// 100 half-moves without pawn move or capture.
    FiftyMoveRule,
    ThreefoldRepetition,
    Agreement,
    /// A flag fell, but the opponent could not have mated.
    TimeoutVsInsufficientMaterial,
    /// Both kings reached the eighth rank (racing kings).
    RaceDrawn,
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "kebab-case")]
pub enum GameResult {
    Decisive { winner: Color, reason: WinReason },
    Draw { reason: DrawReason },
    /// Stopped before a result was reached.
    Aborted,
}

impl GameResult {
    #[inline]
    pub const fn win(winner: Color, reason: WinReason) -> Self {
        GameResult::Decisive { winner, reason }
    }

    #[inline]
    pub const fn draw(reason: DrawReason) -> Self {
        GameResult::Draw { reason }
    }

    /// The winning side, if any.
    pub fn winner(self) -> Option<Color> {
        match self {
            GameResult::Decisive { winner, .. } => Some(winner),
            _ => None,
        }
    }

    pub fn is_draw(self) -> bool {
        matches!(self, GameResult::Draw { .. })
    }

    /// Score notation: `1-0`, `0-1`, `1/2-1/2`, or `*` for aborted games.
    pub fn score(self) -> &'static str {
        match self {
            GameResult::Decisive {
                winner: Color::White,
                ..
            } => "1-0",
            GameResult::Decisive {
                winner: Color::Black,
                ..
            } => "0-1",
            GameResult::Draw { .. } => "1/2-1/2",
            GameResult::Aborted => "*",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Decisive { winner, reason } => {
                write!(f, "{} ({} wins by {:?})", self.score(), winner, reason)
            }
            GameResult::Draw { reason } => write!(f, "{} (draw by {:?})", self.score(), reason),
            GameResult::Aborted => write!(f, "{} (aborted)", self.score()),
        }
    }
}

/// Status returned after every move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "kebab-case")]
pub enum GameStatus {
    Ongoing,
    Over(GameResult),
}

/// The supported variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariantKind {
    #[default]
    Standard,
    NoCastling,
    ThreeCheck,
    KingOfTheHill,
    RacingKings,
    Antichess,
    Horde,
    Torpedo,
    Crazyhouse,
}

impl VariantKind {
    pub const ALL: [VariantKind; 9] = [
        VariantKind::Standard,
        VariantKind::NoCastling,
        VariantKind::ThreeCheck,
        VariantKind::KingOfTheHill,
        VariantKind::RacingKings,
        VariantKind::Antichess,
        VariantKind::Horde,
        VariantKind::Torpedo,
        VariantKind::Crazyhouse,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            VariantKind::Standard => "standard",
            VariantKind::NoCastling => "no-castling",
            VariantKind::ThreeCheck => "three-check",
            VariantKind::KingOfTheHill => "king-of-the-hill",
            VariantKind::RacingKings => "racing-kings",
            VariantKind::Antichess => "antichess",
            VariantKind::Horde => "horde",
            VariantKind::Torpedo => "torpedo",
            VariantKind::Crazyhouse => "crazyhouse",
        }
    }

    /// The rule set for this variant.
    pub fn rules(self) -> Box<dyn Variant> {
        match self {
            VariantKind::Standard => Box::new(Standard),
            VariantKind::NoCastling => Box::new(NoCastling),
            VariantKind::ThreeCheck => Box::new(ThreeCheck),
            VariantKind::KingOfTheHill => Box::new(KingOfTheHill),
            VariantKind::RacingKings => Box::new(RacingKings),
            VariantKind::Antichess => Box::new(Antichess),
            VariantKind::Horde => Box::new(Horde),
            VariantKind::Torpedo => Box::new(Torpedo),
            VariantKind::Crazyhouse => Box::new(Crazyhouse),
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognised variant name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown variant {0:?}")]
pub struct UnknownVariant(pub String);

impl FromStr for VariantKind {
    type Err = UnknownVariant;

    /// Accepts the kebab-case name in any case, with `_` for `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        VariantKind::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// A FEN that parses but is not a valid setup for the variant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("{color} has {found} king(s), expected {expected}")]
    WrongKingCount {
        color: Color,
        expected: u8,
        found: usize,
    },

    #[error("this variant has no pockets")]
    PocketNotSupported,

    #[error("this variant has no check counters")]
    ChecksNotSupported,

    #[error("this variant has no promoted piece markers")]
    PromotedNotSupported,

    #[error("{0} king is attacked but it is not {0}'s move")]
    OpponentInCheck(Color),

    #[error("{0} pawn on its promotion rank")]
    PawnOnPromotionRank(Color),

    #[error("{0} pawn on its back rank")]
    PawnOnBackRank(Color),
}

/// What a valid setup looks like for a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupRules {
    /// Required number of kings per color; `None` allows any number.
    pub kings: [Option<u8>; 2],
    /// FEN carries a pocket segment.
    pub pockets: bool,
    /// FEN carries check counters.
    pub checks: bool,
    /// Pawns may stand on their own back rank.
    pub back_rank_pawns: bool,
}

impl SetupRules {
    pub const STANDARD: SetupRules = SetupRules {
        kings: [Some(1), Some(1)],
        pockets: false,
        checks: false,
        back_rank_pawns: false,
    };

    /// Checks a tokenized FEN and the position built from it.
    pub fn validate(&self, parsed: &FenParser, position: &Position) -> Result<(), SetupError> {
        if parsed.pocket.is_some() && !self.pockets {
            return Err(SetupError::PocketNotSupported);
        }
        if parsed.checks.is_some() && !self.checks {
            return Err(SetupError::ChecksNotSupported);
        }
        if !self.pockets && parsed.board.iter().flatten().any(|p| p.promoted) {
            return Err(SetupError::PromotedNotSupported);
        }

        for color in Color::ALL {
            if let Some(expected) = self.kings[color.index()] {
                let found = position.count(PieceKind::King, color);
                if found != expected as usize {
                    return Err(SetupError::WrongKingCount {
                        color,
                        expected,
                        found,
                    });
                }
            }
            if position.has_pawn_on(color, color.promotion_rank()) {
                return Err(SetupError::PawnOnPromotionRank(color));
            }
            if !self.back_rank_pawns && position.has_pawn_on(color, color.back_rank()) {
                return Err(SetupError::PawnOnBackRank(color));
            }
        }
        Ok(())
    }
}

impl Default for SetupRules {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// What a rule set sees when deciding whether the game is over.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation<'a> {
    pub position: &'a Position,
    /// Legal moves of the side to move.
    pub legal_moves: &'a [Move],
    /// How often the current position has occurred, this time included.
    pub repetitions: usize,
}

/// A chess variant.
///
/// Only [`kind`](Variant::kind) is required; the defaults implement
/// standard chess.
pub trait Variant: fmt::Debug + Send + Sync {
    fn kind(&self) -> VariantKind;

    fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn starting_fen(&self) -> &'static str {
        FenParser::STARTPOS
    }

    fn piece_rules(&self) -> PieceRules {
        PieceRules::STANDARD
    }

    fn setup(&self) -> SetupRules {
        SetupRules::STANDARD
    }

    /// Parses and validates a FEN for this variant.
    ///
    /// Castling rights without a king and rook at home are dropped. With
    /// royal kings, the side that just moved may not be left in check.
    fn decode_fen(&self, fen: &str) -> Result<Position, SetupError> {
        let parsed = FenParser::parse(fen)?;
        let mut position = Position::from_parsed(&parsed);
        self.setup().validate(&parsed, &position)?;
        let waiting = position.turn.opposite();
        if self.piece_rules().royal_king && position.is_king_attacked(waiting) {
            return Err(SetupError::OpponentInCheck(waiting));
        }
        position.sanitize_castling();
        if !self.piece_rules().castling {
            position.castling.remove_color(Color::White);
            position.castling.remove_color(Color::Black);
        }
        Ok(position)
    }

    fn encode_fen(&self, position: &Position) -> String {
        let setup = self.setup();
        position.to_parsed(setup.pockets, setup.checks).to_fen()
    }

    /// Keeps the pseudo-legal moves that are legal.
    ///
    /// By default a move is legal unless it leaves the mover's king
    /// attacked. A side without a king is never filtered.
    fn filter_legal(&self, position: &Position, candidates: Vec<(Move, MoveOutcome)>) -> Vec<Move> {
        let us = position.turn;
        keep_safe(self.piece_rules(), position, candidates, |next| {
            !next.is_king_attacked(us)
        })
    }

    /// Called with the position before and after every move.
    fn after_move(&self, _before: &Position, _after: &mut Position) {}

    /// Returns the result if the game is over.
    fn evaluate(&self, ctx: &Evaluation<'_>) -> Option<GameResult> {
        standard_termination(ctx, true)
    }

    /// Whether `color` could still win if the opponent ran out of time.
    fn can_force_mate(&self, position: &Position, color: Color) -> bool {
        material::can_mate(position, color)
    }

    /// All legal moves for the side to move.
    fn legal_moves(&self, position: &Position) -> Vec<Move> {
        let candidates = movegen::pseudo_legal(position, &self.piece_rules());
        let pseudo = candidates.len();
        let legal = self.filter_legal(position, candidates);
        trace!(variant = self.name(), pseudo, legal = legal.len(), "filtered moves");
        legal
    }

    /// Plays a move without checking legality, returning the new position,
    /// or `None` if the piece cannot make the move at all.
    fn make_move(&self, position: &Position, mv: Move) -> Option<Position> {
        let rules = self.piece_rules();
        let outcome = movegen::classify(position, &rules, mv);
        let mut next = position.clone();
        movegen::apply(&mut next, &rules, mv, outcome)?;
        self.after_move(position, &mut next);
        Some(next)
    }
}

/// Keeps each candidate whose resulting position satisfies `safe`.
pub(crate) fn keep_safe(
    rules: PieceRules,
    position: &Position,
    candidates: Vec<(Move, MoveOutcome)>,
    safe: impl Fn(&Position) -> bool,
) -> Vec<Move> {
    candidates
        .into_iter()
        .filter(|&(mv, outcome)| {
            let mut next = position.clone();
            movegen::apply(&mut next, &rules, mv, outcome).is_some() && safe(&next)
        })
        .map(|(mv, _)| mv)
        .collect()
}

/// Standard end-of-game checks, in order: no legal moves (checkmate or
/// stalemate), the fifty-move rule, threefold repetition and, when
/// `material_rule` is set, insufficient material.
pub fn standard_termination(ctx: &Evaluation<'_>, material_rule: bool) -> Option<GameResult> {
    let position = ctx.position;
    let us = position.turn;

    if ctx.legal_moves.is_empty() {
        return Some(if position.is_king_attacked(us) {
            GameResult::win(us.opposite(), WinReason::Checkmate)
        } else {
            GameResult::draw(DrawReason::Stalemate)
        });
    }
    if position.halfmove_clock >= 100 {
        return Some(GameResult::draw(DrawReason::FiftyMoveRule));
    }
    if ctx.repetitions >= 3 {
        return Some(GameResult::draw(DrawReason::ThreefoldRepetition));
    }
    if material_rule && material::is_dead(position) {
        return Some(GameResult::draw(DrawReason::InsufficientMaterial));
    }
    None
}

/// Returns true if the king of `color` stands on `rank`.
pub(crate) fn king_on_rank(position: &Position, color: Color, rank: Rank) -> bool {
    position
        .king_square(color)
        .is_some_and(|sq| sq.rank() == rank)
}
