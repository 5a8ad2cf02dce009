//! Rules engine for chess and eight of its variants.
//!
//! This crate provides:
//! - [`Position`] - board cells, pockets, check counters and FEN state
//! - [`movegen`] - per-piece candidate generation, move classification
//!   ([`MoveOutcome`]) and application
//! - [`Variant`] - rule sets: standard, no castling, three-check, king of
//!   the hill, racing kings, antichess, horde, torpedo and crazyhouse
//! - [`Board`] - a game in progress with repetition history and an
//!   optional [`Clock`]
//! - [`GameConfig`] - TOML game configuration
//!
//! # Example
//!
//! ```
//! use chess_variants::{Board, GameResult, GameStatus, VariantKind, WinReason};
//! use chess_core::Color;
//!
//! let mut board = Board::new(VariantKind::Standard).unwrap();
//! for mv in ["f2f3", "e7e5", "g2g4"] {
//!     assert_eq!(board.play(mv).unwrap(), GameStatus::Ongoing);
//! }
//! let status = board.play("d8h4").unwrap();
//! assert_eq!(
//!     status,
//!     GameStatus::Over(GameResult::win(Color::Black, WinReason::Checkmate))
//! );
//! ```

mod board;
mod clock;
mod config;
pub mod material;
pub mod movegen;
mod position;
pub mod rules;
mod zobrist;

pub use board::{Board, GameError};
pub use clock::{Clock, ClockError, TimeControl};
pub use config::{ConfigError, GameConfig};
pub use movegen::{Applied, DoubleStep, MoveOutcome, PieceRules};
pub use position::{CastlingRights, Piece, PieceView, Pocket, Position};
pub use rules::{
    DrawReason, Evaluation, GameResult, GameStatus, SetupError, SetupRules, UnknownVariant,
    Variant, VariantKind, WinReason,
};
pub use zobrist::{ZobristKeys, ZOBRIST};
