//! Core types for chess and its variants.
//!
//! This crate provides the position-independent vocabulary used by the
//! rules engine:
//! - [`PieceKind`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] for move notation, including crazyhouse drops
//! - FEN tokenizing and serialization, including variant extensions

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenParser, PlacedPiece};
pub use mov::{Move, MoveParseError};
pub use piece::PieceKind;
pub use square::{File, Rank, Square};
