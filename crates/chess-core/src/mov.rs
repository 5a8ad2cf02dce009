//! Move notation.
//!
//! Board moves are written `<from><to>` with an optional promotion letter
//! (`e7e8q`). Drops from a crazyhouse pocket are written `@<letter><to>`
//! (`@Nf3`); the letter is case-insensitive on input and uppercase on output.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::{PieceKind, Square};

/// Errors from parsing move notation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("invalid move length: {0:?}")]
    InvalidLength(String),

    #[error("invalid square in move {0:?}")]
    InvalidSquare(String),

    #[error("invalid piece letter '{0}'")]
    InvalidPiece(char),
}

/// A move as written by a player.
///
/// A `Move` carries no position context; whether it is legal, and what it
/// does on the board, is decided by the engine.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Move {
    /// A piece moves from one square to another, optionally promoting.
    Normal {
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    },
    /// A pocket piece is placed on an empty square.
    Drop { kind: PieceKind, to: Square },
}

impl Move {
    /// Creates a non-promoting board move.
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Move::Normal {
            from,
            to,
            promotion: None,
        }
    }

    /// Creates a promoting board move.
    #[inline]
    pub const fn promote(from: Square, to: Square, kind: PieceKind) -> Self {
        Move::Normal {
            from,
            to,
            promotion: Some(kind),
        }
    }

    /// Creates a drop.
    #[inline]
    pub const fn drop(kind: PieceKind, to: Square) -> Self {
        Move::Drop { kind, to }
    }

    /// Origin square, or `None` for drops.
    #[inline]
    pub const fn from(self) -> Option<Square> {
        match self {
            Move::Normal { from, .. } => Some(from),
            Move::Drop { .. } => None,
        }
    }

    /// Destination square.
    #[inline]
    pub const fn to(self) -> Square {
        match self {
            Move::Normal { to, .. } | Move::Drop { to, .. } => to,
        }
    }

    /// Promotion kind, if any.
    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        match self {
            Move::Normal { promotion, .. } => promotion,
            Move::Drop { .. } => None,
        }
    }

    #[inline]
    pub const fn is_drop(self) -> bool {
        matches!(self, Move::Drop { .. })
    }

    /// Parses move notation.
    pub fn parse(s: &str) -> Result<Self, MoveParseError> {
        if let Some(rest) = s.strip_prefix('@') {
            let mut chars = rest.chars();
            let letter = chars
                .next()
                .ok_or_else(|| MoveParseError::InvalidLength(s.to_string()))?;
            let kind = PieceKind::from_letter(letter).ok_or(MoveParseError::InvalidPiece(letter))?;
            let to = Square::from_algebraic(chars.as_str())
                .ok_or_else(|| MoveParseError::InvalidSquare(s.to_string()))?;
            return Ok(Move::Drop { kind, to });
        }

        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(MoveParseError::InvalidLength(s.to_string()));
        }
        let from = Square::from_algebraic(&s[0..2])
            .ok_or_else(|| MoveParseError::InvalidSquare(s.to_string()))?;
        let to = Square::from_algebraic(&s[2..4])
            .ok_or_else(|| MoveParseError::InvalidSquare(s.to_string()))?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match PieceKind::from_letter(c) {
                Some(PieceKind::Pawn) | None => return Err(MoveParseError::InvalidPiece(c)),
                Some(kind) => Some(kind),
            },
        };
        Ok(Move::Normal {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Move::Normal {
                from,
                to,
                promotion,
            } => {
                write!(f, "{}{}", from, to)?;
                if let Some(kind) = promotion {
                    write!(f, "{}", kind.letter())?;
                }
                Ok(())
            }
            Move::Drop { kind, to } => {
                write!(f, "@{}{}", kind.letter().to_ascii_uppercase(), to)
            }
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self)
    }
}

impl std::str::FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::parse(s)
    }
}

impl TryFrom<String> for Move {
    type Error = MoveParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Move::parse(&s)
    }
}

impl From<Move> for String {
    fn from(mv: Move) -> String {
        mv.to_string()
    }
}
