//! FEN (Forsyth-Edwards Notation) parsing and serialization.
//!
//! Besides the six standard fields this tokenizer understands the two
//! variant extensions the engine emits:
//!
//! - a ninth `/` segment in the placement listing pocket pieces
//!   (`.../RNBQKBNR/Qpp w ...`), with `~` after a piece marking it as
//!   promoted;
//! - a trailing seventh field `+<black>+<white>` holding the number of
//!   checks each king has received.
//!
//! Whether an extension is allowed is decided by the engine, not here.

use thiserror::Error;

use crate::{Color, PieceKind, Square};

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 or 7 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),

    #[error("invalid pocket: {0}")]
    InvalidPocket(String),

    #[error("invalid check counters: {0}")]
    InvalidCheckCounters(String),
}

/// A piece as written in the placement field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacedPiece {
    pub kind: PieceKind,
    pub color: Color,
    /// Marked with `~`: the piece was a pawn once.
    pub promoted: bool,
}

/// Parsed FEN data.
///
/// This struct holds the tokenized FEN components. The engine is
/// responsible for checking that they describe a legal setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Board cells indexed a1 = 0 .. h8 = 63.
    pub board: [Option<PlacedPiece>; 64],
    /// Pocket segment, if the placement had a ninth segment.
    pub pocket: Option<Vec<(PieceKind, Color)>>,
    /// Side to move.
    pub active_color: Color,
    /// Castling availability (e.g., "KQkq", "-")
    pub castling: String,
    /// En passant target square
    pub en_passant: Option<Square>,
    /// Halfmove clock (for 50-move rule)
    pub halfmove_clock: u32,
    /// Fullmove number
    pub fullmove_number: u32,
    /// Checks received, indexed by [`Color::index`], if the field is present.
    pub checks: Option<[u8; 2]>,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() != 6 && parts.len() != 7 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let (board, pocket) = Self::parse_placement(parts[0])?;

        let active_color = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = parts[2];
        Self::validate_castling(castling)?;

        let en_passant = match parts[3] {
            "-" => None,
            ep => Some(
                Square::from_algebraic(ep)
                    .ok_or_else(|| FenError::InvalidEnPassantSquare(ep.to_string()))?,
            ),
        };

        let halfmove_clock = parts[4]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;

        let fullmove_number = parts[5]
            .parse::<u32>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;

        let checks = match parts.get(6) {
            Some(field) => Some(Self::parse_checks(field)?),
            None => None,
        };

        Ok(FenParser {
            board,
            pocket,
            active_color,
            castling: castling.to_string(),
            en_passant,
            halfmove_clock,
            fullmove_number,
            checks,
        })
    }

    #[allow(clippy::type_complexity)]
    fn parse_placement(
        placement: &str,
    ) -> Result<([Option<PlacedPiece>; 64], Option<Vec<(PieceKind, Color)>>), FenError> {
        let mut segments: Vec<&str> = placement.split('/').collect();
        let pocket = match segments.len() {
            8 => None,
            9 => segments.pop().map(Self::parse_pocket).transpose()?,
            n => {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "expected 8 ranks, got {}",
                    n
                )))
            }
        };

        let mut board: [Option<PlacedPiece>; 64] = [None; 64];
        for (i, segment) in segments.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            let mut last_was_piece = false;
            for c in segment.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file = file.saturating_add(skip as u8);
                    last_was_piece = false;
                } else if c == '~' {
                    let marked = file
                        .checked_sub(1)
                        .and_then(|f| Square::from_coords(f, rank))
                        .filter(|_| last_was_piece);
                    match marked {
                        Some(sq) => {
                            if let Some(piece) = board[sq.index() as usize].as_mut() {
                                piece.promoted = true;
                            }
                        }
                        None => {
                            return Err(FenError::InvalidPiecePlacement(format!(
                                "'~' without a piece in rank {}",
                                rank + 1
                            )))
                        }
                    }
                    last_was_piece = false;
                } else if let Some((kind, color)) = PieceKind::from_fen_char(c) {
                    let sq = Square::from_coords(file, rank).ok_or_else(|| {
                        FenError::InvalidPiecePlacement(format!(
                            "rank {} has more than 8 squares",
                            rank + 1
                        ))
                    })?;
                    board[sq.index() as usize] = Some(PlacedPiece {
                        kind,
                        color,
                        promoted: false,
                    });
                    file += 1;
                    last_was_piece = true;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        rank + 1
                    )));
                }
            }
            if file != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    rank + 1,
                    file
                )));
            }
        }

        Ok((board, pocket))
    }

    fn parse_pocket(segment: &str) -> Result<Vec<(PieceKind, Color)>, FenError> {
        segment
            .chars()
            .map(|c| match PieceKind::from_fen_char(c) {
                Some((PieceKind::King, _)) | None => {
                    Err(FenError::InvalidPocket(format!("invalid piece '{}'", c)))
                }
                Some(piece) => Ok(piece),
            })
            .collect()
    }

    fn parse_checks(field: &str) -> Result<[u8; 2], FenError> {
        let invalid = || FenError::InvalidCheckCounters(field.to_string());
        let mut counts = field.strip_prefix('+').ok_or_else(invalid)?.split('+');
        let black = counts.next().and_then(|n| n.parse::<u8>().ok());
        let white = counts.next().and_then(|n| n.parse::<u8>().ok());
        match (black, white, counts.next()) {
            (Some(black), Some(white), None) => {
                let mut checks = [0; 2];
                checks[Color::White.index()] = white;
                checks[Color::Black.index()] = black;
                Ok(checks)
            }
            _ => Err(invalid()),
        }
    }

    fn validate_castling(castling: &str) -> Result<(), FenError> {
        if castling == "-" {
            return Ok(());
        }

        let mut seen = String::new();
        for c in castling.chars() {
            if !"KQkq".contains(c) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "invalid character '{}'",
                    c
                )));
            }
            if seen.contains(c) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "duplicate '{}'",
                    c
                )));
            }
            seen.push(c);
        }

        Ok(())
    }

    /// Serializes the board cells (and pocket, if any) as a placement field.
    pub fn placement(&self) -> String {
        let mut out = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let piece = Square::from_coords(file, rank).and_then(|sq| self.board[sq.index() as usize]);
                match piece {
                    None => empty += 1,
                    Some(piece) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(piece.kind.to_fen_char(piece.color));
                        if piece.promoted {
                            out.push('~');
                        }
                    }
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }
        if let Some(pocket) = &self.pocket {
            out.push('/');
            out.extend(pocket.iter().map(|&(kind, color)| kind.to_fen_char(color)));
        }
        out
    }

    /// Converts the parsed FEN back to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = format!(
            "{} {} {} {} {} {}",
            self.placement(),
            self.active_color.fen_char(),
            self.castling,
            self.en_passant
                .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic()),
            self.halfmove_clock,
            self.fullmove_number
        );
        if let Some(checks) = self.checks {
            fen.push_str(&format!(
                " +{}+{}",
                checks[Color::Black.index()],
                checks[Color::White.index()]
            ));
        }
        fen
    }
}
