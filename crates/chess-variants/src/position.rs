//! Board state: the 64 cells plus everything FEN records about a game.

use chess_core::{Color, FenParser, PieceKind, PlacedPiece, Rank, Square};
use serde::{Deserialize, Serialize};

use crate::movegen::attacks;

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates new castling rights from flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Parses the FEN castling field. The field is assumed to be validated.
    pub fn from_fen_field(field: &str) -> Self {
        let flags = field.chars().fold(0, |acc, c| {
            acc | match c {
                'K' => Self::WHITE_KINGSIDE,
                'Q' => Self::WHITE_QUEENSIDE,
                'k' => Self::BLACK_KINGSIDE,
                'q' => Self::BLACK_QUEENSIDE,
                _ => 0,
            }
        });
        CastlingRights::new(flags)
    }

    /// Renders the FEN castling field.
    pub fn fen_field(self) -> String {
        if self.0 == 0 {
            return "-".to_string();
        }
        [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ]
        .iter()
        .filter(|(flag, _)| self.0 & flag != 0)
        .map(|&(_, c)| c)
        .collect()
    }

    /// Returns true if the given side can castle kingside.
    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Returns true if the given side can castle queenside.
    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Removes castling rights for a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.remove_kingside(color);
        self.remove_queenside(color);
    }

    /// Removes kingside castling for a color.
    #[inline]
    pub fn remove_kingside(&mut self, color: Color) {
        let mask = match color {
            Color::White => !Self::WHITE_KINGSIDE,
            Color::Black => !Self::BLACK_KINGSIDE,
        };
        self.0 &= mask;
    }

    /// Removes queenside castling for a color.
    #[inline]
    pub fn remove_queenside(&mut self, color: Color) {
        let mask = match color {
            Color::White => !Self::WHITE_QUEENSIDE,
            Color::Black => !Self::BLACK_QUEENSIDE,
        };
        self.0 &= mask;
    }

    /// Clears the right tied to a rook corner, if `sq` is one.
    pub fn remove_for_corner(&mut self, sq: Square) {
        match sq {
            Square::H1 => self.remove_kingside(Color::White),
            Square::A1 => self.remove_queenside(Color::White),
            Square::H8 => self.remove_kingside(Color::Black),
            Square::A8 => self.remove_queenside(Color::Black),
            _ => {}
        }
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// A piece standing on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    /// Set when a pawn promoted into this piece.
    pub promoted: bool,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Piece {
            kind,
            color,
            promoted: false,
        }
    }
}

/// A piece together with the square it stands on, for front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceView {
    pub square: Square,
    pub kind: PieceKind,
    pub color: Color,
    pub promoted: bool,
}

/// Pieces in hand, counted per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pocket {
    counts: [u8; 6],
}

impl Pocket {
    /// Kinds in the order they are written in FEN.
    pub const FEN_ORDER: [PieceKind; 5] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Pawn,
    ];

    #[inline]
    pub fn count(&self, kind: PieceKind) -> u8 {
        self.counts[kind.index()]
    }

    pub fn add(&mut self, kind: PieceKind) {
        let slot = &mut self.counts[kind.index()];
        *slot = slot.saturating_add(1);
    }

    /// Removes one piece of `kind`; returns false if there was none.
    pub fn take(&mut self, kind: PieceKind) -> bool {
        let slot = &mut self.counts[kind.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&n| n == 0)
    }

    pub fn len(&self) -> usize {
        self.counts.iter().map(|&n| n as usize).sum()
    }

    /// Kinds that can currently be dropped.
    pub fn kinds(&self) -> impl Iterator<Item = PieceKind> + '_ {
        Self::FEN_ORDER
            .into_iter()
            .filter(move |&kind| self.count(kind) > 0)
    }
}

/// Complete game state for one position.
///
/// The cell array is the only storage of on-board pieces; piece lists are
/// derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    squares: [Option<Piece>; 64],

    /// The side to move.
    pub turn: Color,

    /// Castling rights.
    pub castling: CastlingRights,

    /// En passant target square (if any).
    pub en_passant: Option<Square>,

    /// Halfmove clock for 50-move rule.
    pub halfmove_clock: u32,

    /// Fullmove number (starts at 1, increments after Black's move).
    pub fullmove_number: u32,

    /// Pieces in hand, indexed by color.
    pub pockets: [Pocket; 2],

    /// Checks received by each color's king.
    pub checks: [u8; 2],
}

impl Position {
    /// Creates an empty position.
    pub fn empty() -> Self {
        Position {
            squares: [None; 64],
            turn: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            pockets: [Pocket::default(); 2],
            checks: [0; 2],
        }
    }

    /// Builds a position from tokenized FEN without checking the setup.
    pub fn from_parsed(parsed: &FenParser) -> Self {
        let mut position = Position::empty();
        for sq in Square::all() {
            let cell = sq.index() as usize;
            position.squares[cell] = parsed.board[cell].map(|p| Piece {
                kind: p.kind,
                color: p.color,
                promoted: p.promoted,
            });
        }
        for &(kind, color) in parsed.pocket.iter().flatten() {
            position.pockets[color.index()].add(kind);
        }
        position.turn = parsed.active_color;
        position.castling = CastlingRights::from_fen_field(&parsed.castling);
        position.en_passant = parsed.en_passant;
        position.halfmove_clock = parsed.halfmove_clock;
        position.fullmove_number = parsed.fullmove_number;
        position.checks = parsed.checks.unwrap_or_default();
        position
    }

    /// Converts back to tokenized FEN, emitting the pocket segment and
    /// the check field only when asked to. Promoted markers go with the
    /// pocket segment.
    pub fn to_parsed(&self, with_pocket: bool, with_checks: bool) -> FenParser {
        let mut board: [Option<PlacedPiece>; 64] = [None; 64];
        for (sq, piece) in self.occupied() {
            board[sq.index() as usize] = Some(PlacedPiece {
                kind: piece.kind,
                color: piece.color,
                promoted: with_pocket && piece.promoted,
            });
        }
        let pocket: Option<Vec<(PieceKind, Color)>> = with_pocket.then(|| {
            Color::ALL
                .iter()
                .flat_map(|&color| {
                    let pocket = self.pockets[color.index()];
                    Pocket::FEN_ORDER.into_iter().flat_map(move |kind| {
                        std::iter::repeat((kind, color)).take(pocket.count(kind) as usize)
                    })
                })
                .collect()
        });
        FenParser {
            board,
            pocket,
            active_color: self.turn,
            castling: self.castling.fen_field(),
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            checks: with_checks.then_some(self.checks),
        }
    }

    /// Returns the piece at the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index() as usize]
    }

    /// Places a piece, returning whatever stood there.
    #[inline]
    pub fn put(&mut self, sq: Square, piece: Piece) -> Option<Piece> {
        self.squares[sq.index() as usize].replace(piece)
    }

    /// Empties a square, returning its occupant.
    #[inline]
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.index() as usize].take()
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.squares[sq.index() as usize].is_none()
    }

    /// Iterates over occupied squares from a1 to h8.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// Iterates over the pieces of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied().filter(move |(_, piece)| piece.color == color)
    }

    /// Number of pieces of the given kind and color on the board.
    pub fn count(&self, kind: PieceKind, color: Color) -> usize {
        self.pieces_of(color)
            .filter(|(_, piece)| piece.kind == kind)
            .count()
    }

    /// The square of the first king of `color`, scanning from a1.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// All pieces on the board.
    pub fn pieces(&self) -> Vec<PieceView> {
        self.occupied()
            .map(|(square, piece)| PieceView {
                square,
                kind: piece.kind,
                color: piece.color,
                promoted: piece.promoted,
            })
            .collect()
    }

    /// Returns true if any piece of `by` attacks `sq`.
    #[inline]
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        attacks::is_attacked(self, sq, by)
    }

    /// Returns true if the king of `color` stands attacked.
    pub fn is_king_attacked(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|sq| self.is_attacked(sq, color.opposite()))
    }

    /// Drops castling rights whose king or rook is not on its home square.
    pub fn sanitize_castling(&mut self) {
        for color in Color::ALL {
            let rank = color.back_rank();
            let home = |file| Square::new(file, rank);
            let has = |sq: Square, kind| {
                self.piece_at(sq)
                    .is_some_and(|p| p.kind == kind && p.color == color)
            };
            let king_home = has(home(chess_core::File::E), PieceKind::King);
            let kingside = king_home && has(home(chess_core::File::H), PieceKind::Rook);
            let queenside = king_home && has(home(chess_core::File::A), PieceKind::Rook);
            if !kingside {
                self.castling.remove_kingside(color);
            }
            if !queenside {
                self.castling.remove_queenside(color);
            }
        }
    }

    /// Returns true if `color` has a pawn standing on `rank`.
    pub fn has_pawn_on(&self, color: Color, rank: Rank) -> bool {
        self.pieces_of(color)
            .any(|(sq, piece)| piece.kind == PieceKind::Pawn && sq.rank() == rank)
    }
}
