//! Zobrist hashing for repetition detection.
//!
//! A position's key XORs random numbers associated with:
//! - each piece on each square (6 kinds × 2 colors × 64 squares)
//! - the promoted mark on each square
//! - side to move
//! - castling rights (4 values)
//! - en passant file (8 values), only when the capture is available
//! - pocket counts and check counters, for the variants that carry them

use chess_core::{Color, PieceKind, Square};

use crate::movegen::attacks;
use crate::Position;

/// Pocket counts above this share a key.
const MAX_POCKET: usize = 16;
const MAX_CHECKS: usize = 3;

/// Zobrist hash keys, generated from a fixed seed.
pub struct ZobristKeys {
    /// Keys for pieces: [kind][color][square]
    pub pieces: [[[u64; 64]; 2]; 6],
    pub promoted: [u64; 64],
    pub black_to_move: u64,
    pub castling: [u64; 4],
    pub en_passant: [u64; 8],
    /// Keys for pocket counts: [color][kind][count]
    pub pockets: [[[u64; MAX_POCKET + 1]; 6]; 2],
    /// Keys for checks received: [color][count]
    pub checks: [[u64; MAX_CHECKS + 1]; 2],
}

impl ZobristKeys {
    pub const fn new() -> Self {
        // xorshift64
        const fn next_random(state: u64) -> (u64, u64) {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            (x, x)
        }

        let mut state = 0x9E3779B97F4A7C15u64;
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut promoted = [0u64; 64];
        let mut castling = [0u64; 4];
        let mut en_passant = [0u64; 8];
        let mut pockets = [[[0u64; MAX_POCKET + 1]; 6]; 2];
        let mut checks = [[0u64; MAX_CHECKS + 1]; 2];

        let mut kind = 0;
        while kind < 6 {
            let mut color = 0;
            while color < 2 {
                let mut square = 0;
                while square < 64 {
                    let (new_state, value) = next_random(state);
                    state = new_state;
                    pieces[kind][color][square] = value;
                    square += 1;
                }
                color += 1;
            }
            kind += 1;
        }

        let mut square = 0;
        while square < 64 {
            let (new_state, value) = next_random(state);
            state = new_state;
            promoted[square] = value;
            square += 1;
        }

        let (new_state, black_to_move) = next_random(state);
        state = new_state;

        let mut i = 0;
        while i < 4 {
            let (new_state, value) = next_random(state);
            state = new_state;
            castling[i] = value;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            let (new_state, value) = next_random(state);
            state = new_state;
            en_passant[i] = value;
            i += 1;
        }

        let mut color = 0;
        while color < 2 {
            let mut kind = 0;
            while kind < 6 {
                // count 0 hashes to nothing
                let mut count = 1;
                while count <= MAX_POCKET {
                    let (new_state, value) = next_random(state);
                    state = new_state;
                    pockets[color][kind][count] = value;
                    count += 1;
                }
                kind += 1;
            }
            let mut count = 1;
            while count <= MAX_CHECKS {
                let (new_state, value) = next_random(state);
                state = new_state;
                checks[color][count] = value;
                count += 1;
            }
            color += 1;
        }

        ZobristKeys {
            pieces,
            promoted,
            black_to_move,
            castling,
            en_passant,
            pockets,
            checks,
        }
    }

    #[inline]
    pub const fn piece_key(&self, kind: PieceKind, color: Color, square: Square) -> u64 {
        self.pieces[kind.index()][color.index()][square.index() as usize]
    }

    /// Hashes a whole position.
    pub fn key(&self, position: &Position) -> u64 {
        let mut hash = 0u64;

        for (sq, piece) in position.occupied() {
            hash ^= self.piece_key(piece.kind, piece.color, sq);
            if piece.promoted {
                hash ^= self.promoted[sq.index() as usize];
            }
        }

        if position.turn == Color::Black {
            hash ^= self.black_to_move;
        }

        let rights = position.castling.raw();
        for (i, key) in self.castling.iter().enumerate() {
            if rights & (1 << i) != 0 {
                hash ^= key;
            }
        }

        if let Some(ep) = position.en_passant.filter(|&ep| en_passant_available(position, ep)) {
            hash ^= self.en_passant[ep.file().index() as usize];
        }

        for color in Color::ALL {
            let pocket = &position.pockets[color.index()];
            for kind in pocket.kinds() {
                let count = (pocket.count(kind) as usize).min(MAX_POCKET);
                hash ^= self.pockets[color.index()][kind.index()][count];
            }
            let checks = (position.checks[color.index()] as usize).min(MAX_CHECKS);
            hash ^= self.checks[color.index()][checks];
        }

        hash
    }
}

/// Whether a pawn of the side to move can capture en passant on `target`.
fn en_passant_available(position: &Position, target: Square) -> bool {
    let us = position.turn;
    let victim = target
        .offset(0, -us.pawn_direction())
        .and_then(|sq| position.piece_at(sq))
        .is_some_and(|p| p.kind == PieceKind::Pawn && p.color != us);
    victim
        && position
            .pieces_of(us)
            .any(|(sq, p)| p.kind == PieceKind::Pawn && attacks::pawn_attacks(sq, us, target))
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// Global Zobrist keys (initialized at compile time).
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();
