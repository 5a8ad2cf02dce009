//! Attack geometry.
//!
//! Attacks never include pushes or castling, so asking whether a square is
//! attacked cannot recurse into move generation.

use chess_core::{Color, PieceKind, Square};

use crate::Position;

/// Squares along one direction, stopping at (and including) the first
/// occupied square.
#[derive(Debug, Clone)]
pub struct Ray<'a> {
    position: &'a Position,
    current: Square,
    step: (i8, i8),
    done: bool,
}

impl<'a> Ray<'a> {
    pub fn new(position: &'a Position, from: Square, step: (i8, i8)) -> Self {
        Ray {
            position,
            current: from,
            step,
            done: false,
        }
    }
}

impl Iterator for Ray<'_> {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.done {
            return None;
        }
        match self.current.offset(self.step.0, self.step.1) {
            Some(sq) => {
                self.current = sq;
                self.done = !self.position.is_empty(sq);
                Some(sq)
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

/// Returns true if a pawn of `color` on `from` attacks `to`.
#[inline]
pub fn pawn_attacks(from: Square, color: Color, to: Square) -> bool {
    let dir = color.pawn_direction();
    from.offset(-1, dir) == Some(to) || from.offset(1, dir) == Some(to)
}

/// Returns true if a non-pawn piece of `kind` on `from` reaches `to`.
///
/// Sliders need a clear path; `to` itself may be occupied.
pub fn reaches(position: &Position, from: Square, kind: PieceKind, to: Square) -> bool {
    let (ff, fr) = from.coords();
    let (tf, tr) = to.coords();
    let df = tf as i8 - ff as i8;
    let dr = tr as i8 - fr as i8;

    if !kind.is_slider() {
        return kind.directions().contains(&(df, dr));
    }
    if (df, dr) == (0, 0) || (df != 0 && dr != 0 && df.abs() != dr.abs()) {
        return false;
    }
    let step = (df.signum(), dr.signum());
    kind.directions().contains(&step) && Ray::new(position, from, step).any(|sq| sq == to)
}

/// Returns true if any piece of color `by` attacks `sq`.
pub fn is_attacked(position: &Position, sq: Square, by: Color) -> bool {
    let holds = |from: Option<Square>, kinds: &[PieceKind]| {
        from.and_then(|from| position.piece_at(from))
            .is_some_and(|p| p.color == by && kinds.contains(&p.kind))
    };

    let behind = -by.pawn_direction();
    if holds(sq.offset(-1, behind), &[PieceKind::Pawn]) || holds(sq.offset(1, behind), &[PieceKind::Pawn]) {
        return true;
    }

    if PieceKind::Knight
        .directions()
        .iter()
        .any(|&(df, dr)| holds(sq.offset(df, dr), &[PieceKind::Knight]))
    {
        return true;
    }

    if PieceKind::King
        .directions()
        .iter()
        .any(|&(df, dr)| holds(sq.offset(df, dr), &[PieceKind::King]))
    {
        return true;
    }

    let sliders = [
        (PieceKind::Rook.directions(), PieceKind::Rook),
        (PieceKind::Bishop.directions(), PieceKind::Bishop),
    ];
    sliders.iter().any(|&(directions, kind)| {
        directions
            .iter()
            .any(|&step| holds(Ray::new(position, sq, step).last(), &[kind, PieceKind::Queen]))
    })
}
