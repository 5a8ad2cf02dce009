//! Insufficient material.

use chess_core::{Color, PieceKind, Square};

use crate::Position;

/// Non-king material of one side.
fn material(position: &Position, color: Color) -> Vec<(Square, PieceKind)> {
    position
        .pieces_of(color)
        .filter(|(_, piece)| piece.kind != PieceKind::King)
        .map(|(sq, piece)| (sq, piece.kind))
        .collect()
}

/// True when every piece is a bishop and they all share one square colour.
/// An empty set counts as true.
fn same_colour_bishops(pieces: &[(Square, PieceKind)]) -> bool {
    let mut light = false;
    let mut dark = false;
    for &(sq, kind) in pieces {
        if kind != PieceKind::Bishop {
            return false;
        }
        if sq.is_light() {
            light = true;
        } else {
            dark = true;
        }
    }
    !(light && dark)
}

/// Returns true if `color` has enough material on the board to ever mate.
pub fn can_mate(position: &Position, color: Color) -> bool {
    let ours = material(position, color);
    match ours.as_slice() {
        [] => false,
        [(_, PieceKind::Knight)] => false,
        pieces => !same_colour_bishops(pieces),
    }
}

/// Returns true if neither side can ever mate.
pub fn is_dead(position: &Position) -> bool {
    let white = material(position, Color::White);
    let black = material(position, Color::Black);

    match (white.as_slice(), black.as_slice()) {
        ([], []) => true,
        ([(_, PieceKind::Knight)], []) | ([], [(_, PieceKind::Knight)]) => true,
        _ => {
            let all: Vec<_> = white.iter().chain(black.iter()).copied().collect();
            same_colour_bishops(&all)
        }
    }
}
