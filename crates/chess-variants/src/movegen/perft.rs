//! Perft (performance test) for move generator validation.
//!
//! Perft counts the leaf nodes of the legal move tree at a given depth.
//! The counts are compared against published values for each variant.

use chess_core::Move;

use crate::rules::Variant;
use crate::Position;

/// Counts the leaf nodes at the given depth under `variant`'s rules.
///
/// Game termination is not consulted: a position without legal moves is a
/// leaf, but positions won by a variant goal are still expanded.
pub fn perft(variant: &dyn Variant, position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = variant.legal_moves(position);

    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .into_iter()
        .filter_map(|m| variant.make_move(position, m))
        .map(|next| perft(variant, &next, depth - 1))
        .sum()
}

/// Perft with divide: the node count below each root move, sorted by move.
pub fn perft_divide(variant: &dyn Variant, position: &Position, depth: u32) -> Vec<(Move, u64)> {
    let mut results: Vec<(Move, u64)> = variant
        .legal_moves(position)
        .into_iter()
        .filter_map(|m| {
            let next = variant.make_move(position, m)?;
            let nodes = if depth > 1 {
                perft(variant, &next, depth - 1)
            } else {
                1
            };
            Some((m, nodes))
        })
        .collect();

    results.sort_by_key(|(m, _)| m.to_string());
    results
}
