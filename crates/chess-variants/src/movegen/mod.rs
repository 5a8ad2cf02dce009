//! Move generation.
//!
//! Every piece kind implements three operations against an explicit
//! [`Position`]:
//!
//! - [`candidates`] lazily lists pseudo-legal destinations,
//! - [`classify`] decides what a single move would do (its
//!   [`MoveOutcome`]), or that it is [`MoveOutcome::Blocked`],
//! - [`apply`] performs a classified move.
//!
//! What a variant changes about piece behaviour is carried in
//! [`PieceRules`]. Filtering moves that expose a royal king happens one
//! level up, in the rule sets.

pub mod attacks;
pub mod perft;

use chess_core::{Color, File, Move, PieceKind, Rank, Square};

use crate::position::{Piece, Position};

pub use attacks::Ray;

/// Where a pawn may start a two-square advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoubleStep {
    /// Only from its starting rank.
    HomeRank,
    /// Also from its own back rank, without creating an en-passant target.
    HomeOrBackRank,
    /// From any rank, whenever both squares ahead are empty.
    AnyRank,
}

/// Piece behaviour a variant can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceRules {
    /// Castling moves are generated.
    pub castling: bool,
    /// Kings may not be left attacked.
    pub royal_king: bool,
    /// Pocket pieces may be dropped and captures fill the pockets.
    pub drops: bool,
    pub double_step: DoubleStep,
    /// Kinds a pawn may promote to.
    pub promotions: &'static [PieceKind],
}

impl PieceRules {
    pub const STANDARD: PieceRules = PieceRules {
        castling: true,
        royal_king: true,
        drops: false,
        double_step: DoubleStep::HomeRank,
        promotions: &[
            PieceKind::Queen,
            PieceKind::Rook,
            PieceKind::Bishop,
            PieceKind::Knight,
        ],
    };
}

impl Default for PieceRules {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// What a move does to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveOutcome {
    /// The move is not possible.
    Blocked,
    /// A move to an empty square.
    Quiet,
    /// A two-square pawn advance.
    DoublePush { en_passant: Option<Square> },
    /// An ordinary capture.
    Capture { victim: Square },
    /// A pawn captures the pawn that just passed it.
    EnPassant { victim: Square },
    /// The king castles and the rook jumps over it.
    Castle { rook_from: Square, rook_to: Square },
    /// A pawn reaches the last rank, possibly capturing.
    Promotion {
        kind: PieceKind,
        victim: Option<Square>,
    },
    /// A pocket piece is placed on the board.
    Drop,
}

impl MoveOutcome {
    /// Returns true if the move removes an enemy piece.
    pub fn is_capture(self) -> bool {
        matches!(
            self,
            MoveOutcome::Capture { .. }
                | MoveOutcome::EnPassant { .. }
                | MoveOutcome::Promotion {
                    victim: Some(_),
                    ..
                }
        )
    }
}

/// The result of applying a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    /// The piece that moved, as it stood before the move.
    pub moved: Piece,
    pub captured: Option<Piece>,
}

/// Pseudo-legal moves of the piece on `from`.
///
/// The iterator may over-approximate; [`classify`] has the last word.
pub fn candidates<'a>(
    position: &'a Position,
    rules: &'a PieceRules,
    from: Square,
) -> Box<dyn Iterator<Item = Move> + 'a> {
    let piece = match position.piece_at(from) {
        Some(piece) if piece.color == position.turn => piece,
        _ => return Box::new(std::iter::empty()),
    };

    match piece.kind {
        PieceKind::Pawn => Box::new(pawn_candidates(rules, from, piece.color)),
        kind if kind.is_slider() => Box::new(
            kind.directions()
                .iter()
                .flat_map(move |&step| Ray::new(position, from, step))
                .map(move |to| Move::normal(from, to)),
        ),
        kind => {
            let steps = kind
                .directions()
                .iter()
                .filter_map(move |&(df, dr)| from.offset(df, dr))
                .map(move |to| Move::normal(from, to));
            let home = Square::new(File::E, piece.color.back_rank());
            let castles = (kind == PieceKind::King && rules.castling && from == home)
                .then(|| {
                    [File::G, File::C]
                        .into_iter()
                        .map(move |file| Move::normal(from, Square::new(file, from.rank())))
                })
                .into_iter()
                .flatten();
            Box::new(steps.chain(castles))
        }
    }
}

fn pawn_candidates(rules: &PieceRules, from: Square, color: Color) -> impl Iterator<Item = Move> {
    let dir = color.pawn_direction();
    let promotions = rules.promotions;
    [(0, dir), (0, 2 * dir), (-1, dir), (1, dir)]
        .into_iter()
        .filter_map(move |(df, dr)| from.offset(df, dr))
        .flat_map(move |to| {
            let moves: Vec<Move> = if to.rank() == color.promotion_rank() {
                promotions
                    .iter()
                    .map(|&kind| Move::promote(from, to, kind))
                    .collect()
            } else {
                vec![Move::normal(from, to)]
            };
            moves
        })
}

/// Decides what `mv` would do for the side to move.
pub fn classify(position: &Position, rules: &PieceRules, mv: Move) -> MoveOutcome {
    let us = position.turn;
    let (from, to, promotion) = match mv {
        Move::Drop { kind, to } => return classify_drop(position, rules, kind, to),
        Move::Normal {
            from,
            to,
            promotion,
        } => (from, to, promotion),
    };

    let piece = match position.piece_at(from) {
        Some(piece) if piece.color == us => piece,
        _ => return MoveOutcome::Blocked,
    };
    let target = position.piece_at(to);
    if from == to || target.is_some_and(|t| t.color == us) {
        return MoveOutcome::Blocked;
    }

    match piece.kind {
        PieceKind::Pawn => classify_pawn(position, rules, from, to, promotion),
        _ if promotion.is_some() => MoveOutcome::Blocked,
        PieceKind::King if from.rank() == to.rank() && from.file().index().abs_diff(to.file().index()) == 2 => {
            classify_castle(position, rules, from, to)
        }
        kind => {
            if !attacks::reaches(position, from, kind, to) {
                MoveOutcome::Blocked
            } else if target.is_some() {
                MoveOutcome::Capture { victim: to }
            } else {
                MoveOutcome::Quiet
            }
        }
    }
}

fn classify_pawn(
    position: &Position,
    rules: &PieceRules,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
) -> MoveOutcome {
    let us = position.turn;
    let dir = us.pawn_direction();
    let (ff, fr) = from.coords();
    let (tf, tr) = to.coords();
    let df = tf as i8 - ff as i8;
    let dr = tr as i8 - fr as i8;
    let target = position.piece_at(to);

    let base = if df == 0 && dr == dir && target.is_none() {
        MoveOutcome::Quiet
    } else if df == 0 && dr == 2 * dir && target.is_none() {
        let middle = from.offset(0, dir);
        match (middle, double_step_target(rules, us, from)) {
            (Some(middle), Some(en_passant)) if position.is_empty(middle) => {
                MoveOutcome::DoublePush {
                    en_passant: en_passant.then_some(middle),
                }
            }
            _ => MoveOutcome::Blocked,
        }
    } else if df.abs() == 1 && dr == dir {
        if target.is_some() {
            MoveOutcome::Capture { victim: to }
        } else if position.en_passant == Some(to) {
            match to.offset(0, -dir) {
                Some(victim)
                    if position
                        .piece_at(victim)
                        .is_some_and(|p| p.kind == PieceKind::Pawn && p.color != us) =>
                {
                    MoveOutcome::EnPassant { victim }
                }
                _ => MoveOutcome::Blocked,
            }
        } else {
            MoveOutcome::Blocked
        }
    } else {
        MoveOutcome::Blocked
    };

    if base == MoveOutcome::Blocked {
        return base;
    }

    let last_rank = to.rank() == us.promotion_rank();
    match (last_rank, promotion) {
        (true, Some(kind)) if rules.promotions.contains(&kind) => MoveOutcome::Promotion {
            kind,
            victim: match base {
                MoveOutcome::Capture { victim } => Some(victim),
                _ => None,
            },
        },
        (false, None) => base,
        _ => MoveOutcome::Blocked,
    }
}

/// Whether a pawn of `color` on `from` may advance two squares, and if so
/// whether the advance leaves an en-passant target behind.
fn double_step_target(rules: &PieceRules, color: Color, from: Square) -> Option<bool> {
    let rank = from.rank();
    match rules.double_step {
        DoubleStep::HomeRank => (rank == color.pawn_rank()).then_some(true),
        DoubleStep::HomeOrBackRank if rank == color.pawn_rank() => Some(true),
        DoubleStep::HomeOrBackRank => (rank == color.back_rank()).then_some(false),
        DoubleStep::AnyRank => Some(true),
    }
}

fn classify_castle(position: &Position, rules: &PieceRules, from: Square, to: Square) -> MoveOutcome {
    let us = position.turn;
    let them = us.opposite();
    let rank = us.back_rank();
    if !rules.castling || !rules.royal_king || from != Square::new(File::E, rank) {
        return MoveOutcome::Blocked;
    }

    let (allowed, rook_file, rook_to_file, between, crossing): (bool, File, File, &[File], File) =
        match to.file() {
            File::G => (
                position.castling.can_castle_kingside(us),
                File::H,
                File::F,
                &[File::F, File::G][..],
                File::F,
            ),
            File::C => (
                position.castling.can_castle_queenside(us),
                File::A,
                File::D,
                &[File::B, File::C, File::D][..],
                File::D,
            ),
            _ => return MoveOutcome::Blocked,
        };

    let rook_from = Square::new(rook_file, rank);
    let rook_home = position
        .piece_at(rook_from)
        .is_some_and(|p| p.kind == PieceKind::Rook && p.color == us);
    let path_clear = between
        .iter()
        .all(|&file| position.is_empty(Square::new(file, rank)));

    if !allowed
        || !rook_home
        || !path_clear
        || position.is_attacked(from, them)
        || position.is_attacked(Square::new(crossing, rank), them)
    {
        return MoveOutcome::Blocked;
    }

    MoveOutcome::Castle {
        rook_from,
        rook_to: Square::new(rook_to_file, rank),
    }
}

fn classify_drop(position: &Position, rules: &PieceRules, kind: PieceKind, to: Square) -> MoveOutcome {
    let in_pocket = position.pockets[position.turn.index()].count(kind) > 0;
    let pawn_on_edge = kind == PieceKind::Pawn && matches!(to.rank(), Rank::R1 | Rank::R8);
    if !rules.drops || kind == PieceKind::King || !in_pocket || !position.is_empty(to) || pawn_on_edge {
        MoveOutcome::Blocked
    } else {
        MoveOutcome::Drop
    }
}

/// Performs a classified move and passes the turn.
///
/// Returns `None`, leaving the position untouched, when the outcome does
/// not fit the move (including [`MoveOutcome::Blocked`]).
pub fn apply(position: &mut Position, rules: &PieceRules, mv: Move, outcome: MoveOutcome) -> Option<Applied> {
    let us = position.turn;
    let fits = match mv {
        Move::Drop { .. } => outcome == MoveOutcome::Drop,
        Move::Normal { .. } => !matches!(outcome, MoveOutcome::Blocked | MoveOutcome::Drop),
    };
    if !fits {
        return None;
    }

    let mut en_passant = None;
    let applied = match mv {
        Move::Drop { kind, to } => {
            if !position.pockets[us.index()].take(kind) {
                return None;
            }
            let piece = Piece::new(kind, us);
            position.put(to, piece);
            Applied {
                moved: piece,
                captured: None,
            }
        }
        Move::Normal { from, to, .. } => {
            let piece = position.remove(from)?;
            let captured = match outcome {
                MoveOutcome::DoublePush { en_passant: target } => {
                    en_passant = target;
                    None
                }
                MoveOutcome::Capture { victim } | MoveOutcome::EnPassant { victim } => position.remove(victim),
                MoveOutcome::Castle { rook_from, rook_to } => {
                    if let Some(rook) = position.remove(rook_from) {
                        position.put(rook_to, rook);
                    }
                    None
                }
                MoveOutcome::Promotion { victim, .. } => victim.and_then(|v| position.remove(v)),
                _ => None,
            };
            let placed = match outcome {
                MoveOutcome::Promotion { kind, .. } => Piece {
                    kind,
                    color: us,
                    promoted: rules.drops,
                },
                _ => piece,
            };
            position.put(to, placed);

            if piece.kind == PieceKind::King {
                position.castling.remove_color(us);
            }
            position.castling.remove_for_corner(from);
            position.castling.remove_for_corner(to);

            Applied {
                moved: piece,
                captured,
            }
        }
    };

    if rules.drops {
        if let Some(captured) = applied.captured.filter(|p| p.kind != PieceKind::King) {
            let kind = if captured.promoted {
                PieceKind::Pawn
            } else {
                captured.kind
            };
            position.pockets[us.index()].add(kind);
        }
    }

    let pawn_move = applied.moved.kind == PieceKind::Pawn && !mv.is_drop();
    if pawn_move || applied.captured.is_some() {
        position.halfmove_clock = 0;
    } else {
        position.halfmove_clock += 1;
    }
    if us == Color::Black {
        position.fullmove_number += 1;
    }
    position.en_passant = en_passant;
    position.turn = us.opposite();

    Some(applied)
}

/// All pseudo-legal moves for the side to move, paired with their outcome.
pub fn pseudo_legal(position: &Position, rules: &PieceRules) -> Vec<(Move, MoveOutcome)> {
    let us = position.turn;
    let mut moves = Vec::with_capacity(64);

    for (from, _) in position.pieces_of(us) {
        for mv in candidates(position, rules, from) {
            let outcome = classify(position, rules, mv);
            if outcome != MoveOutcome::Blocked {
                moves.push((mv, outcome));
            }
        }
    }

    if rules.drops {
        for kind in position.pockets[us.index()].kinds() {
            for to in Square::all() {
                let mv = Move::drop(kind, to);
                let outcome = classify(position, rules, mv);
                if outcome != MoveOutcome::Blocked {
                    moves.push((mv, outcome));
                }
            }
        }
    }

    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::FenParser;

    fn pos(fen: &str) -> Position {
        Position::from_parsed(&FenParser::parse(fen).unwrap())
    }

    fn mv(s: &str) -> Move {
        Move::parse(s).unwrap()
    }

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn startpos_pseudo_legal() {
        let p = pos(FenParser::STARTPOS);
        assert_eq!(pseudo_legal(&p, &PieceRules::STANDARD).len(), 20);
    }

    #[test]
    fn castle_candidates_only_from_home_square() {
        for fen in [
            "4k3/8/8/8/8/8/8/R2K3R w KQ - 0 1",
            "4k3/8/8/8/8/8/8/R4K1R w KQ - 0 1",
            "4k3/8/8/8/8/8/8/RK5R w KQ - 0 1",
        ] {
            let p = pos(fen);
            let moves: Vec<Move> = pseudo_legal(&p, &PieceRules::STANDARD)
                .into_iter()
                .map(|(m, _)| m)
                .collect();
            let mut unique = moves.clone();
            unique.sort_by_key(|m| m.to_string());
            unique.dedup();
            assert_eq!(unique.len(), moves.len(), "{fen}");
        }
    }

    #[test]
    fn classify_pawn_moves() {
        let p = pos(FenParser::STARTPOS);
        let rules = PieceRules::STANDARD;
        assert_eq!(classify(&p, &rules, mv("e2e3")), MoveOutcome::Quiet);
        assert_eq!(
            classify(&p, &rules, mv("e2e4")),
            MoveOutcome::DoublePush {
                en_passant: Some(sq("e3"))
            }
        );
        assert_eq!(classify(&p, &rules, mv("e2e5")), MoveOutcome::Blocked);
        assert_eq!(classify(&p, &rules, mv("e2d3")), MoveOutcome::Blocked);
        // black piece, white to move
        assert_eq!(classify(&p, &rules, mv("e7e5")), MoveOutcome::Blocked);
    }

    #[test]
    fn classify_blocked_double_step() {
        let p = pos("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        let rules = PieceRules::STANDARD;
        assert_eq!(classify(&p, &rules, mv("e2e4")), MoveOutcome::Blocked);
        assert_eq!(classify(&p, &rules, mv("e2e3")), MoveOutcome::Blocked);
    }

    #[test]
    fn classify_promotions() {
        let p = pos("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let rules = PieceRules::STANDARD;
        assert_eq!(
            classify(&p, &rules, mv("a7a8q")),
            MoveOutcome::Promotion {
                kind: PieceKind::Queen,
                victim: None
            }
        );
        assert_eq!(
            classify(&p, &rules, mv("a7b8n")),
            MoveOutcome::Promotion {
                kind: PieceKind::Knight,
                victim: Some(sq("b8"))
            }
        );
        assert_eq!(classify(&p, &rules, mv("a7a8")), MoveOutcome::Blocked);
        assert_eq!(classify(&p, &rules, mv("a7a8k")), MoveOutcome::Blocked);
        let pawns = pawn_candidates(&rules, sq("a7"), Color::White).count();
        // push and one capture square on the board, four kinds each
        assert_eq!(pawns, 8);
    }

    #[test]
    fn classify_en_passant() {
        let p = pos("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        assert_eq!(
            classify(&p, &PieceRules::STANDARD, mv("e5d6")),
            MoveOutcome::EnPassant { victim: sq("d5") }
        );
        let mut after = p.clone();
        let applied = apply(
            &mut after,
            &PieceRules::STANDARD,
            mv("e5d6"),
            MoveOutcome::EnPassant { victim: sq("d5") },
        )
        .unwrap();
        assert_eq!(applied.captured.map(|c| c.kind), Some(PieceKind::Pawn));
        assert!(after.is_empty(sq("d5")));
        assert!(after.is_empty(sq("e5")));
        assert_eq!(after.halfmove_clock, 0);
    }

    #[test]
    fn castling_gates() {
        let rules = PieceRules::STANDARD;
        let p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_eq!(
            classify(&p, &rules, mv("e1g1")),
            MoveOutcome::Castle {
                rook_from: Square::H1,
                rook_to: Square::F1
            }
        );
        assert_eq!(
            classify(&p, &rules, mv("e1c1")),
            MoveOutcome::Castle {
                rook_from: Square::A1,
                rook_to: Square::D1
            }
        );

        // f1 is covered by the rook on f8
        let p = pos("r3kr2/8/8/8/8/8/8/R3K2R w KQq - 0 1");
        assert_eq!(classify(&p, &rules, mv("e1g1")), MoveOutcome::Blocked);
        assert_ne!(classify(&p, &rules, mv("e1c1")), MoveOutcome::Blocked);

        // no right, no castle
        let p = pos("r3k2r/8/8/8/8/8/8/R3K2R w Qkq - 0 1");
        assert_eq!(classify(&p, &rules, mv("e1g1")), MoveOutcome::Blocked);

        // b1 occupied blocks the long castle only
        let p = pos("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1");
        assert_eq!(classify(&p, &rules, mv("e1c1")), MoveOutcome::Blocked);

        // in check
        let p = pos("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1");
        assert_eq!(classify(&p, &rules, mv("e1g1")), MoveOutcome::Blocked);

        let no_castling = PieceRules {
            castling: false,
            ..rules
        };
        let p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_eq!(classify(&p, &no_castling, mv("e1g1")), MoveOutcome::Blocked);
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let rules = PieceRules::STANDARD;
        let mut p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let outcome = classify(&p, &rules, mv("e1g1"));
        apply(&mut p, &rules, mv("e1g1"), outcome).unwrap();
        assert_eq!(p.piece_at(Square::G1).map(|x| x.kind), Some(PieceKind::King));
        assert_eq!(p.piece_at(Square::F1).map(|x| x.kind), Some(PieceKind::Rook));
        assert!(p.is_empty(Square::H1));
        assert_eq!(p.castling.fen_field(), "kq");
        assert_eq!(p.turn, Color::Black);
    }

    #[test]
    fn rook_capture_clears_opponent_right() {
        let rules = PieceRules::STANDARD;
        let mut p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let outcome = classify(&p, &rules, mv("a1a8"));
        assert_eq!(outcome, MoveOutcome::Capture { victim: Square::A8 });
        apply(&mut p, &rules, mv("a1a8"), outcome).unwrap();
        assert_eq!(p.castling.fen_field(), "Kk");
    }

    #[test]
    fn horde_back_rank_double_step() {
        let rules = PieceRules {
            double_step: DoubleStep::HomeOrBackRank,
            ..PieceRules::STANDARD
        };
        let p = pos("4k3/8/8/8/8/8/8/P3K3 w - - 0 1");
        assert_eq!(
            classify(&p, &rules, mv("a1a3")),
            MoveOutcome::DoublePush { en_passant: None }
        );
        assert_eq!(classify(&p, &PieceRules::STANDARD, mv("a1a3")), MoveOutcome::Blocked);
    }

    #[test]
    fn torpedo_double_step() {
        let rules = PieceRules {
            double_step: DoubleStep::AnyRank,
            ..PieceRules::STANDARD
        };
        let p = pos("4k3/8/P7/8/3P4/8/8/4K3 w - - 0 1");
        assert_eq!(
            classify(&p, &rules, mv("d4d6")),
            MoveOutcome::DoublePush {
                en_passant: Some(sq("d5"))
            }
        );
        assert_eq!(
            classify(&p, &rules, mv("a6a8r")),
            MoveOutcome::Promotion {
                kind: PieceKind::Rook,
                victim: None
            }
        );
    }

    #[test]
    fn drops() {
        let rules = PieceRules {
            drops: true,
            ..PieceRules::STANDARD
        };
        let mut p = pos("4k3/8/8/8/8/8/8/4K3/PN w - - 0 1");
        assert_eq!(classify(&p, &rules, mv("@Pe4")), MoveOutcome::Drop);
        assert_eq!(classify(&p, &rules, mv("@Pe8")), MoveOutcome::Blocked);
        assert_eq!(classify(&p, &rules, mv("@Pa1")), MoveOutcome::Blocked);
        assert_eq!(classify(&p, &rules, mv("@Ne1")), MoveOutcome::Blocked);
        assert_eq!(classify(&p, &rules, mv("@Qd4")), MoveOutcome::Blocked);
        assert_eq!(classify(&p, &PieceRules::STANDARD, mv("@Nd4")), MoveOutcome::Blocked);

        apply(&mut p, &rules, mv("@Nd4"), MoveOutcome::Drop).unwrap();
        assert_eq!(p.pockets[Color::White.index()].count(PieceKind::Knight), 0);
        assert_eq!(p.halfmove_clock, 1);
        // black has nothing to drop
        assert_eq!(pseudo_legal(&p, &rules).iter().filter(|(m, _)| m.is_drop()).count(), 0);

        // pawn drops skip ranks 1 and 8: 64 squares, 3 occupied, 14 edge squares empty
        p.turn = Color::White;
        let pawn_drops = pseudo_legal(&p, &rules)
            .iter()
            .filter(|(m, _)| m.is_drop())
            .count();
        assert_eq!(pawn_drops, 64 - 3 - 14);
    }

    #[test]
    fn captures_fill_pocket() {
        let rules = PieceRules {
            drops: true,
            ..PieceRules::STANDARD
        };
        let mut p = pos("4k3/8/8/3q~4/8/4N3/8/4K3 w - - 0 1");
        let outcome = classify(&p, &rules, mv("e3d5"));
        assert_eq!(outcome, MoveOutcome::Capture { victim: sq("d5") });
        let applied = apply(&mut p, &rules, mv("e3d5"), outcome).unwrap();
        assert!(applied.captured.is_some_and(|c| c.promoted));
        // a promoted piece goes back as a pawn
        assert_eq!(p.pockets[Color::White.index()].count(PieceKind::Pawn), 1);
        assert_eq!(p.pockets[Color::White.index()].count(PieceKind::Queen), 0);

        let mut p = pos("4k3/8/8/3q4/8/4N3/8/4K3 w - - 0 1");
        apply(&mut p, &PieceRules::STANDARD, mv("e3d5"), MoveOutcome::Capture { victim: sq("d5") }).unwrap();
        assert!(p.pockets[Color::White.index()].is_empty());
    }

    #[test]
    fn apply_rejects_mismatched_outcome() {
        let mut p = pos(FenParser::STARTPOS);
        let before = p.clone();
        assert!(apply(&mut p, &PieceRules::STANDARD, mv("e2e4"), MoveOutcome::Blocked).is_none());
        assert!(apply(&mut p, &PieceRules::STANDARD, mv("e2e4"), MoveOutcome::Drop).is_none());
        assert_eq!(p, before);
    }

    #[test]
    fn outcome_capture_flag() {
        assert!(MoveOutcome::Capture { victim: Square::A1 }.is_capture());
        assert!(MoveOutcome::Promotion {
            kind: PieceKind::Queen,
            victim: Some(Square::A8)
        }
        .is_capture());
        assert!(!MoveOutcome::Promotion {
            kind: PieceKind::Queen,
            victim: None
        }
        .is_capture());
        assert!(!MoveOutcome::DoublePush { en_passant: None }.is_capture());
    }
}
