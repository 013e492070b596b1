// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pseudo-legal move generation.
//!
//! Every generator here reads a `Position` and appends moves to a caller-provided buffer. None of
//! them know what check is: a generated move may leave the mover's own king attacked. Castling and
//! en-passant are not generated.

use crate::core::*;
use crate::Position;

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

/// Whether a piece of color `us` may land on `target`: it must be empty or hold an enemy piece.
fn can_land_on(us: Color, pos: &Position, target: Square) -> bool {
    match pos.piece_at(target) {
        Some(piece) => piece.color != us,
        None => true,
    }
}

fn push_pawn_move(us: Color, source: Square, target: Square, moves: &mut Vec<Move>) {
    if target.rank() == us.promotion_rank() {
        for kind in PieceKind::PROMOTIONS {
            moves.push(Move::promotion(source, target, kind));
        }
    } else {
        moves.push(Move::new(source, target));
    }
}

pub fn generate_pawn_moves(us: Color, pos: &Position, source: Square, moves: &mut Vec<Move>) {
    // A pawn can't stand on its own last rank; there is nothing sensible to generate.
    if source.rank() == us.promotion_rank() {
        return;
    }

    let up = us.pawn_direction();

    // Single and double pawn pushes.
    if let Some(single) = source.offset(up, 0) {
        if pos.piece_at(single).is_none() {
            push_pawn_move(us, source, single, moves);
            if source.rank() == us.pawn_home_rank() {
                if let Some(double) = single.offset(up, 0) {
                    if pos.piece_at(double).is_none() {
                        moves.push(Move::new(source, double));
                    }
                }
            }
        }
    }

    // Diagonal captures, towards the a-file first.
    for file_delta in [-1, 1] {
        if let Some(target) = source.offset(up, file_delta) {
            match pos.piece_at(target) {
                Some(piece) if piece.color != us => push_pawn_move(us, source, target, moves),
                _ => {}
            }
        }
    }
}

fn generate_step_moves(
    us: Color,
    pos: &Position,
    source: Square,
    offsets: impl IntoIterator<Item = (i32, i32)>,
    moves: &mut Vec<Move>,
) {
    for (rank_delta, file_delta) in offsets {
        if let Some(target) = source.offset(rank_delta, file_delta) {
            if can_land_on(us, pos, target) {
                moves.push(Move::new(source, target));
            }
        }
    }
}

pub fn generate_knight_moves(us: Color, pos: &Position, source: Square, moves: &mut Vec<Move>) {
    generate_step_moves(us, pos, source, KNIGHT_OFFSETS, moves);
}

/// King moves to adjacent squares. Castling is not generated.
pub fn generate_king_moves(us: Color, pos: &Position, source: Square, moves: &mut Vec<Move>) {
    generate_step_moves(
        us,
        pos,
        source,
        QUEEN_DIRECTIONS.iter().map(|dir| dir.as_vector()),
        moves,
    );
}

/// Casts a ray from `source` in each of `directions`. A ray ends at the edge of the board or at
/// the first occupied square, which is included as a capture if it holds an enemy piece.
pub fn generate_sliding_moves(
    us: Color,
    pos: &Position,
    source: Square,
    directions: &[Direction],
    moves: &mut Vec<Move>,
) {
    for &dir in directions {
        let mut cursor = source.towards(dir);
        while let Some(target) = cursor {
            match pos.piece_at(target) {
                None => moves.push(Move::new(source, target)),
                Some(piece) => {
                    if piece.color != us {
                        moves.push(Move::new(source, target));
                    }
                    break;
                }
            }

            cursor = target.towards(dir);
        }
    }
}

pub fn generate_moves_for_kind(
    us: Color,
    pos: &Position,
    kind: PieceKind,
    source: Square,
    moves: &mut Vec<Move>,
) {
    match kind {
        PieceKind::Pawn => generate_pawn_moves(us, pos, source, moves),
        PieceKind::Knight => generate_knight_moves(us, pos, source, moves),
        PieceKind::Bishop => generate_sliding_moves(us, pos, source, &BISHOP_DIRECTIONS, moves),
        PieceKind::Rook => generate_sliding_moves(us, pos, source, &ROOK_DIRECTIONS, moves),
        PieceKind::Queen => generate_sliding_moves(us, pos, source, &QUEEN_DIRECTIONS, moves),
        PieceKind::King => generate_king_moves(us, pos, source, moves),
    }
}

/// Generates every pseudo-legal move for `us`, scanning the board from a1 to h8 rank by rank and
/// appending each piece's moves in scan order.
pub fn generate_moves(us: Color, pos: &Position, moves: &mut Vec<Move>) {
    for square in squares() {
        match pos.piece_at(square) {
            Some(piece) if piece.color == us => {
                generate_moves_for_kind(us, pos, piece.kind, square, moves)
            }
            _ => {}
        }
    }
}
