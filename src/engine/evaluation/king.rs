// src/engine/evaluation/king.rs

//! King attack pressure and tropism.

use shakmaty::{attacks, Bitboard, Board, Color, Role};

use super::chebyshev;

/// Weighted count of `attacker` pieces standing inside the 3x3 zone around
/// the enemy king.
pub fn zone_pressure(board: &Board, attacker: Color) -> i32 {
    let king_sq = match board.king_of(!attacker) {
        Some(sq) => sq,
        None => return 0,
    };
    let zone = attacks::king_attacks(king_sq) | Bitboard::from_square(king_sq);

    let mut pressure = 0;
    for sq in board.by_color(attacker) & zone {
        if let Some(piece) = board.piece_at(sq) {
            pressure += match piece.role {
                Role::Pawn => 1,
                Role::Knight | Role::Bishop => 2,
                Role::Rook => 3,
                Role::Queen => 5,
                Role::King => 0,
            };
        }
    }
    pressure
}

/// Escalating penalty for accumulated zone pressure.
pub fn attack_penalty(pressure: i32) -> i32 {
    match pressure {
        0 => 0,
        1 => 10,
        2 => 25,
        3 => 45,
        a => 70 + (a - 3) * 15,
    }
}

/// Rewards pieces for simply being near the enemy king. The caller halves
/// the difference of the two totals.
pub fn tropism(board: &Board, color: Color) -> i32 {
    let enemy_king = match board.king_of(!color) {
        Some(sq) => sq,
        None => return 0,
    };

    let mut total = 0;
    for (role, weight) in [
        (Role::Knight, 3),
        (Role::Bishop, 2),
        (Role::Rook, 2),
        (Role::Queen, 4),
    ] {
        for sq in board.by_piece(shakmaty::Piece { role, color }) {
            total += ((7 - chebyshev(sq, enemy_king)) * weight).max(0);
        }
    }
    total
}
