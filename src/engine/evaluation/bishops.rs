//! Evaluation terms for bishops.

use shakmaty::{Board, Color, Piece, Role};

const PAIR_BASE: f64 = 30.0;

/// The bishop pair, worth more as pawns come off the board.
pub fn evaluate(board: &Board, color: Color) -> i32 {
    let bishops = board.by_piece(Piece { role: Role::Bishop, color });
    if bishops.count() < 2 {
        return 0;
    }
    let pawns = board.pawns().count() as f64;
    let scale = (1.0 - pawns / 16.0).max(0.3);
    (PAIR_BASE * scale).round() as i32
}
