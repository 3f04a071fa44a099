// src/engine/evaluation/mobility.rs

use shakmaty::{Chess, Color, Position};

use crate::engine::null_move_position;

/// Legal-move-count difference, scaled down toward the endgame.
///
/// Only one side actually has the move; the other side's count comes from a
/// synthesized position with the turn passed and en passant cleared. When
/// that synthesis fails (the mover is in check), the opponent contributes 0.
pub fn evaluate(pos: &Chess, endgame: f64) -> i32 {
    let to_move = pos.legal_moves().len() as i32;
    let waiting = match null_move_position(pos) {
        Some(swapped) => swapped.legal_moves().len() as i32,
        None => 0,
    };

    let (white, black) = match pos.turn() {
        Color::White => (to_move, waiting),
        Color::Black => (waiting, to_move),
    };

    (f64::from(white - black) * 2.0 * (1.0 - endgame)).round() as i32
}
