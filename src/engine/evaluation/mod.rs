//! Static evaluation of a chess position.
//!
//! Scores are centipawns, positive when white is better. Each term that
//! involves a fractional game-phase scale is rounded on its own before it is
//! added to the total.

pub mod bishops;
pub mod king;
pub mod knights;
pub mod mobility;
pub mod pawns;
pub mod pst;
pub mod rooks;
pub mod space;
pub mod threats;

use shakmaty::{Board, Chess, Color, Piece, Position, Role, Square};

use crate::constants::{
    BISHOP_VALUE, ENDGAME_MATERIAL, KING_VALUE, KNIGHT_VALUE, MATE_SCORE, PAWN_VALUE, QUEEN_VALUE,
    ROOK_VALUE,
};

/// Whether the mobility term participates. Quiescence calls the evaluator on
/// every stand-pat, where counting both sides' legal moves is too expensive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvalMode {
    Full,
    Quiescence,
}

pub fn piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => PAWN_VALUE,
        Role::Knight => KNIGHT_VALUE,
        Role::Bishop => BISHOP_VALUE,
        Role::Rook => ROOK_VALUE,
        Role::Queen => QUEEN_VALUE,
        Role::King => KING_VALUE,
    }
}

fn non_king_material(board: &Board) -> i32 {
    let mut material = 0;
    for &role in &[Role::Pawn, Role::Knight, Role::Bishop, Role::Rook, Role::Queen] {
        material += board.by_role(role).count() as i32 * piece_value(role);
    }
    material
}

/// Game phase in `[0, 1]`: 0 with full material on the board, 1 once both
/// sides are down to roughly a minor piece or less.
pub fn endgame_weight(board: &Board) -> f64 {
    (1.0 - f64::from(non_king_material(board)) / ENDGAME_MATERIAL).clamp(0.0, 1.0)
}

pub(crate) fn chebyshev(a: Square, b: Square) -> i32 {
    let file = (a.file() as i32 - b.file() as i32).abs();
    let rank = (a.rank() as i32 - b.rank() as i32).abs();
    file.max(rank)
}

pub fn evaluate(pos: &Chess, mode: EvalMode) -> i32 {
    if pos.is_checkmate() {
        return match pos.turn() {
            Color::White => -MATE_SCORE,
            Color::Black => MATE_SCORE,
        };
    }
    if pos.is_stalemate() || insufficient_material(pos) {
        return 0;
    }

    let board = pos.board();
    let endgame = endgame_weight(board);
    let mut score = 0;

    score += material_and_pst(board, endgame);

    score += bishops::evaluate(board, Color::White) - bishops::evaluate(board, Color::Black);
    score += pawns::evaluate(board, Color::White, endgame)
        - pawns::evaluate(board, Color::Black, endgame);
    score += rooks::evaluate(board, Color::White, endgame)
        - rooks::evaluate(board, Color::Black, endgame);
    score += knights::evaluate(board, Color::White) - knights::evaluate(board, Color::Black);
    score += threats::evaluate(board, Color::White) - threats::evaluate(board, Color::Black);

    // King attack only matters while there is still attacking material around.
    if endgame <= 0.7 {
        let pressure_on_black = king::zone_pressure(board, Color::White);
        let pressure_on_white = king::zone_pressure(board, Color::Black);
        let diff = king::attack_penalty(pressure_on_black) - king::attack_penalty(pressure_on_white);
        score += (f64::from(diff) * (1.0 - endgame)).round() as i32;
    }
    let tropism_diff = king::tropism(board, Color::White) - king::tropism(board, Color::Black);
    score += (f64::from(tropism_diff) / 2.0).round() as i32;

    score += space::evaluate(board, endgame);
    score += tempo(pos, endgame);

    if mode == EvalMode::Full {
        score += mobility::evaluate(pos, endgame);
    }

    score
}

fn insufficient_material(pos: &Chess) -> bool {
    pos.has_insufficient_material(Color::White) && pos.has_insufficient_material(Color::Black)
}

fn material_and_pst(board: &Board, endgame: f64) -> i32 {
    let mut score = 0;
    for &color in &Color::ALL {
        let sign = if color == Color::White { 1 } else { -1 };
        for &role in &Role::ALL {
            let material = if role == Role::King { 0 } else { piece_value(role) };
            for square in board.by_piece(Piece { role, color }) {
                score += sign * (material + pst::value(role, color, square, endgame));
            }
        }
    }
    score
}

fn tempo(pos: &Chess, endgame: f64) -> i32 {
    let bonus = (15.0 - 10.0 * endgame).round() as i32;
    match pos.turn() {
        Color::White => bonus,
        Color::Black => -bonus,
    }
}

#[cfg(test)]
pub mod tests;
