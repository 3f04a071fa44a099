//! Pieces left hanging to pawns.

use shakmaty::{attacks, Board, Color, Piece, Role};

const HANGING_PENALTY: i32 = 20;

/// Penalises minor and major pieces that a pawn attacks while no friendly
/// pawn covers them.
pub fn evaluate(board: &Board, color: Color) -> i32 {
    let our_pawns = board.by_piece(Piece { role: Role::Pawn, color });
    let their_pawns = board.by_piece(Piece { role: Role::Pawn, color: !color });

    let mut score = 0;
    for role in [Role::Knight, Role::Bishop, Role::Rook, Role::Queen] {
        for sq in board.by_piece(Piece { role, color }) {
            let attacked = !(attacks::pawn_attacks(color, sq) & their_pawns).is_empty();
            let defended = !(attacks::pawn_attacks(!color, sq) & our_pawns).is_empty();
            if attacked && !defended {
                score -= HANGING_PENALTY;
            }
        }
    }
    score
}
