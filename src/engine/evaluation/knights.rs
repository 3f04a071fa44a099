//! Evaluation terms for knights.

use shakmaty::{Bitboard, Board, Color, File, Piece, Rank, Role, Square};

const OUTPOST_BONUS: i32 = 20;

/// A knight is on an outpost when it sits in the opponent's half, a friendly
/// pawn protects it, and no enemy pawn on an adjacent file can ever chase it
/// away.
pub fn evaluate(board: &Board, color: Color) -> i32 {
    let knights = board.by_piece(Piece { role: Role::Knight, color });
    let mut score = 0;
    for sq in knights {
        if is_outpost(board, color, sq) {
            score += OUTPOST_BONUS;
        }
    }
    score
}

fn is_outpost(board: &Board, color: Color, square: Square) -> bool {
    let rank = square.rank() as i32;
    let file = square.file() as i32;
    let forward: i32 = if color == Color::White { 1 } else { -1 };

    let relative_rank = if color == Color::White { rank } else { 7 - rank };
    if relative_rank < 4 {
        return false;
    }

    let our_pawns = board.by_piece(Piece { role: Role::Pawn, color });
    let their_pawns = board.by_piece(Piece { role: Role::Pawn, color: !color });

    // Supported by a friendly pawn from behind.
    let support_rank = rank - forward;
    let mut supported = false;
    if (0..8).contains(&support_rank) {
        for f in [file - 1, file + 1] {
            if (0..8).contains(&f) {
                let support_sq =
                    Square::from_coords(File::new(f as u32), Rank::new(support_rank as u32));
                if !(our_pawns & Bitboard::from_square(support_sq)).is_empty() {
                    supported = true;
                }
            }
        }
    }
    if !supported {
        return false;
    }

    // No enemy pawn on an adjacent file that could still advance past us.
    for f in [file - 1, file + 1] {
        if (0..8).contains(&f) {
            for sq in their_pawns & Bitboard::from_file(File::new(f as u32)) {
                if (sq.rank() as i32 - rank) * forward > 0 {
                    return false;
                }
            }
        }
    }

    true
}
