//! Evaluation of space behind the pawn front on the central files.

use shakmaty::{Bitboard, Board, Color, File, Piece, Role};

/// Pawn advancement on the c-f files, scaled down toward the endgame.
pub fn evaluate(board: &Board, endgame: f64) -> i32 {
    let white_pawns = board.by_piece(Piece { role: Role::Pawn, color: Color::White });
    let black_pawns = board.by_piece(Piece { role: Role::Pawn, color: Color::Black });

    let mut white = 0;
    let mut black = 0;
    for file in [File::C, File::D, File::E, File::F] {
        let file_bb = Bitboard::from_file(file);
        for sq in white_pawns & file_bb {
            white += sq.rank() as i32 - 1;
        }
        for sq in black_pawns & file_bb {
            black += 6 - sq.rank() as i32;
        }
    }

    (f64::from(white - black) * 0.5 * (1.0 - endgame)).round() as i32
}
