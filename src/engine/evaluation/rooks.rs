//! Evaluation terms for rooks.

use shakmaty::{Bitboard, Board, Color, Piece, Rank, Role, Square};

use super::pawns::is_passed;

const OPEN_FILE_BONUS: i32 = 25;
const SEMI_OPEN_FILE_BONUS: i32 = 12;
const SEVENTH_RANK_BONUS: i32 = 25;
const BATTERY_BONUS: i32 = 15;
const BEHIND_PASSER_BASE: f64 = 15.0;

pub fn evaluate(board: &Board, color: Color, endgame: f64) -> i32 {
    let rooks = board.by_piece(Piece { role: Role::Rook, color });
    let our_pawns = board.by_piece(Piece { role: Role::Pawn, color });
    let their_pawns = board.by_piece(Piece { role: Role::Pawn, color: !color });

    let forward: i32 = if color == Color::White { 1 } else { -1 };
    let seventh = if color == Color::White { Rank::Seventh } else { Rank::Second };
    let back_rank = if color == Color::White { Rank::Eighth } else { Rank::First };

    let mut score = 0;

    for sq in rooks {
        let file_bb = Bitboard::from_file(sq.file());
        let own_on_file = !(our_pawns & file_bb).is_empty();
        let their_on_file = !(their_pawns & file_bb).is_empty();

        if !own_on_file && !their_on_file {
            score += OPEN_FILE_BONUS;
        } else if !own_on_file {
            score += SEMI_OPEN_FILE_BONUS;
        }

        // A rook escorting its own passer from behind.
        for pawn_sq in our_pawns & file_bb {
            let rook_is_behind = (pawn_sq.rank() as i32 - sq.rank() as i32) * forward > 0;
            if rook_is_behind && is_passed(pawn_sq, color, their_pawns) {
                score += (BEHIND_PASSER_BASE * endgame).round() as i32;
                break;
            }
        }

        if sq.rank() == seventh {
            let pawns_to_harvest = !(their_pawns & Bitboard::from_rank(seventh)).is_empty();
            let king_cut_off = match board.king_of(!color) {
                Some(king) => king.rank() == back_rank,
                None => false,
            };
            if pawns_to_harvest || king_cut_off {
                score += SEVENTH_RANK_BONUS;
            }
        }
    }

    // Doubled rooks on a file or rank back each other up.
    let rook_squares: Vec<Square> = rooks.into_iter().collect();
    for (i, a) in rook_squares.iter().enumerate() {
        for b in &rook_squares[i + 1..] {
            if a.file() == b.file() || a.rank() == b.rank() {
                score += BATTERY_BONUS;
            }
        }
    }

    score
}
