// src/engine/evaluation/pawns.rs

//! Pawn-structure evaluation: passed and candidate pawns, doubled, isolated,
//! backward, chains and connected pawns, plus the king-related pawn terms
//! (endgame king activity around passers, pawn shield in the middle game).

use shakmaty::{attacks, Bitboard, Board, Color, File, Piece, Rank, Role, Square};

use super::chebyshev;

const PASSED_BONUS: [i32; 8] = [0, 0, 10, 20, 35, 55, 80, 120];
const CANDIDATE_BONUS: [i32; 8] = [0, 0, 5, 10, 20, 35, 0, 0];
const DOUBLED_PENALTY: i32 = 25;
const ISOLATED_PENALTY: i32 = 20;
const BACKWARD_PENALTY: i32 = 15;
const CHAIN_BONUS: i32 = 10;
const CONNECTED_BONUS: i32 = 8;
const KING_DISTANCE_FACTOR: i32 = 5;
const SHIELD_BASE: f64 = 8.0;

/// A pawn with no enemy pawn ahead of it on its own or an adjacent file.
pub(crate) fn is_passed(pawn: Square, color: Color, their_pawns: Bitboard) -> bool {
    let file = pawn.file() as i32;
    let rank = pawn.rank() as i32;
    let forward: i32 = if color == Color::White { 1 } else { -1 };

    for f in (file - 1).max(0)..=(file + 1).min(7) {
        let file_bb = Bitboard::from_file(File::new(f as u32));
        for sq in their_pawns & file_bb {
            if (sq.rank() as i32 - rank) * forward > 0 {
                return false;
            }
        }
    }
    true
}

pub fn evaluate(board: &Board, color: Color, endgame: f64) -> i32 {
    let our_pawns = board.by_piece(Piece { role: Role::Pawn, color });
    let their_pawns = board.by_piece(Piece { role: Role::Pawn, color: !color });

    // Per-file rank lists, sorted from rank 1 upward.
    let mut ours: [Vec<i32>; 8] = Default::default();
    let mut theirs: [Vec<i32>; 8] = Default::default();
    for sq in our_pawns {
        ours[sq.file() as usize].push(sq.rank() as i32);
    }
    for sq in their_pawns {
        theirs[sq.file() as usize].push(sq.rank() as i32);
    }
    for list in ours.iter_mut().chain(theirs.iter_mut()) {
        list.sort_unstable();
    }

    let forward: i32 = if color == Color::White { 1 } else { -1 };
    let relative = |rank: i32| -> usize {
        if color == Color::White {
            rank as usize
        } else {
            (7 - rank) as usize
        }
    };

    let mut score = 0;

    for list in &ours {
        if list.len() > 1 {
            score -= (list.len() as i32 - 1) * DOUBLED_PENALTY;
        }
    }

    let mut passers: Vec<Square> = Vec::new();

    for sq in our_pawns {
        let file = sq.file() as i32;
        let rank = sq.rank() as i32;
        let adjacent: Vec<usize> = ((file - 1).max(0)..=(file + 1).min(7))
            .filter(|&f| f != file)
            .map(|f| f as usize)
            .collect();

        if adjacent.iter().all(|&f| ours[f].is_empty()) {
            score -= ISOLATED_PENALTY;
        }

        if is_passed(sq, color, their_pawns) {
            passers.push(sq);
            let bonus = PASSED_BONUS[relative(rank)];
            score += (f64::from(bonus) * (0.5 + 0.5 * endgame)).round() as i32;
        } else {
            // A candidate has a clear path on its own file and more nearby
            // supporters than enemy stoppers on the adjacent files.
            let own_file_clear = ours[file as usize]
                .iter()
                .chain(theirs[file as usize].iter())
                .all(|&r| (r - rank) * forward <= 0);
            if own_file_clear {
                let supporters: usize = adjacent
                    .iter()
                    .map(|&f| {
                        ours[f]
                            .iter()
                            .filter(|&&r| {
                                let delta = (r - rank) * forward;
                                (-1..=2).contains(&delta)
                            })
                            .count()
                    })
                    .sum();
                let stoppers: usize = adjacent
                    .iter()
                    .map(|&f| theirs[f].iter().filter(|&&r| (r - rank) * forward > 0).count())
                    .sum();
                if supporters > stoppers {
                    score += CANDIDATE_BONUS[relative(rank)];
                }
            }
        }

        // Backward: no pawn beside or behind it to support the advance, the
        // stop square is covered by an enemy pawn, and something sits on it.
        let supported = adjacent
            .iter()
            .any(|&f| ours[f].iter().any(|&r| (r - rank) * forward <= 0));
        let stop_rank = rank + forward;
        if !supported && (0..8).contains(&stop_rank) {
            let stop_sq = Square::from_coords(File::new(file as u32), Rank::new(stop_rank as u32));
            let controlled = !(attacks::pawn_attacks(color, stop_sq) & their_pawns).is_empty();
            let blocked = !(board.occupied() & Bitboard::from_square(stop_sq)).is_empty();
            if controlled && blocked {
                score -= BACKWARD_PENALTY;
            }
        }

        if adjacent
            .iter()
            .any(|&f| ours[f].contains(&(rank + forward)))
        {
            score += CHAIN_BONUS;
        }

        let connected_files = adjacent
            .iter()
            .filter(|&&f| ours[f].iter().any(|&r| (r - rank).abs() <= 1))
            .count() as i32;
        score += connected_files * CONNECTED_BONUS;
    }

    // In the endgame the kings fight over the passers.
    if endgame > 0.3 {
        if let (Some(own_king), Some(their_king)) = (board.king_of(color), board.king_of(!color)) {
            for &sq in &passers {
                let diff = chebyshev(their_king, sq) - chebyshev(own_king, sq);
                score += (f64::from(diff * KING_DISTANCE_FACTOR) * endgame).round() as i32;
            }
        }
    }

    // Pawn shield while the king still needs one.
    if endgame < 0.6 {
        if let Some(king_sq) = board.king_of(color) {
            let per_file = (SHIELD_BASE * (1.0 - endgame)).round() as i32;
            let king_file = king_sq.file() as i32;
            let king_rank = king_sq.rank() as i32;
            for f in (king_file - 1).max(0)..=(king_file + 1).min(7) {
                let covered = ours[f as usize].iter().any(|&r| {
                    let delta = (r - king_rank) * forward;
                    delta == 1 || delta == 2
                });
                if covered {
                    score += per_file;
                }
            }
        }
    }

    score
}
