//! Unit tests for the evaluation terms.

use super::*;
use shakmaty::{fen::Fen, CastlingMode, Chess};

fn position(fen: &str) -> Chess {
    let fen: Fen = fen.parse().unwrap();
    fen.into_position(CastlingMode::Standard).unwrap()
}

/// Color-mirror of a FEN: ranks flipped, piece colors swapped, side to move
/// swapped. Only valid for positions without castling rights or en passant.
fn mirrored(fen: &str) -> String {
    let fields: Vec<&str> = fen.split(' ').collect();
    let board = fields[0]
        .split('/')
        .rev()
        .map(|rank| {
            rank.chars()
                .map(|c| {
                    if c.is_ascii_uppercase() {
                        c.to_ascii_lowercase()
                    } else {
                        c.to_ascii_uppercase()
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("/");
    let turn = if fields[1] == "w" { "b" } else { "w" };
    format!("{board} {turn} - - {} {}", fields[4], fields[5])
}

#[test]
fn endgame_weight_full_board_is_zero() {
    let pos = Chess::default();
    assert_eq!(endgame_weight(pos.board()), 0.0);
}

#[test]
fn endgame_weight_bare_kings_is_one() {
    let pos = position("8/4k3/8/8/8/8/4K3/8 w - - 0 1");
    assert_eq!(endgame_weight(pos.board()), 1.0);
}

#[test]
fn starting_position_is_nearly_balanced() {
    let score = evaluate(&Chess::default(), EvalMode::Full);
    // Only the tempo and mobility terms may move the needle.
    assert!((-20..=20).contains(&score), "unexpected score {score}");
}

#[test]
fn evaluation_is_antisymmetric_under_color_mirror() {
    let fens = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1",
        "r2q1rk1/pp2ppbp/2np1np1/8/3PP1b1/2N1BN2/PPQ1BPPP/R4RK1 w - - 0 1",
        "8/2k5/3p4/p2P1p2/P2P1P2/8/2K5/8 w - - 0 1",
        "6k1/5ppp/3q4/8/8/2R5/5PPP/6K1 b - - 0 1",
    ];
    for fen in fens {
        let pos = position(fen);
        let mirror = position(&mirrored(fen));
        assert_eq!(
            evaluate(&pos, EvalMode::Full),
            -evaluate(&mirror, EvalMode::Full),
            "full eval asymmetry for {fen}"
        );
        assert_eq!(
            evaluate(&pos, EvalMode::Quiescence),
            -evaluate(&mirror, EvalMode::Quiescence),
            "quiescence eval asymmetry for {fen}"
        );
    }
}

#[test]
fn checkmate_scores_by_side_to_move() {
    // Fool's mate: white has been mated.
    let mated_white = position("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
    assert_eq!(evaluate(&mated_white, EvalMode::Full), -MATE_SCORE);

    // Back-rank mate: black has been mated.
    let mated_black = position("R5k1/5ppp/8/8/8/8/5PPP/6K1 b - - 0 1");
    assert_eq!(evaluate(&mated_black, EvalMode::Full), MATE_SCORE);
}

#[test]
fn stalemate_is_a_draw() {
    let pos = position("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert_eq!(evaluate(&pos, EvalMode::Full), 0);
}

#[test]
fn bare_kings_are_a_draw() {
    let pos = position("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    assert_eq!(evaluate(&pos, EvalMode::Full), 0);
}

#[test]
fn mobility_is_the_only_mode_difference() {
    let pos = position("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w - - 2 3");
    let full = evaluate(&pos, EvalMode::Full);
    let quiescence = evaluate(&pos, EvalMode::Quiescence);
    let endgame = endgame_weight(pos.board());
    assert_eq!(full - quiescence, mobility::evaluate(&pos, endgame));
}

#[test]
fn lone_passed_pawn() {
    let pos = position("4k3/8/8/8/3P4/8/8/4K3 w - - 0 1");
    // Isolated (-20) but passed on the fourth rank (+20 scaled by 0.5).
    assert_eq!(pawns::evaluate(pos.board(), Color::White, 0.0), -10);
}

#[test]
fn doubled_isolated_pawns() {
    let pos = position("4k3/8/8/8/8/1P6/1P6/4K3 w - - 0 1");
    // One doubled pair (-25), two isolated pawns (-40), b3 passed (+5).
    assert_eq!(pawns::evaluate(pos.board(), Color::White, 0.0), -60);
}

#[test]
fn pawn_chain_and_connection() {
    let pos = position("4k3/8/8/4P3/3P4/8/8/4K3 w - - 0 1");
    // d4: passed +10, defends e5 +10, connected +8.
    // e5: passed +18, connected +8.
    assert_eq!(pawns::evaluate(pos.board(), Color::White, 0.0), 54);
}

#[test]
fn candidate_passed_pawn() {
    // c4 is not passed (d5 stops it) but has a clear file and two
    // supporters against one stopper.
    let pos = position("4k3/8/8/3p4/2P5/1P1P4/8/4K3 w - - 0 1");
    // b3: passed +5, chain +10, connected +8. c4: candidate +10, connected
    // on both sides +16. d3: chain +10, connected +8. King shield on d3: +8.
    assert_eq!(pawns::evaluate(pos.board(), Color::White, 0.0), 75);
}

#[test]
fn backward_pawn_needs_a_controlled_blocked_stop() {
    let blocked = position("4k3/8/8/8/2P1p3/3p4/3P4/4K3 w - - 0 1");
    let free = position("4k3/8/8/8/2P5/3p4/3P4/4K3 w - - 0 1");
    // Removing the black e4 pawn uncontrols d3, so only the first white d2
    // pawn is backward.
    assert_eq!(
        pawns::evaluate(blocked.board(), Color::White, 0.0),
        pawns::evaluate(free.board(), Color::White, 0.0) - 15
    );
}

#[test]
fn rook_file_bonuses() {
    let open = position("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
    assert_eq!(rooks::evaluate(open.board(), Color::White, 0.0), 25);

    let semi_open = position("4k3/8/8/8/8/7p/8/4K2R w K - 0 1");
    assert_eq!(rooks::evaluate(semi_open.board(), Color::White, 0.0), 12);
}

#[test]
fn rook_on_the_seventh() {
    let pos = position("4k3/5p1R/8/8/8/8/8/4K3 w - - 0 1");
    // Open file (+25) and a seventh rank with pawns to harvest (+25).
    assert_eq!(rooks::evaluate(pos.board(), Color::White, 0.0), 50);
}

#[test]
fn rook_battery() {
    let pos = position("4k3/8/8/8/8/8/8/R3K2R w - - 0 1");
    // Two open files (+50) and a shared first rank (+15).
    assert_eq!(rooks::evaluate(pos.board(), Color::White, 0.0), 65);
}

#[test]
fn rook_behind_passed_pawn() {
    let pos = position("4k3/8/8/3P4/8/8/8/3RK3 w - - 0 1");
    assert_eq!(rooks::evaluate(pos.board(), Color::White, 1.0), 15);
}

#[test]
fn knight_outpost() {
    let pos = position("4k3/8/8/3N4/2P5/8/8/4K3 w - - 0 1");
    assert_eq!(knights::evaluate(pos.board(), Color::White), 20);

    // An enemy pawn that can still advance and attack cancels the outpost.
    let contested = position("4k3/4p3/8/3N4/2P5/8/8/4K3 w - - 0 1");
    assert_eq!(knights::evaluate(contested.board(), Color::White), 0);
}

#[test]
fn bishop_pair_scales_with_pawns() {
    let bare = position("4k3/8/8/8/8/8/B7/B3K3 w - - 0 1");
    assert_eq!(bishops::evaluate(bare.board(), Color::White), 30);

    let crowded = position("4k3/pppppppp/8/8/8/8/PPPPPPPP/BB2K3 w - - 0 1");
    assert_eq!(bishops::evaluate(crowded.board(), Color::White), 9);
}

#[test]
fn king_zone_pressure_and_penalty() {
    let pos = position("6k1/5Q2/8/8/8/8/8/4K3 b - - 0 1");
    assert_eq!(king::zone_pressure(pos.board(), Color::White), 5);
    assert_eq!(king::attack_penalty(0), 0);
    assert_eq!(king::attack_penalty(1), 10);
    assert_eq!(king::attack_penalty(3), 45);
    assert_eq!(king::attack_penalty(5), 100);
}

#[test]
fn hanging_piece_penalty() {
    // A white knight attacked by a pawn with no pawn cover.
    let pos = position("4k3/8/4p3/3N4/8/8/8/4K3 w - - 0 1");
    assert_eq!(threats::evaluate(pos.board(), Color::White), -20);

    // The same knight covered by a friendly pawn is fine.
    let covered = position("4k3/8/4p3/3N4/2P5/8/8/4K3 w - - 0 1");
    assert_eq!(threats::evaluate(covered.board(), Color::White), 0);
}
