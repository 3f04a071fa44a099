// src/engine/search/root.rs

//! Iterative deepening with aspiration windows over every root move, keeping
//! the best `multi_pv` lines.

use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Color, Position};

use crate::constants::{INFINITY, MATE_BOUND};
use crate::engine;

use super::heuristics::MoveKey;
use super::SearchContext;

const ASPIRATION_NARROW: i32 = 50;
const ASPIRATION_WIDE: i32 = 150;

/// One ranked root move. The score is from the perspective of the side to
/// move at the root.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RootLine {
    pub san: String,
    pub uci: String,
    pub score: i32,
}

impl SearchContext {
    /// Searches every legal root move to `max_depth` and returns the best
    /// `multi_pv` of them, sorted by descending score. A terminal root
    /// position yields an empty list.
    pub fn search_root(&mut self, pos: &Chess, max_depth: u8, multi_pv: usize) -> Vec<RootLine> {
        self.begin_search();

        let root_color = pos.turn();
        let mut lines = Vec::new();

        for m in pos.legal_moves() {
            let san = engine::san_string(pos, m);
            let uci = engine::uci_string(&m);
            let mut child = pos.clone();
            child.play_unchecked(m);
            // Seed the stack so ply-1 countermove lookups see their parent.
            self.move_stack.set(0, MoveKey::of(&m));
            let maximizing = child.turn() == Color::White;

            let mut score = 0;
            for depth in 1..=max_depth {
                score = if depth == 1 {
                    self.search(&child, depth, -INFINITY, INFINITY, maximizing, 1)
                } else {
                    self.aspiration(&child, depth, score, maximizing)
                };
                // A forced mate will not change at higher depths.
                if score.abs() >= MATE_BOUND {
                    break;
                }
            }

            let score = if root_color == Color::Black { -score } else { score };
            lines.push(RootLine { san, uci, score });
        }

        lines.sort_by(|a, b| b.score.cmp(&a.score));
        lines.truncate(multi_pv);
        lines
    }

    /// Searches a narrow window around the previous iteration's score and
    /// widens twice on a miss before giving up and going full width.
    fn aspiration(&mut self, pos: &Chess, depth: u8, previous: i32, maximizing: bool) -> i32 {
        for margin in [ASPIRATION_NARROW, ASPIRATION_WIDE] {
            let alpha = previous - margin;
            let beta = previous + margin;
            let score = self.search(pos, depth, alpha, beta, maximizing, 1);
            if score > alpha && score < beta {
                return score;
            }
        }
        self.search(pos, depth, -INFINITY, INFINITY, maximizing, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::parse_fen;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn opening_multi_pv_prefers_development() {
        let pos = parse_fen(START_FEN).unwrap();
        let mut ctx = SearchContext::new();
        let lines = ctx.search_root(&pos, 1, 3);
        assert_eq!(lines.len(), 3);
        let principal = ["e2e4", "d2d4", "g1f3", "c2c4"];
        assert!(
            principal.contains(&lines[0].uci.as_str()),
            "unexpected top move {}",
            lines[0].uci
        );
        assert!(lines[0].score.abs() < 100);
    }

    #[test]
    fn finds_mate_in_one() {
        let pos = parse_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1").unwrap();
        let mut ctx = SearchContext::new();
        let lines = ctx.search_root(&pos, 2, 1);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].san, "Ra8#");
        assert!(lines[0].score >= MATE_BOUND);
    }

    #[test]
    fn scores_are_from_the_root_side_for_black() {
        // Black is a queen up and to move; the score must be positive for
        // the side to move.
        let pos = parse_fen("3qk3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        let mut ctx = SearchContext::new();
        let lines = ctx.search_root(&pos, 2, 1);
        assert!(!lines.is_empty());
        assert!(lines[0].score > 500, "got {}", lines[0].score);
    }

    #[test]
    fn king_and_pawn_endgame_stays_sane() {
        // The pawn is blocked by the black king, so every candidate is a
        // king move.
        let pos = parse_fen("8/8/8/4k3/4P3/4K3/8/8 w - - 0 1").unwrap();
        let mut ctx = SearchContext::new();
        let lines = ctx.search_root(&pos, 4, 5);
        assert_eq!(lines.len(), 5);
        assert!(lines[0].san.starts_with('K'));
        assert!(lines[0].score.abs() < 1000);
    }

    #[test]
    fn terminal_root_returns_no_lines() {
        let pos = parse_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let mut ctx = SearchContext::new();
        assert!(ctx.search_root(&pos, 3, 4).is_empty());
    }

    #[test]
    fn repeated_search_in_one_context_is_stable() {
        // The TT persists between root searches, so a second identical
        // search must agree on the top move.
        let pos = parse_fen(START_FEN).unwrap();
        let mut ctx = SearchContext::new();
        let first = ctx.search_root(&pos, 3, 1);
        let second = ctx.search_root(&pos, 3, 1);
        assert_eq!(first[0].uci, second[0].uci);
    }

    #[test]
    fn search_leaves_the_position_untouched() {
        let pos = parse_fen(START_FEN).unwrap();
        let before = crate::engine::fen_string(&pos);
        let mut ctx = SearchContext::new();
        ctx.search_root(&pos, 2, 8);
        assert_eq!(crate::engine::fen_string(&pos), before);
    }
}
