// src/engine/search.rs

//! The single-position search core.
//!
//! `SearchContext` holds everything a worker mutates while searching: the
//! transposition table and countermove table (which survive across root
//! searches), the killer/history tables and move stack (reset per root
//! search) and the node counter. The search itself is a minimax over
//! white-positive scores; `maximizing` is true exactly when white is to
//! move.

pub mod heuristics;
pub mod lmr;
pub mod quiescence;
pub mod root;
pub mod tt;

use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{Chess, EnPassantMode, Move, Position, Square};
use std::cmp::Reverse;

use crate::constants::{INFINITY, MATE_SCORE};
use crate::engine::evaluation::{self, piece_value, EvalMode};
use heuristics::{CountermoveTable, HistoryTable, KillerTable, MoveKey, MoveStack};
use tt::{Bound, TranspositionTable};

const NULL_MOVE_REDUCTION: u8 = 3;
const RAZOR_MARGIN: [i32; 3] = [0, 200, 350];
const FUTILITY_MARGIN: [i32; 4] = [0, 150, 300, 500];
const LMP_THRESHOLD: [usize; 3] = [0, 5, 12];
const LMR_MIN_DEPTH: u8 = 3;
const LMR_MIN_MOVE_INDEX: usize = 2;

pub struct SearchContext {
    pub tt: TranspositionTable,
    pub countermoves: CountermoveTable,
    pub killers: KillerTable,
    pub history: HistoryTable,
    pub move_stack: MoveStack,
    pub nodes: u64,
}

impl SearchContext {
    pub fn new() -> Self {
        Self {
            tt: TranspositionTable::new(),
            countermoves: CountermoveTable::new(),
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            move_stack: MoveStack::new(),
            nodes: 0,
        }
    }

    /// Per-root-search reset. The TT and countermove table survive so that
    /// consecutive searches in the same worker keep their accumulated
    /// knowledge.
    pub fn begin_search(&mut self) {
        self.killers.clear();
        self.move_stack.clear();
        self.history.decay();
    }

    pub fn search(
        &mut self,
        pos: &Chess,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        ply: usize,
    ) -> i32 {
        self.nodes += 1;

        // Mate-distance pruning: nothing past this node can beat a mate
        // already available at a shorter distance.
        alpha = alpha.max(-(MATE_SCORE - ply as i32));
        beta = beta.min(MATE_SCORE - ply as i32);
        if alpha >= beta {
            return alpha;
        }

        let key = pos.zobrist_hash::<Zobrist64>(EnPassantMode::Legal);
        if let Some(score) = self.tt.probe(key, depth, alpha, beta) {
            return score;
        }

        if depth == 0 {
            return self.quiescence(pos, alpha, beta, maximizing);
        }

        let legal = pos.legal_moves();
        if legal.is_empty() || pos.is_game_over() {
            return evaluation::evaluate(pos, EvalMode::Full);
        }

        let in_check = pos.is_check();

        // Null move: hand the opponent a free tempo; if the position still
        // fails high the real moves will too.
        if !in_check && depth >= NULL_MOVE_REDUCTION + 1 {
            if let Some(null_pos) = crate::engine::null_move_position(pos) {
                if !null_pos.is_check() {
                    let score = self.search(
                        &null_pos,
                        depth - 1 - NULL_MOVE_REDUCTION,
                        alpha,
                        beta,
                        !maximizing,
                        ply + 1,
                    );
                    if maximizing && score >= beta {
                        return beta;
                    }
                    if !maximizing && score <= alpha {
                        return alpha;
                    }
                }
            }
        }

        let mut static_eval: Option<i32> = None;

        // Razoring on the maximizing side: a hopeless static eval at low
        // depth gets one zero-width quiescence probe to confirm.
        if !in_check && maximizing && (1..=2).contains(&depth) {
            let eval = evaluation::evaluate(pos, EvalMode::Full);
            static_eval = Some(eval);
            if eval + RAZOR_MARGIN[depth as usize] < alpha {
                let score = self.quiescence(pos, alpha - 1, alpha, maximizing);
                if score < alpha {
                    return score;
                }
            }
        }

        if depth <= 3 && static_eval.is_none() {
            static_eval = Some(evaluation::evaluate(pos, EvalMode::Full));
        }

        let tt_move = self.tt.probe_move(key);
        let parent = self.move_stack.get(ply.wrapping_sub(1));
        let counter = parent.and_then(|p| self.countermoves.get(p));

        let mut moves: Vec<Move> = legal.to_vec();
        moves.sort_by_key(|m| Reverse(self.order_score(m, ply, tt_move, counter)));

        let entry_alpha = alpha;
        let entry_beta = beta;
        let mut best = if maximizing { -INFINITY } else { INFINITY };
        let mut best_move: Option<MoveKey> = None;
        let mut searched = 0usize;
        let mut late_quiets = 0usize;

        for (mi, m) in moves.iter().enumerate() {
            let quiet = !m.is_capture() && m.promotion().is_none();

            if quiet && !in_check && depth <= 3 {
                if let Some(eval) = static_eval {
                    let margin = FUTILITY_MARGIN[depth as usize];
                    if maximizing && eval + margin <= alpha {
                        continue;
                    }
                    if !maximizing && eval - margin >= beta {
                        continue;
                    }
                }
            }

            if quiet && !in_check && depth <= 2 && searched >= 1 {
                late_quiets += 1;
                if late_quiets > LMP_THRESHOLD[depth as usize] {
                    continue;
                }
            }

            let move_key = MoveKey::of(m);
            self.move_stack.set(ply, move_key);
            let mut child = pos.clone();
            child.play_unchecked(*m);
            let gives_check = child.is_check();
            let new_depth = depth - 1;

            let score = if mi == 0 {
                self.search(&child, new_depth, alpha, beta, !maximizing, ply + 1)
            } else {
                let mut reduction = 0;
                if mi >= LMR_MIN_MOVE_INDEX
                    && depth >= LMR_MIN_DEPTH
                    && quiet
                    && !gives_check
                    && !in_check
                {
                    reduction = lmr::reduction(depth, mi).min(new_depth);
                }
                let (zw_alpha, zw_beta) = if maximizing {
                    (alpha, alpha + 1)
                } else {
                    (beta - 1, beta)
                };
                let zw_score = self.search(
                    &child,
                    new_depth - reduction,
                    zw_alpha,
                    zw_beta,
                    !maximizing,
                    ply + 1,
                );
                if zw_score > alpha && zw_score < beta {
                    self.search(&child, new_depth, alpha, beta, !maximizing, ply + 1)
                } else {
                    zw_score
                }
            };
            searched += 1;

            if maximizing {
                if score > best {
                    best = score;
                    best_move = Some(move_key);
                }
                if score > alpha {
                    alpha = score;
                    if quiet {
                        self.history.reward(move_key, i32::from(depth));
                    }
                }
            } else {
                if score < best {
                    best = score;
                    best_move = Some(move_key);
                }
                if score < beta {
                    beta = score;
                    if quiet {
                        self.history.reward(move_key, i32::from(depth));
                    }
                }
            }

            if alpha >= beta {
                if quiet {
                    self.killers.insert(ply, (move_key.from, move_key.to));
                    self.history.reward(move_key, i32::from(depth).pow(2));
                    if let Some(parent_key) = parent {
                        self.countermoves.insert(parent_key, move_key);
                    }
                }
                break;
            }
        }

        // Every move was pruned: fail hard to the entry bound the prunes
        // were measured against.
        if searched == 0 {
            return if maximizing { entry_alpha } else { entry_beta };
        }

        let bound = if best >= entry_beta {
            Bound::Lower
        } else if best <= entry_alpha {
            Bound::Upper
        } else {
            Bound::Exact
        };
        self.tt
            .store(key, depth, best, bound, best_move.map(|k| (k.from, k.to)));

        best
    }

    fn order_score(
        &self,
        m: &Move,
        ply: usize,
        tt_move: Option<(Square, Square)>,
        counter: Option<MoveKey>,
    ) -> i32 {
        let key = MoveKey::of(m);
        let mut score = 0;
        if tt_move == Some((key.from, key.to)) {
            score += 300;
        }
        if let Some(victim) = m.capture() {
            score += 10 * piece_value(victim) - piece_value(m.role());
        }
        if let Some(promotion) = m.promotion() {
            score += 8 * piece_value(promotion);
        }
        if self.killers.matches(ply, (key.from, key.to)) {
            score += 90;
        }
        if !m.is_capture() && m.promotion().is_none() {
            if counter == Some(key) {
                score += 75;
            }
            score += (self.history.get(key) / 100).min(80);
        }
        score
    }
}

impl Default for SearchContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MATE_BOUND;
    use crate::engine::parse_fen;

    #[test]
    fn finds_the_hanging_queen() {
        // White to move can simply take the queen on d5.
        let pos = parse_fen("4k3/8/8/3q4/8/2N5/8/4K3 w - - 0 1").unwrap();
        let mut ctx = SearchContext::new();
        let score = ctx.search(&pos, 3, -INFINITY, INFINITY, true, 1);
        assert!(score > 300, "expected a winning capture, got {score}");
    }

    #[test]
    fn minimizing_side_wins_the_hanging_queen() {
        // Black to move takes the queen on d5 with the knight.
        let pos = parse_fen("4k3/8/1n6/3Q4/8/8/8/4K3 b - - 0 1").unwrap();
        let mut ctx = SearchContext::new();
        let score = ctx.search(&pos, 3, -INFINITY, INFINITY, false, 1);
        assert!(score < -300, "expected black to win the queen, got {score}");
    }

    #[test]
    fn mated_position_scores_from_the_static_verdict() {
        // White has already been mated by Qh4#.
        let pos = parse_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
        let mut ctx = SearchContext::new();
        let score = ctx.search(&pos, 2, -INFINITY, INFINITY, true, 1);
        assert!(score <= -MATE_BOUND, "white is mated, got {score}");
    }

    #[test]
    fn search_does_not_disturb_the_caller_position() {
        let pos = parse_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w - - 2 3").unwrap();
        let before = crate::engine::fen_string(&pos);
        let mut ctx = SearchContext::new();
        ctx.search(&pos, 3, -INFINITY, INFINITY, true, 1);
        assert_eq!(crate::engine::fen_string(&pos), before);
    }

    #[test]
    fn node_counter_accumulates() {
        let pos = parse_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        let mut ctx = SearchContext::new();
        ctx.search(&pos, 2, -INFINITY, INFINITY, true, 1);
        assert!(ctx.nodes > 0);
    }
}
