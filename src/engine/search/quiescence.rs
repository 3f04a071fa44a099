// src/engine/search/quiescence.rs

//! Quiescence search: resolves captures (and check evasions) past the main
//! search horizon so that the evaluation is never taken in the middle of a
//! tactical exchange. The stand-pat evaluation runs with the mobility term
//! suppressed.

use shakmaty::{Chess, Move, Position};
use std::cmp::Reverse;

use crate::constants::MATE_SCORE;
use crate::engine::evaluation::{self, piece_value, EvalMode};

use super::SearchContext;

const DELTA_MARGIN: i32 = 200;

impl SearchContext {
    pub fn quiescence(&mut self, pos: &Chess, mut alpha: i32, mut beta: i32, maximizing: bool) -> i32 {
        self.nodes += 1;

        let in_check = pos.is_check();
        let mut stand_pat = None;

        if !in_check {
            let eval = evaluation::evaluate(pos, EvalMode::Quiescence);
            if maximizing {
                if eval >= beta {
                    return beta;
                }
                if eval > alpha {
                    alpha = eval;
                }
            } else {
                if eval <= alpha {
                    return alpha;
                }
                if eval < beta {
                    beta = eval;
                }
            }
            stand_pat = Some(eval);
        }

        let legal = pos.legal_moves();
        if in_check && legal.is_empty() {
            return if maximizing { -MATE_SCORE } else { MATE_SCORE };
        }

        // In check every evasion must be tried; otherwise only captures and
        // promotions can improve on the stand-pat.
        let mut candidates: Vec<Move> = if in_check {
            legal.to_vec()
        } else {
            legal
                .iter()
                .filter(|m| m.is_capture() || m.promotion().is_some())
                .copied()
                .collect()
        };
        candidates.sort_by_key(|m| Reverse(tactical_score(m)));

        for m in candidates {
            // Delta pruning: even winning the victim outright cannot bring
            // this capture back into the window.
            if !in_check {
                if let (Some(eval), Some(victim)) = (stand_pat, m.capture()) {
                    let swing = piece_value(victim) + DELTA_MARGIN;
                    if maximizing && eval + swing < alpha {
                        continue;
                    }
                    if !maximizing && eval - swing > beta {
                        continue;
                    }
                }
            }

            let mut child = pos.clone();
            child.play_unchecked(m);
            let score = self.quiescence(&child, alpha, beta, !maximizing);

            if maximizing {
                if score >= beta {
                    return beta;
                }
                if score > alpha {
                    alpha = score;
                }
            } else {
                if score <= alpha {
                    return alpha;
                }
                if score < beta {
                    beta = score;
                }
            }
        }

        if maximizing {
            alpha
        } else {
            beta
        }
    }
}

fn tactical_score(m: &Move) -> i32 {
    let mut score = 0;
    if let Some(victim) = m.capture() {
        score += 10 * piece_value(victim) - piece_value(m.role());
    }
    if let Some(promotion) = m.promotion() {
        score += 8 * piece_value(promotion);
    }
    score
}
