// src/engine/search/lmr.rs

//! Precomputed late-move-reduction table: reductions grow with both the
//! remaining depth and how late the move is in the ordered list.

use once_cell::sync::Lazy;

const DEPTH_BUCKETS: usize = 32;
const MOVE_BUCKETS: usize = 64;

static REDUCTIONS: Lazy<[[u8; MOVE_BUCKETS]; DEPTH_BUCKETS]> = Lazy::new(|| {
    let mut table = [[0u8; MOVE_BUCKETS]; DEPTH_BUCKETS];
    for (depth, row) in table.iter_mut().enumerate().skip(1) {
        for (index, cell) in row.iter_mut().enumerate().skip(1) {
            let raw = 0.75 + (depth as f64).ln() * ((index + 1) as f64).ln() / 2.25;
            *cell = (raw.floor() as u8).max(1);
        }
    }
    table
});

pub fn reduction(depth: u8, move_index: usize) -> u8 {
    REDUCTIONS[(depth as usize).min(DEPTH_BUCKETS - 1)][move_index.min(MOVE_BUCKETS - 1)]
}
