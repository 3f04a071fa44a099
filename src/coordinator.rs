// src/coordinator.rs

//! The multi-plan coordinator.
//!
//! `start` fans every generated task out over a fresh worker pool, then folds
//! completions back into a ranked per-root-move line list, invoking the
//! update callback after every settled task and once more with the final
//! flag when the run is complete.

use futures_util::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::engine::search::root::RootLine;
use crate::engine::{self, EngineError};
use crate::palette;
use crate::plan::{self, ROOT_TASK_ID};
use crate::worker::{AnalysisTask, TaskReply, WorkerPool};

#[derive(Clone, Debug)]
pub struct CoordinatorConfig {
    pub worker_count: usize,
    pub max_plans: usize,
    pub max_depth: u8,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get(),
            max_plans: 128,
            max_depth: 4,
        }
    }
}

/// One aggregated candidate line: a root move, its score from the root
/// side's perspective, and the best known continuation.
#[derive(Clone, Debug, Serialize)]
pub struct Line {
    pub root_move: String,
    pub score: i32,
    pub moves: Vec<String>,
    pub color: &'static str,
    pub plan_count: u32,
    pub depth: u8,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchStats {
    pub nodes: u64,
    pub nps: u64,
    pub elapsed_seconds: f64,
    pub tasks: usize,
    pub total: usize,
    #[serde(rename = "final")]
    pub is_final: bool,
}

pub type UpdateFn = dyn Fn(&[Line], &SearchStats) + Send + Sync;

struct PlanRecord {
    task: AnalysisTask,
    lines: Option<Vec<RootLine>>,
}

/// Requests that a running `start` call wind down.
#[derive(Clone)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

pub struct Coordinator {
    config: CoordinatorConfig,
    on_update: Box<UpdateFn>,
    stop_flag: Arc<AtomicBool>,
    records: HashMap<String, PlanRecord>,
    order: Vec<String>,
    total_nodes: u64,
    settled: usize,
}

impl Coordinator {
    pub fn new(
        config: CoordinatorConfig,
        on_update: impl Fn(&[Line], &SearchStats) + Send + Sync + 'static,
    ) -> Self {
        Self {
            config,
            on_update: Box::new(on_update),
            stop_flag: Arc::new(AtomicBool::new(false)),
            records: HashMap::new(),
            order: Vec::new(),
            total_nodes: 0,
            settled: 0,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle { flag: Arc::clone(&self.stop_flag) }
    }

    /// Marks the coordinator idle. A run in progress notices the flag at its
    /// next task completion, terminates the pool and discards the rest.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// Analyses `fen` to completion, emitting an update per settled task and
    /// a final one at the end. Returns the final ranked lines.
    pub async fn start(&mut self, fen: &str) -> Result<Vec<Line>, EngineError> {
        self.stop_flag.store(false, Ordering::SeqCst);
        self.records.clear();
        self.order.clear();
        self.total_nodes = 0;
        self.settled = 0;

        let pos = engine::parse_fen(fen)?;
        let started = Instant::now();
        let pool = WorkerPool::new(self.config.worker_count);
        let tasks = plan::generate_plans(&pos, self.config.max_plans, self.config.max_depth);
        info!(fen, tasks = tasks.len(), workers = self.config.worker_count, "analysis started");

        let mut pending = FuturesUnordered::new();
        for task in tasks {
            let task_id = task.task_id.clone();
            self.order.push(task_id.clone());
            let rx = pool.dispatch(task.clone());
            self.records.insert(task_id.clone(), PlanRecord { task, lines: None });
            pending.push(async move { (task_id, rx.await) });
        }

        let mut stopped = false;
        while let Some((task_id, reply)) = pending.next().await {
            if self.stop_flag.load(Ordering::SeqCst) {
                stopped = true;
                break;
            }
            self.settled += 1;
            match reply {
                Ok(TaskReply::Result { lines, nodes, .. }) => {
                    self.total_nodes += nodes;
                    debug!(task = %task_id, nodes, "task settled");
                    if let Some(record) = self.records.get_mut(&task_id) {
                        record.lines = Some(lines);
                    }
                }
                Ok(TaskReply::Error { error, .. }) => {
                    debug!(task = %task_id, %error, "task failed");
                }
                Err(_) => {
                    debug!(task = %task_id, "task canceled");
                }
            }
            self.emit(started, false);
        }

        pool.terminate();
        if stopped {
            info!("analysis stopped");
            return Ok(self.build_lines());
        }

        let lines = self.emit(started, true);
        info!(nodes = self.total_nodes, elapsed = ?started.elapsed(), "analysis complete");
        Ok(lines)
    }

    fn emit(&self, started: Instant, is_final: bool) -> Vec<Line> {
        let lines = self.build_lines();
        let elapsed = started.elapsed().as_secs_f64();
        let nps = if elapsed > 0.0 {
            (self.total_nodes as f64 / elapsed).round() as u64
        } else {
            0
        };
        let stats = SearchStats {
            nodes: self.total_nodes,
            nps,
            elapsed_seconds: elapsed,
            tasks: self.settled,
            total: self.config.max_plans,
            is_final,
        };
        (self.on_update)(&lines, &stats);
        lines
    }

    /// Rebuilds the ranking from scratch: the root task seeds one line per
    /// returned move, derived tasks create lines for moves the root task
    /// did not cover and extend continuations they agree on.
    fn build_lines(&self) -> Vec<Line> {
        let mut lines: Vec<Line> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut color_idx = 0usize;

        if let Some(root) = self.records.get(ROOT_TASK_ID) {
            if let Some(root_lines) = &root.lines {
                for rl in root_lines {
                    index.insert(rl.san.clone(), lines.len());
                    lines.push(Line {
                        root_move: rl.san.clone(),
                        score: rl.score,
                        moves: vec![rl.san.clone()],
                        color: palette::color(color_idx),
                        plan_count: 0,
                        depth: self.config.max_depth,
                    });
                    color_idx += 1;
                }
            }
        }

        for task_id in &self.order {
            if task_id == ROOT_TASK_ID {
                continue;
            }
            let record = match self.records.get(task_id) {
                Some(record) => record,
                None => continue,
            };
            let best = match record.lines.as_ref().and_then(|lines| lines.first()) {
                Some(best) => best,
                None => continue,
            };
            let root_move = match &record.task.root_move {
                Some(san) => san.clone(),
                None => continue,
            };

            // Task scores are from the side to move after the prefix; an odd
            // prefix means the opponent, so negate back to root perspective.
            let score = if record.task.moves.len() % 2 == 1 {
                -best.score
            } else {
                best.score
            };

            match index.get(&root_move) {
                None => {
                    let mut moves = record.task.moves.clone();
                    moves.push(best.san.clone());
                    index.insert(root_move.clone(), lines.len());
                    lines.push(Line {
                        root_move: root_move.clone(),
                        score,
                        moves,
                        color: palette::color(color_idx),
                        plan_count: 1,
                        depth: record.task.depth,
                    });
                    color_idx += 1;
                }
                Some(&at) => {
                    let line = &mut lines[at];
                    let mut continuation = record.task.moves.clone();
                    continuation.push(best.san.clone());
                    if continuation.len() > line.moves.len()
                        && continuation.starts_with(&line.moves)
                    {
                        line.moves = continuation;
                    }
                    line.plan_count += 1;
                }
            }
        }

        lines.sort_by(|a, b| b.score.cmp(&a.score));
        lines
    }
}
