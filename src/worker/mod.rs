// src/worker/mod.rs

//! The analysis worker pool.
//!
//! A fixed number of worker threads pull jobs from a shared FIFO queue. Each
//! worker owns its search state: the transposition and countermove tables
//! live for the thread's lifetime, so repeated tasks in the same worker
//! benefit from earlier work. Results travel back through a oneshot channel
//! per job. Dropping the pool closes the queue; workers finish their current
//! task and exit, and any queued jobs resolve as canceled.

use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use tokio::sync::oneshot;
use tracing::warn;

use crate::engine::search::root::RootLine;
use crate::engine::search::SearchContext;
use crate::engine::{self, EngineError};

/// A unit of analysis: one position searched to one depth.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisTask {
    pub fen: String,
    pub depth: u8,
    pub multi_pv: usize,
    pub task_id: String,
    /// SAN of the root move this task refines, for derived tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_move: Option<String>,
    /// The moves played from the analysis root to reach `fen`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub moves: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub enum WorkerStatus {
    Idle,
    /// Busy with the named task.
    Busy(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskReply {
    Result {
        task_id: String,
        lines: Vec<RootLine>,
        nodes: u64,
    },
    Error {
        task_id: String,
        error: String,
    },
}

pub struct Job {
    task: AnalysisTask,
    reply_tx: oneshot::Sender<TaskReply>,
}

pub struct WorkerPool {
    job_tx: Sender<Job>,
    shutdown: Arc<AtomicBool>,
    statuses: Arc<Mutex<Vec<WorkerStatus>>>,
}

impl WorkerPool {
    /// Spawns `size` detached worker threads sharing one job queue.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let (job_tx, job_rx) = crossbeam_channel::unbounded::<Job>();
        let shutdown = Arc::new(AtomicBool::new(false));
        let statuses = Arc::new(Mutex::new(vec![WorkerStatus::Idle; size]));
        for id in 0..size {
            let job_rx: Receiver<Job> = job_rx.clone();
            let shutdown = Arc::clone(&shutdown);
            let statuses = Arc::clone(&statuses);
            thread::spawn(move || worker_loop(id, job_rx, shutdown, statuses));
        }
        Self { job_tx, shutdown, statuses }
    }

    /// Snapshot of what each worker is doing right now.
    pub fn statuses(&self) -> Vec<WorkerStatus> {
        self.statuses.lock().unwrap().clone()
    }

    /// Queues a task. The receiver resolves with the worker's reply, or as
    /// canceled when the pool is terminated before the task runs.
    pub fn dispatch(&self, task: AnalysisTask) -> oneshot::Receiver<TaskReply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let _ = self.job_tx.send(Job { task, reply_tx });
        reply_rx
    }

    /// Closes the queue and drains pending jobs without running them; their
    /// receivers resolve as canceled. Workers exit after the task they are
    /// currently running.
    pub fn terminate(self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

fn worker_loop(
    id: usize,
    job_rx: Receiver<Job>,
    shutdown: Arc<AtomicBool>,
    statuses: Arc<Mutex<Vec<WorkerStatus>>>,
) {
    let mut context = SearchContext::new();

    while let Ok(job) = job_rx.recv() {
        if shutdown.load(Ordering::SeqCst) {
            // Terminated: drop the job so its receiver reads as canceled.
            continue;
        }
        let task = job.task;
        if let Some(status) = statuses.lock().unwrap().get_mut(id) {
            *status = WorkerStatus::Busy(task.task_id.clone());
        }
        let reply = match engine::parse_fen(&task.fen) {
            Err(err) => TaskReply::Error {
                task_id: task.task_id.clone(),
                error: err.to_string(),
            },
            Ok(pos) => {
                context.nodes = 0;
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    context.search_root(&pos, task.depth, task.multi_pv)
                }));
                match outcome {
                    Ok(lines) => TaskReply::Result {
                        task_id: task.task_id.clone(),
                        lines,
                        nodes: context.nodes,
                    },
                    Err(payload) => {
                        let failure = EngineError::TaskFailed {
                            task_id: task.task_id.clone(),
                            message: panic_message(payload),
                        };
                        warn!(worker = id, error = %failure, "search panicked; rebuilding worker state");
                        context = SearchContext::new();
                        TaskReply::Error {
                            task_id: task.task_id.clone(),
                            error: failure.to_string(),
                        }
                    }
                }
            }
        };
        let _ = job.reply_tx.send(reply);
        if let Some(status) = statuses.lock().unwrap().get_mut(id) {
            *status = WorkerStatus::Idle;
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
