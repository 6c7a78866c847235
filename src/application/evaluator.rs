//! Evaluation off the calling thread.
//!
//! Jobs run on a dedicated rayon pool. Each job owns an immutable
//! [`CellState`] snapshot and sends back a new one over a channel, so the
//! caller never shares mutable state with a worker.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Instant;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::domain::{CellState, GameOfLifeAlgorithm};
use crate::error::{Error, Result};

/// Submits evaluations to a background thread pool.
///
/// Jobs from [`submit`](Self::submit) share one evaluator. A
/// [`HashLifeAlgorithm`](crate::HashLifeAlgorithm) holds its node table
/// lock for a whole computation, so such jobs run one at a time however
/// many threads the pool has. Pass a separate instance per job through
/// [`submit_with`](Self::submit_with) to evaluate them in parallel.
pub struct BackgroundEvaluator {
    pool: ThreadPool,
    algorithm: Arc<dyn GameOfLifeAlgorithm>,
}

impl BackgroundEvaluator {
    /// `threads == 0` lets rayon pick one thread per core
    pub fn new(algorithm: Arc<dyn GameOfLifeAlgorithm>, threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("life-eval-{}", i))
            .build()?;
        Ok(Self { pool, algorithm })
    }

    /// Swap the evaluator used by later submissions
    pub fn set_algorithm(&mut self, algorithm: Arc<dyn GameOfLifeAlgorithm>) {
        self.algorithm = algorithm;
    }

    /// Queue an evaluation of `state` advanced by `step` generations
    pub fn submit(&self, state: CellState, step: u64) -> EvaluationHandle {
        self.submit_with(Arc::clone(&self.algorithm), state, step)
    }

    /// Like [`submit`](Self::submit), but evaluated with `algorithm`
    pub fn submit_with(
        &self,
        algorithm: Arc<dyn GameOfLifeAlgorithm>,
        state: CellState,
        step: u64,
    ) -> EvaluationHandle {
        let (sender, receiver) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let job_cancelled = Arc::clone(&cancelled);

        self.pool.spawn(move || {
            if job_cancelled.load(Ordering::Acquire) {
                log::debug!("evaluation of {} generations cancelled before start", step);
                return;
            }
            let start = Instant::now();
            let result = algorithm.compute_generation_with_step(&state, step);
            log::debug!(
                "background evaluation of {} generations finished in {:.3} ms",
                step,
                start.elapsed().as_secs_f64() * 1000.0
            );
            // The handle may already be gone; nobody wants the result then.
            let _ = sender.send(result);
        });

        EvaluationHandle {
            receiver,
            cancelled,
        }
    }
}

/// Pending result of a [`BackgroundEvaluator::submit`] call.
/// Dropping the handle abandons the result.
pub struct EvaluationHandle {
    receiver: Receiver<CellState>,
    cancelled: Arc<AtomicBool>,
}

impl EvaluationHandle {
    /// Ask the job not to run. A job already running still finishes its
    /// generations, but its result is discarded.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Block until the job finishes
    pub fn wait(self) -> Result<CellState> {
        match self.receiver.recv() {
            _ if self.is_cancelled() => Err(Error::Cancelled),
            Ok(state) => Ok(state),
            Err(_) => Err(Error::WorkerDisconnected),
        }
    }

    /// Non-blocking poll: `Ok(None)` while the job is still running
    pub fn try_result(&self) -> Result<Option<CellState>> {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }
        match self.receiver.try_recv() {
            Ok(state) => Ok(Some(state)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(Error::WorkerDisconnected),
        }
    }
}
