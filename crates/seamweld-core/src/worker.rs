//! Shared thread pool and cooperative cancellation for the pipeline.
//!
//! Every stage that fans out per-tile, per-triangle, or per-observation work
//! (the rasterizer, the coherent-index builder, the multigrid solver, the
//! panorama tiler) runs its `rayon` fan-out on the same [`WorkerPool`]
//! instead of the global rayon pool, so a caller embedding `seamweld` in a
//! larger process can size and share one pool across stages.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::{Error, Result};

/// A sized `rayon` thread pool shared across pipeline stages.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
}

impl WorkerPool {
    /// Builds a pool with `threads` workers. `0` means
    /// `std::thread::available_parallelism()`.
    pub fn new(threads: usize) -> Result<Self> {
        let threads = if threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            threads
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| Error::other(format!("failed to build worker pool: {e}")))?;
        Ok(Self { pool })
    }

    /// Number of worker threads in the pool.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs `f` on the pool, blocking the caller until it returns.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(f)
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(0).expect("default worker pool construction should not fail")
    }
}

/// Cooperative cancellation flag checked between triangles, V-cycles, or
/// tiles. Cloning is cheap (shares the underlying flag); there is no
/// internal timeout, callers decide when to flip it.
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a token that is not yet cancelled.
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Requests cancellation. Visible to every clone of this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns `true` if [`Self::cancel`] has been called.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_pool_runs_work() {
        let pool = WorkerPool::new(2).unwrap();
        let sum: i32 = pool.install(|| (0..100).sum());
        assert_eq!(sum, 4950);
    }

    #[test]
    fn test_cancellation_token_shared() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
