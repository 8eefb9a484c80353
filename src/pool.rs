//! Per-point worker pool
//!
//! Each configuration point gets its own rayon pool sized to exactly the
//! requested thread count. The pool is dropped when the point is done, so no
//! parallelism setting leaks into the next measurement.

use tracing::debug;

use crate::{Error, Result};

/// A rayon thread pool with a fixed number of workers.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    threads: usize,
}

impl WorkerPool {
    /// Build a pool with exactly `threads` workers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for `threads == 0` and
    /// [`Error::ThreadPool`] if the OS refuses to spawn the workers.
    pub fn new(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(Error::InvalidConfig(
                "thread count must be at least 1".to_string(),
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|idx| format!("bench-worker-{idx}"))
            .build()?;
        debug!(threads, "worker pool ready");
        Ok(Self { pool, threads })
    }

    /// Number of workers in this pool.
    #[must_use]
    pub const fn threads(&self) -> usize {
        self.threads
    }

    /// Run `op` inside the pool; rayon parallel iterators inside `op` use
    /// this pool's workers only.
    pub fn install<R, OP>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.threads)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_size_is_exact() {
        for threads in [1, 2, 4] {
            let pool = WorkerPool::new(threads).unwrap();
            assert_eq!(pool.threads(), threads);
            assert_eq!(pool.install(rayon::current_num_threads), threads);
        }
    }

    #[test]
    fn test_zero_threads_rejected() {
        let err = WorkerPool::new(0).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_worker_thread_names() {
        let pool = WorkerPool::new(2).unwrap();
        let name = pool.install(|| std::thread::current().name().map(str::to_string));
        assert!(name.unwrap().starts_with("bench-worker-"));
    }
}
