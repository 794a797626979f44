//! Worker pool for per-file phase work.
//!
//! A thin wrapper around a dedicated rayon pool. Phases that only read the
//! state hand their per-file closures to [`WorkerPool::map`]; results come back
//! in input order so diagnostics and trees stay deterministic.

use std::sync::Arc;

use garnet_check::FileMapper;
use rayon::prelude::*;
use tracing::{debug, warn};

/// 8 MiB: deep class nesting recurses through every visitor.
const WORKER_STACK_SIZE: usize = 8 * 1024 * 1024;

#[derive(Clone, Default)]
pub struct WorkerPool {
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl WorkerPool {
    /// A pool with `threads` workers. `0` runs everything on the caller.
    pub fn new(threads: usize) -> Self {
        if threads == 0 {
            return WorkerPool::inline();
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .stack_size(WORKER_STACK_SIZE)
            .thread_name(|i| format!("garnet-worker-{i}"))
            .build()
        {
            Ok(pool) => {
                debug!(threads, "worker pool ready");
                WorkerPool {
                    pool: Some(Arc::new(pool)),
                }
            }
            Err(e) => {
                warn!("failed to create worker pool ({e}), running inline");
                WorkerPool::inline()
            }
        }
    }

    pub fn inline() -> Self {
        WorkerPool { pool: None }
    }

    pub fn threads(&self) -> usize {
        self.pool.as_ref().map_or(0, |pool| pool.current_num_threads())
    }

    /// Consume `items`, mapping each on the pool. Order is preserved.
    pub fn map_into<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(|| items.into_par_iter().map(f).collect()),
            None => items.into_iter().map(f).collect(),
        }
    }
}

impl FileMapper for WorkerPool {
    fn map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(|| items.par_iter().map(f).collect()),
            None => items.iter().map(f).collect(),
        }
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.threads())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_preserves_order() {
        for pool in [WorkerPool::inline(), WorkerPool::new(4)] {
            let items: Vec<u32> = (0..1000).collect();
            let doubled = pool.map(&items, |n| n * 2);
            assert_eq!(doubled, items.iter().map(|n| n * 2).collect::<Vec<_>>());

            let owned = pool.map_into(items.clone(), |n| n + 1);
            assert_eq!(owned[0], 1);
            assert_eq!(owned[999], 1000);
        }
    }

    #[test]
    fn test_zero_threads_is_inline() {
        assert_eq!(WorkerPool::new(0).threads(), 0);
        assert_eq!(WorkerPool::new(2).threads(), 2);
    }
}
