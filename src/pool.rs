//! Bounded-concurrency map executor with order-preserving output.
//!
//! [`WorkerPool::map`] applies a fallible function across a slice of
//! independent work units on a rayon pool of bounded size. Results come back
//! index-aligned with the input regardless of completion order, and a pool of
//! one worker degrades to plain sequential iteration with identical output.
//!
//! Work functions must be stateless with respect to their surroundings: each
//! unit may read only its own input and immutable configuration, since
//! execution order and concurrency degree are unspecified.

use rayon::prelude::*;

use crate::error::PoolError;

/// Result type for pool operations.
pub type PoolResult<T> = std::result::Result<T, PoolError>;

/// Default number of items handed to a worker at a time.
pub const DEFAULT_CHUNK_SIZE: usize = 20;

/// A bounded worker pool for order-preserving parallel maps.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
    chunk_size: usize,
}

impl WorkerPool {
    /// Create a pool with the given worker bound (clamped to at least 1).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the minimum number of items dispatched to a worker at a time.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// The worker bound.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Apply `f` to every item, returning results in input order.
    ///
    /// Fail-fast: the first error aborts the whole map and surfaces as
    /// [`PoolError::Task`] naming the failing input index; no partial results
    /// are returned. With one worker the map runs sequentially on the calling
    /// thread and reports the first failing index deterministically.
    pub fn map<T, R, E, F>(&self, items: &[T], f: F) -> PoolResult<Vec<R>>
    where
        T: Sync,
        R: Send,
        E: std::error::Error + Send + Sync + 'static,
        F: Fn(&T) -> Result<R, E> + Send + Sync,
    {
        if self.workers <= 1 {
            return items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    f(item).map_err(|e| PoolError::Task {
                        index,
                        source: Box::new(e),
                    })
                })
                .collect();
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| PoolError::Build {
                message: e.to_string(),
            })?;

        pool.install(|| {
            items
                .par_iter()
                .with_min_len(self.chunk_size)
                .enumerate()
                .map(|(index, item)| {
                    f(item).map_err(|e| PoolError::Task {
                        index,
                        source: Box::new(e),
                    })
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(pool: &WorkerPool, items: &[&str]) -> PoolResult<Vec<i64>> {
        let owned: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        pool.map(&owned, |s| s.parse::<i64>())
    }

    #[test]
    fn output_is_index_aligned_with_input() {
        let items: Vec<usize> = (0..200).collect();
        let results = WorkerPool::new(4)
            .with_chunk_size(3)
            .map(&items, |&i| Ok::<_, std::convert::Infallible>(i * 2))
            .unwrap();
        assert_eq!(results, (0..200).map(|i| i * 2).collect::<Vec<_>>());
    }

    #[test]
    fn single_worker_matches_parallel_output() {
        let items: Vec<usize> = (0..100).collect();
        let sequential = WorkerPool::new(1)
            .map(&items, |&i| Ok::<_, std::convert::Infallible>(i + 7))
            .unwrap();
        let parallel = WorkerPool::new(8)
            .with_chunk_size(1)
            .map(&items, |&i| Ok::<_, std::convert::Infallible>(i + 7))
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn failure_names_the_failing_index() {
        let items = ["1", "2", "oops", "4"];

        for workers in [1, 4] {
            let err = parse_all(&WorkerPool::new(workers).with_chunk_size(1), &items).unwrap_err();
            match err {
                PoolError::Task { index, .. } => assert_eq!(index, 2),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn sequential_failure_reports_first_failing_index() {
        let items = ["1", "bad", "also bad", "4"];
        let err = parse_all(&WorkerPool::new(1), &items).unwrap_err();
        assert!(matches!(err, PoolError::Task { index: 1, .. }));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let items: Vec<u8> = vec![];
        let results = WorkerPool::new(4)
            .map(&items, |&b| Ok::<_, std::convert::Infallible>(b))
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn zero_workers_clamps_to_one() {
        assert_eq!(WorkerPool::new(0).workers(), 1);
    }
}
