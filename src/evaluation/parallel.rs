//! Scatter a pure function over a slice, gather the results in input order.

use rayon::prelude::*;

use crate::error::EvaluationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    Sequential,
    /// Dedicated rayon pool with a fixed number of threads.
    ThreadPool { workers: usize },
}

impl ExecutionStrategy {
    /// `0` and `1` both mean sequential.
    pub fn from_worker_count(workers: usize) -> Self {
        if workers <= 1 {
            Self::Sequential
        } else {
            Self::ThreadPool { workers }
        }
    }

    pub fn workers(&self) -> usize {
        match *self {
            Self::Sequential => 1,
            Self::ThreadPool { workers } => workers,
        }
    }

    /// Applies `f` to every item; `out[i] == f(&items[i])` whatever the
    /// completion order across workers.
    pub fn scatter_gather<T, R, F>(&self, items: &[T], f: F) -> Result<Vec<R>, EvaluationError>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        match *self {
            Self::Sequential => Ok(items.iter().map(f).collect()),
            Self::ThreadPool { workers } => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .build()
                    .map_err(|e| EvaluationError::runtime("build evaluation thread pool", e))?;
                Ok(pool.install(|| items.par_iter().map(f).collect()))
            }
        }
    }

    /// [`scatter_gather`](Self::scatter_gather) followed by a left fold over
    /// the ordered results.
    pub fn scatter_gather_fold<T, R, A, F, G>(
        &self,
        items: &[T],
        f: F,
        init: A,
        fold: G,
    ) -> Result<(Vec<R>, A), EvaluationError>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
        G: FnMut(A, &R) -> A,
    {
        let results = self.scatter_gather(items, f)?;
        let acc = results.iter().fold(init, fold);
        Ok((results, acc))
    }
}
