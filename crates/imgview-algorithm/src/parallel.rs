use std::any::Any;
use std::fmt;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// Every chunk needs exactly one state.
    #[error("got {states} worker states for {chunks} chunks")]
    StateCountMismatch {
        /// Number of chunks.
        chunks: usize,
        /// Number of states.
        states: usize,
    },

    /// A worker panicked while processing its chunk.
    #[error("worker {worker} panicked: {message}")]
    WorkerPanicked {
        /// Index of the chunk the worker was processing.
        worker: usize,
        /// The panic payload, when it was a string.
        message: String,
    },
}

/// Controls how chunked operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionStrategy {
    /// Run every chunk sequentially on the current thread.
    #[default]
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead
    /// for small inputs.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Picks the strategy for a requested worker count.
    ///
    /// Counts of 0 and 1 run serially; anything larger gets a pool of that size.
    pub fn from_num_threads(num_threads: usize) -> Self {
        match num_threads {
            0 | 1 => ExecutionStrategy::Serial,
            n => ExecutionStrategy::Fixed(n),
        }
    }

    /// Returns the number of workers this strategy runs.
    pub fn num_threads(&self) -> usize {
        match self {
            ExecutionStrategy::Serial => 1,
            ExecutionStrategy::Fixed(n) => *n,
        }
    }
}

/// A contiguous range of flat indices processed by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the chunk in the partition.
    pub index: usize,
    /// First flat index of the chunk.
    pub start: usize,
    /// Number of indices in the chunk.
    pub len: usize,
}

impl Chunk {
    /// Returns the flat range covered by the chunk.
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

/// Partitions `[0, total)` into `max(1, num_threads)` contiguous chunks.
///
/// Chunk lengths differ by at most one; the longer chunks come first. When
/// there are more threads than indices the trailing chunks are empty.
///
/// # Example
///
/// ```
/// use imgview_algorithm::parallel::divide_into_chunks;
///
/// let chunks = divide_into_chunks(10, 3);
/// let lens: Vec<usize> = chunks.iter().map(|c| c.len).collect();
/// assert_eq!(lens, vec![4, 3, 3]);
/// ```
pub fn divide_into_chunks(total: usize, num_threads: usize) -> Vec<Chunk> {
    let n = num_threads.max(1);
    let base = total / n;
    let extra = total % n;

    let mut chunks = Vec::with_capacity(n);
    let mut start = 0;
    for index in 0..n {
        let len = base + usize::from(index < extra);
        chunks.push(Chunk { index, start, len });
        start += len;
    }
    chunks
}

/// Runs `task` once per chunk, handing each call its own state.
///
/// With [`ExecutionStrategy::Fixed`] a pool of that many threads is built for
/// this call only and every task has finished when the function returns.
/// Errors and panics of individual tasks are recorded; once all tasks are done
/// the failure of the lowest chunk index is returned and any further failures
/// are logged.
///
/// # Arguments
///
/// * `strategy` - How to run the tasks.
/// * `chunks` - The partition, usually from [`divide_into_chunks`].
/// * `states` - One state per chunk, moved into its task.
/// * `task` - The work to run for a chunk.
///
/// # Errors
///
/// Returns [`ParallelError::StateCountMismatch`] if `states` and `chunks`
/// differ in length, [`ParallelError::InvalidThreadCount`] for `Fixed(0)`,
/// [`ParallelError::BuildError`] if the pool cannot be built,
/// [`ParallelError::WorkerPanicked`] for a panicking task, or the task's own error.
pub fn run_chunked<S, E, F>(
    strategy: ExecutionStrategy,
    chunks: &[Chunk],
    states: Vec<S>,
    task: F,
) -> Result<(), E>
where
    S: Send,
    E: Send + fmt::Display + From<ParallelError>,
    F: Fn(&Chunk, S) -> Result<(), E> + Sync,
{
    if chunks.len() != states.len() {
        return Err(ParallelError::StateCountMismatch {
            chunks: chunks.len(),
            states: states.len(),
        }
        .into());
    }

    log::debug!(
        "running {} chunks with {:?}: {:?}",
        chunks.len(),
        strategy,
        chunks.iter().map(|c| c.len).collect::<Vec<_>>()
    );

    let mut results: Vec<Option<Result<(), E>>> = (0..chunks.len()).map(|_| None).collect();

    match strategy {
        ExecutionStrategy::Serial => {
            for ((chunk, state), slot) in chunks.iter().zip(states).zip(results.iter_mut()) {
                *slot = Some(run_guarded(&task, chunk, state));
            }
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n).into());
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .thread_name(|i| format!("morphology-worker-{i}"))
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            let task = &task;
            pool.scope(|scope| {
                for ((chunk, state), slot) in chunks.iter().zip(states).zip(results.iter_mut()) {
                    scope.spawn(move |_| {
                        *slot = Some(run_guarded(task, chunk, state));
                    });
                }
            });
        }
    }

    let mut first_failure = None;
    for (index, result) in results.into_iter().enumerate() {
        let result = result.unwrap_or_else(|| {
            Err(ParallelError::WorkerPanicked {
                worker: index,
                message: "worker did not report a result".to_string(),
            }
            .into())
        });
        if let Err(e) = result {
            if first_failure.is_none() {
                first_failure = Some(e);
            } else {
                log::warn!("chunk {index} also failed: {e}");
            }
        }
    }

    match first_failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn run_guarded<S, E, F>(task: &F, chunk: &Chunk, state: S) -> Result<(), E>
where
    E: From<ParallelError>,
    F: Fn(&Chunk, S) -> Result<(), E>,
{
    match panic::catch_unwind(AssertUnwindSafe(|| task(chunk, state))) {
        Ok(result) => result,
        Err(payload) => Err(ParallelError::WorkerPanicked {
            worker: chunk.index,
            message: panic_message(payload.as_ref()),
        }
        .into()),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_are_balanced_and_cover_the_range() {
        for total in [0, 1, 2, 7, 10, 64, 101] {
            for threads in [0, 1, 2, 3, 5, 17] {
                let chunks = divide_into_chunks(total, threads);
                assert_eq!(chunks.len(), threads.max(1));

                let mut next = 0;
                for (i, chunk) in chunks.iter().enumerate() {
                    assert_eq!(chunk.index, i);
                    assert_eq!(chunk.start, next);
                    next += chunk.len;
                }
                assert_eq!(next, total);

                let longest = chunks.iter().map(|c| c.len).max().unwrap_or(0);
                let shortest = chunks.iter().map(|c| c.len).min().unwrap_or(0);
                assert!(longest - shortest <= 1, "total {total} threads {threads}");
            }
        }
    }

    #[test]
    fn test_more_threads_than_elements() {
        let chunks = divide_into_chunks(2, 5);
        let lens: Vec<usize> = chunks.iter().map(|c| c.len).collect();
        assert_eq!(lens, vec![1, 1, 0, 0, 0]);
        assert_eq!(chunks[4].range(), 2..2);
    }

    #[test]
    fn test_from_num_threads() {
        assert_eq!(ExecutionStrategy::from_num_threads(0), ExecutionStrategy::Serial);
        assert_eq!(ExecutionStrategy::from_num_threads(1), ExecutionStrategy::Serial);
        assert_eq!(ExecutionStrategy::from_num_threads(4), ExecutionStrategy::Fixed(4));
        assert_eq!(ExecutionStrategy::Fixed(4).num_threads(), 4);
    }

    fn fill(strategy: ExecutionStrategy) -> Result<Vec<usize>, ParallelError> {
        let mut data = vec![0usize; 23];
        let chunks = divide_into_chunks(data.len(), strategy.num_threads());
        let mut states = Vec::new();
        let mut rest = data.as_mut_slice();
        for chunk in &chunks {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(chunk.len);
            states.push(head);
            rest = tail;
        }
        run_chunked(strategy, &chunks, states, |chunk, part: &mut [usize]| {
            for (offset, value) in part.iter_mut().enumerate() {
                *value = chunk.start + offset;
            }
            Ok::<(), ParallelError>(())
        })?;
        Ok(data)
    }

    #[test]
    fn test_every_strategy_writes_every_element() -> Result<(), ParallelError> {
        let expected: Vec<usize> = (0..23).collect();
        assert_eq!(fill(ExecutionStrategy::Serial)?, expected);
        assert_eq!(fill(ExecutionStrategy::Fixed(2))?, expected);
        assert_eq!(fill(ExecutionStrategy::Fixed(5))?, expected);
        Ok(())
    }

    #[test]
    fn test_lowest_failing_chunk_is_reported() {
        let _ = env_logger::builder().is_test(true).try_init();
        let chunks = divide_into_chunks(8, 4);
        let res = run_chunked(ExecutionStrategy::Fixed(4), &chunks, vec![(); 4], |chunk, ()| {
            if chunk.index >= 2 {
                return Err(ParallelError::InvalidThreadCount(chunk.index));
            }
            Ok(())
        });
        assert_eq!(res, Err(ParallelError::InvalidThreadCount(2)));
    }

    #[test]
    fn test_panics_become_errors() {
        let chunks = divide_into_chunks(4, 2);
        for strategy in [ExecutionStrategy::Serial, ExecutionStrategy::Fixed(2)] {
            let res = run_chunked(strategy, &chunks, vec![(); 2], |chunk, ()| {
                if chunk.index == 1 {
                    panic!("boom");
                }
                Ok::<(), ParallelError>(())
            });
            assert_eq!(
                res,
                Err(ParallelError::WorkerPanicked {
                    worker: 1,
                    message: "boom".to_string()
                })
            );
        }
    }

    #[test]
    fn test_invalid_arguments() {
        let chunks = divide_into_chunks(4, 2);
        let res = run_chunked(ExecutionStrategy::Serial, &chunks, vec![(); 3], |_, ()| {
            Ok::<(), ParallelError>(())
        });
        assert!(matches!(
            res,
            Err(ParallelError::StateCountMismatch {
                chunks: 2,
                states: 3
            })
        ));

        let res = run_chunked(ExecutionStrategy::Fixed(0), &chunks, vec![(); 2], |_, ()| {
            Ok::<(), ParallelError>(())
        });
        assert!(matches!(res, Err(ParallelError::InvalidThreadCount(0))));
    }
}
