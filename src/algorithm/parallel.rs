use std::panic::{self, AssertUnwindSafe};
use std::sync::RwLock;
use std::thread;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::algorithm::barrier::CancellableBarrier;
use crate::algorithm::floyd_warshall::relax_row;
use crate::algorithm::AllPairsShortestPath;
use crate::matrix::{DistanceMatrix, SuccessorMatrix, Weight};
use crate::{Error, Result};

/// How workers are kept in lockstep between rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarrierStrategy {
    /// Fan out one rayon task per row block every round and join before the next
    ///
    /// The join plays the part of a kernel-launch boundary.
    #[default]
    ForkJoin,
    /// Spawn one thread per row block for the whole run and meet at a counting barrier
    ///
    /// A worker that panics cancels the barrier, so the others stop at their
    /// next wait and the run returns [`Error::WorkerPanicked`].
    Persistent,
}

/// Floyd-Warshall with the rows of every round split across threads
///
/// Every round starts from a snapshot of row `k`. Workers read `row[k]` from
/// their own rows and the bridge values from the snapshot, and each worker
/// writes only the rows it owns. No round starts before the previous one has
/// finished on every worker. Results are identical to [`FloydWarshall`].
///
/// An explicit thread count is capped at the machine's available
/// parallelism. If a worker fails mid-run the matrix is left partially
/// updated and an error is returned.
///
/// [`FloydWarshall`]: crate::algorithm::floyd_warshall::FloydWarshall
#[derive(Debug, Clone)]
pub struct ParallelFloydWarshall {
    /// Barrier flavour used between rounds
    strategy: BarrierStrategy,
    /// Number of worker threads, 0 picks the available parallelism
    num_threads: usize,
    /// Smallest number of rows handed to one task
    min_rows_per_task: usize,
}

impl Default for ParallelFloydWarshall {
    fn default() -> Self {
        Self::new()
    }
}

impl ParallelFloydWarshall {
    /// Create a new parallel engine with default settings
    pub fn new() -> Self {
        ParallelFloydWarshall {
            strategy: BarrierStrategy::ForkJoin,
            num_threads: 0,
            min_rows_per_task: 1,
        }
    }

    /// Set the barrier strategy
    pub fn with_strategy(mut self, strategy: BarrierStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the number of worker threads (0 = use all available cores)
    ///
    /// Counts above the available parallelism are capped when the engine runs.
    pub fn with_num_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }

    /// Set the minimum row block size given to a single task
    pub fn with_min_rows_per_task(mut self, rows: usize) -> Self {
        self.min_rows_per_task = rows.max(1);
        self
    }

    pub fn strategy(&self) -> BarrierStrategy {
        self.strategy
    }

    /// Threads that will actually run, given the pool in scope
    fn resolved_threads(&self) -> usize {
        match self.num_threads {
            0 => rayon::current_num_threads(),
            n => n.min(available_cores()),
        }
    }

    fn fork_join<W: Weight>(&self, cells: &mut [W], n: usize, mut next: Option<&mut [usize]>) -> usize {
        // Enough blocks to keep every thread busy, but never below the floor
        let rows_per_block = (n / (self.resolved_threads() * 4)).max(self.min_rows_per_task).max(1);
        let block = rows_per_block * n;
        let mut pivot = vec![W::infinity(); n];
        let mut improved = 0;

        for k in 0..n {
            pivot.copy_from_slice(&cells[k * n..(k + 1) * n]);
            let pivot = &pivot[..];

            let relax_block = |block_index: usize, rows: &mut [W], mut next_rows: Option<&mut [usize]>| -> usize {
                let first_row = block_index * rows_per_block;
                let mut count = 0;
                for (r, row) in rows.chunks_mut(n).enumerate() {
                    if first_row + r == k {
                        continue;
                    }
                    let next_row = next_rows.as_deref_mut().map(|nr| &mut nr[r * n..(r + 1) * n]);
                    count += relax_row(row, pivot, k, next_row);
                }
                count
            };

            // The sum below only returns once every block is done: that is the round barrier
            let round: usize = match next.as_deref_mut() {
                None => cells
                    .par_chunks_mut(block)
                    .enumerate()
                    .map(|(b, rows)| relax_block(b, rows, None))
                    .sum(),
                Some(next) => cells
                    .par_chunks_mut(block)
                    .zip(next.par_chunks_mut(block))
                    .enumerate()
                    .map(|(b, (rows, next_rows))| relax_block(b, rows, Some(next_rows)))
                    .sum(),
            };
            log::trace!("round {}: {} cells improved", k, round);
            improved += round;
        }

        improved
    }

    fn persistent<W: Weight>(&self, cells: &mut [W], n: usize, next: Option<&mut [usize]>) -> Result<usize> {
        let threads = self.resolved_threads().clamp(1, n);
        let rows_per_worker = ((n + threads - 1) / threads).max(self.min_rows_per_task);
        let workers = (n + rows_per_worker - 1) / rows_per_worker;
        let block = rows_per_worker * n;

        let barrier = CancellableBarrier::new(workers);
        let pivot = RwLock::new(vec![W::infinity(); n]);
        let next_blocks: Vec<Option<&mut [usize]>> = match next {
            Some(next) => next.chunks_mut(block).map(Some).collect(),
            None => (0..workers).map(|_| None).collect(),
        };

        log::debug!("{} persistent workers, {} rows each", workers, rows_per_worker);

        thread::scope(|s| {
            let mut handles = Vec::with_capacity(workers);
            for (w, (rows, mut next_rows)) in cells.chunks_mut(block).zip(next_blocks).enumerate() {
                let barrier = &barrier;
                let pivot = &pivot;
                let spawned = thread::Builder::new()
                    .name(format!("fw-worker-{}", w))
                    .spawn_scoped(s, move || {
                        let run = panic::catch_unwind(AssertUnwindSafe(|| {
                            let first_row = w * rows_per_worker;
                            let owned = first_row..first_row + rows.len() / n;
                            let mut improved = 0;

                            for k in 0..n {
                                if owned.contains(&k) {
                                    let local = k - first_row;
                                    let mut shared = pivot.write().unwrap_or_else(|e| e.into_inner());
                                    shared.copy_from_slice(&rows[local * n..(local + 1) * n]);
                                }
                                // Pivot row published
                                if barrier.wait().is_cancelled() {
                                    return None;
                                }

                                {
                                    let shared = pivot.read().unwrap_or_else(|e| e.into_inner());
                                    for (r, row) in rows.chunks_mut(n).enumerate() {
                                        if first_row + r == k {
                                            continue;
                                        }
                                        let next_row = next_rows.as_deref_mut().map(|nr| &mut nr[r * n..(r + 1) * n]);
                                        improved += relax_row(row, &shared[..], k, next_row);
                                    }
                                }
                                // Round finished everywhere
                                if barrier.wait().is_cancelled() {
                                    return None;
                                }
                            }

                            Some(improved)
                        }));

                        match run {
                            Ok(Some(improved)) => Ok(improved),
                            // Another worker gave up first
                            Ok(None) => Err(Error::WorkerPanicked),
                            Err(_) => {
                                log::error!("worker {} panicked in a relaxation round", w);
                                barrier.cancel();
                                Err(Error::WorkerPanicked)
                            }
                        }
                    });

                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        log::error!("could not spawn worker {}: {}", w, e);
                        barrier.cancel();
                        return Err(Error::ThreadPool(e.to_string()));
                    }
                }
            }

            handles
                .into_iter()
                .map(|handle| handle.join().map_err(|_| Error::WorkerPanicked).and_then(|run| run))
                .sum::<Result<usize>>()
        })
    }
}

fn available_cores() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Runs `f`, turning a panic raised by any worker into an error
fn catch_worker_panic<T>(f: impl FnOnce() -> T) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|_| {
        log::error!("a relaxation task panicked, the matrix is left partially updated");
        Error::WorkerPanicked
    })
}

impl<W: Weight> AllPairsShortestPath<W> for ParallelFloydWarshall {
    fn name(&self) -> &'static str {
        match self.strategy {
            BarrierStrategy::ForkJoin => "ParallelFloydWarshall(fork-join)",
            BarrierStrategy::Persistent => "ParallelFloydWarshall(persistent)",
        }
    }

    fn relax_all(&self, matrix: &mut DistanceMatrix<W>, successors: Option<&mut SuccessorMatrix>) -> Result<usize> {
        let n = matrix.dimension();
        if n == 0 {
            return Ok(0);
        }

        let cells = matrix.as_mut_slice();
        let next = successors.map(|s| s.as_mut_slice());

        match self.strategy {
            BarrierStrategy::Persistent => self.persistent(cells, n, next),
            BarrierStrategy::ForkJoin if self.num_threads == 0 => catch_worker_panic(|| self.fork_join(cells, n, next)),
            BarrierStrategy::ForkJoin => {
                let threads = self.resolved_threads();
                if threads < self.num_threads {
                    log::debug!("{} threads requested, capped at {}", self.num_threads, threads);
                }
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| Error::ThreadPool(e.to_string()))?;
                log::debug!("running on a dedicated pool of {} threads", threads);
                catch_worker_panic(|| pool.install(|| self.fork_join(cells, n, next)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::floyd_warshall::FloydWarshall;
    use crate::matrix::DuplicateEdgePolicy;

    fn build(n: usize, edges: &[(usize, usize, i64)]) -> DistanceMatrix<i64> {
        DistanceMatrix::from_edges(n, edges.iter().copied(), DuplicateEdgePolicy::KeepLast).unwrap()
    }

    fn engines() -> Vec<ParallelFloydWarshall> {
        let mut engines = Vec::new();
        for strategy in [BarrierStrategy::ForkJoin, BarrierStrategy::Persistent] {
            for threads in [1, 2, 3, 8] {
                engines.push(ParallelFloydWarshall::new().with_strategy(strategy).with_num_threads(threads));
            }
        }
        engines.push(ParallelFloydWarshall::new().with_min_rows_per_task(4));
        engines
    }

    #[test]
    fn matches_sequential_on_small_graph() {
        let edges = [(0, 1, 4), (0, 2, 1), (2, 1, 2), (1, 3, 1), (2, 3, 5), (3, 4, 3), (4, 0, 2)];
        let mut expected = build(5, &edges);
        FloydWarshall::new().compute(&mut expected).unwrap();

        for engine in engines() {
            let mut m = build(5, &edges);
            engine.compute(&mut m).unwrap();
            assert_eq!(m, expected, "{:?}", engine);
        }
    }

    #[test]
    fn more_threads_than_rows() {
        let mut m = build(2, &[(0, 1, 5), (1, 0, 5)]);
        let engine = ParallelFloydWarshall::new()
            .with_strategy(BarrierStrategy::Persistent)
            .with_num_threads(16);
        engine.compute(&mut m).unwrap();
        assert_eq!(m.as_slice(), &[0, 5, 5, 0]);
    }

    /// Integer weight whose addition blows up when it starts from 13
    #[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
    struct Fragile(i64);

    impl Weight for Fragile {
        fn infinity() -> Self {
            Fragile(i64::MAX)
        }

        fn zero() -> Self {
            Fragile(0)
        }

        fn is_infinite(&self) -> bool {
            self.0 == i64::MAX
        }

        fn path_add(self, other: Self) -> Self {
            if self.0 == 13 {
                panic!("cannot extend a path of length 13");
            }
            Fragile(self.0.path_add(other.0))
        }
    }

    #[test]
    fn worker_panic_becomes_error() {
        // Only the row of vertex 3 reaches vertex 0 with weight 13, so exactly
        // one worker fails in the first round while the others wait for it
        let edges: [(usize, usize, i64); 4] = [(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 0, 13)];
        for strategy in [BarrierStrategy::Persistent, BarrierStrategy::ForkJoin] {
            for threads in [0, 2, 4] {
                let mut m = DistanceMatrix::from_edges(
                    4,
                    edges.iter().map(|&(u, v, w)| (u, v, Fragile(w))),
                    DuplicateEdgePolicy::KeepLast,
                )
                .unwrap();
                let engine = ParallelFloydWarshall::new().with_strategy(strategy).with_num_threads(threads);
                let err = engine.compute(&mut m).unwrap_err();
                assert!(matches!(err, Error::WorkerPanicked), "{:?}", engine);
                assert!(!m.is_relaxed());
            }
        }
    }

    #[test]
    fn thread_count_is_capped() {
        let engine = ParallelFloydWarshall::new().with_num_threads(100_000);
        assert!(engine.resolved_threads() <= available_cores());

        let mut m = build(3, &[(0, 1, 1), (1, 2, 1)]);
        engine.with_strategy(BarrierStrategy::Persistent).compute(&mut m).unwrap();
        assert_eq!(m.get(0, 2), 2);
    }

    #[test]
    fn empty_matrix() {
        for engine in engines() {
            let mut m: DistanceMatrix<i64> = DistanceMatrix::new(0);
            let summary = engine.compute(&mut m).unwrap();
            assert_eq!(summary.relaxations, 0);
        }
    }
}
