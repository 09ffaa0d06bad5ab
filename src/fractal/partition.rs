//! Static block decomposition of image rows over a fixed set of workers.
//!
//! Worker `k` of `P` renders rows `[k·(H/P), k·(H/P) + rows_k)` where
//! `rows_k = H/P` for every worker but the last, which also takes the `H mod P`
//! leftover rows. The blocks are contiguous, so the output buffer can be split
//! into one exclusive slab per worker up front.
//!
//! The calling thread renders block 0 itself and spawns workers `1..P` on a
//! dedicated pool of `P - 1` threads, then waits for all of them.
//!
//! Blocks are equal in rows, not in work: escape times vary across the image, so
//! the worker holding the interior of the set finishes last.

use std::ops::Range;

use log::{debug, error, info};

use crate::{
    error::{thread_pool_error, validation_error, worker_limit_error, Result},
    fractal::viewport::{render_slab, Viewport},
    MAX_WORKERS,
};

/// Row range assigned to `worker` when `height` rows are split over `workers`.
///
/// `workers` must be at least 1 and `worker < workers`.
#[inline(always)]
pub fn row_range(worker: usize, workers: usize, height: usize) -> Range<usize> {
    debug_assert!(worker < workers, "worker {worker} out of {workers}");

    let block = height / workers;
    let start = worker * block;
    let rows = if worker == workers - 1 {
        height - block * (workers - 1)
    } else {
        block
    };

    start..start + rows
}

/// Everything one worker needs, including exclusive ownership of its rows.
#[derive(Debug)]
pub struct WorkerDescriptor<'a> {
    pub id: usize,
    pub viewport: Viewport,
    pub width: usize,
    pub height: usize,
    pub rows: Range<usize>,
    pub budget: u32,
    output: &'a mut [u32],
}

impl WorkerDescriptor<'_> {
    /// Renders the worker's rows into its slab.
    pub fn run(self) {
        debug!(
            "worker {} rendering rows {}..{} ({} rows)",
            self.id,
            self.rows.start,
            self.rows.end,
            self.rows.len()
        );

        render_slab(
            &self.viewport,
            self.width,
            self.height,
            self.rows.start,
            self.budget,
            self.output,
        );
    }
}

/// Splits renders into row blocks for at most `max_workers` workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPartitioner {
    max_workers: usize,
}

impl Default for RowPartitioner {
    fn default() -> Self {
        Self::new(MAX_WORKERS)
    }
}

impl RowPartitioner {
    pub fn new(max_workers: usize) -> Self {
        Self { max_workers }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    fn check(&self, workers: usize) -> Result<()> {
        if workers > self.max_workers {
            let err = worker_limit_error(workers, self.max_workers);
            error!("{err}");
            return Err(err);
        }

        if workers == 0 {
            return Err(validation_error("worker count must be at least 1"));
        }

        Ok(())
    }

    /// Row ranges for every worker, in worker order.
    ///
    /// # Errors
    ///
    /// Fails when `workers` is zero or above the configured ceiling.
    pub fn plan(&self, workers: usize, height: usize) -> Result<Vec<Range<usize>>> {
        self.check(workers)?;

        Ok((0..workers)
            .map(|worker| row_range(worker, workers, height))
            .collect())
    }

    /// Builds one descriptor per worker, each owning the slab of `buffer` that
    /// covers its rows.
    ///
    /// # Panics
    ///
    /// Panics if `buffer` holds fewer than `width * height` elements.
    pub fn describe<'a>(
        &self,
        workers: usize,
        viewport: &Viewport,
        width: usize,
        height: usize,
        budget: u32,
        buffer: &'a mut [u32],
    ) -> Result<Vec<WorkerDescriptor<'a>>> {
        let ranges = self.plan(workers, height)?;

        let mut rest = &mut buffer[..width * height];
        let mut descriptors = Vec::with_capacity(workers);

        for (id, rows) in ranges.into_iter().enumerate() {
            let (output, tail) = std::mem::take(&mut rest).split_at_mut(rows.len() * width);
            rest = tail;

            descriptors.push(WorkerDescriptor {
                id,
                viewport: *viewport,
                width,
                height,
                rows,
                budget,
                output,
            });
        }

        Ok(descriptors)
    }

    /// Renders the full `width × height` grid with `workers` concurrent workers.
    ///
    /// Every pixel ends up identical to a single-worker
    /// [`render_rows`](crate::fractal::render_rows) over the whole grid.
    ///
    /// # Errors
    ///
    /// Returns [`MasklaneError::WorkerLimitExceeded`](crate::MasklaneError::WorkerLimitExceeded)
    /// when `workers` is above the ceiling; nothing is rendered in that case.
    pub fn render(
        &self,
        workers: usize,
        viewport: &Viewport,
        width: usize,
        height: usize,
        budget: u32,
        buffer: &mut [u32],
    ) -> Result<()> {
        let mut descriptors = self
            .describe(workers, viewport, width, height, budget, buffer)?
            .into_iter();

        let Some(orchestrator) = descriptors.next() else {
            return Ok(());
        };

        if workers > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers - 1)
                .thread_name(|index| format!("masklane-worker-{}", index + 1))
                .build()
                .map_err(|err| thread_pool_error(err.to_string()))?;

            pool.in_place_scope(|scope| {
                for worker in descriptors {
                    scope.spawn(move |_| worker.run());
                }

                orchestrator.run();
            });
        } else {
            orchestrator.run();
        }

        info!("rendered {width}x{height} with {workers} workers, budget {budget}");

        Ok(())
    }
}

/// Renders the whole grid with `workers` workers under the default
/// [`MAX_WORKERS`] ceiling.
pub fn render_parallel(
    workers: usize,
    viewport: &Viewport,
    width: usize,
    height: usize,
    budget: u32,
    buffer: &mut [u32],
) -> Result<()> {
    RowPartitioner::default().render(workers, viewport, width, height, budget, buffer)
}
