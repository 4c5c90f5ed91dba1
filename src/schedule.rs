//! Parallel dispatch of per-voxel aggregation.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::{
    error::Error,
    interception::{aggregate, InterceptionStats, OcclusionStats, FULL_WIDTH, REDUCED_WIDTH},
    spatial::{Float, Segment},
    voxel::VoxelGrid,
};

/// Per-call settings for [intercept_voxels].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Worker threads for this call; `0` uses one per available hardware thread.
    pub threads: usize,
    /// Whether to measure path lengths (full table) or only classify rays (occlusion table).
    pub with_path_length: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            with_path_length: true,
        }
    }
}

impl SchedulerConfig {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_path_length(mut self, with_path_length: bool) -> Self {
        self.with_path_length = with_path_length;
        self
    }
}

type Observer = dyn Fn(usize, usize) + Send + Sync;

/// Shared progress counter and cancellation flag for one scheduler run.
///
/// The counter is incremented once per finished voxel, so a completed run leaves it at the voxel
/// count. Cancellation is only observed between voxels: voxels already being processed finish.
#[derive(Default)]
pub struct Progress {
    completed: AtomicUsize,
    cancelled: AtomicBool,
    observer: Option<Box<Observer>>,
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress")
            .field("completed", &self.completed())
            .field("cancelled", &self.is_cancelled())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `observer(completed, total)` from the worker thread after each finished voxel.
    pub fn with_observer(observer: impl Fn(usize, usize) + Send + Sync + 'static) -> Self {
        Self {
            observer: Some(Box::new(observer)),
            ..Self::default()
        }
    }

    #[inline]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Ask the scheduler to stop dispatching voxels.
    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    #[inline]
    fn tick(&self, total: usize) {
        let done = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(observer) = &self.observer {
            observer(done, total);
        }
    }
}

/// One interception row per voxel, in grid order.
#[derive(Debug, Clone, PartialEq)]
pub struct InterceptionTable<Real: Float> {
    rows: Vec<InterceptionStats<Real>>,
    with_path_length: bool,
}

impl<Real: Float> InterceptionTable<Real> {
    #[inline]
    pub fn rows(&self) -> &[InterceptionStats<Real>] {
        &self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether path lengths were measured.
    #[inline]
    pub fn has_path_length(&self) -> bool {
        self.with_path_length
    }

    pub fn occlusion(&self) -> Vec<OcclusionStats> {
        self.rows.iter().map(InterceptionStats::occlusion).collect()
    }

    /// Number of matrix columns: 9 with path lengths, 3 without.
    #[inline]
    pub fn width(&self) -> usize {
        if self.with_path_length {
            FULL_WIDTH
        } else {
            REDUCED_WIDTH
        }
    }

    /// Lay the table out as a G × 9 (full) or G × 3 (occlusion) matrix.
    pub fn to_matrix(&self) -> DMatrix<Real> {
        let data: Vec<Real> = if self.with_path_length {
            self.rows.iter().flat_map(|r| r.to_row()).collect()
        } else {
            self.rows
                .iter()
                .flat_map(|r| r.occlusion().to_row::<Real>())
                .collect()
        };
        DMatrix::from_row_slice(self.rows.len(), self.width(), &data)
    }

    pub fn into_rows(self) -> Vec<InterceptionStats<Real>> {
        self.rows
    }
}

/// Aggregate every ray against every voxel of `grid`, one voxel per task.
///
/// A dedicated worker pool sized by `config.threads` is built for the call. Each voxel's row is
/// written only by the task that owns it, so the table does not depend on the thread count.
///
/// # Errors
///
/// * [`ThreadPool`](Error::ThreadPool) if the worker pool can't be started.
/// * [`Cancelled`](Error::Cancelled) if `progress` was cancelled before every voxel was processed.
#[tracing::instrument(
    skip_all,
    fields(voxels = grid.len(), rays = rays.len(), threads = config.threads)
)]
pub fn intercept_voxels<Real: Float>(
    grid: &VoxelGrid<Real>,
    rays: &[Segment<Real>],
    config: &SchedulerConfig,
    progress: Option<&Progress>,
) -> Result<InterceptionTable<Real>, Error<Real>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .thread_name(|i| format!("voxray-{i}"))
        .build()?;

    let total = grid.len();
    let with_path_length = config.with_path_length;
    let mut rows = vec![InterceptionStats::default(); total];
    tracing::debug!(
        workers = pool.current_num_threads(),
        with_path_length,
        "dispatching voxel tasks"
    );

    let dispatched = pool.install(|| {
        rows.par_iter_mut()
            .zip(grid.par_aabbs())
            .try_for_each(|(row, bb)| {
                if progress.is_some_and(Progress::is_cancelled) {
                    tracing::trace!("skipping voxel after cancellation");
                    return Err(());
                }
                *row = aggregate(&bb, rays, with_path_length);
                if let Some(progress) = progress {
                    progress.tick(total);
                }
                Ok(())
            })
    });

    if dispatched.is_err() {
        let completed = progress.map_or(0, Progress::completed);
        tracing::warn!(completed, total, "interception cancelled");
        return Err(Error::Cancelled { completed, total });
    }

    tracing::debug!("all voxel tasks finished");
    Ok(InterceptionTable {
        rows,
        with_path_length,
    })
}
