use std::io::Write;

use clap::Parser;
use nalgebra::Point3;
use voxray::{matrix, EdgeLength, Progress, SchedulerConfig};

mod cli;
mod table;

use cli::{Cli, Command};

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error(transparent)]
    Table(#[from] table::TableError),
    #[error(transparent)]
    Engine(#[from] voxray::Error<f64>),
}

/// Sort voxel centers and drop repeats.
fn unique_centers(mut centers: Vec<Point3<f64>>) -> Vec<Point3<f64>> {
    centers.sort_by(|a, b| {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| x.total_cmp(y))
            .find(|o| o.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    centers.dedup();
    centers
}

/// Log every tenth of the way through a run.
fn report(done: usize, total: usize) {
    if done == total || done * 10 / total != (done - 1) * 10 / total {
        tracing::info!(done, total, "voxels processed");
    }
}

fn main() -> Result<(), Error> {
    let args = Cli::parse();
    cli::initialize_tracing(&args.log_filter, args.log_format);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Voxelize {
            edge,
            unique,
            points,
        } => {
            let cloud = table::read_table(&points)?;
            let points = matrix::points_from_matrix(&cloud, "point columns")?;
            let edge = EdgeLength::new(edge)?;
            let mut centers = voxray::voxelize(&points, &edge);
            if unique {
                centers = unique_centers(centers);
            }
            tracing::info!(points = points.len(), voxels = centers.len(), "voxelized");
            table::write_table(&mut out, &matrix::points_to_matrix(&centers))?;
        }
        Command::Intercept {
            edge,
            threads,
            reduced,
            progress,
            origins,
            ends,
            voxels,
        } => {
            let origins = table::read_table(&origins)?;
            let ends = table::read_table(&ends)?;
            let voxels = table::read_table(&voxels)?;
            let config = SchedulerConfig {
                threads: cli::worker_threads(threads),
                with_path_length: !reduced,
            };
            let progress = progress.then(|| Progress::with_observer(report));
            let result = matrix::intercept_matrices(
                &origins,
                &ends,
                &voxels,
                edge,
                &config,
                progress.as_ref(),
            )?;
            table::write_table(&mut out, &result)?;
        }
    }

    out.flush().map_err(table::TableError::from)?;
    Ok(())
}
