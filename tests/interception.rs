use std::sync::{Arc, OnceLock, Weak};

use nalgebra::{point, vector, Point3};
use quickcheck_macros::quickcheck;
use voxray::{
    intercept_voxels, matrix, voxelize, EdgeLength, InterceptionCode, Progress, SchedulerConfig,
    Segment, VoxelGrid,
};

/// A scanner at the origin looking at a sparse canopy of returns.
fn scan() -> (VoxelGrid<f64>, Vec<Segment<f64>>) {
    let scanner = point![0.0, 0.0, 1.5];
    let returns: Vec<Point3<f64>> = (0..400)
        .map(|i| {
            let i = f64::from(i);
            let azimuth = i * 0.61;
            let range = 2.0 + (i * 0.37).sin().abs() * 6.0;
            point![
                range * azimuth.cos(),
                range * azimuth.sin(),
                1.5 + (i * 0.13).cos() * 3.0
            ]
        })
        .collect();

    let edge = EdgeLength::new(vector![1.0, 1.0, 0.5]).unwrap();
    let mut centers = voxelize(&returns, &edge);
    centers.sort_by(|a, b| {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| x.total_cmp(y))
            .find(|o| o.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    centers.dedup();

    let rays = returns
        .into_iter()
        .map(|end| Segment::new(scanner, end))
        .collect();
    (VoxelGrid::new(centers, edge), rays)
}

#[test]
fn thread_count_does_not_change_results() {
    let (grid, rays) = scan();
    for with_path_length in [true, false] {
        let config = SchedulerConfig::default().with_path_length(with_path_length);
        let single = intercept_voxels(&grid, &rays, &config.with_threads(1), None).unwrap();
        let many = intercept_voxels(&grid, &rays, &config.with_threads(8), None).unwrap();
        let default = intercept_voxels(&grid, &rays, &config, None).unwrap();
        let bits = |t: &voxray::InterceptionTable<f64>| -> Vec<u64> {
            t.to_matrix().iter().map(|v| v.to_bits()).collect()
        };
        assert_eq!(bits(&single), bits(&many));
        assert_eq!(bits(&single), bits(&default));
    }
}

#[test]
fn every_voxel_accounts_for_every_ray() {
    let (grid, rays) = scan();
    let table = intercept_voxels(&grid, &rays, &SchedulerConfig::default(), None).unwrap();
    assert_eq!(table.len(), grid.len());
    for row in table.rows() {
        assert_eq!(row.total(), rays.len());
    }
    // every return lies in exactly one voxel of the deduplicated grid
    let terminating: usize = table
        .rows()
        .iter()
        .map(|r| r.count(InterceptionCode::Contained) + r.count(InterceptionCode::Entering))
        .sum();
    assert_eq!(terminating, rays.len());
}

#[test]
fn reversing_rays_swaps_entering_and_exiting() {
    let (grid, rays) = scan();
    let reversed: Vec<_> = rays.iter().map(Segment::reversed).collect();
    let config = SchedulerConfig::default();
    let fwd = intercept_voxels(&grid, &rays, &config, None).unwrap();
    let rev = intercept_voxels(&grid, &reversed, &config, None).unwrap();
    for (f, r) in fwd.rows().iter().zip(rev.rows()) {
        for code in [
            InterceptionCode::Contained,
            InterceptionCode::Exiting,
            InterceptionCode::Entering,
        ] {
            assert_eq!(f.count(code), r.count(code.reversed()));
        }
        let (into, out) = (InterceptionCode::Entering, InterceptionCode::Exiting);
        assert!((f.path(into) - r.path(out)).abs() < 1e-9);
    }
}

#[test]
fn progress_counts_voxels() {
    let (grid, rays) = scan();
    let progress = Progress::new();
    intercept_voxels(&grid, &rays, &SchedulerConfig::default(), Some(&progress)).unwrap();
    assert_eq!(progress.completed(), grid.len());
    assert!(!progress.is_cancelled());
}

#[test]
fn cancellation_from_observer() {
    let (grid, rays) = scan();
    let progress = Arc::new(OnceLock::<Weak<Progress>>::new());
    let handle = progress.clone();
    let p = Arc::new(Progress::with_observer(move |done, _| {
        if done >= 3 {
            if let Some(p) = handle.get().and_then(Weak::upgrade) {
                p.cancel();
            }
        }
    }));
    progress.set(Arc::downgrade(&p)).unwrap();

    let config = SchedulerConfig::default().with_threads(1);
    let res = intercept_voxels(&grid, &rays, &config, Some(&*p));
    match res {
        Err(voxray::Error::Cancelled { completed, total }) => {
            assert_eq!(total, grid.len());
            assert_eq!(completed, 3);
        }
        other => panic!("expected cancellation, got {other:?}"),
    }
}

#[test]
fn matrices_end_to_end() {
    let cloud: nalgebra::DMatrix<f64> = nalgebra::dmatrix![
        0.2, 0.2, 0.2;
        1.7, 0.4, 0.1
    ];
    let centers = matrix::voxelize_matrix(&cloud, vector![1.0, 1.0, 1.0]).unwrap();
    let origins = nalgebra::dmatrix![-1.0, 0.5, 0.5];
    let ends = nalgebra::dmatrix![1.5, 0.5, 0.5];
    let full = matrix::intercept_matrices(
        &origins,
        &ends,
        &centers,
        vector![1.0, 1.0, 1.0],
        &SchedulerConfig::default(),
        None,
    )
    .unwrap();
    // crosses the first voxel, terminates in the second
    let counts = |i: usize| full.row(i).iter().take(5).copied().collect::<Vec<_>>();
    assert_eq!(counts(0), [0.0, 0.0, 0.0, 0.0, 1.0]);
    assert_eq!(counts(1), [0.0, 0.0, 0.0, 1.0, 0.0]);
    assert!((full[(0, 8)] - 1.0).abs() < 1e-9);
    assert!((full[(1, 7)] - 0.3).abs() < 1e-9);
}

#[quickcheck]
fn occlusion_rows_sum_to_ray_count(ends: Vec<(i8, i8, i8)>) -> bool {
    let c = |v: i8| f64::from(v) / 16.0;
    let rays: Vec<_> = ends
        .iter()
        .map(|&(x, y, z)| Segment::new(point![0.0, 0.0, 0.0], point![c(x), c(y), c(z)]))
        .collect();
    let centers = vec![
        point![0.5, 0.5, 0.5],
        point![-1.5, 0.5, 2.5],
        point![3.0, -3.0, 0.0],
    ];
    let grid = VoxelGrid::new(centers, EdgeLength::cube(2.0).unwrap());
    let config = SchedulerConfig::default().with_path_length(false);
    let table = intercept_voxels(&grid, &rays, &config, None).unwrap();
    table.occlusion().iter().all(|o| o.total() == rays.len())
}
