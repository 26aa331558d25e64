//! Hull areas for random point groups, plus a Voronoi run when qhull is
//! installed.
//! Run with: RUST_LOG=debug cargo run --example hull_areas

use cellhull::{
    GeometryError, HullBatch, HullBatchOptions, PointSet, QvoronoiProcess, Voronoi,
    VoronoiOptions,
};
use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), GeometryError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    const GROUPS: usize = 1_000;
    const PER_GROUP: usize = 50;

    let mut rng = StdRng::seed_from_u64(1);
    let mut points = Vec::with_capacity(GROUPS * PER_GROUP);
    for g in 0..GROUPS {
        let centre = DVec2::new(g as f64 * 10.0, 0.0);
        for _ in 0..PER_GROUP {
            points.push(centre + DVec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)));
        }
    }
    let indptr: Vec<usize> = (0..=GROUPS).map(|g| g * PER_GROUP).collect();

    let areas = HullBatch::with_options(HullBatchOptions::default()).areas_2d(&points, &indptr)?;
    let mean = areas.iter().sum::<f64>() / areas.len() as f64;
    println!("{GROUPS} groups of {PER_GROUP} points, mean hull area {mean:.4} (square area 4)");

    let sites = PointSet::from_2d(&points[..PER_GROUP]);
    let options = VoronoiOptions::default()
        .with_bounding_box(true)
        .with_span(tracing::info_span!("voronoi", sites = sites.len()));
    match Voronoi::compute(&sites, &options, &QvoronoiProcess::new()) {
        Ok(voronoi) => {
            let m = voronoi.incidence();
            println!(
                "voronoi: {} cells, {} vertices, {} incidences",
                m.nrows(),
                voronoi.vertex_count(),
                m.nnz()
            );
        }
        Err(GeometryError::Io(e)) => println!("skipping voronoi, qvoronoi not runnable: {e}"),
        Err(e) => return Err(e),
    }

    Ok(())
}
