use glam::Vec3;
use poisson_disc::prelude::*;
use poisson_disc_examples::{init_tracing, PointStats};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = SamplerConfig::new(Vec3::splat(10.0), 2.0)
        .with_dimensions(Dimensions::Three)
        .with_spherical(true);
    let center = config.center();
    let radius = config.sphere_radius();

    let mut sampler = PoissonDiscSampler::configure_with_sink(config, VecSink::new())?;
    let mut rng = StdRng::seed_from_u64(7);
    sampler.run(&mut rng)?;

    let farthest = sampler
        .points()
        .iter()
        .map(|p| p.distance(center))
        .fold(0.0f32, f32::max);
    if farthest > radius {
        warn!("Point found {farthest:.3} from the center, outside radius {radius}.");
    }

    let grid = sampler.grid();
    let dims = grid.dims();
    info!(
        "Grid {}x{}x{}: {} of {} cells occupied.",
        dims.cols,
        dims.rows,
        dims.layers,
        grid.len(),
        grid.cell_count()
    );
    info!(
        "{} | farthest from center {farthest:.3} (radius {radius}).",
        PointStats::from_points(sampler.points())
    );
    info!("{} events recorded.", sampler.sink().len());

    Ok(())
}
