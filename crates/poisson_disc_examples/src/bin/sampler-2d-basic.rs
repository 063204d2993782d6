use glam::Vec3;
use poisson_disc::prelude::*;
use poisson_disc_examples::{init_tracing, PointStats};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Host-side settings, as a scene component would expose them.
    let (width, height, depth) = (10.0, 10.0, 10.0);
    let min_distance = 1.0;
    let rejection_limit = 30;

    let sampler = PoissonDiscSampler::configure_region(
        width,
        height,
        depth,
        min_distance,
        rejection_limit,
        2,
        false,
    )?;

    let mut added = 0usize;
    let observer = Observer::new(
        |_index, _point| added += 1,
        |total| info!("Sampling finished with {total} points."),
    );
    let mut sampler = sampler.with_sink(observer);

    let mut rng = StdRng::seed_from_u64(42);
    let summary = sampler.run(&mut rng)?;
    let stats = PointStats::from_points(sampler.points());
    drop(sampler);

    info!("{stats} | {} ticks.", summary.ticks);
    assert_eq!(added, summary.total_points);

    // Same region through the builder, with classic first-accept behavior.
    let config = SamplerConfig::new(Vec3::new(width, height, 0.0), min_distance)
        .with_acceptance_policy(AcceptancePolicy::FirstAccepted);
    let points = PoissonDiscSampling::new(config).generate(&mut rng)?;
    info!("First-accepted policy produced {} points.", points.len());

    Ok(())
}
