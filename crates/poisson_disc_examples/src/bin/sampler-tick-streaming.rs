//! Drives a sampler one tick per "frame" and streams accepted points to a
//! consumer thread over a channel, the way a host would hand them to a
//! renderer while sampling continues.
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use glam::Vec3;
use poisson_disc::prelude::*;
use poisson_disc_examples::init_tracing;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

const FRAME: Duration = Duration::from_millis(1);

/// Event sink that forwards every event to a channel.
struct ChannelSink {
    tx: Sender<SampleEvent>,
}

impl EventSink for ChannelSink {
    #[inline]
    fn send(&mut self, event: SampleEvent) {
        let _ = self.tx.send(event);
    }
}

fn consume(rx: Receiver<SampleEvent>) -> Vec<Vec3> {
    let mut points = Vec::new();
    for event in rx {
        match event {
            SampleEvent::PointAdded { index, point } => {
                if index % 25 == 0 {
                    info!("Consumer received point #{index} at {point:.2}.");
                }
                points.push(point);
            }
            SampleEvent::Finished { total_points } => {
                info!("Consumer saw completion with {total_points} points.");
                break;
            }
            _ => {}
        }
    }
    points
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let (tx, rx) = crossbeam_channel::unbounded();
    let consumer = thread::spawn(move || consume(rx));

    let config = SamplerConfig::new(Vec3::new(20.0, 12.0, 0.0), 1.0);
    let mut sampler = PoissonDiscSampler::configure_with_sink(config, ChannelSink { tx })?;
    let mut rng = StdRng::seed_from_u64(2024);

    sampler.start(&mut rng)?;
    let mut frame = 0usize;
    while !sampler.is_finished() {
        let outcome = sampler.tick(&mut rng);
        frame += 1;
        if frame % 100 == 0 {
            info!(
                "Frame {frame}: {} points, {} active, last tick accepted {}.",
                sampler.point_count(),
                sampler.active_len(),
                outcome.accepted
            );
        }
        thread::sleep(FRAME);
    }

    let produced = sampler.point_count();
    drop(sampler);
    let received = consumer
        .join()
        .map_err(|_| anyhow::anyhow!("consumer thread panicked"))?;
    anyhow::ensure!(
        received.len() == produced,
        "consumer received {} of {produced} points",
        received.len()
    );
    info!("Streamed {produced} points over {frame} frames.");

    Ok(())
}
