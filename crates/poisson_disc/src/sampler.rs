//! Tick-driven Poisson-disc sampler.
//!
//! [`PoissonDiscSampler`] owns the background grid, the active list and an
//! [`EventSink`] for the lifetime of one run. The host calls
//! [`PoissonDiscSampler::start`] once and then [`PoissonDiscSampler::tick`]
//! as often as it likes (for example once per frame); every tick processes one
//! active point and reports accepted points to the sink synchronously.
use glam::Vec3;
use rand::Rng as RngCore;
use tracing::{debug, info, trace};

use crate::active::ActiveList;
use crate::config::{AcceptancePolicy, Dimensions, SamplerConfig};
use crate::error::{Error, Result};
use crate::events::{EventSink, SampleEvent, SampleEventKind};
use crate::grid::BackgroundGrid;
use crate::random;

/// Share of each axis, around the center, in which the first point is drawn.
const SEED_BOX_FRACTION: f32 = 0.2;

/// Lifecycle of a sampling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    /// Configured, waiting for [`PoissonDiscSampler::start`].
    Seeding,
    /// Active points remain; each tick processes one of them.
    Generating,
    /// The active list is empty. Terminal.
    Finished,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Points accepted during this tick.
    pub accepted: usize,
    /// Whether the processed active point was retired from the active list.
    pub retired: bool,
    /// State after the tick.
    pub state: SamplerState,
}

impl TickOutcome {
    fn idle(state: SamplerState) -> Self {
        Self {
            accepted: 0,
            retired: false,
            state,
        }
    }
}

/// Totals of a run driven to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Total number of accepted points.
    pub total_points: usize,
    /// Number of generating ticks processed.
    pub ticks: usize,
}

/// Incremental Poisson-disc sampler over one region, reporting to sink `S`.
pub struct PoissonDiscSampler<S: EventSink = ()> {
    config: SamplerConfig,
    grid: BackgroundGrid,
    active: ActiveList,
    points: Vec<Vec3>,
    state: SamplerState,
    ticks: usize,
    center: Vec3,
    min_distance_squared: f32,
    sphere_radius_squared: f32,
    sink: S,
}

impl PoissonDiscSampler<()> {
    /// Validates `config` and allocates the background grid.
    pub fn configure(config: SamplerConfig) -> Result<Self> {
        Self::configure_with_sink(config, ())
    }

    /// Positional form of [`PoissonDiscSampler::configure`].
    pub fn configure_region(
        width: f32,
        height: f32,
        depth: f32,
        min_distance: f32,
        rejection_limit: usize,
        dimensions: u32,
        spherical: bool,
    ) -> Result<Self> {
        let config = SamplerConfig::new(Vec3::new(width, height, depth), min_distance)
            .with_rejection_limit(rejection_limit)
            .with_dimensions(Dimensions::try_from(dimensions)?)
            .with_spherical(spherical);
        Self::configure(config)
    }
}

impl<S: EventSink> PoissonDiscSampler<S> {
    /// Validates `config`, allocates the grid and attaches `sink`.
    pub fn configure_with_sink(config: SamplerConfig, sink: S) -> Result<Self> {
        config.validate()?;
        let grid = BackgroundGrid::for_config(&config)?;
        let radius = config.sphere_radius();

        Ok(Self {
            center: config.center(),
            min_distance_squared: config.min_distance * config.min_distance,
            sphere_radius_squared: radius * radius,
            active: ActiveList::with_capacity(grid.cell_count().min(1024)),
            points: Vec::new(),
            state: SamplerState::Seeding,
            ticks: 0,
            grid,
            config,
            sink,
        })
    }

    /// Replaces the event sink, keeping all sampling state.
    pub fn with_sink<T: EventSink>(self, sink: T) -> PoissonDiscSampler<T> {
        PoissonDiscSampler {
            config: self.config,
            grid: self.grid,
            active: self.active,
            points: self.points,
            state: self.state,
            ticks: self.ticks,
            center: self.center,
            min_distance_squared: self.min_distance_squared,
            sphere_radius_squared: self.sphere_radius_squared,
            sink,
        }
    }

    /// Places the first point near the region center and enters
    /// [`SamplerState::Generating`].
    pub fn start(&mut self, rng: &mut dyn RngCore) -> Result<()> {
        if self.state != SamplerState::Seeding {
            return Err(Error::AlreadyStarted);
        }

        let dims = self.grid.dims();
        info!(
            "Poisson-disc run: {}D | grid {}x{}x{} | cell {:.4} | min distance {}.",
            self.config.dimensions.count(),
            dims.cols,
            dims.rows,
            dims.layers,
            self.grid.cell_size(),
            self.config.min_distance,
        );

        let seed = self.seed_point(rng);
        let inserted = self.grid.insert(seed);
        debug_assert!(inserted, "seed must land in an empty in-bounds cell");
        self.accept(seed);
        self.state = SamplerState::Generating;
        Ok(())
    }

    fn seed_point(&self, rng: &mut dyn RngCore) -> Vec3 {
        let extent = self.config.region_extent();
        let covered = self.grid.covered_extent();
        let mut jitter = extent * (SEED_BOX_FRACTION * 0.5);
        if self.config.is_spherical() {
            jitter = jitter.min(Vec3::splat(self.config.sphere_radius() / 3f32.sqrt()));
        }

        let mut axis = |i: usize| {
            let c = self.center[i];
            let v = random::range(rng, c - jitter[i], c + jitter[i]);
            v.clamp(0.0, random::next_down(covered[i]))
        };
        let x = axis(0);
        let y = axis(1);
        let z = match self.config.dimensions {
            Dimensions::Two => 0.0,
            Dimensions::Three => axis(2),
        };
        Vec3::new(x, y, z)
    }

    /// Processes one active point.
    ///
    /// Tries up to `rejection_limit` candidates around a randomly chosen
    /// active point. The point is retired when none of them is accepted. Ticks
    /// before [`PoissonDiscSampler::start`] or after completion do nothing.
    pub fn tick(&mut self, rng: &mut dyn RngCore) -> TickOutcome {
        if self.state != SamplerState::Generating {
            return TickOutcome::idle(self.state);
        }

        let Some(selected) = self.active.choose_index(rng) else {
            self.finish();
            return TickOutcome::idle(self.state);
        };
        let Some(origin) = self.active.get(selected) else {
            return TickOutcome::idle(self.state);
        };

        let r = self.config.min_distance;
        let mut accepted = 0;
        for _ in 0..self.config.rejection_limit {
            let radius = random::range(rng, r, 2.0 * r);
            let candidate = origin + random::direction(rng, self.config.dimensions) * radius;
            if self.try_accept(candidate) {
                accepted += 1;
                if self.config.acceptance == AcceptancePolicy::FirstAccepted {
                    break;
                }
            }
        }

        let retired = accepted == 0;
        if retired {
            self.active.remove(selected);
            debug!(
                "Retired active point {} | {} still active.",
                origin,
                self.active.len()
            );
        }

        self.ticks += 1;
        if self.active.is_empty() {
            self.finish();
        }

        TickOutcome {
            accepted,
            retired,
            state: self.state,
        }
    }

    fn try_accept(&mut self, candidate: Vec3) -> bool {
        let coord = self.grid.cell_coords(candidate);
        if !self.grid.contains(coord) {
            return false;
        }
        if self.config.is_spherical()
            && candidate.distance_squared(self.center) > self.sphere_radius_squared
        {
            return false;
        }
        if let Some(d2) = self.grid.nearest_occupied_distance_squared(candidate, coord) {
            if d2 < self.min_distance_squared {
                return false;
            }
        }
        if !self.grid.insert(candidate) {
            return false;
        }
        self.accept(candidate);
        true
    }

    fn accept(&mut self, point: Vec3) {
        let index = self.points.len();
        self.points.push(point);
        self.active.push(point);
        trace!("Accepted point #{} at {}.", index, point);
        if self.sink.wants(SampleEventKind::PointAdded) {
            self.sink.send(SampleEvent::PointAdded { index, point });
        }
    }

    fn finish(&mut self) {
        self.state = SamplerState::Finished;
        info!(
            "Poisson-disc run finished: {} points after {} ticks.",
            self.points.len(),
            self.ticks
        );
        if self.sink.wants(SampleEventKind::Finished) {
            self.sink.send(SampleEvent::Finished {
                total_points: self.points.len(),
            });
        }
    }

    /// Starts the run if needed and ticks until it finishes.
    pub fn run(&mut self, rng: &mut dyn RngCore) -> Result<RunSummary> {
        if self.state == SamplerState::Seeding {
            self.start(rng)?;
        }
        while self.state == SamplerState::Generating {
            self.tick(rng);
        }
        Ok(self.summary())
    }

    /// Starts the run if needed and processes at most `max_ticks` ticks.
    pub fn run_for(&mut self, rng: &mut dyn RngCore, max_ticks: usize) -> Result<SamplerState> {
        if self.state == SamplerState::Seeding {
            self.start(rng)?;
        }
        for _ in 0..max_ticks {
            if self.tick(rng).state != SamplerState::Generating {
                break;
            }
        }
        Ok(self.state)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total_points: self.points.len(),
            ticks: self.ticks,
        }
    }

    #[inline]
    pub fn state(&self) -> SamplerState {
        self.state
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state == SamplerState::Finished
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Accepted points in acceptance order.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Vec3> {
        self.points
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Sparse view: every grid cell, empty ones included.
    pub fn grid(&self) -> &BackgroundGrid {
        &self.grid
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::events::VecSink;

    fn config_2d(side: f32, min_distance: f32) -> SamplerConfig {
        SamplerConfig::new(Vec3::new(side, side, 0.0), min_distance)
    }

    #[test]
    fn configure_rejects_degenerate_regions() {
        assert!(matches!(
            PoissonDiscSampler::configure(config_2d(10.0, 0.0)),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            PoissonDiscSampler::configure(config_2d(0.0, 1.0)),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            PoissonDiscSampler::configure_region(10.0, 10.0, 10.0, 1.0, 30, 4, false),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn start_seeds_one_point_in_central_box() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sampler =
            PoissonDiscSampler::configure_with_sink(config_2d(10.0, 1.0), VecSink::new())
                .unwrap();
        sampler.start(&mut rng).unwrap();

        assert_eq!(sampler.state(), SamplerState::Generating);
        assert_eq!(sampler.point_count(), 1);
        assert_eq!(sampler.active_len(), 1);
        assert_eq!(sampler.grid().len(), 1);

        let seed = sampler.points()[0];
        assert!((4.0..6.0).contains(&seed.x));
        assert!((4.0..6.0).contains(&seed.y));
        assert_eq!(seed.z, 0.0);
        assert_eq!(
            sampler.sink().as_slice(),
            &[SampleEvent::PointAdded {
                index: 0,
                point: seed
            }]
        );
    }

    #[test]
    fn start_twice_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sampler = PoissonDiscSampler::configure(config_2d(10.0, 1.0)).unwrap();
        sampler.start(&mut rng).unwrap();
        assert_eq!(sampler.start(&mut rng), Err(Error::AlreadyStarted));
    }

    #[test]
    fn tick_before_start_is_idle() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sampler = PoissonDiscSampler::configure(config_2d(10.0, 1.0)).unwrap();
        let outcome = sampler.tick(&mut rng);
        assert_eq!(outcome, TickOutcome::idle(SamplerState::Seeding));
        assert_eq!(sampler.point_count(), 0);
    }

    #[test]
    fn finished_event_fires_once() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut sampler =
            PoissonDiscSampler::configure_with_sink(config_2d(6.0, 1.0), VecSink::new())
                .unwrap();
        let summary = sampler.run(&mut rng).unwrap();
        for _ in 0..5 {
            assert_eq!(sampler.tick(&mut rng).state, SamplerState::Finished);
        }

        let events = sampler.into_sink().into_inner();
        let finished: Vec<_> = events
            .iter()
            .filter(|e| e.kind() == SampleEventKind::Finished)
            .collect();
        assert_eq!(
            finished,
            vec![&SampleEvent::Finished {
                total_points: summary.total_points
            }]
        );
        assert!(matches!(events.last(), Some(SampleEvent::Finished { .. })));
    }

    #[test]
    fn point_events_match_dense_points() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut sampler =
            PoissonDiscSampler::configure_with_sink(config_2d(8.0, 1.0), VecSink::new())
                .unwrap();
        sampler.run(&mut rng).unwrap();
        assert_eq!(sampler.sink().points(), sampler.points());
        assert_eq!(sampler.grid().len(), sampler.point_count());
    }

    #[test]
    fn first_accepted_policy_accepts_at_most_one_per_tick() {
        let mut rng = StdRng::seed_from_u64(4);
        let config =
            config_2d(10.0, 1.0).with_acceptance_policy(AcceptancePolicy::FirstAccepted);
        let mut sampler = PoissonDiscSampler::configure(config).unwrap();
        sampler.start(&mut rng).unwrap();
        while !sampler.is_finished() {
            let outcome = sampler.tick(&mut rng);
            assert!(outcome.accepted <= 1);
            assert_eq!(outcome.retired, outcome.accepted == 0);
        }
    }

    #[test]
    fn run_for_stops_after_budget() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut sampler = PoissonDiscSampler::configure(config_2d(20.0, 1.0)).unwrap();
        let state = sampler.run_for(&mut rng, 3).unwrap();
        assert_eq!(state, SamplerState::Generating);
        assert_eq!(sampler.ticks(), 3);
    }

    #[test]
    fn with_sink_keeps_progress() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut sampler = PoissonDiscSampler::configure(config_2d(10.0, 1.0)).unwrap();
        sampler.start(&mut rng).unwrap();
        let mut sampler = sampler.with_sink(VecSink::new());
        assert_eq!(sampler.point_count(), 1);
        sampler.run(&mut rng).unwrap();
        assert_eq!(sampler.sink().points().len(), sampler.point_count() - 1);
    }

    #[test]
    fn spherical_seed_stays_inside_narrow_sphere() {
        let config = SamplerConfig::new(Vec3::new(2.0, 20.0, 0.0), 0.5).with_spherical(true);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut sampler = PoissonDiscSampler::configure(config.clone()).unwrap();
            sampler.start(&mut rng).unwrap();
            let p = sampler.points()[0];
            assert!(p.distance(config.center()) <= config.sphere_radius());
        }
    }

}
