#![forbid(unsafe_code)]
//! poisson_disc: incremental blue-noise (Poisson-disc) point sampling in 2D and 3D.
//!
//! Modules:
//! - config: region, spacing, rejection budget and shape
//! - grid: append-only background grid for neighbor rejection
//! - active: the active list of points that may still spawn candidates
//! - sampler: tick-driven sampler state machine
//! - events: point-added / finished events and sinks
//! - sampling: run-to-completion convenience
pub mod active;
pub mod config;
pub mod error;
pub mod events;
pub mod grid;
mod random;
pub mod sampler;
pub mod sampling;

/// Convenient re-exports for common types. Import with `use poisson_disc::prelude::*;`.
pub mod prelude {
    pub use crate::config::{
        AcceptancePolicy, Dimensions, RegionShape, SamplerConfig, DEFAULT_REJECTION_LIMIT,
    };
    pub use crate::error::{Error, Result};
    pub use crate::events::{
        EventSink, FilterSink, FnSink, MultiSink, Observer, SampleEvent, SampleEventKind,
        VecSink,
    };
    pub use crate::grid::{BackgroundGrid, Cell, CellCoord, GridDims};
    pub use crate::sampler::{PoissonDiscSampler, RunSummary, SamplerState, TickOutcome};
    pub use crate::sampling::{PoissonDiscSampling, PointSampling};
}
