//! One-shot sampling for callers that do not need to observe progress.
use mint::Vector3;
use rand::Rng as RngCore;

use crate::config::SamplerConfig;
use crate::error::Result;
use crate::sampler::PoissonDiscSampler;

/// Trait for point sampling strategies.
pub trait PointSampling: Send + Sync {
    fn generate(&self, rng: &mut dyn RngCore) -> Result<Vec<Vector3<f32>>>;
}

/// Runs a [`PoissonDiscSampler`] to completion and returns its points.
#[derive(Debug, Clone)]
pub struct PoissonDiscSampling {
    pub config: SamplerConfig,
}

impl PoissonDiscSampling {
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }
}

impl PointSampling for PoissonDiscSampling {
    fn generate(&self, rng: &mut dyn RngCore) -> Result<Vec<Vector3<f32>>> {
        let mut sampler = PoissonDiscSampler::configure(self.config.clone())?;
        sampler.run(rng)?;
        Ok(sampler.into_points().into_iter().map(Into::into).collect())
    }
}
