//! Sampler configuration: region, spacing, rejection budget and shape.
use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Rejection limit used when none is configured.
pub const DEFAULT_REJECTION_LIMIT: usize = 30;

/// Dimensionality of the sampled region.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dimensions {
    #[default]
    Two,
    Three,
}

impl Dimensions {
    /// Number of axes in use.
    pub fn count(self) -> usize {
        match self {
            Dimensions::Two => 2,
            Dimensions::Three => 3,
        }
    }
}

impl TryFrom<u32> for Dimensions {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            2 => Ok(Dimensions::Two),
            3 => Ok(Dimensions::Three),
            other => Err(Error::invalid(format!(
                "unsupported dimensionality {other}; expected 2 or 3"
            ))),
        }
    }
}

/// Shape constraint applied on top of the bounding box.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionShape {
    /// Points fill the whole axis-aligned box.
    #[default]
    Box,
    /// Points are restricted to the sphere (circle in 2D) centered in the box
    /// with radius `width / 2`.
    Sphere,
}

/// What a generating step does after a candidate is accepted.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcceptancePolicy {
    /// Keep spending the remaining rejection budget on the same active point,
    /// so one step may accept several points.
    #[default]
    ExhaustBudget,
    /// Stop the step after the first accepted candidate.
    FirstAccepted,
}

/// Configuration for a Poisson-disc sampling run.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerConfig {
    /// Region size as width, height, depth. Depth is ignored in 2D.
    pub extent: Vec3,
    /// Minimum distance between any two accepted points.
    pub min_distance: f32,
    /// Maximum candidates tried around an active point per step.
    pub rejection_limit: usize,
    /// Number of axes sampled.
    pub dimensions: Dimensions,
    /// Optional spherical constraint.
    pub shape: RegionShape,
    /// Behavior of the retry loop after an acceptance.
    pub acceptance: AcceptancePolicy,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            extent: Vec3::new(10.0, 10.0, 0.0),
            min_distance: 1.0,
            rejection_limit: DEFAULT_REJECTION_LIMIT,
            dimensions: Dimensions::Two,
            shape: RegionShape::Box,
            acceptance: AcceptancePolicy::ExhaustBudget,
        }
    }
}

impl SamplerConfig {
    /// Creates a new 2D [`SamplerConfig`] for the given region and spacing.
    pub fn new(extent: Vec3, min_distance: f32) -> Self {
        Self {
            extent,
            min_distance,
            ..Default::default()
        }
    }

    /// Sets the number of candidates tried per active point.
    pub fn with_rejection_limit(mut self, rejection_limit: usize) -> Self {
        self.rejection_limit = rejection_limit;
        self
    }

    /// Sets the dimensionality.
    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Sets the region shape.
    pub fn with_shape(mut self, shape: RegionShape) -> Self {
        self.shape = shape;
        self
    }

    /// Shorthand for [`RegionShape::Sphere`] / [`RegionShape::Box`].
    pub fn with_spherical(self, spherical: bool) -> Self {
        self.with_shape(if spherical {
            RegionShape::Sphere
        } else {
            RegionShape::Box
        })
    }

    /// Sets the acceptance policy of the retry loop.
    pub fn with_acceptance_policy(mut self, acceptance: AcceptancePolicy) -> Self {
        self.acceptance = acceptance;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.min_distance.is_finite() || self.min_distance <= 0.0 {
            return Err(Error::invalid("min_distance must be finite and > 0"));
        }
        if self.rejection_limit == 0 {
            return Err(Error::invalid("rejection_limit must be > 0"));
        }
        let extent = self.region_extent();
        let used = self.dimensions.count();
        for (axis, value) in ["width", "height", "depth"]
            .into_iter()
            .zip(extent.to_array())
            .take(used)
        {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::invalid(format!("{axis} must be finite and > 0")));
            }
        }

        Ok(())
    }

    /// Region extent with depth forced to zero in 2D.
    pub fn region_extent(&self) -> Vec3 {
        match self.dimensions {
            Dimensions::Two => Vec3::new(self.extent.x, self.extent.y, 0.0),
            Dimensions::Three => self.extent,
        }
    }

    /// Center of the region box.
    pub fn center(&self) -> Vec3 {
        self.region_extent() * 0.5
    }

    /// Radius of the inscribed sphere used by [`RegionShape::Sphere`].
    pub fn sphere_radius(&self) -> f32 {
        self.extent.x * 0.5
    }

    /// Background grid cell size, `min_distance / sqrt(dimensions)`.
    pub fn cell_size(&self) -> f32 {
        self.min_distance / (self.dimensions.count() as f32).sqrt()
    }

    pub fn is_spherical(&self) -> bool {
        self.shape == RegionShape::Sphere
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_two_dimensional_box() {
        let config = SamplerConfig::default();
        assert_eq!(config.dimensions, Dimensions::Two);
        assert_eq!(config.shape, RegionShape::Box);
        assert_eq!(config.rejection_limit, DEFAULT_REJECTION_LIMIT);
        assert_eq!(config.acceptance, AcceptancePolicy::ExhaustBudget);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_min_distance() {
        for min_distance in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let config = SamplerConfig::new(Vec3::new(10.0, 10.0, 0.0), min_distance);
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        }
    }

    #[test]
    fn rejects_zero_rejection_limit() {
        let config = SamplerConfig::default().with_rejection_limit(0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn depth_only_matters_in_three_dimensions() {
        let flat = SamplerConfig::new(Vec3::new(10.0, 10.0, 0.0), 1.0);
        assert!(flat.validate().is_ok());
        assert_eq!(flat.region_extent().z, 0.0);

        let volume = flat.clone().with_dimensions(Dimensions::Three);
        let err = volume.validate().unwrap_err();
        assert!(err.to_string().contains("depth"));
    }

    #[test]
    fn rejects_zero_width() {
        let config = SamplerConfig::new(Vec3::new(0.0, 10.0, 0.0), 1.0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("width"));
    }

    #[test]
    fn dimensions_from_integer() {
        assert_eq!(Dimensions::try_from(2).unwrap(), Dimensions::Two);
        assert_eq!(Dimensions::try_from(3).unwrap(), Dimensions::Three);
        assert!(Dimensions::try_from(4).is_err());
        assert!(Dimensions::try_from(1).is_err());
    }

    #[test]
    fn cell_size_scales_with_dimensionality() {
        let config = SamplerConfig::new(Vec3::splat(10.0), 2.0);
        assert!((config.cell_size() - 2.0 / 2f32.sqrt()).abs() < 1e-6);
        let config = config.with_dimensions(Dimensions::Three);
        assert!((config.cell_size() - 2.0 / 3f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn spherical_builder_toggles_shape() {
        let config = SamplerConfig::default().with_spherical(true);
        assert!(config.is_spherical());
        assert_eq!(config.sphere_radius(), 5.0);
        assert!(!config.with_spherical(false).is_spherical());
    }
}
