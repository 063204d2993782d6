#![forbid(unsafe_code)]

use glam::Vec3;
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Quick statistics over a finished point set.
#[derive(Debug, Clone, Copy)]
pub struct PointStats {
    pub count: usize,
    pub min: Vec3,
    pub max: Vec3,
    pub min_spacing: Option<f32>,
}

impl PointStats {
    pub fn from_points(points: &[Vec3]) -> Self {
        let (min, max) = points.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );

        let mut min_spacing: Option<f32> = None;
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                let d = a.distance(*b);
                min_spacing = Some(min_spacing.map_or(d, |m| m.min(d)));
            }
        }

        Self {
            count: points.len(),
            min,
            max,
            min_spacing,
        }
    }
}

impl std::fmt::Display for PointStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} points", self.count)?;
        if self.count > 0 {
            write!(f, " | bounds {:.2} .. {:.2}", self.min, self.max)?;
        }
        if let Some(spacing) = self.min_spacing {
            write!(f, " | closest pair {spacing:.3}")?;
        }
        Ok(())
    }
}
