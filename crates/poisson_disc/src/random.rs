//! Uniform random helpers over a caller-supplied [`RngCore`].
use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use rand::Rng as RngCore;

use crate::config::Dimensions;

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    // 24 mantissa bits keep the result strictly below 1.0.
    (rng.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Uniform float in `[a, b)`. Returns `a` when the range is empty.
#[inline]
pub(crate) fn range(rng: &mut dyn RngCore, a: f32, b: f32) -> f32 {
    lerp_below(a, b, rand01(rng))
}

/// `a + t * (b - a)` for `t` in `[0, 1)`, kept below `b`.
#[inline]
fn lerp_below(a: f32, b: f32, t: f32) -> f32 {
    let v = a + t * (b - a);
    // Rounding can land exactly on `b`.
    if v >= b && b > a {
        next_down(b)
    } else {
        v
    }
}

/// Uniform index in `[0, n)`. `n` must be non-zero.
#[inline]
pub(crate) fn index(rng: &mut dyn RngCore, n: usize) -> usize {
    debug_assert!(n > 0);
    ((rng.next_u64() as u128 * n as u128) >> 64) as usize
}

/// Compute the next smaller representable float value.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() || val == f32::NEG_INFINITY {
        return val;
    }
    if val == f32::INFINITY {
        return f32::MAX;
    }
    if val == 0.0 {
        return -f32::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits.saturating_sub(1))
    } else {
        f32::from_bits(bits.saturating_add(1))
    }
}

/// Unit direction for candidate placement.
///
/// 2D rotates `+Y` about the plane normal `+Z`; 3D additionally rotates the
/// result about `+Y` by an independent angle.
pub(crate) fn direction(rng: &mut dyn RngCore, dimensions: Dimensions) -> Vec3 {
    let mut dir = Quat::from_axis_angle(Vec3::Z, rand01(rng) * TAU) * Vec3::Y;
    if dimensions == Dimensions::Three {
        dir = Quat::from_axis_angle(Vec3::Y, rand01(rng) * TAU) * dir;
    }
    dir.normalize()
}
