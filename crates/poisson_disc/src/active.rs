//! Active list: accepted points that may still spawn candidates.
use glam::Vec3;
use rand::Rng as RngCore;

use crate::random;

#[derive(Debug, Clone, Default)]
pub struct ActiveList {
    points: Vec<Vec3>,
}

impl ActiveList {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            points: Vec::with_capacity(cap),
        }
    }

    pub fn push(&mut self, point: Vec3) {
        self.points.push(point);
    }

    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    /// Removes the point at `index`, keeping the order of the rest.
    pub fn remove(&mut self, index: usize) -> Option<Vec3> {
        (index < self.points.len()).then(|| self.points.remove(index))
    }

    /// Picks a uniformly random index, or `None` when the list is empty.
    pub fn choose_index(&self, rng: &mut dyn RngCore) -> Option<usize> {
        if self.points.is_empty() {
            return None;
        }
        Some(random::index(rng, self.points.len()))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[Vec3] {
        &self.points
    }
}
