//! Background grid used for constant-time neighbor rejection.
//!
//! Cells are `min_distance / sqrt(dimensions)` wide, so two accepted points can
//! never share a cell. A candidate only has to be compared against the points
//! stored in the block of cells around its own cell.
use glam::Vec3;

use crate::config::{Dimensions, SamplerConfig};
use crate::error::{Error, Result};

/// Integer cell coordinates. Signed so that points outside the region map to
/// coordinates that fail [`BackgroundGrid::contains`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub col: i64,
    pub row: i64,
    pub layer: i64,
}

impl CellCoord {
    pub fn new(col: i64, row: i64, layer: i64) -> Self {
        Self { col, row, layer }
    }
}

/// Grid dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDims {
    pub cols: usize,
    pub rows: usize,
    pub layers: usize,
}

impl GridDims {
    /// Computes grid dimensions for a validated configuration.
    ///
    /// Fails if any used axis would end up with zero cells.
    pub fn for_config(config: &SamplerConfig) -> Result<Self> {
        let extent = config.region_extent();
        let cell_size = config.cell_size();
        let cells = |len: f32| (len / cell_size).floor() as usize;

        let cols = cells(extent.x);
        let rows = cells(extent.y);
        let layers = match config.dimensions {
            Dimensions::Two => 1,
            Dimensions::Three => cells(extent.z),
        };

        if cols == 0 || rows == 0 || layers == 0 {
            return Err(Error::invalid(format!(
                "region {extent} is smaller than one grid cell ({cell_size}) on some axis"
            )));
        }

        let dims = Self { cols, rows, layers };
        if dims.checked_byte_size().is_none() {
            return Err(Error::invalid(format!(
                "grid {cols}x{rows}x{layers} is too large to allocate"
            )));
        }
        Ok(dims)
    }

    /// Size of the cell array in bytes, if it fits an allocation.
    fn checked_byte_size(&self) -> Option<usize> {
        self.cols
            .checked_mul(self.rows)?
            .checked_mul(self.layers)?
            .checked_mul(std::mem::size_of::<Cell>())
            .filter(|&bytes| bytes <= isize::MAX as usize)
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cols * self.rows * self.layers
    }
}

/// Content of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Vec3),
}

impl Cell {
    pub fn point(&self) -> Option<Vec3> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(p) => Some(*p),
        }
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, Cell::Occupied(_))
    }
}

/// Append-only uniform grid over the sampling region.
#[derive(Debug, Clone)]
pub struct BackgroundGrid {
    cell_size: f32,
    dims: GridDims,
    reach: i64,
    cells: Vec<Cell>,
    occupied: usize,
}

impl BackgroundGrid {
    pub fn new(cell_size: f32, dims: GridDims, min_distance: f32) -> Self {
        let cells = vec![Cell::Empty; dims.cell_count()];
        Self::with_cells(cell_size, dims, min_distance, cells)
    }

    /// Allocates an empty grid for the given configuration.
    ///
    /// Fails with [`Error::InvalidConfig`] when the cell array cannot be
    /// allocated.
    pub fn for_config(config: &SamplerConfig) -> Result<Self> {
        let dims = GridDims::for_config(config)?;
        let count = dims.cell_count();
        let mut cells = Vec::new();
        cells.try_reserve_exact(count).map_err(|e| {
            Error::invalid(format!("cannot allocate {count} grid cells: {e}"))
        })?;
        cells.resize(count, Cell::Empty);
        Ok(Self::with_cells(
            config.cell_size(),
            dims,
            config.min_distance,
            cells,
        ))
    }

    fn with_cells(cell_size: f32, dims: GridDims, min_distance: f32, cells: Vec<Cell>) -> Self {
        debug_assert!(cell_size > 0.0);
        debug_assert_eq!(cells.len(), dims.cell_count());
        // Cells a point within `min_distance` can be away on one axis.
        let reach = (min_distance / cell_size).ceil().max(1.0) as i64;
        Self {
            cell_size,
            dims,
            reach,
            cells,
            occupied: 0,
        }
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of occupied cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.occupied
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Span of the region actually covered by cells.
    pub fn covered_extent(&self) -> Vec3 {
        Vec3::new(
            self.dims.cols as f32,
            self.dims.rows as f32,
            self.dims.layers as f32,
        ) * self.cell_size
    }

    #[inline]
    pub fn cell_coords(&self, point: Vec3) -> CellCoord {
        let c = (point / self.cell_size).floor();
        CellCoord::new(c.x as i64, c.y as i64, c.z as i64)
    }

    #[inline]
    pub fn contains(&self, coord: CellCoord) -> bool {
        (0..self.dims.cols as i64).contains(&coord.col)
            && (0..self.dims.rows as i64).contains(&coord.row)
            && (0..self.dims.layers as i64).contains(&coord.layer)
    }

    #[inline]
    fn linear_index(&self, coord: CellCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let (cols, rows) = (self.dims.cols, self.dims.rows);
        Some(
            coord.col as usize
                + coord.row as usize * cols
                + coord.layer as usize * cols * rows,
        )
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.linear_index(coord).map(|i| &self.cells[i])
    }

    /// All cells in linear order, empty cells included.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterates the points stored in occupied cells, in linear cell order.
    pub fn occupied(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.cells.iter().filter_map(Cell::point)
    }

    /// Minimum squared distance from `point` to any point stored around `coord`.
    ///
    /// Scans every in-bounds cell within the neighbor reach of `coord` and
    /// returns `None` when none of them is occupied.
    pub fn nearest_occupied_distance_squared(&self, point: Vec3, coord: CellCoord) -> Option<f32> {
        let r = self.reach;
        let (dz_min, dz_max) = if self.dims.layers == 1 { (0, 0) } else { (-r, r) };

        let mut nearest: Option<f32> = None;
        for dz in dz_min..=dz_max {
            for dy in -r..=r {
                for dx in -r..=r {
                    let neighbor =
                        CellCoord::new(coord.col + dx, coord.row + dy, coord.layer + dz);
                    let Some(existing) = self.cell(neighbor).and_then(Cell::point) else {
                        continue;
                    };
                    let d2 = existing.distance_squared(point);
                    nearest = Some(nearest.map_or(d2, |n| n.min(d2)));
                }
            }
        }
        nearest
    }

    /// Stores `point` in its cell.
    ///
    /// Returns `false` without touching the grid when the cell is outside the
    /// region or already occupied.
    pub fn insert(&mut self, point: Vec3) -> bool {
        let Some(idx) = self.linear_index(self.cell_coords(point)) else {
            return false;
        };
        if self.cells[idx].is_occupied() {
            return false;
        }
        self.cells[idx] = Cell::Occupied(point);
        self.occupied += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_2d(side: f32, min_distance: f32) -> BackgroundGrid {
        let config = SamplerConfig::new(Vec3::new(side, side, 0.0), min_distance);
        BackgroundGrid::for_config(&config).expect("valid grid")
    }

    #[test]
    fn dims_use_floor_division() {
        let config = SamplerConfig::new(Vec3::new(10.0, 5.0, 0.0), 1.0);
        let dims = GridDims::for_config(&config).unwrap();
        let cell = 1.0 / 2f32.sqrt();
        assert_eq!(dims.cols, (10.0 / cell).floor() as usize);
        assert_eq!(dims.rows, (5.0 / cell).floor() as usize);
        assert_eq!(dims.layers, 1);
    }

    #[test]
    fn dims_fail_for_region_smaller_than_a_cell() {
        let config = SamplerConfig::new(Vec3::new(0.5, 10.0, 0.0), 1.0);
        assert!(matches!(
            GridDims::for_config(&config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn oversized_grid_is_rejected_instead_of_allocated() {
        let wide = SamplerConfig::new(Vec3::new(1.0e19, 1.0, 0.0), 1.0);
        assert!(matches!(
            GridDims::for_config(&wide),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            BackgroundGrid::for_config(&wide),
            Err(Error::InvalidConfig(_))
        ));

        let deep =
            SamplerConfig::new(Vec3::splat(1.0e7), 1.0).with_dimensions(Dimensions::Three);
        assert!(matches!(
            BackgroundGrid::for_config(&deep),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn three_dimensional_dims_include_layers() {
        let config =
            SamplerConfig::new(Vec3::splat(10.0), 2.0).with_dimensions(Dimensions::Three);
        let dims = GridDims::for_config(&config).unwrap();
        assert_eq!(dims.layers, (10.0 / (2.0 / 3f32.sqrt())).floor() as usize);
        assert_eq!(dims.cell_count(), dims.cols * dims.rows * dims.layers);
    }

    #[test]
    fn cell_coords_floor_negative_points() {
        let grid = grid_2d(10.0, 1.0);
        let coord = grid.cell_coords(Vec3::new(-0.1, 0.2, 0.0));
        assert_eq!(coord.col, -1);
        assert_eq!(coord.row, 0);
        assert!(!grid.contains(coord));
    }

    #[test]
    fn insert_is_append_only() {
        let mut grid = grid_2d(10.0, 1.0);
        let p = Vec3::new(1.0, 1.0, 0.0);
        assert!(grid.insert(p));
        assert!(!grid.insert(p + Vec3::new(0.01, 0.0, 0.0)));
        assert_eq!(grid.cell(grid.cell_coords(p)), Some(&Cell::Occupied(p)));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn insert_rejects_out_of_region_points() {
        let mut grid = grid_2d(10.0, 1.0);
        assert!(!grid.insert(Vec3::new(20.0, 1.0, 0.0)));
        assert!(grid.is_empty());
    }

    #[test]
    fn neighbor_query_reports_nearest_point() {
        let mut grid = grid_2d(10.0, 1.0);
        assert!(grid.insert(Vec3::new(2.0, 2.0, 0.0)));
        assert!(grid.insert(Vec3::new(3.5, 2.0, 0.0)));

        let candidate = Vec3::new(2.5, 2.0, 0.0);
        let d2 = grid
            .nearest_occupied_distance_squared(candidate, grid.cell_coords(candidate))
            .expect("neighbors present");
        assert!((d2 - 0.25).abs() < 1e-6);
    }

    #[test]
    fn neighbor_query_is_none_without_neighbors() {
        let mut grid = grid_2d(10.0, 1.0);
        assert!(grid.insert(Vec3::new(9.0, 9.0, 0.0)));
        let candidate = Vec3::new(1.0, 1.0, 0.0);
        assert_eq!(
            grid.nearest_occupied_distance_squared(candidate, grid.cell_coords(candidate)),
            None
        );
    }

    #[test]
    fn neighbor_query_sees_points_two_cells_away() {
        let mut grid = grid_2d(10.0, 1.0);
        let cell = grid.cell_size();
        // Just below a cell boundary, and a candidate two columns over but
        // still closer than the minimum distance.
        let existing = Vec3::new(cell * 0.99, 0.5, 0.0);
        let candidate = Vec3::new(cell * 2.01, 0.5, 0.0);
        assert!(existing.distance(candidate) < 1.0);
        assert!(grid.insert(existing));

        let coord = grid.cell_coords(candidate);
        assert_eq!(coord.col - grid.cell_coords(existing).col, 2);
        assert!(grid
            .nearest_occupied_distance_squared(candidate, coord)
            .is_some());
    }

    #[test]
    fn occupied_iterates_only_filled_cells() {
        let mut grid = grid_2d(10.0, 1.0);
        grid.insert(Vec3::new(1.0, 1.0, 0.0));
        grid.insert(Vec3::new(5.0, 5.0, 0.0));
        assert_eq!(grid.occupied().count(), 2);
        assert_eq!(
            grid.cells().iter().filter(|c| !c.is_occupied()).count(),
            grid.cell_count() - 2
        );
    }

    #[test]
    fn covered_extent_never_exceeds_region() {
        let grid = grid_2d(10.0, 1.0);
        let covered = grid.covered_extent();
        assert!(covered.x <= 10.0 && covered.y <= 10.0);
        assert!(covered.x > 10.0 - grid.cell_size());
    }
}
