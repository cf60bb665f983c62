//! Fixed-size 2D grid of cells
//!
//! Cells are stored row-major (`y * width + x`). Dimensions never change
//! after construction; the simulation keeps two of these and swaps them
//! every tick.

use crate::core_types::{Cell, CellLocation, CellState, GridOffset, Material};
use crate::error::GridError;
use serde::{Deserialize, Serialize};

/// Row-major grid of cells with fixed dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellGrid {
    width: usize,
    height: usize,
    /// Cells in row-major order: [y * width + x]
    cells: Vec<Cell>,
}

impl CellGrid {
    /// Create a grid of unburned cells of a single material at height 0
    ///
    /// # Errors
    /// Returns `GridError::InvalidDimensions` if either dimension is zero or
    /// the cell count cannot be represented by a `u32` id
    pub fn new(width: usize, height: usize, material: Material) -> Result<Self, GridError> {
        let total = width
            .checked_mul(height)
            .filter(|&n| n > 0 && u32::try_from(n).is_ok())
            .ok_or(GridError::InvalidDimensions { width, height })?;

        let mut cells = Vec::with_capacity(total);
        for y in 0..height {
            for x in 0..width {
                let id = (y * width + x) as u32;
                cells.push(Cell::new(id, CellLocation::new(x, y), material, 0.0));
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false; a grid has at least one cell
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get cell index from (x, y)
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn contains(&self, location: CellLocation) -> bool {
        location.x < self.width && location.y < self.height
    }

    /// Get cell at grid indices (bounds-checked)
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if x < self.width && y < self.height {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Get mutable cell at grid indices (bounds-checked)
    pub fn cell_mut(&mut self, x: usize, y: usize) -> Option<&mut Cell> {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Overwrite this grid's cells with another grid of the same size
    pub(crate) fn copy_from(&mut self, other: &CellGrid) {
        debug_assert_eq!(self.width, other.width);
        debug_assert_eq!(self.height, other.height);
        self.cells.copy_from_slice(&other.cells);
    }

    /// Number of cells currently in `state`
    pub fn count_by_state(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| c.state == state).count()
    }

    /// Number of cells currently made of `material`
    pub fn count_by_material(&self, material: Material) -> usize {
        self.cells.iter().filter(|c| c.material == material).count()
    }

    /// All cells within `radius` (Chebyshev) of `location` whose state matches
    ///
    /// The square `[x - r, x + r] × [y - r, y + r]` is clamped to the grid and
    /// never includes `location` itself. `location` must lie inside the grid.
    pub fn find_neighbors_by_state(
        &self,
        location: CellLocation,
        state: CellState,
        radius: usize,
    ) -> Vec<Cell> {
        debug_assert!(
            self.contains(location),
            "neighbour search centre {location:?} outside {}x{} grid",
            self.width,
            self.height
        );

        let x_min = location.x.saturating_sub(radius);
        let y_min = location.y.saturating_sub(radius);
        let x_max = location.x.saturating_add(radius).min(self.width - 1);
        let y_max = location.y.saturating_add(radius).min(self.height - 1);

        let mut found = Vec::new();
        for y in y_min..=y_max {
            for x in x_min..=x_max {
                if x == location.x && y == location.y {
                    continue;
                }
                let cell = &self.cells[self.index(x, y)];
                if cell.state == state {
                    found.push(*cell);
                }
            }
        }
        found
    }

    pub fn neighbors_on_fire(&self, location: CellLocation) -> Vec<Cell> {
        self.find_neighbors_by_state(location, CellState::OnFire, 1)
    }

    pub fn neighbors_not_on_fire(&self, location: CellLocation) -> Vec<Cell> {
        self.find_neighbors_by_state(location, CellState::NotOnFire, 1)
    }

    pub fn neighbors_destroyed(&self, location: CellLocation) -> Vec<Cell> {
        self.find_neighbors_by_state(location, CellState::Destroyed, 1)
    }

    /// Whether any in-bounds neighbour at one of `offsets` is on fire
    #[inline]
    pub fn any_upwind_on_fire(&self, x: usize, y: usize, offsets: &[GridOffset]) -> bool {
        offsets.iter().any(|offset| {
            let nx = x as i64 + i64::from(offset.x);
            let ny = y as i64 + i64::from(offset.y);
            nx >= 0
                && ny >= 0
                && (nx as usize) < self.width
                && (ny as usize) < self.height
                && self.cells[self.index(nx as usize, ny as usize)].state == CellState::OnFire
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_state(grid: &mut CellGrid, x: usize, y: usize, state: CellState) {
        grid.cell_mut(x, y).unwrap().state = state;
    }

    #[test]
    fn test_ids_and_locations() {
        let grid = CellGrid::new(4, 3, Material::Grass).unwrap();
        assert_eq!(grid.len(), 12);
        let cell = grid.cell(3, 2).unwrap();
        assert_eq!(cell.id(), 2 * 4 + 3);
        assert_eq!(cell.location(), CellLocation::new(3, 2));
        assert!(grid.cell(4, 0).is_none());
        assert!(grid.cell(0, 3).is_none());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            CellGrid::new(0, 5, Material::Grass).unwrap_err(),
            GridError::InvalidDimensions {
                width: 0,
                height: 5
            }
        );
        assert!(CellGrid::new(5, 0, Material::Grass).is_err());
        assert!(CellGrid::new(usize::MAX, 2, Material::Grass).is_err());
    }

    #[test]
    fn test_neighbor_search_excludes_self_and_respects_radius() {
        let mut grid = CellGrid::new(7, 7, Material::Grass).unwrap();
        for y in 0..7 {
            for x in 0..7 {
                set_state(&mut grid, x, y, CellState::Destroyed);
            }
        }
        let centre = CellLocation::new(3, 3);
        let found = grid.find_neighbors_by_state(centre, CellState::Destroyed, 2);
        assert_eq!(found.len(), 25 - 1);
        assert!(found.iter().all(|c| c.location() != centre));
        assert!(found
            .iter()
            .all(|c| c.location().chebyshev_distance(&centre) <= 2));
    }

    #[test]
    fn test_neighbor_search_clamps_at_edges() {
        let mut grid = CellGrid::new(5, 5, Material::Grass).unwrap();
        set_state(&mut grid, 1, 1, CellState::OnFire);
        set_state(&mut grid, 4, 4, CellState::OnFire);

        let found = grid.neighbors_on_fire(CellLocation::new(0, 0));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].location(), CellLocation::new(1, 1));

        // Corner search with a radius larger than the grid
        let found = grid.find_neighbors_by_state(CellLocation::new(0, 0), CellState::NotOnFire, 10);
        assert_eq!(found.len(), 25 - 1 - 2);
    }

    #[test]
    fn test_radius_zero_finds_nothing() {
        let grid = CellGrid::new(3, 3, Material::Grass).unwrap();
        assert!(grid
            .find_neighbors_by_state(CellLocation::new(1, 1), CellState::NotOnFire, 0)
            .is_empty());
    }

    #[test]
    fn test_counts() {
        let mut grid = CellGrid::new(3, 3, Material::Grass).unwrap();
        set_state(&mut grid, 0, 0, CellState::OnFire);
        set_state(&mut grid, 1, 0, CellState::Destroyed);
        assert_eq!(grid.count_by_state(CellState::OnFire), 1);
        assert_eq!(grid.count_by_state(CellState::Destroyed), 1);
        assert_eq!(grid.count_by_state(CellState::NotOnFire), 7);
        assert_eq!(grid.count_by_material(Material::Grass), 9);
    }

    #[test]
    fn test_upwind_check_ignores_out_of_bounds() {
        let mut grid = CellGrid::new(3, 3, Material::Grass).unwrap();
        let offsets = [GridOffset::new(-1, 0), GridOffset::new(1, 0)];
        assert!(!grid.any_upwind_on_fire(0, 0, &offsets));
        set_state(&mut grid, 1, 0, CellState::OnFire);
        assert!(grid.any_upwind_on_fire(0, 0, &offsets));
        assert!(!grid.any_upwind_on_fire(0, 1, &offsets));
    }
}
