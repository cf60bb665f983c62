//! RGB raster snapshots of a grid

use crate::export::ColorPalette;
use crate::grid::CellGrid;

/// Row-major RGB image, three bytes per cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbRaster {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl RgbRaster {
    /// Colour of pixel (x, y), `None` outside the image
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// Render every cell through `palette`
#[must_use]
pub fn render_snapshot(grid: &CellGrid, palette: &ColorPalette) -> RgbRaster {
    let mut data = Vec::with_capacity(grid.len() * 3);
    for cell in grid.cells() {
        data.extend_from_slice(&palette.color(cell.state(), cell.material(), cell.height()));
    }
    RgbRaster {
        width: grid.width(),
        height: grid.height(),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{CellState, Material};

    #[test]
    fn test_snapshot_layout() {
        let mut grid = CellGrid::new(3, 2, Material::Grass).unwrap();
        grid.cell_mut(2, 1).unwrap().state = CellState::OnFire;
        grid.cell_mut(0, 1).unwrap().material = Material::Water;

        let raster = render_snapshot(&grid, &ColorPalette::compute());
        assert_eq!(raster.data.len(), 3 * 2 * 3);
        assert_eq!(raster.pixel(0, 0), Some([0, 255, 0]));
        assert_eq!(raster.pixel(2, 1), Some([255, 0, 0]));
        assert_eq!(raster.pixel(0, 1), Some([0, 0, 255]));
        assert_eq!(raster.pixel(3, 0), None);
    }
}
