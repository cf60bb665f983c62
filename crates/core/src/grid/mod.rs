//! Grid storage, terrain inputs and initial material assignment

pub mod cell_grid;
pub mod materials;
pub mod terrain;

pub use cell_grid::CellGrid;
pub use materials::{ClusterConfig, Fill, MaterialPolicy};
pub use terrain::{HeightMap, LandscapeMap, LandscapePalette, Raster, Sampling};
