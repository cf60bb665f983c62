//! Snapshot export for visualization

pub mod palette;
pub mod snapshot;

pub use palette::{ColorPalette, Rgb};
pub use snapshot::{render_snapshot, RgbRaster};
