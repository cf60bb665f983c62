//! Terrain inputs: heightmaps and landscape material maps
//!
//! Both are supplied as raw raster bytes (decoded by the host) and resampled
//! to the grid resolution. Heights only feed visualization; the landscape map
//! sets each cell's initial material from an exact colour table.

use crate::core_types::Material;
use crate::error::GridError;
use serde::{Deserialize, Serialize};

/// Decoded 8-bit raster, row-major, `channels` bytes per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

impl Raster {
    /// Grayscale raster, one byte per pixel
    ///
    /// # Errors
    /// Returns an error if a dimension is zero or `data` has the wrong length
    pub fn luma(width: usize, height: usize, data: Vec<u8>) -> Result<Self, GridError> {
        Self::with_channels(width, height, 1, data)
    }

    /// RGB raster, three bytes per pixel
    ///
    /// # Errors
    /// Returns an error if a dimension is zero or `data` has the wrong length
    pub fn rgb(width: usize, height: usize, data: Vec<u8>) -> Result<Self, GridError> {
        Self::with_channels(width, height, 3, data)
    }

    fn with_channels(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(GridError::InvalidDimensions { width, height })?;
        if data.len() != expected {
            return Err(GridError::RasterSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Pixel bytes at (x, y)
    fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let start = (y * self.width + x) * self.channels;
        &self.data[start..start + self.channels]
    }

    /// Intensity in `[0, 1]`; RGB pixels are averaged
    fn intensity(&self, x: usize, y: usize) -> f32 {
        let px = self.pixel(x, y);
        let sum: u32 = px.iter().map(|&b| u32::from(b)).sum();
        sum as f32 / (255.0 * px.len() as f32)
    }

    /// Nearest source pixel for grid cell `(x, y)` of a `width × height` grid
    fn nearest_source(&self, x: usize, y: usize, width: usize, height: usize) -> (usize, usize) {
        let sx = ((x * self.width) / width).min(self.width - 1);
        let sy = ((y * self.height) / height).min(self.height - 1);
        (sx, sy)
    }
}

/// How a raster is resampled to grid resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sampling {
    Nearest,
    #[default]
    Bilinear,
}

/// Normalized per-cell heights in `[0, 1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightMap {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl HeightMap {
    /// All-zero heights
    #[must_use]
    pub fn flat(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; width * height],
        }
    }

    /// Resample a raster to `width × height` cells
    ///
    /// # Errors
    /// Returns `GridError::InvalidDimensions` if the target grid is empty
    pub fn from_raster(
        raster: &Raster,
        width: usize,
        height: usize,
        sampling: Sampling,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }

        let mut values = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let value = match sampling {
                    Sampling::Nearest => {
                        let (sx, sy) = raster.nearest_source(x, y, width, height);
                        raster.intensity(sx, sy)
                    }
                    Sampling::Bilinear => bilinear(raster, x, y, width, height),
                };
                values.push(value.clamp(0.0, 1.0));
            }
        }

        Ok(Self {
            width,
            height,
            values,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Height at (x, y), 0 outside the map
    pub fn get(&self, x: usize, y: usize) -> f32 {
        if x < self.width && y < self.height {
            self.values[y * self.width + x]
        } else {
            0.0
        }
    }
}

/// Bilinear sample of raster intensity at the centre of grid cell (x, y)
fn bilinear(raster: &Raster, x: usize, y: usize, width: usize, height: usize) -> f32 {
    let scale_x = raster.width as f32 / width as f32;
    let scale_y = raster.height as f32 / height as f32;
    let gx = ((x as f32 + 0.5) * scale_x - 0.5).max(0.0);
    let gy = ((y as f32 + 0.5) * scale_y - 0.5).max(0.0);

    let x0 = (gx.floor() as usize).min(raster.width - 1);
    let y0 = (gy.floor() as usize).min(raster.height - 1);
    let x1 = (x0 + 1).min(raster.width - 1);
    let y1 = (y0 + 1).min(raster.height - 1);
    let fx = gx - x0 as f32;
    let fy = gy - y0 as f32;

    let lerp = |a: f32, b: f32, t: f32| a * (1.0 - t) + b * t;
    let top = lerp(raster.intensity(x0, y0), raster.intensity(x1, y0), fx);
    let bottom = lerp(raster.intensity(x0, y1), raster.intensity(x1, y1), fx);
    lerp(top, bottom, fy)
}

/// Exact colour → material table for landscape rasters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandscapePalette {
    entries: Vec<([u8; 3], Material)>,
    /// Material for colours not in the table
    pub fallback: Material,
}

impl Default for LandscapePalette {
    fn default() -> Self {
        Self::reference()
    }
}

impl LandscapePalette {
    /// Colours of the reference landscape images
    #[must_use]
    pub fn reference() -> Self {
        Self {
            entries: vec![
                ([181, 219, 235], Material::Water),
                ([207, 198, 180], Material::Bedrock),
                ([121, 150, 114], Material::Grass),
                ([34, 87, 22], Material::Tree),
                // Tree species
                ([61, 92, 49], Material::Tree),
                ([25, 64, 35], Material::Tree),
                ([78, 110, 52], Material::Tree),
            ],
            fallback: Material::Grass,
        }
    }

    /// Add or replace the material for an exact colour
    pub fn with_entry(mut self, rgb: [u8; 3], material: Material) -> Self {
        match self.entries.iter_mut().find(|(c, _)| *c == rgb) {
            Some(entry) => entry.1 = material,
            None => self.entries.push((rgb, material)),
        }
        self
    }

    /// Material for a colour, or the fallback
    #[must_use]
    pub fn material_for(&self, rgb: [u8; 3]) -> Material {
        self.entries
            .iter()
            .find(|(c, _)| *c == rgb)
            .map_or(self.fallback, |(_, m)| *m)
    }
}

/// Per-cell initial materials decoded from a landscape raster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandscapeMap {
    width: usize,
    height: usize,
    materials: Vec<Material>,
}

impl LandscapeMap {
    /// Nearest-sample an RGB raster to `width × height` cells
    ///
    /// # Errors
    /// Returns `GridError::InvalidParameter` if the raster is not RGB, or
    /// `GridError::InvalidDimensions` if the target grid is empty
    pub fn from_raster(
        raster: &Raster,
        width: usize,
        height: usize,
        palette: &LandscapePalette,
    ) -> Result<Self, GridError> {
        if raster.channels != 3 {
            return Err(GridError::InvalidParameter {
                name: "landscape",
                message: format!("expected an RGB raster, got {} channel(s)", raster.channels),
            });
        }
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }

        let mut materials = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let (sx, sy) = raster.nearest_source(x, y, width, height);
                let px = raster.pixel(sx, sy);
                materials.push(palette.material_for([px[0], px[1], px[2]]));
            }
        }

        Ok(Self {
            width,
            height,
            materials,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Checks that the material list covers `width × height` cells
    ///
    /// # Errors
    /// Returns an error for an empty map or a list of the wrong length
    pub fn validate(&self) -> Result<(), GridError> {
        if self.width == 0 || self.height == 0 {
            return Err(GridError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let expected = self
            .width
            .checked_mul(self.height)
            .ok_or(GridError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        if self.materials.len() != expected {
            return Err(GridError::RasterSizeMismatch {
                expected,
                actual: self.materials.len(),
            });
        }
        Ok(())
    }

    /// Material at (x, y); `None` outside the map
    pub fn get(&self, x: usize, y: usize) -> Option<Material> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.materials.get(y * self.width + x).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_raster_size_validation() {
        assert!(Raster::luma(2, 2, vec![0; 4]).is_ok());
        assert_eq!(
            Raster::rgb(2, 2, vec![0; 4]).unwrap_err(),
            GridError::RasterSizeMismatch {
                expected: 12,
                actual: 4
            }
        );
        assert!(Raster::luma(0, 2, vec![]).is_err());
    }

    #[test]
    fn test_nearest_downsample() {
        // 4x4 raster: left half black, right half white
        let mut data = vec![0_u8; 16];
        for y in 0..4 {
            data[y * 4 + 2] = 255;
            data[y * 4 + 3] = 255;
        }
        let raster = Raster::luma(4, 4, data).unwrap();
        let map = HeightMap::from_raster(&raster, 2, 2, Sampling::Nearest).unwrap();
        assert_eq!(map.get(0, 0), 0.0);
        assert_eq!(map.get(1, 0), 1.0);
        assert_eq!(map.get(1, 1), 1.0);
        assert_eq!(map.get(5, 5), 0.0);
    }

    #[test]
    fn test_bilinear_upsample_blends() {
        let raster = Raster::luma(2, 1, vec![0, 255]).unwrap();
        let map = HeightMap::from_raster(&raster, 4, 1, Sampling::Bilinear).unwrap();
        assert_relative_eq!(map.get(0, 0), 0.0, epsilon = 1e-6);
        assert_relative_eq!(map.get(3, 0), 1.0, epsilon = 1e-6);
        let mid = map.get(1, 0);
        assert!(mid > 0.0 && mid < 1.0, "expected a blend, got {mid}");
    }

    #[test]
    fn test_rgb_heightmap_averages_channels() {
        let raster = Raster::rgb(1, 1, vec![255, 0, 0]).unwrap();
        let map = HeightMap::from_raster(&raster, 1, 1, Sampling::Nearest).unwrap();
        assert_relative_eq!(map.get(0, 0), 1.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_landscape_colours() {
        let data = vec![
            181, 219, 235, // water
            207, 198, 180, // bedrock
            121, 150, 114, // grass
            34, 87, 22, // tree
        ];
        let raster = Raster::rgb(4, 1, data).unwrap();
        let map = LandscapeMap::from_raster(&raster, 4, 1, &LandscapePalette::reference()).unwrap();
        assert_eq!(map.get(0, 0), Some(Material::Water));
        assert_eq!(map.get(1, 0), Some(Material::Bedrock));
        assert_eq!(map.get(2, 0), Some(Material::Grass));
        assert_eq!(map.get(3, 0), Some(Material::Tree));
        assert_eq!(map.get(4, 0), None);
    }

    #[test]
    fn test_unknown_colour_uses_fallback_and_custom_entry() {
        let palette = LandscapePalette::reference().with_entry([10, 60, 10], Material::Tree);
        assert_eq!(palette.material_for([1, 2, 3]), Material::Grass);
        assert_eq!(palette.material_for([10, 60, 10]), Material::Tree);
    }

    #[test]
    fn test_landscape_requires_rgb() {
        let raster = Raster::luma(2, 2, vec![0; 4]).unwrap();
        assert!(LandscapeMap::from_raster(&raster, 2, 2, &LandscapePalette::reference()).is_err());
    }

    #[test]
    fn test_oversized_raster_dimensions_rejected() {
        assert_eq!(
            Raster::rgb(usize::MAX, 2, vec![0; 6]).unwrap_err(),
            GridError::InvalidDimensions {
                width: usize::MAX,
                height: 2
            }
        );
    }

    #[test]
    fn test_tree_species_colours_map_to_tree() {
        let palette = LandscapePalette::reference();
        for rgb in [[34, 87, 22], [61, 92, 49], [25, 64, 35], [78, 110, 52]] {
            assert_eq!(palette.material_for(rgb), Material::Tree, "{rgb:?}");
        }
    }

    #[test]
    fn test_landscape_map_length_checked() {
        let short: LandscapeMap =
            serde_json::from_str(r#"{"width":4,"height":4,"materials":["Water"]}"#).unwrap();
        assert_eq!(
            short.validate(),
            Err(GridError::RasterSizeMismatch {
                expected: 16,
                actual: 1
            })
        );
        assert_eq!(short.get(1, 0), None);

        let raster = Raster::rgb(1, 1, vec![181, 219, 235]).unwrap();
        let map = LandscapeMap::from_raster(&raster, 3, 2, &LandscapePalette::reference()).unwrap();
        assert!(map.validate().is_ok());
    }
}
