//! Optional terrain inputs consumed once at initialization

use crate::error::InitWarning;
use crate::grid::{LandscapePalette, Raster, Sampling};

/// Heightmap and landscape rasters for [`WildfireSimulation::initialize`]
///
/// Inputs that cannot be used are recorded as [`InitWarning`]s instead of
/// failing; the simulation then starts on flat terrain with the configured
/// material policy.
///
/// [`WildfireSimulation::initialize`]: crate::simulation::WildfireSimulation::initialize
#[derive(Debug, Clone, Default)]
pub struct TerrainSource {
    pub(crate) heightmap: Option<Raster>,
    pub(crate) landscape: Option<Raster>,
    pub(crate) palette: LandscapePalette,
    pub(crate) sampling: Sampling,
    pub(crate) warnings: Vec<InitWarning>,
}

impl TerrainSource {
    /// No terrain inputs
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_heightmap(mut self, raster: Raster) -> Self {
        self.heightmap = Some(raster);
        self
    }

    /// Heightmap from raw decoded bytes (1 or 3 channels)
    #[must_use]
    pub fn with_heightmap_bytes(
        mut self,
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Self {
        match raster_from_bytes(width, height, channels, data) {
            Ok(raster) => self.heightmap = Some(raster),
            Err(reason) => self.warnings.push(InitWarning::HeightmapUnavailable(reason)),
        }
        self
    }

    /// Record that the host could not load a heightmap
    #[must_use]
    pub fn with_heightmap_failure(mut self, reason: impl Into<String>) -> Self {
        self.warnings
            .push(InitWarning::HeightmapUnavailable(reason.into()));
        self
    }

    #[must_use]
    pub fn with_landscape(mut self, raster: Raster) -> Self {
        self.landscape = Some(raster);
        self
    }

    /// Landscape from raw decoded RGB bytes
    #[must_use]
    pub fn with_landscape_bytes(mut self, width: usize, height: usize, data: Vec<u8>) -> Self {
        match Raster::rgb(width, height, data) {
            Ok(raster) => self.landscape = Some(raster),
            Err(e) => self
                .warnings
                .push(InitWarning::LandscapeUnavailable(e.to_string())),
        }
        self
    }

    /// Record that the host could not load a landscape raster
    #[must_use]
    pub fn with_landscape_failure(mut self, reason: impl Into<String>) -> Self {
        self.warnings
            .push(InitWarning::LandscapeUnavailable(reason.into()));
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: LandscapePalette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }
}

fn raster_from_bytes(
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
) -> Result<Raster, String> {
    let raster = match channels {
        1 => Raster::luma(width, height, data),
        3 => Raster::rgb(width, height, data),
        n => return Err(format!("unsupported channel count {n}")),
    };
    raster.map_err(|e| e.to_string())
}
