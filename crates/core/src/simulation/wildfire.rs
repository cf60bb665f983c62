//! The wildfire grid automaton
//!
//! `WildfireSimulation` owns two pre-allocated grids. Each tick reads the
//! front grid, writes the back grid, then swaps them. It also owns the RNG,
//! wind direction, temperature profile and tick counter, so independent
//! instances never share state.

use crate::core_types::{
    Cell, CellLocation, CellState, Material, SimRng, TemperatureProfile, WindDirection,
};
use crate::error::{GridError, InitWarning};
use crate::export::{render_snapshot, ColorPalette, RgbRaster};
use crate::grid::{CellGrid, HeightMap, LandscapeMap, MaterialPolicy};
use crate::simulation::config::{ExecutionMode, SimulationConfig};
use crate::simulation::stats::{SimulationStats, StepCounts};
use crate::simulation::terrain_source::TerrainSource;
use crate::simulation::transition::{step_row, TickContext};
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Grid-based stochastic wildfire spread simulation
#[derive(Debug, Clone)]
pub struct WildfireSimulation {
    config: SimulationConfig,
    /// Authoritative grid, read during a tick
    front: CellGrid,
    /// Write buffer, swapped with `front` at the end of a tick
    back: CellGrid,
    rng: SimRng,
    wind: WindDirection,
    tick: u32,
    temperature: TemperatureProfile,
    init_warnings: Vec<InitWarning>,
    last_step: StepCounts,
}

impl WildfireSimulation {
    /// Flat terrain with materials from the configured policy
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid
    pub fn new(config: SimulationConfig, seed: u64) -> Result<Self, GridError> {
        Self::initialize(config, seed, TerrainSource::default())
    }

    /// Build a simulation from a configuration and optional terrain inputs
    ///
    /// Unusable terrain inputs are logged and kept in [`Self::init_warnings`].
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid
    pub fn initialize(
        config: SimulationConfig,
        seed: u64,
        terrain: TerrainSource,
    ) -> Result<Self, GridError> {
        config.validate()?;
        let (width, height) = (config.width, config.height);
        let mut rng = SimRng::from_seed_u64(seed);
        let TerrainSource {
            heightmap,
            landscape,
            palette,
            sampling,
            warnings: mut init_warnings,
        } = terrain;

        let heights = heightmap.and_then(|raster| {
            HeightMap::from_raster(&raster, width, height, sampling)
                .map_err(|e| init_warnings.push(InitWarning::HeightmapUnavailable(e.to_string())))
                .ok()
        });

        let landscape_policy = landscape.and_then(|raster| {
            LandscapeMap::from_raster(&raster, width, height, &palette)
                .map(MaterialPolicy::Landscape)
                .map_err(|e| init_warnings.push(InitWarning::LandscapeUnavailable(e.to_string())))
                .ok()
        });
        let policy = landscape_policy.as_ref().unwrap_or(&config.materials);

        let mut grid = CellGrid::new(width, height, Material::Grass)?;
        let materials = policy.assign(width, height, &mut rng);
        for (cell, material) in grid.cells_mut().iter_mut().zip(materials) {
            cell.material = material;
            if let Some(heights) = &heights {
                cell.height = heights.get(cell.location.x, cell.location.y).clamp(0.0, 1.0);
            }
        }

        let temperature = TemperatureProfile::generate(&config.temperature, &mut rng);
        let wind = WindDirection::random(&mut rng);

        for warning in &init_warnings {
            warn!("{}", warning);
        }
        info!(
            "Wildfire simulation initialized: {}x{} grid, seed={}, wind={}, materials={}, heightmap={}",
            width,
            height,
            seed,
            wind,
            policy.name(),
            heights.is_some()
        );

        Ok(Self {
            back: grid.clone(),
            front: grid,
            config,
            rng,
            wind,
            tick: 0,
            temperature,
            init_warnings,
            last_step: StepCounts::default(),
        })
    }

    /// Advance the simulation by one tick
    pub fn advance(&mut self) -> StepCounts {
        if self.config.wind_policy.should_reroll(self.tick) {
            self.wind = WindDirection::random(&mut self.rng);
            debug!("Wind re-rolled at tick {}: {}", self.tick, self.wind);
        }

        let temperature = self.temperature.at_tick(self.tick);
        let is_hot = temperature > self.config.temperature.hot_threshold;
        let rain_factor = if self.config.rain.enabled {
            let amount = self.rng.uniform() * self.config.rain.max_amount;
            self.config.rain.attenuation(amount)
        } else {
            1.0
        };

        let ctx = TickContext {
            tick: self.tick,
            offsets: self.config.wind_offsets.offsets(self.wind),
            flammability: &self.config.flammability,
            regrowth: self.config.regrowth,
            spontaneous_ignition: self.config.spontaneous_ignition,
            schedule: self.config.schedule,
            is_hot,
            hot_ignition_multiplier: self.config.temperature.hot_ignition_multiplier,
            rain_factor,
        };

        self.back.copy_from(&self.front);
        let width = self.front.width();
        let read = &self.front;

        let counts = match self.config.execution {
            ExecutionMode::Sequential => {
                let rng = &mut self.rng;
                self.back
                    .cells_mut()
                    .chunks_mut(width)
                    .fold(StepCounts::default(), |acc, row| {
                        acc + step_row(read, row, &ctx, rng)
                    })
            }
            ExecutionMode::RowParallel => {
                let mut row_rngs: Vec<SimRng> =
                    (0..self.front.height()).map(|_| self.rng.fork()).collect();
                self.back
                    .cells_mut()
                    .par_chunks_mut(width)
                    .zip(row_rngs.par_iter_mut())
                    .map(|(row, rng)| step_row(read, row, &ctx, rng))
                    .reduce(StepCounts::default, |a, b| a + b)
            }
        };

        std::mem::swap(&mut self.front, &mut self.back);

        debug!(
            "Tick {}: hour={}, T={:.1}°C, hot={}, rain_factor={:.3}, ignited={}, burned_out={}, regrown={}",
            self.tick,
            TemperatureProfile::hour_of_tick(self.tick),
            temperature,
            is_hot,
            rain_factor,
            counts.ignitions,
            counts.burnouts,
            counts.grass_regrowths + counts.tree_regrowths
        );

        self.tick = self.tick.wrapping_add(1);
        self.last_step = counts;
        counts
    }

    /// Advance `ticks` times, returning the summed transitions
    pub fn advance_by(&mut self, ticks: u32) -> StepCounts {
        (0..ticks).fold(StepCounts::default(), |acc, _| acc + self.advance())
    }

    /// Advance until nothing is burning or `max_ticks` have run
    ///
    /// Returns the number of ticks advanced.
    pub fn run_until_extinguished(&mut self, max_ticks: u32) -> u32 {
        let mut ran = 0;
        while ran < max_ticks && self.front.count_by_state(CellState::OnFire) > 0 {
            self.advance();
            ran += 1;
        }
        info!(
            "Run finished after {} ticks, {} cells destroyed",
            ran,
            self.front.count_by_state(CellState::Destroyed)
        );
        ran
    }

    /// Set an unburned cell on fire
    ///
    /// Returns `false` if the location is outside the grid or the cell is
    /// already burning or destroyed.
    pub fn ignite(&mut self, location: CellLocation) -> bool {
        match self.front.cell_mut(location.x, location.y) {
            Some(cell) if cell.state == CellState::NotOnFire => {
                cell.state = CellState::OnFire;
                debug!("Ignited cell ({}, {})", location.x, location.y);
                true
            }
            _ => false,
        }
    }

    /// Overwrite the state and material of one cell
    ///
    /// Returns `false` if the location is outside the grid.
    pub fn set_cell(&mut self, location: CellLocation, state: CellState, material: Material) -> bool {
        match self.front.cell_mut(location.x, location.y) {
            Some(cell) => {
                cell.state = state;
                cell.material = material;
                true
            }
            None => false,
        }
    }

    pub fn set_wind(&mut self, wind: WindDirection) {
        self.wind = wind;
    }

    /// Move the tick counter, e.g. to start at a given hour of day
    pub fn set_tick(&mut self, tick: u32) {
        self.tick = tick;
    }

    pub fn count_by_state(&self, state: CellState) -> usize {
        self.front.count_by_state(state)
    }

    /// Cells within `radius` of `location` in `state`, excluding `location`
    ///
    /// `location` must lie inside the grid.
    pub fn find_neighbors_by_state(
        &self,
        location: CellLocation,
        state: CellState,
        radius: usize,
    ) -> Vec<Cell> {
        self.front.find_neighbors_by_state(location, state, radius)
    }

    pub fn neighbors_on_fire(&self, location: CellLocation) -> Vec<Cell> {
        self.front.neighbors_on_fire(location)
    }

    pub fn neighbors_not_on_fire(&self, location: CellLocation) -> Vec<Cell> {
        self.front.neighbors_not_on_fire(location)
    }

    pub fn neighbors_destroyed(&self, location: CellLocation) -> Vec<Cell> {
        self.front.neighbors_destroyed(location)
    }

    /// Counts and conditions for the upcoming tick
    pub fn stats(&self) -> SimulationStats {
        let temperature = self.temperature.at_tick(self.tick);
        let mut stats = SimulationStats {
            tick: self.tick,
            hour: TemperatureProfile::hour_of_tick(self.tick),
            temperature,
            is_hot: temperature > self.config.temperature.hot_threshold,
            wind: self.wind,
            not_on_fire: 0,
            on_fire: 0,
            destroyed: 0,
            grass: 0,
            tree: 0,
            water: 0,
            bedrock: 0,
            last_step: self.last_step,
        };
        stats.count_grid(&self.front);
        stats
    }

    /// RGB snapshot of the current grid
    pub fn render_snapshot(&self, palette: &ColorPalette) -> RgbRaster {
        render_snapshot(&self.front, palette)
    }

    pub fn grid(&self) -> &CellGrid {
        &self.front
    }

    pub fn width(&self) -> usize {
        self.front.width()
    }

    pub fn height(&self) -> usize {
        self.front.height()
    }

    pub fn wind(&self) -> WindDirection {
        self.wind
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn temperature_profile(&self) -> &TemperatureProfile {
        &self.temperature
    }

    /// Terrain inputs rejected during initialization
    pub fn init_warnings(&self) -> &[InitWarning] {
        &self.init_warnings
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Transitions applied by the most recent tick
    pub fn last_step(&self) -> StepCounts {
        self.last_step
    }
}
