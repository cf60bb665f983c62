//! Wildfire Grid Automaton Core Library
//!
//! A discrete-time stochastic cellular automaton for wildfire spread on a 2D
//! grid. Each cell has a fuel material and a combustion state; fire spreads
//! from burning upwind neighbours with material-dependent probability,
//! modulated by a daily temperature curve and optional rainfall, and burned
//! ground can regrow.
//!
//! ## Overview
//!
//! - [`WildfireSimulation`] owns a double-buffered grid, a seeded RNG, the
//!   wind direction and a tick counter
//! - [`SimulationConfig`] holds every tunable constant, with `reference()`
//!   and `extended()` presets and JSON load/save
//! - [`TerrainSource`] supplies optional heightmap and landscape rasters
//! - [`render_snapshot`] turns a grid into an RGB raster through a
//!   [`ColorPalette`]
//!
//! ```
//! use wildfire_grid_core::{CellLocation, CellState, SimulationConfig, WildfireSimulation};
//!
//! let config = SimulationConfig::reference().with_size(32, 32);
//! let mut sim = WildfireSimulation::new(config, 42).unwrap();
//! sim.ignite(CellLocation::new(16, 16));
//! sim.advance();
//! assert_eq!(sim.grid().cell(16, 16).unwrap().state(), CellState::Destroyed);
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;

pub mod export;
pub mod grid;
pub mod simulation;

// Re-export core types
pub use core_types::{
    Cell, CellLocation, CellState, GridOffset, Material, SimRng, TemperatureModel,
    TemperatureProfile, WindDirection, WindOffsetTable, WindPolicy, DEFAULT_SEED,
};
pub use error::{GridError, InitWarning};

pub use export::{render_snapshot, ColorPalette, RgbRaster};
pub use grid::{
    CellGrid, ClusterConfig, Fill, HeightMap, LandscapeMap, LandscapePalette, MaterialPolicy,
    Raster, Sampling,
};
pub use simulation::{
    ExecutionMode, FlammabilityTable, RainConfig, RegrowthConfig, SimulationConfig,
    SimulationStats, StepCounts, TerrainSource, UpdateSchedule, WildfireSimulation,
};
