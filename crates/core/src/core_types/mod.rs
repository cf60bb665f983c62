//! Core types and utilities

pub mod cell;
pub mod rng;
pub mod temperature;
pub mod wind;

pub use cell::{Cell, CellLocation, CellState, Material};
pub use rng::{SimRng, DEFAULT_SEED};
pub use temperature::{TemperatureModel, TemperatureProfile, HOURS_PER_DAY};
pub use wind::{GridOffset, WindDirection, WindOffsetTable, WindPolicy};
