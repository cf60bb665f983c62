//! Wildfire spread automaton: configuration, transition rule and engine

pub mod config;
pub mod stats;
pub mod terrain_source;
mod transition;
pub mod wildfire;

pub use config::{
    ExecutionMode, FlammabilityTable, RainConfig, RegrowthConfig, SimulationConfig,
    UpdateSchedule,
};
pub use stats::{SimulationStats, StepCounts};
pub use terrain_source::TerrainSource;
pub use wildfire::WildfireSimulation;
