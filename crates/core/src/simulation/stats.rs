//! Aggregate statistics for reporting

use crate::core_types::{CellState, Material, WindDirection};
use crate::grid::CellGrid;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Transitions applied during one or more ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepCounts {
    /// Unburned → burning
    pub ignitions: usize,
    /// Burning → destroyed
    pub burnouts: usize,
    /// Destroyed → unburned grass
    pub grass_regrowths: usize,
    /// Grass → tree
    pub tree_regrowths: usize,
}

impl Add for StepCounts {
    type Output = StepCounts;

    fn add(mut self, rhs: StepCounts) -> StepCounts {
        self += rhs;
        self
    }
}

impl AddAssign for StepCounts {
    fn add_assign(&mut self, rhs: StepCounts) {
        self.ignitions += rhs.ignitions;
        self.burnouts += rhs.burnouts;
        self.grass_regrowths += rhs.grass_regrowths;
        self.tree_regrowths += rhs.tree_regrowths;
    }
}

/// Snapshot of the simulation between ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub tick: u32,
    pub hour: usize,
    pub temperature: f32,
    pub is_hot: bool,
    pub wind: WindDirection,
    pub not_on_fire: usize,
    pub on_fire: usize,
    pub destroyed: usize,
    pub grass: usize,
    pub tree: usize,
    pub water: usize,
    pub bedrock: usize,
    /// Transitions applied by the most recent tick
    pub last_step: StepCounts,
}

impl SimulationStats {
    pub(crate) fn count_grid(&mut self, grid: &CellGrid) {
        self.not_on_fire = 0;
        self.on_fire = 0;
        self.destroyed = 0;
        self.grass = 0;
        self.tree = 0;
        self.water = 0;
        self.bedrock = 0;

        // Single pass instead of one scan per state and material
        for cell in grid.cells() {
            match cell.state() {
                CellState::NotOnFire => self.not_on_fire += 1,
                CellState::OnFire => self.on_fire += 1,
                CellState::Destroyed => self.destroyed += 1,
            }
            match cell.material() {
                Material::Grass => self.grass += 1,
                Material::Tree => self.tree += 1,
                Material::Water => self.water += 1,
                Material::Bedrock => self.bedrock += 1,
            }
        }
    }

    /// Cells in `state`
    #[must_use]
    pub fn count(&self, state: CellState) -> usize {
        match state {
            CellState::NotOnFire => self.not_on_fire,
            CellState::OnFire => self.on_fire,
            CellState::Destroyed => self.destroyed,
        }
    }

    /// Total cell count
    #[must_use]
    pub fn total(&self) -> usize {
        self.not_on_fire + self.on_fire + self.destroyed
    }
}

impl fmt::Display for SimulationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tick {} (hour {:02}, {:.1}°C{}) wind {}: {} unburned, {} burning, {} destroyed | +{} ignited, +{} regrown",
            self.tick,
            self.hour,
            self.temperature,
            if self.is_hot { ", hot" } else { "" },
            self.wind,
            self.not_on_fire,
            self.on_fire,
            self.destroyed,
            self.last_step.ignitions,
            self.last_step.grass_regrowths + self.last_step.tree_regrowths,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_counts_sum() {
        let a = StepCounts {
            ignitions: 2,
            burnouts: 1,
            grass_regrowths: 0,
            tree_regrowths: 3,
        };
        let total = a + a;
        assert_eq!(total.ignitions, 4);
        assert_eq!(total.tree_regrowths, 6);
    }

    #[test]
    fn test_count_grid_partitions() {
        let grid = CellGrid::new(4, 4, Material::Water).unwrap();
        let mut stats = SimulationStats {
            tick: 0,
            hour: 0,
            temperature: 20.0,
            is_hot: false,
            wind: WindDirection::Calm,
            not_on_fire: 99,
            on_fire: 0,
            destroyed: 0,
            grass: 0,
            tree: 0,
            water: 0,
            bedrock: 0,
            last_step: StepCounts::default(),
        };
        stats.count_grid(&grid);
        assert_eq!(stats.total(), 16);
        assert_eq!(stats.water, 16);
        assert_eq!(stats.count(CellState::NotOnFire), 16);
        assert!(stats.to_string().contains("16 unburned"));
    }
}
