//! Per-cell transition rule
//!
//! Reads come from the previous tick's grid and writes go to a row of the
//! next one, so the order rows are processed in never changes the outcome.

use crate::core_types::{Cell, CellState, GridOffset, Material, SimRng};
use crate::grid::CellGrid;
use crate::simulation::config::{FlammabilityTable, RegrowthConfig, UpdateSchedule};
use crate::simulation::stats::StepCounts;

/// Values fixed for the duration of one tick
#[derive(Debug, Clone, Copy)]
pub(crate) struct TickContext<'a> {
    pub tick: u32,
    pub offsets: &'a [GridOffset],
    pub flammability: &'a FlammabilityTable,
    pub regrowth: RegrowthConfig,
    pub spontaneous_ignition: f32,
    pub schedule: UpdateSchedule,
    pub is_hot: bool,
    pub hot_ignition_multiplier: f32,
    /// Flammability multiplier from this tick's rain draw
    pub rain_factor: f32,
}

/// Apply the rule to one row of the write buffer
///
/// `row` must start as a copy of the same row of `read`.
pub(crate) fn step_row(
    read: &CellGrid,
    row: &mut [Cell],
    ctx: &TickContext<'_>,
    rng: &mut SimRng,
) -> StepCounts {
    let mut counts = StepCounts::default();
    for cell in row.iter_mut() {
        if ctx.schedule.includes(cell.id, ctx.tick) {
            step_cell(read, cell, ctx, rng, &mut counts);
        }
    }
    counts
}

fn step_cell(
    read: &CellGrid,
    cell: &mut Cell,
    ctx: &TickContext<'_>,
    rng: &mut SimRng,
    counts: &mut StepCounts,
) {
    match cell.state {
        CellState::NotOnFire => {
            let location = cell.location;
            let eligible = read.any_upwind_on_fire(location.x, location.y, ctx.offsets)
                || (ctx.spontaneous_ignition > 0.0 && rng.uniform() < ctx.spontaneous_ignition);

            let mut ignited = false;
            if eligible {
                let mut draw = rng.uniform();
                if ctx.is_hot {
                    draw /= ctx.hot_ignition_multiplier;
                }
                let p = ctx.flammability.for_material(cell.material) * ctx.rain_factor;
                if draw < p {
                    cell.state = CellState::OnFire;
                    counts.ignitions += 1;
                    ignited = true;
                }
            }

            if !ignited
                && cell.material == Material::Grass
                && ctx.regrowth.tree > 0.0
                && rng.uniform() < ctx.regrowth.tree
            {
                cell.material = Material::Tree;
                counts.tree_regrowths += 1;
            }
        }
        CellState::OnFire => {
            cell.state = CellState::Destroyed;
            counts.burnouts += 1;
        }
        CellState::Destroyed => {
            if ctx.regrowth.grass > 0.0 && rng.uniform() < ctx.regrowth.grass {
                cell.state = CellState::NotOnFire;
                cell.material = Material::Grass;
                counts.grass_regrowths += 1;
            }
        }
    }
}
