//! Per-cell simulation state
//!
//! A cell is one grid location with a combustion state and a fuel material.
//! Its id and location are fixed at initialization; state and material change
//! every tick through the transition rule.

use serde::{Deserialize, Serialize};

/// Combustion status of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    /// Unburned fuel, eligible to ignite
    #[default]
    NotOnFire,
    /// Burning this tick, becomes `Destroyed` on the next tick
    OnFire,
    /// Burned out, may regrow as grass
    Destroyed,
}

impl CellState {
    /// All states in declaration order
    pub const ALL: [CellState; 3] = [
        CellState::NotOnFire,
        CellState::OnFire,
        CellState::Destroyed,
    ];

    /// Stable numeric code used across the C ABI
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            CellState::NotOnFire => 0,
            CellState::OnFire => 1,
            CellState::Destroyed => 2,
        }
    }

    /// Inverse of [`CellState::code`]
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CellState::NotOnFire),
            1 => Some(CellState::OnFire),
            2 => Some(CellState::Destroyed),
            _ => None,
        }
    }
}

/// Fuel type of a cell, governs flammability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Material {
    #[default]
    Grass,
    Tree,
    Water,
    Bedrock,
}

impl Material {
    /// All materials in declaration order
    pub const ALL: [Material; 4] = [
        Material::Grass,
        Material::Tree,
        Material::Water,
        Material::Bedrock,
    ];

    /// Stable numeric code used across the C ABI
    ///
    /// Matches the material channel of the compute texture layout
    /// (grass 0, water 1, bedrock 2, tree 3).
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Material::Grass => 0,
            Material::Water => 1,
            Material::Bedrock => 2,
            Material::Tree => 3,
        }
    }

    /// Inverse of [`Material::code`]
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Material::Grass),
            1 => Some(Material::Water),
            2 => Some(Material::Bedrock),
            3 => Some(Material::Tree),
            _ => None,
        }
    }
}

/// Integer grid coordinate, `x` is the column and `y` the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellLocation {
    pub x: usize,
    pub y: usize,
}

impl CellLocation {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance, the metric used by square neighbourhood searches
    #[must_use]
    pub fn chebyshev_distance(&self, other: &CellLocation) -> usize {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// The atomic unit of simulation state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Unique id, `y * width + x`
    pub(crate) id: u32,
    pub(crate) location: CellLocation,
    pub(crate) state: CellState,
    pub(crate) material: Material,
    /// Normalized elevation in `[0, 1]`; cosmetic only
    pub(crate) height: f32,
}

impl Cell {
    /// Create an unburned cell
    #[must_use]
    pub fn new(id: u32, location: CellLocation, material: Material, height: f32) -> Self {
        Self {
            id,
            location,
            state: CellState::NotOnFire,
            material,
            height: height.clamp(0.0, 1.0),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn location(&self) -> CellLocation {
        self.location
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn is_on_fire(&self) -> bool {
        self.state == CellState::OnFire
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cell_is_unburned() {
        let cell = Cell::new(7, CellLocation::new(3, 1), Material::Tree, 0.4);
        assert_eq!(cell.state(), CellState::NotOnFire);
        assert_eq!(cell.material(), Material::Tree);
        assert_eq!(cell.id(), 7);
        assert!(!cell.is_on_fire());
    }

    #[test]
    fn test_height_is_clamped() {
        let cell = Cell::new(0, CellLocation::new(0, 0), Material::Grass, 1.7);
        assert_eq!(cell.height(), 1.0);
        let cell = Cell::new(0, CellLocation::new(0, 0), Material::Grass, -3.0);
        assert_eq!(cell.height(), 0.0);
    }

    #[test]
    fn test_codes_are_stable() {
        for state in CellState::ALL {
            assert_eq!(CellState::from_code(state.code()), Some(state));
        }
        for material in Material::ALL {
            assert_eq!(Material::from_code(material.code()), Some(material));
        }
        assert_eq!(Material::Tree.code(), 3);
        assert_eq!(Material::from_code(9), None);
    }

    #[test]
    fn test_chebyshev_distance() {
        let a = CellLocation::new(2, 2);
        assert_eq!(a.chebyshev_distance(&CellLocation::new(4, 3)), 2);
        assert_eq!(a.chebyshev_distance(&CellLocation::new(2, 2)), 0);
    }
}
