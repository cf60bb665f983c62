//! Wind direction and upwind neighbour offsets
//!
//! Fire can only spread onto a cell from the neighbours listed for the
//! current wind direction. Calm wind lists all eight neighbours; cardinal
//! winds list five and diagonal winds three.

use crate::core_types::SimRng;
use crate::error::GridError;
use nalgebra::Vector2;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative `(dx, dy)` offset from a cell to one of its neighbours
pub type GridOffset = Vector2<i32>;

/// Process-wide wind direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindDirection {
    #[default]
    Calm,
    S,
    N,
    W,
    E,
    SW,
    SE,
    NW,
    NE,
}

impl WindDirection {
    /// All directions, in the order used for uniform random selection
    pub const ALL: [WindDirection; 9] = [
        WindDirection::Calm,
        WindDirection::S,
        WindDirection::N,
        WindDirection::W,
        WindDirection::E,
        WindDirection::SW,
        WindDirection::SE,
        WindDirection::NW,
        WindDirection::NE,
    ];

    /// Pick a direction uniformly at random
    pub fn random(rng: &mut SimRng) -> Self {
        Self::ALL[rng.index(Self::ALL.len())]
    }

    /// Stable numeric code used across the C ABI (index into [`WindDirection::ALL`])
    #[must_use]
    pub fn code(self) -> u8 {
        Self::ALL.iter().position(|d| *d == self).unwrap_or(0) as u8
    }

    /// Inverse of [`WindDirection::code`]
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Parse a short name such as `"calm"`, `"ne"` or `"S"`
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "CALM" => Some(WindDirection::Calm),
            "S" => Some(WindDirection::S),
            "N" => Some(WindDirection::N),
            "W" => Some(WindDirection::W),
            "E" => Some(WindDirection::E),
            "SW" => Some(WindDirection::SW),
            "SE" => Some(WindDirection::SE),
            "NW" => Some(WindDirection::NW),
            "NE" => Some(WindDirection::NE),
            _ => None,
        }
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WindDirection::Calm => "calm",
            WindDirection::S => "S",
            WindDirection::N => "N",
            WindDirection::W => "W",
            WindDirection::E => "E",
            WindDirection::SW => "SW",
            WindDirection::SE => "SE",
            WindDirection::NW => "NW",
            WindDirection::NE => "NE",
        };
        f.write_str(name)
    }
}

/// When the wind direction changes during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindPolicy {
    /// Rolled once at initialization and kept for the whole run
    #[default]
    Fixed,
    /// Re-rolled before every tick whose counter is a non-zero multiple of `n`
    RerollEvery(u32),
}

impl WindPolicy {
    /// Whether the wind should be re-rolled before stepping `tick`
    #[must_use]
    pub fn should_reroll(&self, tick: u32) -> bool {
        match *self {
            WindPolicy::Fixed | WindPolicy::RerollEvery(0) => false,
            WindPolicy::RerollEvery(n) => tick != 0 && tick % n == 0,
        }
    }
}

/// Upwind neighbour offsets for every wind direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindOffsetTable {
    offsets: FxHashMap<WindDirection, Vec<GridOffset>>,
}

impl Default for WindOffsetTable {
    fn default() -> Self {
        Self::reference()
    }
}

impl WindOffsetTable {
    /// The reference offset table
    #[must_use]
    pub fn reference() -> Self {
        let o = |pairs: &[(i32, i32)]| -> Vec<GridOffset> {
            pairs.iter().map(|&(dx, dy)| GridOffset::new(dx, dy)).collect()
        };

        let mut offsets = FxHashMap::default();
        offsets.insert(
            WindDirection::Calm,
            o(&[
                (-1, -1),
                (-1, 0),
                (-1, 1),
                (0, -1),
                (0, 1),
                (1, -1),
                (1, 0),
                (1, 1),
            ]),
        );
        offsets.insert(
            WindDirection::N,
            o(&[(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1)]),
        );
        offsets.insert(
            WindDirection::S,
            o(&[(0, -1), (0, 1), (1, -1), (1, 0), (1, 1)]),
        );
        offsets.insert(
            WindDirection::E,
            o(&[(-1, 0), (-1, 1), (0, 1), (1, 0), (1, 1)]),
        );
        offsets.insert(
            WindDirection::W,
            o(&[(-1, -1), (-1, 0), (0, -1), (1, -1), (1, 0)]),
        );
        offsets.insert(WindDirection::NE, o(&[(-1, 0), (-1, 1), (0, 1)]));
        offsets.insert(WindDirection::NW, o(&[(-1, -1), (-1, 0), (0, -1)]));
        offsets.insert(WindDirection::SE, o(&[(0, 1), (1, 0), (1, 1)]));
        offsets.insert(WindDirection::SW, o(&[(0, -1), (1, -1), (1, 0)]));

        Self { offsets }
    }

    /// Build a table from explicit entries
    ///
    /// # Errors
    /// Returns `GridError::EmptyWindTable` if any direction is missing
    pub fn custom(offsets: FxHashMap<WindDirection, Vec<GridOffset>>) -> Result<Self, GridError> {
        let table = Self { offsets };
        table.validate()?;
        Ok(table)
    }

    /// Offsets for `direction`; empty if the table has no entry
    #[must_use]
    pub fn offsets(&self, direction: WindDirection) -> &[GridOffset] {
        self.offsets.get(&direction).map_or(&[], Vec::as_slice)
    }

    /// Replace the offsets of one direction
    pub fn set_offsets(&mut self, direction: WindDirection, offsets: Vec<GridOffset>) {
        self.offsets.insert(direction, offsets);
    }

    /// Every direction must have an entry (an empty list is allowed)
    ///
    /// # Errors
    /// Returns `GridError::EmptyWindTable` naming the first missing direction
    pub fn validate(&self) -> Result<(), GridError> {
        match WindDirection::ALL
            .iter()
            .find(|d| !self.offsets.contains_key(d))
        {
            Some(missing) => Err(GridError::EmptyWindTable(missing.to_string())),
            None => Ok(()),
        }
    }
}
