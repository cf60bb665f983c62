//! State/material → colour table for snapshots

use crate::core_types::{CellState, Material};
use serde::{Deserialize, Serialize};

/// 8-bit RGB colour
pub type Rgb = [u8; 3];

/// Colours used when rendering a grid
///
/// Burning and destroyed cells are coloured by state; unburned cells by
/// material. Grass and tree colours can be darkened on low terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPalette {
    pub fire: Rgb,
    pub destroyed: Rgb,
    pub grass: Rgb,
    pub tree: Rgb,
    pub water: Rgb,
    pub bedrock: Rgb,
    /// Scale grass and tree by `0.5 + 0.5 * height`
    pub shade_by_height: bool,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::reference()
    }
}

impl ColorPalette {
    /// Red fire, white ash, landscape-style vegetation
    #[must_use]
    pub fn reference() -> Self {
        Self {
            fire: [255, 0, 0],
            destroyed: [255, 255, 255],
            grass: [121, 150, 114],
            tree: [34, 87, 22],
            water: [181, 219, 235],
            bedrock: [207, 198, 180],
            shade_by_height: true,
        }
    }

    /// Flat colours matching the texture dump of the compute automaton
    #[must_use]
    pub fn compute() -> Self {
        Self {
            fire: [255, 0, 0],
            destroyed: [0, 0, 0],
            grass: [0, 255, 0],
            tree: [0, 200, 0],
            water: [0, 0, 255],
            bedrock: [100, 100, 100],
            shade_by_height: false,
        }
    }

    /// Parse a preset name (`reference` or `compute`)
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "reference" => Some(Self::reference()),
            "compute" => Some(Self::compute()),
            _ => None,
        }
    }

    /// Colour for one cell
    #[must_use]
    pub fn color(&self, state: CellState, material: Material, height: f32) -> Rgb {
        match state {
            CellState::OnFire => self.fire,
            CellState::Destroyed => self.destroyed,
            CellState::NotOnFire => match material {
                Material::Grass => self.shade(self.grass, height),
                Material::Tree => self.shade(self.tree, height),
                Material::Water => self.water,
                Material::Bedrock => self.bedrock,
            },
        }
    }

    fn shade(&self, rgb: Rgb, height: f32) -> Rgb {
        if !self.shade_by_height {
            return rgb;
        }
        let factor = 0.5 + 0.5 * height.clamp(0.0, 1.0);
        rgb.map(|c| (f32::from(c) * factor).round() as u8)
    }
}
