//! Simulation configuration and presets
//!
//! Every tunable constant of the automaton lives in [`SimulationConfig`].
//! Configurations serialize to JSON so hosts can ship them as data.

use crate::core_types::{Material, TemperatureModel, WindOffsetTable, WindPolicy};
use crate::error::{check_probability, GridError};
use crate::grid::MaterialPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Per-material ignition probability for an eligible cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlammabilityTable {
    pub grass: f32,
    pub tree: f32,
    pub water: f32,
    pub bedrock: f32,
}

impl Default for FlammabilityTable {
    fn default() -> Self {
        Self {
            grass: 0.75,
            tree: 0.9,
            water: 0.0,
            bedrock: 0.1,
        }
    }
}

impl FlammabilityTable {
    /// Probability for `material`
    #[inline]
    #[must_use]
    pub fn for_material(&self, material: Material) -> f32 {
        match material {
            Material::Grass => self.grass,
            Material::Tree => self.tree,
            Material::Water => self.water,
            Material::Bedrock => self.bedrock,
        }
    }

    /// Same probability for every material
    #[must_use]
    pub fn uniform(probability: f32) -> Self {
        Self {
            grass: probability,
            tree: probability,
            water: probability,
            bedrock: probability,
        }
    }

    fn validate(&self) -> Result<(), GridError> {
        check_probability("flammability.grass", self.grass)?;
        check_probability("flammability.tree", self.tree)?;
        check_probability("flammability.water", self.water)?;
        check_probability("flammability.bedrock", self.bedrock)
    }
}

/// Regrowth probabilities per tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegrowthConfig {
    /// Destroyed → unburned grass
    pub grass: f32,
    /// Unburned grass → tree
    pub tree: f32,
}

/// Simulated rainfall that damps ignition
///
/// Once per tick a rain amount is drawn uniformly from `[0, max_amount)`.
/// Amounts below `dry_threshold` scale flammability by `1 - dry_attenuation`,
/// amounts above `wet_threshold` by `1 - wet_attenuation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    pub enabled: bool,
    pub max_amount: f32,
    pub dry_threshold: f32,
    pub dry_attenuation: f32,
    pub wet_threshold: f32,
    pub wet_attenuation: f32,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_amount: 120.0,
            dry_threshold: 24.0,
            dry_attenuation: 0.018,
            wet_threshold: 96.0,
            wet_attenuation: 0.061,
        }
    }
}

impl RainConfig {
    /// Flammability multiplier for a drawn rain amount
    #[must_use]
    pub fn attenuation(&self, amount: f32) -> f32 {
        if amount < self.dry_threshold {
            1.0 - self.dry_attenuation
        } else if amount > self.wet_threshold {
            1.0 - self.wet_attenuation
        } else {
            1.0
        }
    }

    fn validate(&self) -> Result<(), GridError> {
        check_probability("rain.dry_attenuation", self.dry_attenuation)?;
        check_probability("rain.wet_attenuation", self.wet_attenuation)?;
        if !self.max_amount.is_finite() || self.max_amount <= 0.0 {
            return Err(GridError::InvalidParameter {
                name: "rain.max_amount",
                message: format!("must be finite and positive, got {}", self.max_amount),
            });
        }
        if !(self.dry_threshold.is_finite() && self.wet_threshold.is_finite()) {
            return Err(GridError::InvalidParameter {
                name: "rain.thresholds",
                message: "must be finite".to_string(),
            });
        }
        Ok(())
    }
}

/// Which cells are updated on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UpdateSchedule {
    /// Every cell, every tick
    #[default]
    Full,
    /// Only cells with `id % 2 == tick % 2`; the rest are carried over
    Parity,
}

impl UpdateSchedule {
    #[inline]
    #[must_use]
    pub fn includes(self, id: u32, tick: u32) -> bool {
        match self {
            UpdateSchedule::Full => true,
            UpdateSchedule::Parity => id % 2 == tick % 2,
        }
    }
}

/// How the per-cell scan is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecutionMode {
    #[default]
    Sequential,
    /// Rows processed in parallel on the rayon pool, one RNG stream per row
    RowParallel,
}

/// Complete configuration for one simulation instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub width: usize,
    pub height: usize,
    pub flammability: FlammabilityTable,
    /// Chance per tick that an unburned cell is eligible without a burning neighbour
    pub spontaneous_ignition: f32,
    pub temperature: TemperatureModel,
    pub regrowth: RegrowthConfig,
    pub rain: RainConfig,
    pub schedule: UpdateSchedule,
    pub wind_policy: WindPolicy,
    pub wind_offsets: WindOffsetTable,
    pub materials: MaterialPolicy,
    pub execution: ExecutionMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::reference()
    }
}

impl SimulationConfig {
    /// Reference CPU automaton on a 64×64 grass grid
    ///
    /// No spontaneous ignition, regrowth or rain. Fire only spreads from
    /// burning upwind neighbours.
    #[must_use]
    pub fn reference() -> Self {
        Self {
            width: 64,
            height: 64,
            flammability: FlammabilityTable::default(),
            spontaneous_ignition: 0.0,
            temperature: TemperatureModel::default(),
            regrowth: RegrowthConfig::default(),
            rain: RainConfig::default(),
            schedule: UpdateSchedule::Full,
            wind_policy: WindPolicy::Fixed,
            wind_offsets: WindOffsetTable::reference(),
            materials: MaterialPolicy::default(),
            execution: ExecutionMode::Sequential,
        }
    }

    /// Extended automaton with lightning, regrowth and mixed grass/tree fuel
    #[must_use]
    pub fn extended() -> Self {
        Self {
            spontaneous_ignition: 0.01,
            regrowth: RegrowthConfig {
                grass: 0.1,
                tree: 0.2,
            },
            materials: MaterialPolicy::RandomGrassTree,
            ..Self::reference()
        }
    }

    /// Builder-style dimension override
    #[must_use]
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Check every parameter
    ///
    /// # Errors
    /// Returns the first invalid parameter found
    pub fn validate(&self) -> Result<(), GridError> {
        if !matches!(
            self.width.checked_mul(self.height),
            Some(n) if n > 0 && u32::try_from(n).is_ok()
        ) {
            return Err(GridError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        self.flammability.validate()?;
        check_probability("spontaneous_ignition", self.spontaneous_ignition)?;
        self.temperature.validate()?;
        check_probability("regrowth.grass", self.regrowth.grass)?;
        check_probability("regrowth.tree", self.regrowth.tree)?;
        self.rain.validate()?;
        self.wind_offsets.validate()?;
        self.materials.validate()
    }

    /// Parse a JSON document; missing fields take reference values
    ///
    /// # Errors
    /// Returns `GridError::ConfigParse` for malformed JSON, or a validation error
    pub fn from_json_str(json: &str) -> Result<Self, GridError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| GridError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `GridError::ConfigParse` if serialization fails
    pub fn to_json_string(&self) -> Result<String, GridError> {
        serde_json::to_string_pretty(self).map_err(|e| GridError::ConfigParse(e.to_string()))
    }

    /// Load a configuration file
    ///
    /// # Errors
    /// Returns error if the file cannot be read, parsed or validated
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, GridError> {
        let contents =
            fs::read_to_string(path).map_err(|e| GridError::ConfigIo(e.to_string()))?;
        Self::from_json_str(&contents)
    }

    /// Save this configuration as pretty JSON
    ///
    /// # Errors
    /// Returns error if the configuration cannot be serialized or written
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), GridError> {
        let contents = self.to_json_string()?;
        fs::write(path, contents).map_err(|e| GridError::ConfigIo(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ClusterConfig;

    #[test]
    fn test_presets_validate() {
        assert!(SimulationConfig::reference().validate().is_ok());
        assert!(SimulationConfig::extended().validate().is_ok());
        assert_eq!(SimulationConfig::extended().spontaneous_ignition, 0.01);
        assert_eq!(SimulationConfig::reference().regrowth, RegrowthConfig::default());
    }

    #[test]
    fn test_short_landscape_map_rejected() {
        let json = r#"{"width":4,"height":4,"materials":{"Landscape":{"width":4,"height":4,"materials":["Water"]}}}"#;
        assert!(matches!(
            SimulationConfig::from_json_str(json),
            Err(GridError::RasterSizeMismatch {
                expected: 16,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = SimulationConfig::reference().with_size(0, 10);
        assert!(matches!(
            config.validate(),
            Err(GridError::InvalidDimensions { .. })
        ));

        let mut config = SimulationConfig::reference();
        config.flammability.grass = 1.2;
        assert!(matches!(
            config.validate(),
            Err(GridError::InvalidProbability {
                name: "flammability.grass",
                ..
            })
        ));

        let mut config = SimulationConfig::reference();
        config.rain.max_amount = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rain_attenuation_bands() {
        let rain = RainConfig::default();
        assert_eq!(rain.attenuation(10.0), 1.0 - 0.018);
        assert_eq!(rain.attenuation(50.0), 1.0);
        assert_eq!(rain.attenuation(100.0), 1.0 - 0.061);
    }

    #[test]
    fn test_parity_schedule() {
        assert!(UpdateSchedule::Full.includes(3, 0));
        assert!(UpdateSchedule::Parity.includes(4, 2));
        assert!(!UpdateSchedule::Parity.includes(3, 2));
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = SimulationConfig::extended().with_size(32, 16);
        config.materials = MaterialPolicy::Clustered(ClusterConfig::default());
        config.wind_policy = WindPolicy::RerollEvery(24);
        let json = config.to_json_string().unwrap();
        let back = SimulationConfig::from_json_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_json_uses_reference_defaults() {
        let config = SimulationConfig::from_json_str(r#"{ "width": 10, "height": 8 }"#).unwrap();
        assert_eq!(config.width, 10);
        assert_eq!(config.flammability, FlammabilityTable::default());
        assert!(SimulationConfig::from_json_str("{ not json").is_err());
    }
}
