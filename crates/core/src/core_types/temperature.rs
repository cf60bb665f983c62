//! Diurnal temperature curve
//!
//! Ambient temperature follows `mean + amplitude * sin(2πh/24 - π/2)` with
//! independent Gaussian noise per hour, so the day starts at its coldest and
//! peaks at hour 12. The profile is generated once and only read afterwards.

use crate::core_types::SimRng;
use crate::error::GridError;
use serde::{Deserialize, Serialize};

/// Hours in the generated profile
pub const HOURS_PER_DAY: usize = 24;

/// Parameters of the daily temperature model and its effect on ignition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureModel {
    /// Daily mean temperature (°C)
    pub mean: f32,
    /// Half the day/night swing (°C)
    pub amplitude: f32,
    /// Standard deviation of the per-hour noise (°C)
    pub noise_std_dev: f32,
    /// Hours strictly above this temperature are "hot" (°C)
    pub hot_threshold: f32,
    /// During hot hours the ignition draw is divided by this factor,
    /// making ignition more likely
    pub hot_ignition_multiplier: f32,
}

impl Default for TemperatureModel {
    fn default() -> Self {
        Self {
            mean: 20.0,
            amplitude: 5.0,
            noise_std_dev: 2.0,
            hot_threshold: 25.0,
            hot_ignition_multiplier: 2.0,
        }
    }
}

impl TemperatureModel {
    /// # Errors
    /// Returns `GridError::InvalidParameter` for non-finite values or a
    /// non-positive hot multiplier
    pub fn validate(&self) -> Result<(), GridError> {
        for (name, value) in [
            ("temperature.mean", self.mean),
            ("temperature.amplitude", self.amplitude),
            ("temperature.hot_threshold", self.hot_threshold),
        ] {
            if !value.is_finite() {
                return Err(GridError::InvalidParameter {
                    name,
                    message: format!("must be finite, got {value}"),
                });
            }
        }
        if !self.noise_std_dev.is_finite() || self.noise_std_dev < 0.0 {
            return Err(GridError::InvalidParameter {
                name: "temperature.noise_std_dev",
                message: format!("must be finite and non-negative, got {}", self.noise_std_dev),
            });
        }
        if !self.hot_ignition_multiplier.is_finite() || self.hot_ignition_multiplier <= 0.0 {
            return Err(GridError::InvalidParameter {
                name: "temperature.hot_ignition_multiplier",
                message: format!(
                    "must be finite and positive, got {}",
                    self.hot_ignition_multiplier
                ),
            });
        }
        Ok(())
    }
}

/// Hourly ambient temperature for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureProfile {
    hourly: [f32; HOURS_PER_DAY],
}

impl TemperatureProfile {
    /// Generate a profile from the sinusoidal model plus Gaussian noise
    pub fn generate(model: &TemperatureModel, rng: &mut SimRng) -> Self {
        let mut hourly = [0.0_f32; HOURS_PER_DAY];
        for (hour, temp) in hourly.iter_mut().enumerate() {
            let phase = std::f32::consts::TAU * hour as f32 / HOURS_PER_DAY as f32
                - std::f32::consts::FRAC_PI_2;
            *temp = model.mean + model.amplitude * phase.sin() + rng.gaussian(0.0, model.noise_std_dev);
        }
        Self { hourly }
    }

    /// A profile with the same temperature every hour
    #[must_use]
    pub fn constant(temperature: f32) -> Self {
        Self {
            hourly: [temperature; HOURS_PER_DAY],
        }
    }

    /// Build a profile from explicit hourly values
    #[must_use]
    pub fn from_hourly(hourly: [f32; HOURS_PER_DAY]) -> Self {
        Self { hourly }
    }

    /// Hour of day for a tick
    #[inline]
    #[must_use]
    pub fn hour_of_tick(tick: u32) -> usize {
        tick as usize % HOURS_PER_DAY
    }

    /// Temperature during the hour `tick % 24`
    #[inline]
    #[must_use]
    pub fn at_tick(&self, tick: u32) -> f32 {
        self.hourly[Self::hour_of_tick(tick)]
    }

    pub fn hourly(&self) -> &[f32; HOURS_PER_DAY] {
        &self.hourly
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_noiseless_profile_shape() {
        let model = TemperatureModel {
            noise_std_dev: 0.0,
            ..TemperatureModel::default()
        };
        let profile = TemperatureProfile::generate(&model, &mut SimRng::default());

        // sin(-π/2) = -1 at midnight, sin(π/2) = 1 at noon
        assert_relative_eq!(profile.at_tick(0), 15.0, epsilon = 1e-4);
        assert_relative_eq!(profile.at_tick(12), 25.0, epsilon = 1e-4);
        assert_relative_eq!(profile.at_tick(6), 20.0, epsilon = 1e-4);
    }

    #[test]
    fn test_tick_wraps_to_hour() {
        let mut hourly = [0.0; HOURS_PER_DAY];
        hourly[5] = 31.0;
        let profile = TemperatureProfile::from_hourly(hourly);
        assert_eq!(profile.at_tick(5), 31.0);
        assert_eq!(profile.at_tick(24 + 5), 31.0);
        assert_eq!(TemperatureProfile::hour_of_tick(u32::MAX), u32::MAX as usize % 24);
    }

    #[test]
    fn test_noise_is_bounded_in_practice() {
        let profile = TemperatureProfile::generate(&TemperatureModel::default(), &mut SimRng::from_seed_u64(1));
        for t in profile.hourly() {
            assert!(*t > 0.0 && *t < 40.0, "implausible temperature {t}");
        }
    }

    #[test]
    fn test_validate_rejects_bad_multiplier() {
        let model = TemperatureModel {
            hot_ignition_multiplier: 0.0,
            ..TemperatureModel::default()
        };
        assert!(model.validate().is_err());
        assert!(TemperatureModel::default().validate().is_ok());
    }
}
