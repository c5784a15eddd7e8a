//! Construction-time parameters
//!
//! Every config deserializes with `serde` (missing fields fall back to the
//! defaults) and is checked by `validate()` before a component is built.
//!
//! ```
//! use streamstats::config::FusionConfig;
//!
//! let config = FusionConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.wavelet.window(), 8);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Deepest supported Haar decomposition (window of 65536 samples)
pub const MAX_WAVELET_LEVELS: u32 = 16;

/// How [`RollingReturn`](crate::stats::RollingReturn) measures change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnMode {
    /// `(new - last) / last`, 0 when `last` is zero
    #[default]
    Relative,
    /// `new - last`
    Absolute,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReturnConfig {
    pub mode: ReturnMode,
}

impl Default for ReturnConfig {
    fn default() -> Self {
        Self { mode: ReturnMode::Relative }
    }
}

/// Bollinger-style band parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    /// Moment window length
    pub window: usize,
    /// Standard deviation multiplier `k`
    pub multiplier: f64,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self { window: 20, multiplier: 2.0 }
    }
}

impl BandConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::InvalidCapacity { capacity: self.window, min: 1 });
        }
        if !self.multiplier.is_finite() || self.multiplier < 0.0 {
            return Err(ConfigError::InvalidMultiplier(self.multiplier));
        }
        Ok(())
    }
}

/// Adaptive average horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AverageConfig {
    pub memory: usize,
}

impl Default for AverageConfig {
    fn default() -> Self {
        Self { memory: 20 }
    }
}

impl AverageConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory == 0 {
            return Err(ConfigError::InvalidMemory(self.memory));
        }
        Ok(())
    }
}

/// Scalar random-walk Kalman filter parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KalmanConfig {
    /// Process noise variance `q` (how fast the level drifts)
    pub process_noise: f64,
    /// Measurement noise variance `r`
    pub measurement_noise: f64,
    /// Estimate variance right after the first sample
    pub initial_uncertainty: f64,
    /// Updates before the estimate counts as ready
    pub warmup: usize,
}

impl Default for KalmanConfig {
    fn default() -> Self {
        Self {
            process_noise: 1e-4,
            measurement_noise: 1e-2,
            initial_uncertainty: 1.0,
            warmup: 10,
        }
    }
}

impl KalmanConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.process_noise.is_finite() || self.process_noise < 0.0 {
            return Err(ConfigError::InvalidNoise { name: "process noise", value: self.process_noise });
        }
        if !self.measurement_noise.is_finite() || self.measurement_noise <= 0.0 {
            return Err(ConfigError::InvalidNoise {
                name: "measurement noise",
                value: self.measurement_noise,
            });
        }
        if !self.initial_uncertainty.is_finite() || self.initial_uncertainty < 0.0 {
            return Err(ConfigError::InvalidNoise {
                name: "initial uncertainty",
                value: self.initial_uncertainty,
            });
        }
        if self.warmup == 0 {
            return Err(ConfigError::InvalidWarmup(self.warmup));
        }
        Ok(())
    }
}

/// Haar denoiser depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveletConfig {
    /// Decomposition levels; the window holds `2^levels` samples
    pub levels: u32,
}

impl Default for WaveletConfig {
    fn default() -> Self {
        Self { levels: 3 }
    }
}

impl WaveletConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels == 0 || self.levels > MAX_WAVELET_LEVELS {
            return Err(ConfigError::InvalidLevels { levels: self.levels, max: MAX_WAVELET_LEVELS });
        }
        Ok(())
    }

    #[inline]
    pub fn window(&self) -> usize {
        1usize << self.levels
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub kalman: KalmanConfig,
    pub wavelet: WaveletConfig,
}

impl FusionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.kalman.validate()?;
        self.wavelet.validate()
    }
}
