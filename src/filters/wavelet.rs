use std::f64::consts::FRAC_1_SQRT_2;

use crate::config::WaveletConfig;
use crate::core::RollingBuffer;
use crate::error::{ConfigError, UpdateFault};

use super::StreamFilter;

/// Consistency constant turning the median absolute deviation into a sigma
const MAD_TO_SIGMA: f64 = 0.6745;

/// Sliding-window Haar wavelet denoiser
///
/// Holds the last `2^levels` samples. Once the window is full each update runs a
/// full-depth Haar decomposition, soft-thresholds the detail coefficients with
/// the universal threshold `sigma * sqrt(2 ln n)` (sigma estimated from the
/// finest details) and publishes the reconstructed newest sample.
#[derive(Debug, Clone)]
pub struct HaarDenoiser {
    window: RollingBuffer<f64>,
    levels: u32,
    coeffs: Vec<f64>,
    scratch: Vec<f64>,
    value: f64,
}

impl HaarDenoiser {
    pub fn new(config: &WaveletConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let n = config.window();
        Ok(Self {
            window: RollingBuffer::new(n)?,
            levels: config.levels,
            coeffs: vec![0.0; n],
            scratch: vec![0.0; n],
            value: f64::NAN,
        })
    }

    /// Push a sample, returns the denoised newest sample
    ///
    /// Before the window is full the raw sample is published. The sample stays
    /// in the window even if the reconstruction fails.
    pub fn denoise(&mut self, value: f64) -> Result<f64, UpdateFault> {
        self.window.push(value);
        if !self.window.is_ready() {
            self.value = value;
            return Ok(value);
        }

        for (c, v) in self.coeffs.iter_mut().zip(self.window.iter()) {
            *c = v;
        }
        self.forward();
        self.shrink();
        self.inverse();

        let out = self.coeffs[self.coeffs.len() - 1];
        if !out.is_finite() {
            return Err(UpdateFault::Internal(format!(
                "haar: non-finite reconstruction for sample {value}"
            )));
        }
        self.value = out;
        Ok(out)
    }

    /// In-place decomposition: approximation at index 0, details coarse to fine
    fn forward(&mut self) {
        let mut len = self.coeffs.len();
        for _ in 0..self.levels {
            let half = len / 2;
            for i in 0..half {
                let (a, b) = (self.coeffs[2 * i], self.coeffs[2 * i + 1]);
                self.scratch[i] = (a + b) * FRAC_1_SQRT_2;
                self.scratch[half + i] = (a - b) * FRAC_1_SQRT_2;
            }
            self.coeffs[..len].copy_from_slice(&self.scratch[..len]);
            len = half;
        }
    }

    fn inverse(&mut self) {
        let mut half = self.coeffs.len() >> self.levels;
        for _ in 0..self.levels {
            let len = half * 2;
            for i in 0..half {
                let (a, d) = (self.coeffs[i], self.coeffs[half + i]);
                self.scratch[2 * i] = (a + d) * FRAC_1_SQRT_2;
                self.scratch[2 * i + 1] = (a - d) * FRAC_1_SQRT_2;
            }
            self.coeffs[..len].copy_from_slice(&self.scratch[..len]);
            half = len;
        }
    }

    /// Soft thresholding of every detail coefficient
    fn shrink(&mut self) {
        let n = self.coeffs.len();
        let finest = &self.coeffs[n / 2..];

        let m = finest.len();
        for (s, c) in self.scratch[..m].iter_mut().zip(finest) {
            *s = c.abs();
        }
        let mags = &mut self.scratch[..m];
        mags.sort_by(|a, b| a.total_cmp(b));
        let mad = if m % 2 == 1 {
            mags[m / 2]
        } else {
            (mags[m / 2 - 1] + mags[m / 2]) / 2.0
        };

        let sigma = mad / MAD_TO_SIGMA;
        let threshold = sigma * (2.0 * (n as f64).ln()).sqrt();

        let approx = n >> self.levels;
        for c in &mut self.coeffs[approx..] {
            let shrunk = c.abs() - threshold;
            *c = if shrunk > 0.0 { c.signum() * shrunk } else { 0.0 };
        }
    }

    /// Samples per window
    #[inline]
    pub fn window_len(&self) -> usize {
        self.window.capacity()
    }

    #[inline]
    pub fn levels(&self) -> u32 {
        self.levels
    }
}

impl StreamFilter for HaarDenoiser {
    fn update(&mut self, value: f64) -> Result<f64, UpdateFault> {
        self.denoise(value)
    }

    #[inline]
    fn is_ready(&self) -> bool {
        self.window.is_ready()
    }

    #[inline]
    fn value(&self) -> f64 {
        self.value
    }
}
