use crate::config::KalmanConfig;
use crate::error::{ConfigError, UpdateFault};

use super::StreamFilter;

/// 1-dimensional Kalman filter over a random-walk level
///
/// The first sample seeds the state, every later one runs the usual
/// predict/update pair. Ready once `warmup` samples have been absorbed.
#[repr(align(64))]
#[derive(Debug, Clone, Copy)]
pub struct KalmanEstimator {
    /// State estimate
    x: f64,

    /// Estimate uncertainty (variance)
    p: f64,

    /// Process noise variance
    q: f64,

    /// Measurement noise variance
    r: f64,

    updates: usize,
    warmup: usize,
}

impl KalmanEstimator {
    pub fn new(config: &KalmanConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            x: f64::NAN,
            p: config.initial_uncertainty,
            q: config.process_noise,
            r: config.measurement_noise,
            updates: 0,
            warmup: config.warmup,
        })
    }

    /// Combined predict + update
    ///
    /// Nothing is mutated when the step would leave a non-finite state.
    pub fn filter(&mut self, measurement: f64) -> Result<f64, UpdateFault> {
        if self.updates == 0 {
            if !measurement.is_finite() {
                return Err(UpdateFault::Internal(format!(
                    "kalman: cannot seed state from {measurement}"
                )));
            }
            self.x = measurement;
            self.updates = 1;
            return Ok(self.x);
        }

        // Predict: x_pred = x, p_pred = p + q
        let p_pred = self.p + self.q;

        // Innovation covariance: s = p + r
        let s = p_pred + self.r;
        if !s.is_finite() || s <= 0.0 {
            return Err(UpdateFault::Internal(format!(
                "kalman: degenerate innovation covariance {s}"
            )));
        }

        // Kalman gain: k = p / s
        let k = p_pred / s;
        let x = self.x + k * (measurement - self.x);
        if !x.is_finite() {
            return Err(UpdateFault::Internal(format!(
                "kalman: non-finite estimate from measurement {measurement}"
            )));
        }

        self.x = x;
        self.p = (1.0 - k) * p_pred;
        self.updates += 1;

        Ok(self.x)
    }

    /// Get current state estimate
    #[inline(always)]
    pub fn state(&self) -> f64 {
        self.x
    }

    /// Get current uncertainty
    #[inline(always)]
    pub fn uncertainty(&self) -> f64 {
        self.p
    }

    /// Current Kalman gain a new measurement would receive
    #[inline]
    pub fn gain(&self) -> f64 {
        let p_pred = self.p + self.q;
        p_pred / (p_pred + self.r)
    }

    #[inline(always)]
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl StreamFilter for KalmanEstimator {
    fn update(&mut self, value: f64) -> Result<f64, UpdateFault> {
        self.filter(value)
    }

    #[inline]
    fn is_ready(&self) -> bool {
        self.updates >= self.warmup
    }

    #[inline]
    fn value(&self) -> f64 {
        self.x
    }
}
