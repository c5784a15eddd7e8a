//! Denoising filters and their fusion
//!
//! [`KalmanEstimator`] and [`HaarDenoiser`] are independent; [`FilterFusion`]
//! drives both and blends their outputs according to readiness.

mod fusion;
mod kalman;
mod wavelet;

pub use fusion::FilterFusion;
pub use kalman::KalmanEstimator;
pub use wavelet::HaarDenoiser;

use crate::error::UpdateFault;

/// Narrow contract a sub-filter exposes to [`FilterFusion`]
pub trait StreamFilter {
    /// Absorb one sample and return the filtered value
    fn update(&mut self, value: f64) -> Result<f64, UpdateFault>;

    /// Enough samples seen for the output to be trusted
    fn is_ready(&self) -> bool;

    /// Latest filtered value
    fn value(&self) -> f64;
}
