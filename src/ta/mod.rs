//! Technical indicators built on the rolling statistics
//!
//! # Examples
//!
//! ```
//! use streamstats::config::BandConfig;
//! use streamstats::ta::{AdaptiveAverage, BandIndicator};
//!
//! let mut avg = AdaptiveAverage::new(20).unwrap();
//! let value = avg.update(100.0);
//!
//! let mut bands = BandIndicator::new(BandConfig::default()).unwrap();
//! let band = bands.update(1, 101.0, 99.0, 100.0).unwrap();
//! assert!(band.is_nan()); // not ready after one bar
//! ```

mod bands;
mod uema;

pub use bands::BandIndicator;
pub use uema::{AdaptiveAverage, Uema};
