//! # streamstats
//!
//! Bounded-memory statistics over unbounded, timestamped scalar streams.
//!
//! ## Design Philosophy
//!
//! - **f64 only**: NaN is the single "undefined" marker
//! - **Bounded memory**: every component owns a fixed-capacity window
//! - **Never panics on data**: bad samples are rejected, reported to a
//!   [`DiagnosticSink`](diagnostics::DiagnosticSink) and skipped
//! - **Monotonic time**: timestamped components refuse samples older than the
//!   last accepted one
//!
//! ## Modules
//!
//! - `core`: FIFO, reverse-indexed and sorted rolling windows
//! - `stats`: rolling mean/standard deviation, consecutive returns
//! - `ta`: adaptive exponential average, Bollinger-style band
//! - `filters`: Kalman estimator, Haar denoiser and their fusion
//! - `config`: serde-deserializable construction parameters
//! - `diagnostics`: fault sinks (`tracing`, in-memory)
//!
//! ## Example
//!
//! ```rust
//! use streamstats::prelude::*;
//!
//! let mut stats = MomentTracker::new(3).unwrap();
//! let mut bands = BandIndicator::new(BandConfig { window: 3, multiplier: 2.0 }).unwrap();
//! let mut fusion = FilterFusion::new(&FusionConfig::default()).unwrap();
//!
//! for (t, price) in [100.0, 101.0, 99.5, 100.5].into_iter().enumerate() {
//!     let t = t as i64;
//!     stats.update(t, price).unwrap();
//!     bands.update(t, price + 0.5, price - 0.5, price).unwrap();
//!     let smooth = fusion.filter(t, price);
//!     assert!(smooth.is_finite());
//! }
//!
//! assert!(stats.is_ready());
//! assert!(bands.is_ready());
//! ```

pub mod config;
pub mod core;
pub mod diagnostics;
pub mod error;
pub mod filters;
pub mod numeric;
pub mod stats;
pub mod ta;

/// Common imports
pub mod prelude {
    pub use crate::config::{
        AverageConfig, BandConfig, FusionConfig, KalmanConfig, ReturnConfig, ReturnMode,
        WaveletConfig,
    };
    pub use crate::core::{ReverseRollingBuffer, RollingBuffer, SortedRollingBuffer};
    pub use crate::diagnostics::{DiagnosticSink, MemorySink, SharedSink, TracingSink};
    pub use crate::error::{ConfigError, UpdateFault};
    pub use crate::filters::{FilterFusion, HaarDenoiser, KalmanEstimator, StreamFilter};
    pub use crate::numeric::Timestamp;
    pub use crate::stats::{MomentTracker, RollingReturn};
    pub use crate::ta::{AdaptiveAverage, BandIndicator, Uema};
}
