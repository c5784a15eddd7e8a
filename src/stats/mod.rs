//! Incremental statistics over timestamped samples
//!
//! # Examples
//!
//! ```
//! use streamstats::stats::{MomentTracker, RollingReturn};
//! use streamstats::config::ReturnMode;
//!
//! let mut stats = MomentTracker::new(100).unwrap();
//! let (mean, std) = stats.update(1, 42.0).unwrap();
//!
//! let mut ret = RollingReturn::new(ReturnMode::Absolute);
//! ret.update(1, 42.0).unwrap();
//! ```

mod moments;
mod returns;

pub use moments::MomentTracker;
pub use returns::RollingReturn;
