//! Core data structures and primitives
//!
//! Fixed-capacity rolling windows used by every statistic and indicator in the
//! crate. All three variants share the same capacity and readiness contract:
//! `is_ready()` turns true once `capacity` values are held.

mod rolling;
mod sorted;

pub use rolling::{ReverseRollingBuffer, RollingBuffer, RollingBufferIter};
pub use sorted::SortedRollingBuffer;
