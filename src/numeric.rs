//! Shared numeric edge-case policy
//!
//! NaN is the only "undefined" marker used by published values. The helpers
//! here keep the ordering and NaN checks identical across components.

use crate::error::UpdateFault;

/// Observation time, in whatever integer unit the caller uses (typically ms)
pub type Timestamp = i64;

/// Enforces non-decreasing observation times
///
/// `check` never mutates, so a component can validate every input before it
/// touches any state and `advance` only after the update succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeGuard {
    last: Option<Timestamp>,
}

impl TimeGuard {
    #[inline]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Equal timestamps are accepted
    #[inline]
    pub fn check(&self, timestamp: Timestamp) -> Result<(), UpdateFault> {
        match self.last {
            Some(last) if timestamp < last => Err(UpdateFault::OutOfOrder { last, got: timestamp }),
            _ => Ok(()),
        }
    }

    #[inline]
    pub fn advance(&mut self, timestamp: Timestamp) {
        self.last = Some(timestamp);
    }

    /// Last accepted timestamp
    #[inline]
    pub fn last(&self) -> Option<Timestamp> {
        self.last
    }
}

/// Reject NaN on behalf of `component`
#[inline]
pub fn ensure_not_nan(value: f64, component: &'static str) -> Result<(), UpdateFault> {
    if value.is_nan() {
        Err(UpdateFault::NotANumber { component })
    } else {
        Ok(())
    }
}

/// `(current - previous) / previous`, or 0 when `previous` is zero
#[inline]
pub fn relative_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous
    }
}

/// Population mean and variance of a sequence in two passes
///
/// Returns `(NaN, NaN)` for an empty sequence.
#[inline]
pub fn mean_variance(values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let mut n = 0usize;
    let mut sum = 0.0;
    for v in values.clone() {
        sum += v;
        n += 1;
    }
    if n == 0 {
        return (f64::NAN, f64::NAN);
    }
    let mean = sum / n as f64;
    let sum_sq: f64 = values.map(|v| (v - mean) * (v - mean)).sum();
    (mean, sum_sq / n as f64)
}
