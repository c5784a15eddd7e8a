use crate::core::RollingBuffer;
use crate::diagnostics::{default_sink, reject, SharedSink};
use crate::error::{ConfigError, UpdateFault};
use crate::numeric::{ensure_not_nan, mean_variance, Timestamp, TimeGuard};

/// Rolling mean and standard deviation over the last `window` samples
///
/// Statistics are recomputed from the whole window on every update, which is
/// O(window). The window is a small caller-chosen constant, so this keeps the
/// values free of the drift a running sum accumulates.
///
/// Timestamps must be non-decreasing; an earlier timestamp or a NaN value is
/// rejected, reported and leaves every statistic untouched.
///
/// # Examples
///
/// ```
/// use streamstats::stats::MomentTracker;
///
/// let mut stats = MomentTracker::new(3).unwrap();
/// stats.update(1, 1.0).unwrap();
/// stats.update(2, 2.0).unwrap();
/// let (mean, _std) = stats.update(3, 3.0).unwrap();
///
/// assert!(stats.is_ready());
/// assert_eq!(mean, 2.0);
/// ```
#[derive(Clone)]
pub struct MomentTracker {
    buffer: RollingBuffer<f64>,
    guard: TimeGuard,
    mean: f64,
    variance: f64,
    sink: SharedSink,
}

impl MomentTracker {
    /// Create new tracker reporting faults through `tracing`
    pub fn new(window: usize) -> Result<Self, ConfigError> {
        Self::with_sink(window, default_sink())
    }

    pub fn with_sink(window: usize, sink: SharedSink) -> Result<Self, ConfigError> {
        Ok(Self {
            buffer: RollingBuffer::new(window)?,
            guard: TimeGuard::new(),
            mean: f64::NAN,
            variance: f64::NAN,
            sink,
        })
    }

    /// Update with new sample, returns (mean, std_dev)
    pub fn update(&mut self, timestamp: Timestamp, value: f64) -> Result<(f64, f64), UpdateFault> {
        if let Err(fault) = self
            .guard
            .check(timestamp)
            .and_then(|_| ensure_not_nan(value, "moment tracker"))
        {
            return reject(&self.sink, fault, "MomentTracker::update");
        }

        let was_ready = self.buffer.is_ready();
        self.buffer.push(value);
        self.guard.advance(timestamp);

        let (mean, variance) = mean_variance(self.buffer.iter());
        self.mean = mean;
        self.variance = variance;

        if !was_ready && self.buffer.is_ready() {
            tracing::debug!(target: "streamstats", window = self.buffer.capacity(), timestamp, "moment tracker ready");
        }

        Ok((self.mean, self.std_dev()))
    }

    /// Window full; never reverts once true
    #[inline(always)]
    pub fn is_ready(&self) -> bool {
        self.buffer.is_ready()
    }

    /// Mean of the current window, NaN before the first sample
    #[inline(always)]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance of the current window
    #[inline(always)]
    pub fn variance(&self) -> f64 {
        self.variance
    }

    #[inline(always)]
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Number of values currently stored
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline(always)]
    pub fn window(&self) -> usize {
        self.buffer.capacity()
    }

    #[inline]
    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.guard.last()
    }

    /// Most recent accepted sample
    #[inline]
    pub fn last(&self) -> Option<f64> {
        self.buffer.newest()
    }
}

impl std::fmt::Debug for MomentTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MomentTracker")
            .field("buffer", &self.buffer)
            .field("last_timestamp", &self.guard.last())
            .field("mean", &self.mean)
            .field("variance", &self.variance)
            .finish()
    }
}
