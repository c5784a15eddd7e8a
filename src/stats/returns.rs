use crate::config::{ReturnConfig, ReturnMode};
use crate::diagnostics::{default_sink, reject, SharedSink};
use crate::error::UpdateFault;
use crate::numeric::{ensure_not_nan, relative_change, Timestamp, TimeGuard};

/// Return between consecutive samples
///
/// The first sample only primes the tracker. Every later sample yields a return
/// measured against the previous one, in the mode chosen at construction.
///
/// ```
/// use streamstats::config::ReturnMode;
/// use streamstats::stats::RollingReturn;
///
/// let mut ret = RollingReturn::new(ReturnMode::Relative);
/// ret.update(1, 10.0).unwrap();
/// ret.update(2, 11.0).unwrap();
/// assert!((ret.value() - 0.1).abs() < 1e-12);
/// ```
#[derive(Clone)]
pub struct RollingReturn {
    mode: ReturnMode,
    guard: TimeGuard,
    last_value: Option<f64>,
    value: f64,
    computed: bool,
    sink: SharedSink,
}

impl RollingReturn {
    pub fn new(mode: ReturnMode) -> Self {
        Self::with_sink(mode, default_sink())
    }

    pub fn from_config(config: &ReturnConfig) -> Self {
        Self::new(config.mode)
    }

    pub fn with_sink(mode: ReturnMode, sink: SharedSink) -> Self {
        Self {
            mode,
            guard: TimeGuard::new(),
            last_value: None,
            value: f64::NAN,
            computed: false,
            sink,
        }
    }

    /// Feed a sample; returns the new return, or `None` for the priming sample
    pub fn update(&mut self, timestamp: Timestamp, value: f64) -> Result<Option<f64>, UpdateFault> {
        if let Err(fault) = self
            .guard
            .check(timestamp)
            .and_then(|_| ensure_not_nan(value, "rolling return"))
        {
            return reject(&self.sink, fault, "RollingReturn::update");
        }

        self.guard.advance(timestamp);
        let previous = self.last_value.replace(value);

        Ok(previous.map(|last| {
            self.value = match self.mode {
                ReturnMode::Relative => relative_change(last, value),
                ReturnMode::Absolute => value - last,
            };
            self.computed = true;
            self.value
        }))
    }

    /// At least one return computed and the latest one is finite
    ///
    /// An infinite sample (accepted, since only NaN is rejected) can make the
    /// latest return non-finite; readiness then waits for the next finite one.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.computed && self.value.is_finite()
    }

    /// Latest return, NaN before the second sample
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn mode(&self) -> ReturnMode {
        self.mode
    }

    #[inline]
    pub fn last_value(&self) -> Option<f64> {
        self.last_value
    }

    #[inline]
    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.guard.last()
    }
}

impl std::fmt::Debug for RollingReturn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollingReturn")
            .field("mode", &self.mode)
            .field("last_timestamp", &self.guard.last())
            .field("last_value", &self.last_value)
            .field("value", &self.value)
            .finish()
    }
}
