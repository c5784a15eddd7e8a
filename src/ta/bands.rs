use crate::config::BandConfig;
use crate::diagnostics::{default_sink, reject, SharedSink};
use crate::error::{ConfigError, UpdateFault};
use crate::numeric::{ensure_not_nan, Timestamp, TimeGuard};
use crate::stats::MomentTracker;

/// Bollinger-style band distance
///
/// Publishes `close - (mean + k * std_dev)` of the last `window` closes: how far
/// the latest close sits above (positive) or below the upper band.
///
/// Readiness follows the private [`MomentTracker`] and never reverts. A
/// degenerate window can still publish NaN while ready; readiness only means
/// enough data has been seen. There is no way back to the empty state;
/// dropping the indicator releases its window.
///
/// # Examples
///
/// ```
/// use streamstats::config::BandConfig;
/// use streamstats::ta::BandIndicator;
///
/// let mut bands = BandIndicator::new(BandConfig { window: 3, multiplier: 2.0 }).unwrap();
/// for (t, close) in [100.0, 101.0, 102.0].into_iter().enumerate() {
///     bands.update(t as i64, close + 1.0, close - 1.0, close).unwrap();
/// }
/// assert!(bands.is_ready());
/// assert!(bands.value() < 0.0); // close below the upper band
/// ```
#[derive(Clone)]
pub struct BandIndicator {
    stats: MomentTracker,
    guard: TimeGuard,
    multiplier: f64,
    band: f64,
    last_close: f64,
    sink: SharedSink,
}

impl BandIndicator {
    pub fn new(config: BandConfig) -> Result<Self, ConfigError> {
        Self::with_sink(config, default_sink())
    }

    pub fn with_sink(config: BandConfig, sink: SharedSink) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            stats: MomentTracker::with_sink(config.window, sink.clone())?,
            guard: TimeGuard::new(),
            multiplier: config.multiplier,
            band: f64::NAN,
            last_close: f64::NAN,
            sink,
        })
    }

    /// Update with a bar, returns the band value (NaN until ready)
    pub fn update(
        &mut self,
        timestamp: Timestamp,
        high: f64,
        low: f64,
        close: f64,
    ) -> Result<f64, UpdateFault> {
        let checked = self.guard.check(timestamp).and_then(|_| {
            ensure_not_nan(high, "band indicator")?;
            ensure_not_nan(low, "band indicator")?;
            ensure_not_nan(close, "band indicator")
        });
        if let Err(fault) = checked {
            return reject(&self.sink, fault, "BandIndicator::update");
        }

        self.stats.update(timestamp, close)?;
        self.guard.advance(timestamp);
        self.last_close = close;

        self.band = if self.stats.is_ready() {
            close - self.upper()
        } else {
            f64::NAN
        };
        Ok(self.band)
    }

    /// Window full; never reverts
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.stats.is_ready()
    }

    /// Latest band value
    #[inline]
    pub fn value(&self) -> f64 {
        self.band
    }

    /// Moving average of closes, NaN until ready
    #[inline]
    pub fn middle(&self) -> f64 {
        if self.is_ready() {
            self.stats.mean()
        } else {
            f64::NAN
        }
    }

    #[inline]
    pub fn upper(&self) -> f64 {
        self.middle() + self.multiplier * self.stats.std_dev()
    }

    #[inline]
    pub fn lower(&self) -> f64 {
        self.middle() - self.multiplier * self.stats.std_dev()
    }

    /// %b = (close - lower) / (upper - lower), NaN for a zero-width band
    pub fn percent_b(&self) -> f64 {
        let width = self.upper() - self.lower();
        if width > 0.0 {
            (self.last_close - self.lower()) / width
        } else {
            f64::NAN
        }
    }

    #[inline]
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    #[inline]
    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.guard.last()
    }

    /// Snapshot of the underlying moments
    #[inline]
    pub fn moments(&self) -> &MomentTracker {
        &self.stats
    }
}

impl std::fmt::Debug for BandIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BandIndicator")
            .field("stats", &self.stats)
            .field("multiplier", &self.multiplier)
            .field("band", &self.band)
            .finish()
    }
}
