use crate::config::FusionConfig;
use crate::diagnostics::{default_sink, SharedSink};
use crate::error::ConfigError;
use crate::numeric::{Timestamp, TimeGuard};

use super::{HaarDenoiser, KalmanEstimator, StreamFilter};

/// Readiness-gated blend of a recursive estimator and a wavelet denoiser
///
/// Both sub-filters see every accepted sample. The published value falls back
/// in three tiers:
///
/// | recursive | wavelet | output |
/// |-----------|---------|--------|
/// | not ready | not ready | raw input |
/// | ready | not ready | recursive output |
/// | not ready | ready | wavelet output |
/// | ready | ready | mean of both, raw input if that is NaN |
///
/// A fault in either sub-filter is reported and the raw input is returned for
/// that sample; whatever the other sub-filter absorbed is kept.
///
/// # Examples
///
/// ```
/// use streamstats::config::FusionConfig;
/// use streamstats::filters::FilterFusion;
///
/// let mut fusion = FilterFusion::new(&FusionConfig::default()).unwrap();
/// // Nothing is ready yet: the raw sample comes back
/// assert_eq!(fusion.filter(1, 100.0), 100.0);
/// // NaN passes straight through
/// assert!(fusion.filter(2, f64::NAN).is_nan());
/// ```
pub struct FilterFusion<R = KalmanEstimator, W = HaarDenoiser> {
    recursive: R,
    wavelet: W,
    guard: TimeGuard,
    sink: SharedSink,
}

impl FilterFusion {
    pub fn new(config: &FusionConfig) -> Result<Self, ConfigError> {
        Self::with_sink(config, default_sink())
    }

    pub fn with_sink(config: &FusionConfig, sink: SharedSink) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(
            KalmanEstimator::new(&config.kalman)?,
            HaarDenoiser::new(&config.wavelet)?,
            sink,
        ))
    }
}

impl<R: StreamFilter, W: StreamFilter> FilterFusion<R, W> {
    /// Fuse caller-supplied sub-filters
    pub fn from_parts(recursive: R, wavelet: W, sink: SharedSink) -> Self {
        Self {
            recursive,
            wavelet,
            guard: TimeGuard::new(),
            sink,
        }
    }

    /// Filter one sample, returns the fused estimate
    ///
    /// NaN input is returned unchanged without touching any state. An earlier
    /// timestamp than the last accepted one is reported and also returned raw.
    pub fn filter(&mut self, timestamp: Timestamp, value: f64) -> f64 {
        if value.is_nan() {
            return value;
        }
        if let Err(fault) = self.guard.check(timestamp) {
            self.sink.report(&fault, "FilterFusion::filter");
            return value;
        }
        self.guard.advance(timestamp);

        let recursive = self.recursive.update(value);
        let wavelet = self.wavelet.update(value);

        let (recursive, wavelet) = match (recursive, wavelet) {
            (Ok(r), Ok(w)) => (r, w),
            (r, w) => {
                if let Err(fault) = r {
                    self.sink.report(&fault, "FilterFusion::filter (recursive estimator)");
                }
                if let Err(fault) = w {
                    self.sink.report(&fault, "FilterFusion::filter (wavelet denoiser)");
                }
                return value;
            }
        };

        match (self.recursive.is_ready(), self.wavelet.is_ready()) {
            (false, false) => value,
            (true, false) => recursive,
            (false, true) => wavelet,
            (true, true) => {
                let mean = (recursive + wavelet) / 2.0;
                if mean.is_nan() {
                    value
                } else {
                    mean
                }
            }
        }
    }

    /// At least one sub-filter ready, i.e. the output is no longer the raw input
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.recursive.is_ready() || self.wavelet.is_ready()
    }

    /// Both sub-filters ready
    #[inline]
    pub fn is_fully_ready(&self) -> bool {
        self.recursive.is_ready() && self.wavelet.is_ready()
    }

    #[inline]
    pub fn recursive(&self) -> &R {
        &self.recursive
    }

    #[inline]
    pub fn wavelet(&self) -> &W {
        &self.wavelet
    }

    #[inline]
    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.guard.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KalmanConfig, WaveletConfig};
    use crate::diagnostics::MemorySink;
    use crate::error::UpdateFault;
    use std::sync::Arc;

    /// Adds a fixed offset; ready after `ready_after` updates, fails on chosen calls
    struct Scripted {
        offset: f64,
        ready_after: usize,
        fail_on: Option<usize>,
        updates: usize,
        value: f64,
    }

    impl Scripted {
        fn new(offset: f64, ready_after: usize) -> Self {
            Self { offset, ready_after, fail_on: None, updates: 0, value: f64::NAN }
        }
    }

    impl StreamFilter for Scripted {
        fn update(&mut self, value: f64) -> Result<f64, UpdateFault> {
            self.updates += 1;
            if self.fail_on == Some(self.updates) {
                return Err(UpdateFault::Internal("scripted".into()));
            }
            self.value = value + self.offset;
            Ok(self.value)
        }

        fn is_ready(&self) -> bool {
            self.updates >= self.ready_after
        }

        fn value(&self) -> f64 {
            self.value
        }
    }

    fn fusion(r: Scripted, w: Scripted) -> (FilterFusion<Scripted, Scripted>, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (FilterFusion::from_parts(r, w, sink.clone()), sink)
    }

    #[test]
    fn test_readiness_ladder() {
        let (mut f, _) = fusion(Scripted::new(1.0, 2), Scripted::new(-4.0, 4));

        // Neither ready
        assert_eq!(f.filter(0, 10.0), 10.0);
        assert!(!f.is_ready());
        // Recursive only
        assert_eq!(f.filter(1, 10.0), 11.0);
        assert_eq!(f.filter(2, 10.0), 11.0);
        assert!(f.is_ready() && !f.is_fully_ready());
        // Both: mean of 11 and 6
        assert_eq!(f.filter(3, 10.0), 8.5);
        assert!(f.is_fully_ready());
    }

    #[test]
    fn test_wavelet_only_ready() {
        let (mut f, _) = fusion(Scripted::new(1.0, 5), Scripted::new(-4.0, 1));
        assert_eq!(f.filter(0, 10.0), 6.0);
    }

    #[test]
    fn test_nan_mean_falls_back_to_raw() {
        let (mut f, _) = fusion(
            Scripted::new(f64::INFINITY, 1),
            Scripted::new(f64::NEG_INFINITY, 1),
        );
        assert_eq!(f.filter(0, 3.0), 3.0);
    }

    #[test]
    fn test_nan_input_passthrough() {
        let (mut f, _) = fusion(Scripted::new(1.0, 1), Scripted::new(1.0, 1));
        assert!(f.filter(0, f64::NAN).is_nan());
        assert_eq!(f.recursive().updates, 0);
        assert_eq!(f.wavelet().updates, 0);
        assert_eq!(f.last_timestamp(), None);
    }

    #[test]
    fn test_sub_filter_fault_returns_raw_and_keeps_progress() {
        let mut wavelet = Scripted::new(2.0, 1);
        wavelet.fail_on = Some(2);
        let (mut f, sink) = fusion(Scripted::new(1.0, 1), wavelet);

        assert_eq!(f.filter(0, 5.0), 6.5);
        assert_eq!(f.filter(1, 5.0), 5.0);
        assert_eq!(sink.len(), 1);
        assert!(sink.records()[0].context.contains("wavelet"));
        // Recursive estimator kept its update
        assert_eq!(f.recursive().updates, 2);
        assert_eq!(f.filter(2, 5.0), 6.5);
    }

    #[test]
    fn test_recursive_fault_keeps_wavelet_progress() {
        let mut recursive = Scripted::new(1.0, 1);
        recursive.fail_on = Some(2);
        let (mut f, sink) = fusion(recursive, Scripted::new(2.0, 1));

        assert_eq!(f.filter(0, 5.0), 6.5);
        assert_eq!(f.filter(1, 5.0), 5.0);
        assert_eq!(sink.len(), 1);
        assert!(sink.records()[0].context.contains("recursive"));
        // Wavelet denoiser was still updated on the failing call
        assert_eq!(f.wavelet().updates, 2);
        assert_eq!(f.wavelet().value, 7.0);
        assert_eq!(f.filter(2, 5.0), 6.5);
    }

    #[test]
    fn test_out_of_order_returns_raw_untouched() {
        let (mut f, sink) = fusion(Scripted::new(1.0, 1), Scripted::new(1.0, 1));
        f.filter(5, 1.0);
        assert_eq!(f.filter(3, 2.0), 2.0);
        assert_eq!(f.recursive().updates, 1);
        assert_eq!(
            sink.records()[0].fault,
            UpdateFault::OutOfOrder { last: 5, got: 3 }
        );
    }

    #[test]
    fn test_builtin_filters() {
        let config = FusionConfig {
            kalman: KalmanConfig { warmup: 3, ..Default::default() },
            wavelet: WaveletConfig { levels: 2 },
        };
        let mut f = FilterFusion::new(&config).unwrap();
        for t in 0..2 {
            assert_eq!(f.filter(t, 50.0 + t as f64), 50.0 + t as f64);
        }
        for t in 2..40 {
            let out = f.filter(t, 50.0);
            assert!((out - 50.0).abs() < 1.0);
        }
        assert!(f.is_fully_ready());

        // Late sample is refused and readiness holds
        assert_eq!(f.filter(0, 7.0), 7.0);
        assert!(f.is_fully_ready());
        assert_eq!(f.last_timestamp(), Some(39));
    }

    #[test]
    fn test_invalid_config() {
        let config = FusionConfig {
            wavelet: WaveletConfig { levels: 0 },
            ..Default::default()
        };
        assert!(FilterFusion::new(&config).is_err());
    }
}
