use crate::config::AverageConfig;
use crate::error::ConfigError;

/// Exponential average whose span ramps up to `memory` during warm-up
///
/// A plain EWMA with `alpha = 2 / (memory + 1)` leans on its first sample for a
/// long time. Here the `n`-th update uses `alpha = 2 / (1 + min(n, memory))`,
/// so the average behaves like a simple mean of what it has seen until the
/// horizon is reached and like a regular EWMA afterwards.
///
/// NaN handling: a NaN tracked value is replaced by the next input as-is (so a
/// NaN first sample is accepted), a NaN input onto a defined value is ignored.
///
/// # Examples
///
/// ```
/// use streamstats::ta::AdaptiveAverage;
///
/// let mut avg = AdaptiveAverage::new(10).unwrap();
/// assert_eq!(avg.update(100.0), 100.0);
/// // Span 2 on the second update: weight 2/3
/// assert!((avg.update(110.0) - 320.0 / 3.0).abs() < 1e-9);
/// ```
#[repr(align(64))]
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveAverage {
    value: f64,
    updates: usize,
    memory: usize,
}

/// Short name used by indicator code
pub type Uema = AdaptiveAverage;

impl AdaptiveAverage {
    pub fn new(memory: usize) -> Result<Self, ConfigError> {
        Self::from_config(&AverageConfig { memory })
    }

    pub fn from_config(config: &AverageConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            value: f64::NAN,
            updates: 0,
            memory: config.memory,
        })
    }

    #[inline(always)]
    fn weight_for(&self, updates: usize) -> f64 {
        2.0 / (1.0 + updates.min(self.memory) as f64)
    }

    /// Update with new value, returns the tracked value
    #[inline]
    pub fn update(&mut self, value: f64) -> f64 {
        if self.value.is_nan() {
            self.value = value;
            self.updates = self.updates.saturating_add(1);
        } else if !value.is_nan() {
            self.updates = self.updates.saturating_add(1);
            let w = self.weight_for(self.updates);
            self.value = value * w + self.value * (1.0 - w);
        }
        self.value
    }

    /// Weight the next accepted sample will receive
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight_for(self.updates.saturating_add(1))
    }

    /// Get current value without updating; NaN before the first sample
    #[inline(always)]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline(always)]
    pub fn updates(&self) -> usize {
        self.updates
    }

    #[inline(always)]
    pub fn memory(&self) -> usize {
        self.memory
    }

    /// Warm-up ramp complete
    #[inline(always)]
    pub fn is_ready(&self) -> bool {
        self.updates >= self.memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_update_is_exact() {
        let mut avg = AdaptiveAverage::new(20).unwrap();
        assert!(avg.value().is_nan());
        assert_eq!(avg.weight(), 1.0);
        assert_eq!(avg.update(123.456), 123.456);
    }

    #[test]
    fn test_ramp_matches_simple_mean_then_converges() {
        let mut avg = AdaptiveAverage::new(50).unwrap();
        avg.update(100.0);
        let val2 = avg.update(110.0);
        // span 2 -> weight 2/3
        assert!((val2 - (110.0 * 2.0 / 3.0 + 100.0 / 3.0)).abs() < 1e-12);

        let mut previous = avg.weight();
        for i in 0..200 {
            avg.update(100.0 + (i % 7) as f64);
            let w = avg.weight();
            assert!(w <= 1.0);
            assert!(w <= previous);
            previous = w;
        }
        assert!((avg.weight() - 2.0 / 51.0).abs() < 1e-15);
        assert!(avg.is_ready());
    }

    #[test]
    fn test_nan_handling() {
        let mut avg = AdaptiveAverage::new(5).unwrap();

        // NaN is a valid initial value and is replaced by the next input
        assert!(avg.update(f64::NAN).is_nan());
        assert_eq!(avg.updates(), 1);
        assert_eq!(avg.update(4.0), 4.0);

        // NaN after initialization is a no-op
        let updates = avg.updates();
        assert_eq!(avg.update(f64::NAN), 4.0);
        assert_eq!(avg.updates(), updates);
    }

    #[test]
    fn test_memory_one_tracks_input() {
        let mut avg = AdaptiveAverage::new(1).unwrap();
        for v in [3.0, -1.0, 8.0] {
            assert_eq!(avg.update(v), v);
        }
        assert!(avg.is_ready());
    }

    #[test]
    fn test_invalid_memory() {
        assert_eq!(AdaptiveAverage::new(0).unwrap_err(), ConfigError::InvalidMemory(0));
    }

    #[test]
    fn test_ready_holds_through_nan() {
        let mut avg = AdaptiveAverage::new(2).unwrap();
        avg.update(1.0);
        avg.update(2.0);
        assert!(avg.is_ready());
        for _ in 0..3 {
            avg.update(f64::NAN);
            assert!(avg.is_ready());
        }
        assert_eq!(avg.updates(), 2);
    }
}
