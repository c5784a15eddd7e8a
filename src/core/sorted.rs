use std::collections::BTreeSet;

use ordered_float::NotNan;

use crate::diagnostics::{default_sink, reject, SharedSink};
use crate::error::{ConfigError, UpdateFault};

/// Bounded set of the smallest values seen, kept in ascending order
///
/// Unlike [`RollingBuffer`](super::RollingBuffer) this variant does not track
/// recency: once over capacity it evicts the current **maximum**, so it retains
/// the `capacity` smallest values pushed over its lifetime. Equal values keep
/// their insertion order.
///
/// NaN has no place in a total order and is rejected before insertion.
///
/// # Examples
///
/// ```
/// use streamstats::core::SortedRollingBuffer;
///
/// let mut lows = SortedRollingBuffer::new(3).unwrap();
/// for v in [5.0, 1.0, 4.0, 2.0] {
///     lows.push(v).unwrap();
/// }
/// // 5.0 was the maximum when the fourth value arrived
/// assert_eq!(lows.iter().collect::<Vec<_>>(), vec![1.0, 2.0, 4.0]);
/// assert_eq!(lows.max(), Some(4.0));
/// ```
#[derive(Clone)]
pub struct SortedRollingBuffer {
    /// Ordered multiset: the sequence number breaks ties by arrival
    values: BTreeSet<(NotNan<f64>, u64)>,
    capacity: usize,
    seq: u64,
    sink: SharedSink,
}

impl SortedRollingBuffer {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        Self::with_sink(capacity, default_sink())
    }

    pub fn with_sink(capacity: usize, sink: SharedSink) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidCapacity { capacity, min: 1 });
        }
        Ok(Self {
            values: BTreeSet::new(),
            capacity,
            seq: 0,
            sink,
        })
    }

    /// Insert `value`, evicting the current maximum when over capacity
    ///
    /// Returns the evicted value, which may be `value` itself when it is larger
    /// than everything already held by a full buffer.
    ///
    /// # Complexity
    ///
    /// O(log n) for both the insertion and the eviction
    pub fn push(&mut self, value: f64) -> Result<Option<f64>, UpdateFault> {
        let value = match NotNan::new(value) {
            Ok(v) => v,
            Err(_) => {
                return reject(
                    &self.sink,
                    UpdateFault::NotANumber { component: "sorted buffer" },
                    "SortedRollingBuffer::push",
                )
            }
        };

        // After every existing equal element
        self.values.insert((value, self.seq));
        self.seq = self.seq.wrapping_add(1);

        if self.values.len() > self.capacity {
            Ok(self.values.pop_last().map(|(v, _)| v.into_inner()))
        } else {
            Ok(None)
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline(always)]
    pub fn is_ready(&self) -> bool {
        self.values.len() >= self.capacity
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Largest held value, or 0.0 while empty
    ///
    /// Recency is not tracked, so the top of the order stands in for "last".
    #[inline]
    pub fn last(&self) -> f64 {
        self.max().unwrap_or_default()
    }

    #[inline]
    pub fn min(&self) -> Option<f64> {
        self.values.first().map(|(v, _)| v.into_inner())
    }

    #[inline]
    pub fn max(&self) -> Option<f64> {
        self.values.last().map(|(v, _)| v.into_inner())
    }

    /// The `rank`-th smallest held value (0 = minimum)
    pub fn nth_smallest(&self, rank: usize) -> Option<f64> {
        self.iter().nth(rank)
    }

    pub fn contains(&self, value: f64) -> bool {
        match NotNan::new(value) {
            Ok(v) => self.values.range((v, 0)..=(v, u64::MAX)).next().is_some(),
            Err(_) => false,
        }
    }

    /// Median of the held values, `None` while empty
    pub fn median(&self) -> Option<f64> {
        self.percentile(0.5)
    }

    /// Percentile with linear interpolation between ranks, `p` in `[0, 1]`
    pub fn percentile(&self, p: f64) -> Option<f64> {
        if self.values.is_empty() || !(0.0..=1.0).contains(&p) {
            return None;
        }
        let idx = p * (self.values.len() - 1) as f64;
        let lo = idx.floor() as usize;
        let hi = idx.ceil() as usize;

        let mut ranked = self.iter().skip(lo);
        let a = ranked.next()?;
        if lo == hi {
            return Some(a);
        }
        let b = ranked.next()?;
        let w = idx - lo as f64;
        Some(a * (1.0 - w) + b * w)
    }

    /// Ascending iteration
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = f64> + ExactSizeIterator + '_ {
        self.values.iter().map(|(v, _)| v.into_inner())
    }
}

impl std::fmt::Debug for SortedRollingBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortedRollingBuffer")
            .field("values", &self.iter().collect::<Vec<_>>())
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use std::sync::Arc;

    #[test]
    fn test_keeps_ascending_order() {
        let mut buffer = SortedRollingBuffer::new(5).unwrap();
        for v in [3.0, -1.0, 7.0, 3.0, 0.5, 2.0, 9.0, -4.0] {
            buffer.push(v).unwrap();
            let held: Vec<f64> = buffer.iter().collect();
            assert!(held.windows(2).all(|w| w[0] <= w[1]));
            assert!(buffer.len() <= 5);
        }
        assert_eq!(buffer.iter().collect::<Vec<_>>(), vec![-4.0, -1.0, 0.5, 2.0, 3.0]);
    }

    #[test]
    fn test_evicts_maximum_not_oldest() {
        let mut buffer = SortedRollingBuffer::new(3).unwrap();
        assert_eq!(buffer.push(1.0).unwrap(), None);
        assert_eq!(buffer.push(10.0).unwrap(), None);
        assert_eq!(buffer.push(5.0).unwrap(), None);
        assert!(buffer.is_ready());

        // Oldest is 1.0 but the maximum goes
        assert_eq!(buffer.push(2.0).unwrap(), Some(10.0));
        assert!(buffer.contains(1.0));
        assert!(!buffer.contains(10.0));

        // A new maximum is evicted straight away
        assert_eq!(buffer.push(100.0).unwrap(), Some(100.0));
        assert_eq!(buffer.iter().collect::<Vec<_>>(), vec![1.0, 2.0, 5.0]);
    }

    #[test]
    fn test_duplicates_allowed() {
        let mut buffer = SortedRollingBuffer::new(4).unwrap();
        for v in [2.0, 2.0, 1.0, 2.0] {
            buffer.push(v).unwrap();
        }
        assert_eq!(buffer.iter().collect::<Vec<_>>(), vec![1.0, 2.0, 2.0, 2.0]);
        assert_eq!(buffer.push(2.0).unwrap(), Some(2.0));
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn test_nan_rejected_and_reported() {
        let sink = Arc::new(MemorySink::new());
        let mut buffer = SortedRollingBuffer::with_sink(3, sink.clone()).unwrap();
        buffer.push(1.0).unwrap();

        let err = buffer.push(f64::NAN).unwrap_err();
        assert_eq!(err, UpdateFault::NotANumber { component: "sorted buffer" });
        assert_eq!(buffer.len(), 1);
        assert_eq!(sink.len(), 1);
        assert!(!buffer.contains(f64::NAN));
    }

    #[test]
    fn test_order_statistics() {
        let mut buffer = SortedRollingBuffer::new(10).unwrap();
        assert_eq!(buffer.median(), None);
        assert_eq!(buffer.last(), 0.0);

        for v in [4.0, 1.0, 3.0, 2.0] {
            buffer.push(v).unwrap();
        }
        assert_eq!(buffer.min(), Some(1.0));
        assert_eq!(buffer.max(), Some(4.0));
        assert_eq!(buffer.nth_smallest(1), Some(2.0));
        assert_eq!(buffer.median(), Some(2.5));
        assert_eq!(buffer.percentile(0.0), Some(1.0));
        assert_eq!(buffer.percentile(1.0), Some(4.0));
        assert_eq!(buffer.percentile(1.5), None);
    }

    #[test]
    fn test_large_window_front_inserts() {
        // Every push lands below the current minimum of a full buffer
        let capacity = 50_000;
        let mut buffer = SortedRollingBuffer::new(capacity).unwrap();
        for i in 0..capacity {
            buffer.push(i as f64).unwrap();
        }
        for i in 1..=capacity {
            let evicted = buffer.push(-(i as f64)).unwrap();
            assert_eq!(evicted, Some((capacity - i) as f64));
        }
        assert_eq!(buffer.len(), capacity);
        assert_eq!(buffer.min(), Some(-(capacity as f64)));
        assert_eq!(buffer.max(), Some(-1.0));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(SortedRollingBuffer::new(0).is_err());
    }
}
