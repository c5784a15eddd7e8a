use crate::error::ConfigError;

/// Core rolling window buffer with fixed capacity
///
/// This is the foundational building block for all rolling statistics and indicators.
/// It provides O(1) insertions with automatic eviction of the oldest value using a
/// circular buffer. Capacity is chosen at construction and never changes.
///
/// NaN is stored like any other value.
///
/// # Examples
///
/// ```
/// use streamstats::core::RollingBuffer;
///
/// let mut buffer = RollingBuffer::<f64>::new(3).unwrap();
///
/// assert_eq!(buffer.push(1.0), None);      // No eviction
/// assert_eq!(buffer.push(2.0), None);      // No eviction
/// assert_eq!(buffer.push(3.0), None);      // No eviction
/// assert_eq!(buffer.push(4.0), Some(1.0)); // Evicts oldest (1.0)
/// assert_eq!(buffer.len(), 3);
/// assert!(buffer.is_ready());
/// ```
#[derive(Debug, Clone)]
pub struct RollingBuffer<T: Copy + Default = f64> {
    values: Box<[T]>,
    head: usize,
    count: usize,
}

impl<T: Copy + Default> RollingBuffer<T> {
    /// Create a new empty rolling buffer
    ///
    /// Fails when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidCapacity { capacity, min: 1 });
        }
        Ok(Self {
            values: vec![T::default(); capacity].into_boxed_slice(),
            head: 0,
            count: 0,
        })
    }

    /// Add a new value to the buffer
    ///
    /// Returns the evicted value if the buffer was full, otherwise `None`.
    ///
    /// # Complexity
    ///
    /// O(1) - Constant time regardless of window size
    #[inline(always)]
    pub fn push(&mut self, value: T) -> Option<T> {
        let cap = self.values.len();
        let evicted = if self.count >= cap {
            Some(self.values[self.head])
        } else {
            self.count += 1;
            None
        };

        self.values[self.head] = value;
        self.head = (self.head + 1) % cap;

        evicted
    }

    /// Get the number of values currently in the buffer
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True once the buffer holds `capacity` elements; never reverts
    #[inline(always)]
    pub fn is_ready(&self) -> bool {
        self.count >= self.values.len()
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Iterate over all active values in insertion order (oldest first)
    ///
    /// ```
    /// use streamstats::core::RollingBuffer;
    ///
    /// let mut buffer = RollingBuffer::new(5).unwrap();
    /// buffer.push(1.0);
    /// buffer.push(2.0);
    /// buffer.push(3.0);
    ///
    /// let values: Vec<f64> = buffer.iter().collect();
    /// assert_eq!(values, vec![1.0, 2.0, 3.0]);
    /// ```
    pub fn iter(&self) -> RollingBufferIter<'_, T> {
        RollingBufferIter {
            buffer: self,
            front: 0,
            back: self.count,
        }
    }

    /// Get a value by index (0 = oldest, len-1 = newest)
    ///
    /// Returns `None` if index is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<T> {
        if index >= self.count {
            return None;
        }

        let cap = self.values.len();
        let start = if self.count < cap { 0 } else { self.head };

        Some(self.values[(start + index) % cap])
    }

    /// Get the value appended `ago` updates before the newest (0 = newest)
    #[inline]
    pub fn ago(&self, ago: usize) -> Option<T> {
        if ago >= self.count {
            return None;
        }
        self.get(self.count - 1 - ago)
    }

    /// Get the most recent (newest) value
    #[inline]
    pub fn newest(&self) -> Option<T> {
        if self.count == 0 {
            return None;
        }

        let cap = self.values.len();
        let index = if self.head == 0 { cap - 1 } else { self.head - 1 };
        Some(self.values[index])
    }

    /// Most recent value, or `T::default()` while empty
    #[inline]
    pub fn last(&self) -> T {
        self.newest().unwrap_or_default()
    }

    /// Get the oldest value
    #[inline]
    pub fn oldest(&self) -> Option<T> {
        self.get(0)
    }
}

/// Iterator over rolling buffer values in insertion order (oldest to newest)
pub struct RollingBufferIter<'a, T: Copy + Default> {
    buffer: &'a RollingBuffer<T>,
    front: usize,
    back: usize,
}

impl<'a, T: Copy + Default> Iterator for RollingBufferIter<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }

        let value = self.buffer.get(self.front);
        self.front += 1;
        value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<'a, T: Copy + Default> DoubleEndedIterator for RollingBufferIter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }

        self.back -= 1;
        self.buffer.get(self.back)
    }
}

impl<'a, T: Copy + Default> ExactSizeIterator for RollingBufferIter<'a, T> {}

impl<'a, T: Copy + Default> Clone for RollingBufferIter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer,
            front: self.front,
            back: self.back,
        }
    }
}

/// Rolling buffer indexed from the newest element
///
/// Same storage and eviction as [`RollingBuffer`]; only the index direction
/// differs: `get(0)` is always the most recent value.
///
/// ```
/// use streamstats::core::ReverseRollingBuffer;
///
/// let mut buffer = ReverseRollingBuffer::new(3).unwrap();
/// for v in [1.0, 2.0, 3.0, 4.0] {
///     buffer.push(v);
/// }
/// assert_eq!(buffer.get(0), Some(4.0));
/// assert_eq!(buffer.get(2), Some(2.0));
/// ```
#[derive(Debug, Clone)]
pub struct ReverseRollingBuffer<T: Copy + Default = f64> {
    inner: RollingBuffer<T>,
}

impl<T: Copy + Default> ReverseRollingBuffer<T> {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: RollingBuffer::new(capacity)?,
        })
    }

    #[inline(always)]
    pub fn push(&mut self, value: T) -> Option<T> {
        self.inner.push(value)
    }

    /// Get a value by index (0 = newest, len-1 = oldest)
    #[inline]
    pub fn get(&self, index: usize) -> Option<T> {
        self.inner.ago(index)
    }

    /// Values newest first
    pub fn iter(&self) -> std::iter::Rev<RollingBufferIter<'_, T>> {
        self.inner.iter().rev()
    }

    #[inline]
    pub fn last(&self) -> T {
        self.inner.last()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[inline(always)]
    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// View in oldest-first order
    #[inline]
    pub fn as_forward(&self) -> &RollingBuffer<T> {
        &self.inner
    }
}

impl<T: Copy + Default> From<RollingBuffer<T>> for ReverseRollingBuffer<T> {
    fn from(inner: RollingBuffer<T>) -> Self {
        Self { inner }
    }
}
