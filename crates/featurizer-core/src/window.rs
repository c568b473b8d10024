//! Circular buffer and wrap-aware iterator for rolling-window featurizers.
//!
//! [`CircularBuffer`] stores at most `capacity` values in a preallocated
//! vector and overwrites the oldest value once full. Windows over the buffer
//! are handed out as `[begin, end)` pairs of [`CircularIterator`], which wrap
//! around the end of the backing vector and know how many steps they may take
//! before reaching their end state.
//!
//! Iterators borrow the buffer, so a window can never outlive the buffer or
//! observe a `push` or `clear` made after it was created.

use core::iter::FusedIterator;

use crate::error::{FeaturizerError, Result};

/// Forward iterator over a circular backing store.
///
/// Incrementing past the last slot of the store wraps back to slot 0. Since
/// the data has no natural end, every iterator carries a budget of
/// increments; once that budget is spent the iterator is "at end".
///
/// Two iterators compare equal when both are at end, or when neither is at
/// end and both point at the same slot of the same store. The first rule lets
/// a `begin` built from one offset terminate against an `end` built from
/// another.
///
/// Dereferencing ([`get`](Self::get)) or advancing an iterator that is
/// already at end is a contract violation. It is caught by debug assertions
/// and is not reported as a recoverable error.
///
/// # Example
///
/// ```rust
/// use featurizer_core::CircularIterator;
///
/// let data = [1, 2, 3, 4];
/// // Start at slot 2 and take four steps, wrapping once.
/// let iter = CircularIterator::new(&data, 4, 4, 2).unwrap();
/// let values: Vec<i32> = iter.copied().collect();
/// assert_eq!(values, vec![3, 4, 1, 2]);
/// ```
#[derive(Debug)]
pub struct CircularIterator<'a, T> {
    /// Backing store, starting at physical slot 0.
    data: &'a [T],
    /// Capacity of the owning container; indices wrap modulo this value.
    container_max_size: usize,
    /// Physical slot the iterator currently points at.
    cur_index: usize,
    /// Number of increments after which the iterator is at end.
    max_increments: usize,
    /// Number of increments performed so far.
    cur_increment: usize,
}

impl<'a, T> CircularIterator<'a, T> {
    /// Create an iterator over `data`.
    ///
    /// `container_max_size` is the capacity of the owning container,
    /// `max_increments` the number of elements the iterator will visit and
    /// `starting_offset` the physical slot of the first element.
    ///
    /// # Errors
    ///
    /// Returns [`FeaturizerError::InvalidArgument`] if `data` is empty, if
    /// `container_max_size` is 0, if `max_increments` exceeds
    /// `container_max_size` (an iterator never walks more than one lap), if
    /// `starting_offset` is not a slot of the container, or if the walk would
    /// visit a slot past the end of `data`.
    pub fn new(
        data: &'a [T],
        container_max_size: usize,
        max_increments: usize,
        starting_offset: usize,
    ) -> Result<Self> {
        if data.is_empty() {
            return Err(FeaturizerError::invalid_argument(
                "data",
                "input data cannot be empty",
            ));
        }
        if container_max_size == 0 {
            return Err(FeaturizerError::invalid_argument(
                "container_max_size",
                "container max size cannot be 0",
            ));
        }
        if max_increments > container_max_size {
            return Err(FeaturizerError::invalid_argument(
                "max_increments",
                "cannot increment more than container_max_size times",
            ));
        }
        if starting_offset >= container_max_size {
            return Err(FeaturizerError::invalid_argument(
                "starting_offset",
                "starting offset must be smaller than container_max_size",
            ));
        }
        // Without wrapping, every visited slot lies in
        // [starting_offset, starting_offset + max_increments).
        let fits = max_increments == 0
            || container_max_size <= data.len()
            || starting_offset
                .checked_add(max_increments)
                .is_some_and(|stop| stop <= data.len());
        if !fits {
            return Err(FeaturizerError::invalid_argument(
                "max_increments",
                "iteration would run past the end of the data",
            ));
        }

        Ok(Self::from_parts(
            data,
            container_max_size,
            max_increments,
            starting_offset,
        ))
    }

    /// Unchecked constructor used by [`CircularBuffer`], which only builds
    /// iterators over non-empty stores with in-range budgets.
    fn from_parts(
        data: &'a [T],
        container_max_size: usize,
        max_increments: usize,
        starting_offset: usize,
    ) -> Self {
        Self {
            data,
            container_max_size,
            cur_index: starting_offset,
            max_increments,
            cur_increment: 0,
        }
    }

    /// Returns `true` once the increment budget is spent.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.cur_increment == self.max_increments
    }

    /// Number of elements left before the iterator reaches its end.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.max_increments.saturating_sub(self.cur_increment)
    }

    /// Physical slot the iterator currently points at.
    #[must_use]
    pub fn index(&self) -> usize {
        self.cur_index
    }

    /// Reference to the element at the current position.
    ///
    /// # Panics
    ///
    /// Must not be called on an iterator that is at end. Debug builds assert
    /// this; release builds panic on the out-of-bounds slice access for a
    /// default iterator.
    #[must_use]
    pub fn get(&self) -> &'a T {
        debug_assert!(!self.is_at_end(), "dereferenced a CircularIterator at end");
        &self.data[self.cur_index]
    }

    /// Pre-increment: move to the next slot, wrapping at the container end.
    ///
    /// # Panics
    ///
    /// Advancing past the increment budget is a contract violation and is
    /// asserted in debug builds.
    pub fn advance(&mut self) -> &mut Self {
        self.cur_increment += 1;
        debug_assert!(
            self.cur_increment <= self.max_increments,
            "advanced a CircularIterator past its end"
        );

        self.cur_index = (self.cur_index + 1) % self.container_max_size;
        self
    }

    /// Post-increment: advance and return the position before the move.
    pub fn post_advance(&mut self) -> Self {
        let previous = self.clone();
        self.advance();
        previous
    }
}

impl<T> Clone for CircularIterator<'_, T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            container_max_size: self.container_max_size,
            cur_index: self.cur_index,
            max_increments: self.max_increments,
            cur_increment: self.cur_increment,
        }
    }
}

impl<T> Default for CircularIterator<'_, T> {
    /// An iterator that is already at end.
    fn default() -> Self {
        Self {
            data: &[],
            container_max_size: 0,
            cur_index: 0,
            max_increments: 0,
            cur_increment: 0,
        }
    }
}

impl<T> PartialEq for CircularIterator<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_at_end(), other.is_at_end()) {
            (true, true) => true,
            (false, false) => {
                core::ptr::eq(self.data.as_ptr(), other.data.as_ptr())
                    && self.cur_index == other.cur_index
            }
            _ => false,
        }
    }
}

impl<T> Eq for CircularIterator<'_, T> {}

impl<'a, T> Iterator for CircularIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_at_end() {
            return None;
        }
        let item = self.get();
        self.advance();
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for CircularIterator<'_, T> {}

impl<T> FusedIterator for CircularIterator<'_, T> {}

/// A fixed-capacity circular buffer.
///
/// Storage for `capacity` elements is reserved up front. Pushing into a full
/// buffer overwrites the oldest element in place, so the buffer never
/// reallocates after construction.
///
/// # Example
///
/// ```rust
/// use featurizer_core::CircularBuffer;
///
/// let mut buffer = CircularBuffer::new(3).unwrap();
/// for value in 1..=4 {
///     buffer.push(value);
/// }
///
/// // 1 was overwritten by 4.
/// let values: Vec<i32> = buffer.iter().copied().collect();
/// assert_eq!(values, vec![2, 3, 4]);
///
/// // Two elements, skipping the oldest one.
/// let (begin, end) = buffer.range(2, 1);
/// assert_eq!(*begin.get(), 3);
/// assert_eq!(begin.count(), 2);
/// assert!(end.is_at_end());
/// ```
#[derive(Clone, Debug)]
pub struct CircularBuffer<T> {
    /// Backing store; grows to `max_size` and is then overwritten in place.
    data: Vec<T>,
    /// Physical slot of the logically oldest element (0 until full).
    start_offset: usize,
    /// Maximum number of elements held.
    max_size: usize,
}

impl<T> CircularBuffer<T> {
    /// Create an empty buffer holding at most `max_size` elements.
    ///
    /// # Errors
    ///
    /// Returns [`FeaturizerError::InvalidArgument`] if `max_size` is 0 or if
    /// storage for `max_size` elements cannot be reserved.
    pub fn new(max_size: usize) -> Result<Self> {
        if max_size == 0 {
            return Err(FeaturizerError::invalid_argument(
                "max_size",
                "max size cannot be zero",
            ));
        }

        let mut data = Vec::new();
        data.try_reserve_exact(max_size).map_err(|_| {
            FeaturizerError::invalid_argument("max_size", "storage for max size cannot be reserved")
        })?;

        Ok(Self {
            data,
            start_offset: 0,
            max_size,
        })
    }

    /// Number of valid elements.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Number of valid elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no element has been pushed since creation or the
    /// last [`clear`](Self::clear).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Maximum number of elements; constant for the buffer's lifetime.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Returns `true` if the buffer holds `capacity()` elements.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.data.len() == self.max_size
    }

    /// Push a value into the buffer.
    ///
    /// If the buffer is full, the oldest value is overwritten and returned.
    pub fn push(&mut self, value: T) -> Option<T> {
        if self.is_full() {
            let replaced = core::mem::replace(&mut self.data[self.start_offset], value);
            self.start_offset = (self.start_offset + 1) % self.max_size;
            Some(replaced)
        } else {
            self.data.push(value);
            None
        }
    }

    /// Remove all elements. Capacity and allocation are kept.
    pub fn clear(&mut self) {
        self.data.clear();
        self.start_offset = 0;
    }

    /// Get a value by logical index (0 = oldest).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.data.len() {
            return None;
        }
        self.data.get((self.start_offset + index) % self.max_size)
    }

    /// Get the oldest value in the buffer.
    #[must_use]
    pub fn oldest(&self) -> Option<&T> {
        self.get(0)
    }

    /// Get the newest value in the buffer.
    #[must_use]
    pub fn newest(&self) -> Option<&T> {
        self.data.len().checked_sub(1).and_then(|last| self.get(last))
    }

    /// Iterator positioned at the oldest element.
    ///
    /// Returns a default (end) iterator when the buffer is empty.
    #[must_use]
    pub fn begin(&self) -> CircularIterator<'_, T> {
        if self.data.is_empty() {
            return CircularIterator::default();
        }
        CircularIterator::from_parts(&self.data, self.max_size, self.data.len(), self.start_offset)
    }

    /// Iterator one past the newest element.
    ///
    /// For a full buffer this is the oldest slot again, one lap after
    /// [`begin`](Self::begin).
    #[must_use]
    pub fn end(&self) -> CircularIterator<'_, T> {
        if self.data.is_empty() {
            return CircularIterator::default();
        }
        let index = if self.is_full() {
            self.start_offset
        } else {
            self.data.len()
        };
        CircularIterator::from_parts(&self.data, self.max_size, 0, index)
    }

    /// Iterate over all values from oldest to newest.
    pub fn iter(&self) -> CircularIterator<'_, T> {
        self.begin()
    }

    /// `[begin, end)` pair over at most `n` elements, skipping the `offset`
    /// oldest elements first.
    ///
    /// - empty buffer: two default iterators;
    /// - `offset > size()`: `(end(), end())`;
    /// - `n + offset > size()`: truncated to the `size() - offset` elements
    ///   that exist, ending at `end()`;
    /// - otherwise exactly `n` elements.
    ///
    /// # Panics
    ///
    /// `n + offset` must not exceed `capacity()`; debug builds assert this.
    /// A window never spans more than one lap of the buffer.
    #[must_use]
    pub fn range(&self, n: usize, offset: usize) -> (CircularIterator<'_, T>, CircularIterator<'_, T>) {
        debug_assert!(
            n.checked_add(offset).is_some_and(|total| total <= self.max_size),
            "range of {n} elements at offset {offset} exceeds capacity {}",
            self.max_size
        );

        let size = self.data.len();
        if size == 0 {
            return (CircularIterator::default(), CircularIterator::default());
        }
        if offset > size {
            return (self.end(), self.end());
        }

        let start = (self.start_offset + offset) % self.max_size;
        if n > size - offset {
            let begin = CircularIterator::from_parts(&self.data, self.max_size, size - offset, start);
            return (begin, self.end());
        }

        let begin = CircularIterator::from_parts(&self.data, self.max_size, n, start);
        let end = CircularIterator::from_parts(
            &self.data,
            self.max_size,
            0,
            (self.start_offset + n + offset) % self.max_size,
        );
        (begin, end)
    }

    /// Same as [`range`](Self::range); kept for callers that want to make
    /// the read-only intent explicit.
    #[must_use]
    pub fn crange(&self, n: usize, offset: usize) -> (CircularIterator<'_, T>, CircularIterator<'_, T>) {
        self.range(n, offset)
    }
}

impl<'a, T> IntoIterator for &'a CircularBuffer<T> {
    type Item = &'a T;
    type IntoIter = CircularIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.begin()
    }
}

/// Collect the values of a `[begin, end)` pair.
///
/// Walks `begin` until it compares equal to `end`, which is how reducers
/// consume the windows handed out by [`CircularBuffer::range`].
#[must_use]
pub fn collect_range<T: Clone>(mut begin: CircularIterator<'_, T>, end: &CircularIterator<'_, T>) -> Vec<T> {
    let mut values = Vec::with_capacity(begin.remaining());
    while begin != *end {
        values.push(begin.post_advance().get().clone());
    }
    values
}
