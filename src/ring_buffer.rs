//! Fixed-capacity circular buffer used by the smoothing and metrics windows.

/// Circular array that overwrites its oldest entry once full
///
/// Storage is allocated once; pushes never reallocate.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots: Vec<T>,
    capacity: usize,
    /// Index of the oldest entry once the buffer is full
    cursor: usize,
}

impl<T> RingBuffer<T> {
    /// Create an empty buffer holding at most `capacity` entries
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Ring buffer capacity must be greater than 0");
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    /// Append a value, evicting and returning the oldest one when full
    pub fn push(&mut self, value: T) -> Option<T> {
        if self.slots.len() < self.capacity {
            self.slots.push(value);
            None
        } else {
            let evicted = std::mem::replace(&mut self.slots[self.cursor], value);
            self.cursor = (self.cursor + 1) % self.capacity;
            Some(evicted)
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.cursor = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently pushed value
    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        if self.slots.is_empty() {
            None
        } else if self.is_full() {
            self.slots.get((self.cursor + self.capacity - 1) % self.capacity)
        } else {
            self.slots.last()
        }
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let (newer, older) = self.slots.split_at(self.cursor);
        older.iter().chain(newer.iter())
    }
}

impl RingBuffer<f64> {
    /// Arithmetic mean of the stored values, `None` when empty
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        if self.slots.is_empty() {
            return None;
        }
        Some(self.slots.iter().sum::<f64>() / crate::utils::safe_cast::count_to_f64(self.slots.len()))
    }
}
