//! Fixed-capacity circular buffer of recent per-frame values.
//!
//! When the buffer is full, a push **overwrites** the oldest entry so that the
//! most-recent `capacity` values are always available.  The stabilizer keeps
//! one of these per hand to vote over the last N raw labels.
//!
//! # Example
//!
//! ```rust
//! use gesture_control::gesture::RingBuffer;
//!
//! let mut buf = RingBuffer::new(3);
//! for v in [1, 2, 3, 4] {
//!     buf.push(v); // 4 items → capacity 3 → oldest dropped
//! }
//! assert_eq!(buf.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
//! ```

// ---------------------------------------------------------------------------
// RingBuffer
// ---------------------------------------------------------------------------

/// A fixed-capacity circular buffer.
///
/// Generic over `T: Copy + Default`; the engine stores
/// [`RawGesture`](super::RawGesture) values in it.
///
/// ## Overflow behaviour
///
/// When [`push`](Self::push) would exceed `capacity`, the oldest value is
/// silently overwritten.  The buffer never allocates beyond its initial
/// capacity.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    buf: Vec<T>,
    capacity: usize,
    /// Index of the *next* write position (wraps around `capacity`).
    write_pos: usize,
    /// Number of valid values currently stored (≤ `capacity`).
    len: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Create a new ring buffer with the given `capacity`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.  `AppConfig::validate` rejects a zero
    /// window before any buffer is built.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be > 0");
        Self {
            buf: vec![T::default(); capacity],
            capacity,
            write_pos: 0,
            len: 0,
        }
    }

    /// Append one value, overwriting the oldest when full.
    pub fn push(&mut self, item: T) {
        self.buf[self.write_pos] = item;
        self.write_pos = (self.write_pos + 1) % self.capacity;
        if self.len < self.capacity {
            self.len += 1;
        }
    }

    /// Stored values in chronological order (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        // Before the first wrap valid data starts at 0; afterwards the oldest
        // value sits at `write_pos`.
        let read_pos = if self.len < self.capacity {
            0
        } else {
            self.write_pos
        };
        (0..self.len).map(move |i| self.buf[(read_pos + i) % self.capacity])
    }

    /// Number of stored values matching `pred`.
    pub fn count(&self, mut pred: impl FnMut(&T) -> bool) -> usize {
        self.iter().filter(|item| pred(item)).count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
