//! Growable backing store with absolute-offset access.

/// Expandable byte array underlying every root [`CursorBuffer`].
///
/// The store keeps its own position alongside the data so that a root buffer
/// can mirror seeks into it; when several references share one store there is
/// no single authoritative cursor, and each buffer instance tracks its own.
///
/// Capacity is monotonically non-decreasing except through [`reset`], which
/// drops the contents and the allocation.
///
/// [`CursorBuffer`]: crate::CursorBuffer
/// [`reset`]: ByteStore::reset
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ByteStore {
    data: Vec<u8>,
    pos: usize,
}

impl ByteStore {
    /// Create an empty store with capacity 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the given slices, concatenated in order.
    ///
    /// Capacity equals the sum of the slice lengths; the position starts at 0.
    #[must_use]
    pub fn from_slices(slices: &[&[u8]]) -> Self {
        let mut data = Vec::with_capacity(slices.iter().map(|s| s.len()).sum());
        for slice in slices {
            data.extend_from_slice(slice);
        }
        Self { data, pos: 0 }
    }

    /// Current byte extent of the store.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the store holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append `n` zero bytes, extending capacity by exactly `n`.
    pub fn grow(&mut self, n: usize) {
        self.data.resize(self.data.len() + n, 0);
    }

    /// Copy up to `dst.len()` bytes starting at `offset` into `dst`,
    /// clamped to capacity. Returns the number of bytes copied.
    pub fn read_range(&self, offset: usize, dst: &mut [u8]) -> usize {
        if offset >= self.data.len() {
            return 0;
        }
        let n = dst.len().min(self.data.len() - offset);
        dst[..n].copy_from_slice(&self.data[offset..offset + n]);
        n
    }

    /// Copy `src` into the store at `offset`, growing first if the write
    /// would run past the current capacity. Growth and write happen as one
    /// step; a caller never observes the zero-filled gap.
    pub fn write_range(&mut self, offset: usize, src: &[u8]) {
        let end = offset + src.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[offset..end].copy_from_slice(src);
    }

    /// The store's native cursor.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Reposition the store's native cursor.
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Full raw contents.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Drop contents and allocation; capacity and position return to 0.
    pub fn reset(&mut self) {
        self.data = Vec::new();
        self.pos = 0;
    }
}

impl AsRef<[u8]> for ByteStore {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
