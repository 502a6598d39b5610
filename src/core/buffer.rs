//! Purpose: Own the fixed-capacity byte buffer a single read operation fills and resolves.
//! Exports: `InputBuffer`, `SENTINEL`.
//! Role: Replaces pointer + size + "null byte" bookkeeping with one bounds-checked type.
//! Invariants: Zeroed before every acquisition.
//! Invariants: After resolution `content()` holds no terminator and `byte[len] == SENTINEL`.
//! Invariants: `len <= capacity - 1`.

/// Byte written after the resolved content.
pub const SENTINEL: u8 = 0;

#[derive(Debug)]
pub struct InputBuffer {
    bytes: Box<[u8]>,
    len: usize,
}

impl InputBuffer {
    /// Allocates a zeroed buffer.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2`: one content byte plus the sentinel slot is the minimum.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 2, "input buffer needs room for content and sentinel");
        Self {
            bytes: vec![SENTINEL; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn content(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Byte at `index` regardless of the resolved length; `None` past capacity.
    pub fn byte_at(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }

    pub fn reset(&mut self) {
        self.bytes.fill(SENTINEL);
        self.len = 0;
    }

    /// Slot range `[0, budget + 1)` that acquisition reads into.
    ///
    /// # Panics
    ///
    /// Panics if `budget + 1` exceeds the capacity.
    pub fn fill_region(&mut self, budget: usize) -> &mut [u8] {
        assert!(
            budget < self.capacity(),
            "budget {budget} leaves no sentinel slot in capacity {}",
            self.capacity()
        );
        &mut self.bytes[..=budget]
    }

    /// Writes the sentinel at `pos` and records `pos` as the resolved length.
    pub fn terminate_at(&mut self, pos: usize) {
        debug_assert!(pos < self.capacity(), "sentinel position out of bounds");
        self.bytes[pos] = SENTINEL;
        self.len = pos;
    }

    pub(crate) fn position_of(&self, byte: u8, within: usize) -> Option<usize> {
        let end = within.min(self.capacity());
        self.bytes[..end].iter().position(|b| *b == byte)
    }
}
