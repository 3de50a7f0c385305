use crate::{BUF_SIZE, CSTR_INIT_CAPACITY};

/// Smallest initial string capacity that still grows under the ×1.5 rule.
const MIN_CSTR_CAPACITY: usize = 4;

/// Tuning knobs for [`BinaryStream::open_with_options`].
///
/// [`BinaryStream::open_with_options`]: crate::BinaryStream::open_with_options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    buffer_capacity: usize,
    cstr_capacity: usize,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: BUF_SIZE,
            cstr_capacity: CSTR_INIT_CAPACITY,
        }
    }
}

impl StreamOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size of the buffer owned by the stream. Clamped to at least 1 byte.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity.max(1);
        self
    }

    /// Initial capacity of the buffer used by string reads.
    /// Clamped to at least 4 bytes.
    pub fn with_cstr_capacity(mut self, capacity: usize) -> Self {
        self.cstr_capacity = capacity.max(MIN_CSTR_CAPACITY);
        self
    }

    #[inline(always)]
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    #[inline(always)]
    pub fn cstr_capacity(&self) -> usize {
        self.cstr_capacity
    }
}
