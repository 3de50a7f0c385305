use std::{ops::Deref, str::Utf8Error};

use smallvec::SmallVec;

use crate::CSTR_INIT_CAPACITY;

/// Backing storage of a [`Buf`]. Contents up to [`CSTR_INIT_CAPACITY`] bytes
/// stay inline.
pub(crate) type Bytes = SmallVec<[u8; CSTR_INIT_CAPACITY]>;

/// Buffer handed to the caller by [`BinaryStream::read_bytes`],
/// [`BinaryStream::read_cstr`] and [`BinaryStream::read_raw`].
///
/// The stream keeps no reference to it. Dropping it releases the memory;
/// [`Buf::release`] does the same explicitly.
///
/// [`BinaryStream::read_bytes`]: crate::BinaryStream::read_bytes
/// [`BinaryStream::read_cstr`]: crate::BinaryStream::read_cstr
/// [`BinaryStream::read_raw`]: crate::BinaryStream::read_raw
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[must_use = "Buf holds data read from the stream"]
pub struct Buf(Bytes);

impl Buf {
    #[inline]
    pub(crate) fn new(bytes: Bytes) -> Self {
        Self(bytes)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the contents without one trailing NUL, if there is one.
    pub fn without_nul(&self) -> &[u8] {
        self.0.strip_suffix(b"\0").unwrap_or(&self.0[..])
    }

    /// Views the contents, minus a trailing NUL, as UTF-8.
    pub fn to_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(self.without_nul())
    }

    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        self.0.into_vec()
    }

    /// Releases the buffer.
    #[inline]
    pub fn release(self) {
        drop(self)
    }
}

impl Deref for Buf {
    type Target = [u8];

    #[inline(always)]
    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Buf {
    #[inline(always)]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Buf> for Vec<u8> {
    fn from(value: Buf) -> Self {
        value.into_vec()
    }
}

/// Releases a buffer returned by the stream. `None` is a no-op.
#[inline]
pub fn free_buf(buf: Option<Buf>) {
    if let Some(buf) = buf {
        buf.release();
    }
}
