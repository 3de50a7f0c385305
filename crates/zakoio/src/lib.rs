#![doc = include_str!("../README.md")]

use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
};

use log::{debug, trace, warn};

mod buf;
mod buffered;
pub mod endian;
pub mod error;
mod options;
mod primitive;

pub use buf::*;
use buffered::*;
pub use error::*;
pub use options::*;
pub use primitive::*;

/// Default size of the buffer owned by each stream.
pub const BUF_SIZE: usize = 8192;
/// Default initial capacity of the string read buffer.
pub const CSTR_INIT_CAPACITY: usize = 16;
/// Largest blob the 16-bit length prefix can describe.
pub const MAX_BLOB_LEN: usize = u16::MAX as usize;

/// Reference point for [`BinaryStream::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Start,
    Current,
    End,
}

/// Buffered file handle that reads and writes values in the big-endian wire
/// format.
///
/// Every read or write starts at the cursor and leaves it just past the bytes
/// it moved. All mutating operations take `&mut self`, so a stream has a
/// single owner driving it; to touch one file from several threads, open one
/// stream per thread or put the stream behind a lock.
///
/// Buffered writes reach the file on [`flush`](Self::flush),
/// [`close`](Self::close), or when the stream is dropped.
#[derive(Debug)]
#[must_use = "BinaryStream should be stored to keep the file open"]
pub struct BinaryStream {
    path: PathBuf,
    file: BufferedFile,
    options: StreamOptions,
}

macro_rules! primitive_codecs {
    ($($t:ty => $read:ident, $write:ident;)*) => {
        $(
            #[doc = concat!("Reads one `", stringify!($t), "`.")]
            #[inline]
            pub fn $read(&mut self) -> Result<$t> {
                self.read::<$t>()
            }

            #[doc = concat!("Writes one `", stringify!($t), "`.")]
            #[inline]
            pub fn $write(&mut self, value: $t) -> Result<()> {
                self.write::<$t>(value)
            }
        )*
    };
}

impl BinaryStream {
    /// Opens the file at `path` for reading and writing, creating it if it
    /// can't be opened.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_options(path, StreamOptions::default())
    }

    pub fn open_with_options(path: &Path, options: StreamOptions) -> Result<Self> {
        let file = match OpenOptions::new().read(true).write(true).open(path) {
            Ok(file) => {
                debug!("Opened {}.", path.display());
                file
            }
            Err(e) => {
                debug!("Couldn't open {} ({e}), creating it.", path.display());
                OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)
                    .map_err(|source| Error::Open {
                        path: path.to_owned(),
                        source,
                    })?
            }
        };

        let file = BufferedFile::new(file, options.buffer_capacity())?;
        debug!("Buffer of {} bytes attached.", file.capacity());

        Ok(Self {
            path: path.to_owned(),
            file,
            options,
        })
    }

    /// Flushes buffered writes and closes the file.
    ///
    /// If the flush fails the unwritten bytes are dropped and the error is
    /// returned; the file is closed either way.
    pub fn close(mut self) -> Result<()> {
        let result = self.file.flush();
        if result.is_err() {
            let lost = self.file.discard_pending();
            warn!("Closing {} with {lost} unwritten bytes.", self.path.display());
        }
        debug!("Closed {}.", self.path.display());
        result
    }

    /// Reads exactly `n` bytes into a new buffer.
    pub fn read_raw(&mut self, n: usize) -> Result<Buf> {
        let mut bytes = alloc(n)?;
        self.file.read_exact(&mut bytes)?;
        Ok(Buf::new(bytes))
    }

    /// Fills `dst` completely.
    ///
    /// On [`Error::Eof`] the contents of `dst` are unspecified.
    #[inline]
    pub fn read_raw_into(&mut self, dst: &mut [u8]) -> Result<()> {
        self.file.read_exact(dst)
    }

    #[inline]
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.file.write_all(bytes)
    }

    /// Reads any [`Primitive`] value.
    #[inline]
    pub fn read<T: Primitive>(&mut self) -> Result<T> {
        let mut wire = T::Wire::default();
        self.file.read_exact(wire.as_mut())?;
        Ok(T::from_wire(wire))
    }

    /// Writes any [`Primitive`] value.
    #[inline]
    pub fn write<T: Primitive>(&mut self, value: T) -> Result<()> {
        self.file.write_all(value.to_wire().as_ref())
    }

    primitive_codecs! {
        u8 => read_u8, write_u8;
        i8 => read_i8, write_i8;
        u16 => read_u16, write_u16;
        i16 => read_i16, write_i16;
        u32 => read_u32, write_u32;
        i32 => read_i32, write_i32;
        u64 => read_u64, write_u64;
        i64 => read_i64, write_i64;
        f32 => read_f32, write_f32;
        f64 => read_f64, write_f64;
    }

    /// Reads a blob: a `u16` length prefix followed by that many bytes.
    pub fn read_bytes(&mut self) -> Result<Buf> {
        let len = usize::from(self.read_u16()?);
        self.read_raw(len)
    }

    /// Writes a blob: a `u16` length prefix followed by `bytes`.
    ///
    /// Fails with [`Error::BlobTooLong`] before writing anything if `bytes`
    /// is longer than [`MAX_BLOB_LEN`].
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let len = u16::try_from(bytes.len()).map_err(|_| Error::BlobTooLong { len: bytes.len() })?;
        self.write_u16(len)?;
        self.write_raw(bytes)
    }

    /// Reads a NUL-terminated string.
    ///
    /// On success the returned buffer ends with the NUL. If the data ends
    /// first, the bytes read so far are handed back inside
    /// [`Error::UnterminatedCStr`]. If growing the buffer fails, the partial
    /// bytes are released here and [`Error::Alloc`] is returned.
    pub fn read_cstr(&mut self) -> Result<Buf> {
        let mut cap = self.options.cstr_capacity();
        let mut bytes = Bytes::new();
        bytes
            .try_reserve_exact(cap)
            .map_err(|_| Error::Alloc { requested: cap })?;

        loop {
            let Some(byte) = self.file.read_byte()? else {
                return Err(Error::UnterminatedCStr {
                    partial: Buf::new(bytes),
                });
            };

            if bytes.len() == cap {
                cap = cap / 2 * 3;
                bytes
                    .try_reserve_exact(cap - bytes.len())
                    .map_err(|_| Error::Alloc { requested: cap })?;
            }

            bytes.push(byte);

            if byte == 0 {
                return Ok(Buf::new(bytes));
            }
        }
    }

    /// Writes `s` followed by a NUL.
    ///
    /// Fails with [`Error::InteriorNul`] before writing anything if `s`
    /// already contains a NUL, since it couldn't be read back whole.
    pub fn write_cstr(&mut self, s: impl AsRef<[u8]>) -> Result<()> {
        let s = s.as_ref();
        if let Some(position) = s.iter().position(|&b| b == 0) {
            return Err(Error::InteriorNul { position });
        }
        self.file.write_all(s)?;
        self.file.write_all(&[0])
    }

    /// Moves the cursor to `offset` relative to `origin` and returns the new
    /// position.
    pub fn seek(&mut self, offset: i64, origin: Origin) -> Result<u64> {
        let pos = self.file.seek(offset, origin)?;
        trace!("Seek {offset} from {origin:?} in {}: now at {pos}.", self.path.display());
        Ok(pos)
    }

    #[inline]
    pub fn rewind(&mut self) -> Result<()> {
        self.seek(0, Origin::Start).map(|_| ())
    }

    /// Current cursor position.
    #[inline(always)]
    pub fn tell(&self) -> u64 {
        self.file.position()
    }

    /// Length of the file, counting buffered writes.
    pub fn len(&self) -> Result<u64> {
        self.file.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Hands buffered writes to the operating system.
    pub fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        debug!("Flushed {}.", self.path.display());
        Ok(())
    }

    /// Flushes, then asks the file system to persist data and metadata.
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync()
    }

    #[inline(always)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline(always)]
    pub fn options(&self) -> StreamOptions {
        self.options
    }
}

impl Drop for BinaryStream {
    fn drop(&mut self) {
        if let Err(e) = self.file.flush() {
            warn!("Failed to flush {} on drop: {e}", self.path.display());
        }
    }
}

/// Closes the stream held in `stream`, leaving `None` behind.
///
/// Closing an empty slot is a no-op, so calling this twice is harmless.
pub fn close(stream: &mut Option<BinaryStream>) -> Result<()> {
    stream.take().map_or(Ok(()), BinaryStream::close)
}

fn alloc(len: usize) -> Result<Bytes> {
    let mut bytes = Bytes::new();
    bytes
        .try_reserve_exact(len)
        .map_err(|_| Error::Alloc { requested: len })?;
    bytes.resize(len, 0);
    Ok(bytes)
}
