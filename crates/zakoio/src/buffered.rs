use std::{
    fmt,
    fs::File,
    io::{Read, Seek, SeekFrom, Write},
};

use crate::{Error, Origin, Result};

/// File handle with one owned buffer used for both read-ahead and pending
/// writes, in the manner of a fully buffered stdio stream.
///
/// The buffer never holds read-ahead and pending writes at the same time:
/// `buf[head..tail]` is unread read-ahead, `buf[..pending]` is unwritten data.
/// `pos` is the logical cursor, i.e. the position callers observe.
pub(crate) struct BufferedFile {
    file: File,
    buf: Box<[u8]>,
    head: usize,
    tail: usize,
    pending: usize,
    pos: u64,
}

impl BufferedFile {
    pub fn new(mut file: File, capacity: usize) -> Result<Self> {
        let pos = file.stream_position()?;
        Ok(Self {
            file,
            buf: vec![0; capacity.max(1)].into_boxed_slice(),
            head: 0,
            tail: 0,
            pending: 0,
            pos,
        })
    }

    #[inline(always)]
    pub fn position(&self) -> u64 {
        self.pos
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Length of the file once pending writes reach it.
    pub fn len(&self) -> Result<u64> {
        let on_disk = self.file.metadata()?.len();
        Ok(if self.pending > 0 {
            on_disk.max(self.pos)
        } else {
            on_disk
        })
    }

    /// Fills `dst` completely.
    ///
    /// Returns [`Error::Eof`] if the data ends first. Bytes consumed before
    /// that point stay consumed, so the cursor has moved past them.
    pub fn read_exact(&mut self, mut dst: &mut [u8]) -> Result<()> {
        self.flush_writes()?;
        while !dst.is_empty() {
            let n = self.read_some(dst)?;
            if n == 0 {
                return Err(Error::Eof);
            }
            dst = &mut dst[n..];
        }
        Ok(())
    }

    /// Reads one byte, `None` at end of data.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        self.flush_writes()?;
        if self.head == self.tail && !self.fill()? {
            return Ok(None);
        }
        let byte = self.buf[self.head];
        self.consume(1);
        Ok(Some(byte))
    }

    fn read_some(&mut self, dst: &mut [u8]) -> Result<usize> {
        if self.head == self.tail {
            // Large reads skip the buffer entirely.
            if dst.len() >= self.buf.len() {
                let n = self.file.read(dst)?;
                self.pos += n as u64;
                return Ok(n);
            }
            if !self.fill()? {
                return Ok(0);
            }
        }
        let n = dst.len().min(self.tail - self.head);
        dst[..n].copy_from_slice(&self.buf[self.head..self.head + n]);
        self.consume(n);
        Ok(n)
    }

    /// Refills the read-ahead. Returns `false` at end of data.
    fn fill(&mut self) -> Result<bool> {
        self.head = 0;
        self.tail = 0;
        let n = self.file.read(&mut self.buf)?;
        self.tail = n;
        Ok(n > 0)
    }

    #[inline]
    fn consume(&mut self, n: usize) {
        self.head += n;
        self.pos += n as u64;
    }

    /// Writes all of `src`, buffering it when it fits.
    pub fn write_all(&mut self, src: &[u8]) -> Result<()> {
        self.discard_readahead()?;

        if self.pending + src.len() > self.buf.len() {
            self.flush_writes()?;
        }

        if src.len() >= self.buf.len() {
            let mut written = 0;
            let result = write_fully(&mut self.file, src, &mut written);
            self.pos += written as u64;
            return result;
        }

        self.buf[self.pending..self.pending + src.len()].copy_from_slice(src);
        self.pending += src.len();
        self.pos += src.len() as u64;
        Ok(())
    }

    /// Hands pending writes to the OS.
    ///
    /// On failure the bytes that were not accepted stay pending.
    pub fn flush_writes(&mut self) -> Result<()> {
        if self.pending == 0 {
            return Ok(());
        }
        let mut written = 0;
        let result = write_fully(&mut self.file, &self.buf[..self.pending], &mut written);
        self.buf.copy_within(written..self.pending, 0);
        self.pending -= written;
        result
    }

    /// Forgets pending writes that could not be flushed.
    pub fn discard_pending(&mut self) -> usize {
        std::mem::take(&mut self.pending)
    }

    /// Moves the OS cursor back to the logical position and drops read-ahead.
    fn discard_readahead(&mut self) -> Result<()> {
        if self.head != self.tail {
            self.file.seek(SeekFrom::Start(self.pos))?;
        }
        self.head = 0;
        self.tail = 0;
        Ok(())
    }

    pub fn seek(&mut self, offset: i64, origin: Origin) -> Result<u64> {
        self.flush_writes()?;

        let invalid = |source| Error::InvalidSeek {
            offset,
            origin,
            source,
        };
        let negative = || {
            invalid(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "seek to a negative position",
            ))
        };

        // Relative seeks are resolved against the logical position since the
        // OS cursor is ahead of it while read-ahead is buffered.
        let target = match origin {
            Origin::Start => SeekFrom::Start(u64::try_from(offset).map_err(|_| negative())?),
            Origin::Current => SeekFrom::Start(
                self.pos
                    .checked_add_signed(offset)
                    .ok_or_else(negative)?,
            ),
            Origin::End => SeekFrom::End(offset),
        };

        self.head = 0;
        self.tail = 0;
        match self.file.seek(target) {
            Ok(pos) => {
                self.pos = pos;
                Ok(pos)
            }
            Err(source) => {
                // The OS cursor is unchanged, put it back in sync with `pos`.
                self.file.seek(SeekFrom::Start(self.pos))?;
                Err(invalid(source))
            }
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        self.flush_writes()?;
        self.file.flush()?;
        Ok(())
    }

    pub fn sync(&mut self) -> Result<()> {
        self.flush()?;
        self.file.sync_all()?;
        Ok(())
    }
}

impl fmt::Debug for BufferedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferedFile")
            .field("file", &self.file)
            .field("capacity", &self.buf.len())
            .field("readahead", &(self.tail - self.head))
            .field("pending", &self.pending)
            .field("pos", &self.pos)
            .finish()
    }
}

fn write_fully(file: &mut File, src: &[u8], written: &mut usize) -> Result<()> {
    while *written < src.len() {
        match file.write(&src[*written..])? {
            0 => {
                return Err(Error::ShortWrite {
                    expected: src.len(),
                    written: *written,
                });
            }
            n => *written += n,
        }
    }
    Ok(())
}
