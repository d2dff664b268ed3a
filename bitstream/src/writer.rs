//! Big-endian byte writer with offset tracking and back-patching.

use std::io::{Seek, SeekFrom, Write};

use byteorder::{BigEndian, WriteBytesExt};

use crate::error::{StreamError, StreamResult};

/// A byte-level writer for encoding big-endian binary data.
///
/// Counts every byte it emits. When the sink is seekable, previously
/// written length fields can be overwritten in place with
/// [`patch_u32`](Self::patch_u32).
#[derive(Debug)]
pub struct ByteWriter<W> {
    inner: W,
    offset: u64,
}

impl<W: Write> ByteWriter<W> {
    /// Creates a new `ByteWriter` positioned at offset zero.
    #[must_use]
    pub const fn new(inner: W) -> Self {
        Self { inner, offset: 0 }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub const fn position(&self) -> u64 {
        self.offset
    }

    /// Returns a reference to the underlying sink.
    pub const fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consumes the writer, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Writes a `u8`.
    pub fn write_u8(&mut self, value: u8) -> StreamResult<()> {
        let offset = self.offset;
        self.inner.write_u8(value).map_err(|source| StreamError::Io { offset, source })?;
        self.offset += 1;
        Ok(())
    }

    /// Writes a big-endian `u16`.
    pub fn write_u16(&mut self, value: u16) -> StreamResult<()> {
        let offset = self.offset;
        self.inner
            .write_u16::<BigEndian>(value)
            .map_err(|source| StreamError::Io { offset, source })?;
        self.offset += 2;
        Ok(())
    }

    /// Writes a big-endian `u32`.
    pub fn write_u32(&mut self, value: u32) -> StreamResult<()> {
        let offset = self.offset;
        self.inner
            .write_u32::<BigEndian>(value)
            .map_err(|source| StreamError::Io { offset, source })?;
        self.offset += 4;
        Ok(())
    }

    /// Writes a two's-complement `i8`.
    pub fn write_i8(&mut self, value: i8) -> StreamResult<()> {
        let offset = self.offset;
        self.inner.write_i8(value).map_err(|source| StreamError::Io { offset, source })?;
        self.offset += 1;
        Ok(())
    }

    /// Writes a big-endian two's-complement `i16`.
    pub fn write_i16(&mut self, value: i16) -> StreamResult<()> {
        let offset = self.offset;
        self.inner
            .write_i16::<BigEndian>(value)
            .map_err(|source| StreamError::Io { offset, source })?;
        self.offset += 2;
        Ok(())
    }

    /// Writes a big-endian two's-complement `i32`.
    pub fn write_i32(&mut self, value: i32) -> StreamResult<()> {
        let offset = self.offset;
        self.inner
            .write_i32::<BigEndian>(value)
            .map_err(|source| StreamError::Io { offset, source })?;
        self.offset += 4;
        Ok(())
    }

    /// Writes a big-endian IEEE 754 `f32`.
    pub fn write_f32(&mut self, value: f32) -> StreamResult<()> {
        let offset = self.offset;
        self.inner
            .write_f32::<BigEndian>(value)
            .map_err(|source| StreamError::Io { offset, source })?;
        self.offset += 4;
        Ok(())
    }

    /// Writes raw bytes verbatim.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> StreamResult<()> {
        let offset = self.offset;
        self.inner
            .write_all(bytes)
            .map_err(|source| StreamError::Io { offset, source })?;
        self.offset += bytes.len() as u64;
        Ok(())
    }

    /// Writes big-endian `u16` code units.
    pub fn write_u16_units(&mut self, units: &[u16]) -> StreamResult<()> {
        for &unit in units {
            self.write_u16(unit)?;
        }
        Ok(())
    }

    /// Flushes the underlying sink.
    pub fn flush(&mut self) -> StreamResult<()> {
        let offset = self.offset;
        self.inner
            .flush()
            .map_err(|source| StreamError::Io { offset, source })
    }
}

impl<W: Write + Seek> ByteWriter<W> {
    /// Overwrites a big-endian `u32` previously written at `offset`.
    ///
    /// `offset` is relative to where this writer started. The sink is left
    /// positioned at the end of the written data.
    pub fn patch_u32(&mut self, offset: u64, value: u32) -> StreamResult<()> {
        if offset + 4 > self.offset {
            return Err(StreamError::PatchOutOfRange {
                offset,
                len: 4,
                written: self.offset,
            });
        }
        let back = (self.offset - offset) as i64;
        let at = self.offset;
        let io_err = |source| StreamError::Io { offset: at, source };
        self.inner.seek(SeekFrom::Current(-back)).map_err(io_err)?;
        self.inner.write_u32::<BigEndian>(value).map_err(io_err)?;
        self.inner.seek(SeekFrom::Current(back - 4)).map_err(io_err)?;
        Ok(())
    }
}
