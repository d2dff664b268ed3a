//! Big-endian byte reader with offset tracking.

use std::io::{self, Read};

use byteorder::{BigEndian, ByteOrder};

use crate::error::{StreamError, StreamResult};

/// A byte-level reader for decoding big-endian binary data.
///
/// The reader counts every byte it consumes so framing layers can compare
/// declared record sizes against what was actually read. All reads are
/// exact: running out of input returns [`StreamError::ShortRead`], never a
/// partial value.
#[derive(Debug)]
pub struct ByteReader<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> ByteReader<R> {
    /// Creates a new `ByteReader` positioned at offset zero.
    #[must_use]
    pub const fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Returns the number of bytes consumed so far.
    #[must_use]
    pub const fn position(&self) -> u64 {
        self.offset
    }

    /// Consumes the reader, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Reads a `u8`.
    pub fn read_u8(&mut self) -> StreamResult<u8> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    /// Reads a big-endian `u16`.
    pub fn read_u16(&mut self) -> StreamResult<u16> {
        let bytes = self.read_array::<2>()?;
        Ok(BigEndian::read_u16(&bytes))
    }

    /// Reads a big-endian `u32`.
    pub fn read_u32(&mut self) -> StreamResult<u32> {
        let bytes = self.read_array::<4>()?;
        Ok(BigEndian::read_u32(&bytes))
    }

    /// Reads a two's-complement `i8`.
    pub fn read_i8(&mut self) -> StreamResult<i8> {
        Ok(i8::from_be_bytes(self.read_array::<1>()?))
    }

    /// Reads a big-endian two's-complement `i16`.
    pub fn read_i16(&mut self) -> StreamResult<i16> {
        let bytes = self.read_array::<2>()?;
        Ok(BigEndian::read_i16(&bytes))
    }

    /// Reads a big-endian two's-complement `i32`.
    pub fn read_i32(&mut self) -> StreamResult<i32> {
        let bytes = self.read_array::<4>()?;
        Ok(BigEndian::read_i32(&bytes))
    }

    /// Reads a big-endian IEEE 754 `f32`.
    pub fn read_f32(&mut self) -> StreamResult<f32> {
        let bytes = self.read_array::<4>()?;
        Ok(BigEndian::read_f32(&bytes))
    }

    /// Reads exactly `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> StreamResult<Vec<u8>> {
        let mut out = vec![0u8; len];
        self.fill(&mut out)?;
        Ok(out)
    }

    /// Reads exactly `len` big-endian `u16` code units.
    pub fn read_u16_units(&mut self, len: usize) -> StreamResult<Vec<u16>> {
        let raw = self.read_bytes(len * 2)?;
        let mut out = vec![0u16; len];
        BigEndian::read_u16_into(&raw, &mut out);
        Ok(out)
    }

    /// Discards exactly `len` bytes.
    pub fn skip(&mut self, len: usize) -> StreamResult<()> {
        let wanted = len as u64;
        let copied = io::copy(&mut (&mut self.inner).take(wanted), &mut io::sink()).map_err(
            |source| StreamError::Io {
                offset: self.offset,
                source,
            },
        )?;
        if copied < wanted {
            return Err(StreamError::ShortRead {
                offset: self.offset,
                requested: len,
                available: copied as usize,
            });
        }
        self.offset += wanted;
        Ok(())
    }

    /// Reads every remaining byte of the source.
    pub fn read_to_end(&mut self) -> StreamResult<Vec<u8>> {
        let mut out = Vec::new();
        let read = self
            .inner
            .read_to_end(&mut out)
            .map_err(|source| StreamError::Io {
                offset: self.offset,
                source,
            })?;
        self.offset += read as u64;
        Ok(out)
    }

    fn read_array<const N: usize>(&mut self) -> StreamResult<[u8; N]> {
        let mut out = [0u8; N];
        self.fill(&mut out)?;
        Ok(out)
    }

    fn fill(&mut self, buf: &mut [u8]) -> StreamResult<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(StreamError::ShortRead {
                        offset: self.offset,
                        requested: buf.len(),
                        available: filled,
                    });
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(source) => {
                    return Err(StreamError::Io {
                        offset: self.offset,
                        source,
                    });
                }
            }
        }
        self.offset += buf.len() as u64;
        Ok(())
    }
}
