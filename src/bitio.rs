//! Bit-granular I/O over byte streams.
//!
//! Bits are packed big-endian within each byte: the first bit written lands
//! in the most significant position. Because the underlying stream is made of
//! whole bytes, the writer pads the final byte with zero bits and the reader
//! only ever reaches the end of the stream on a byte boundary.

use std::io::{self, Read, Write};

use crate::{Error, Result};

/// Reads individual bits from an underlying byte source.
///
/// The source is pulled one byte at a time; wrap files in a
/// [`BufReader`](std::io::BufReader).
#[derive(Debug)]
pub struct BitReader<R: Read> {
    inner: R,
    current: u8,
    remaining: u8,
    exhausted: bool,
}

impl<R: Read> BitReader<R> {
    /// Creates a bit reader positioned at the first bit of `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            current: 0,
            remaining: 0,
            exhausted: false,
        }
    }

    /// Reads the next bit.
    ///
    /// Returns `Ok(None)` once the underlying source is exhausted; every
    /// subsequent call keeps returning `Ok(None)`.
    pub fn read(&mut self) -> Result<Option<u8>> {
        if self.exhausted {
            return Ok(None);
        }
        if self.remaining == 0 {
            match next_byte(&mut self.inner)? {
                Some(byte) => {
                    self.current = byte;
                    self.remaining = 8;
                }
                None => {
                    self.exhausted = true;
                    return Ok(None);
                }
            }
        }
        self.remaining -= 1;
        Ok(Some((self.current >> self.remaining) & 1))
    }

    /// Reads the next bit, failing with [`Error::EndOfStream`] past the end.
    pub fn read_strict(&mut self) -> Result<u8> {
        self.read()?.ok_or(Error::EndOfStream)
    }

    /// Reads the next bit, treating the end of the stream as an infinite
    /// run of zero bits.
    pub fn read_or_zero(&mut self) -> Result<u8> {
        Ok(self.read()?.unwrap_or(0))
    }

    /// Returns `true` once the underlying source has reported end of stream.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Consumes the reader, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

fn next_byte<R: Read>(reader: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Writes individual bits to an underlying byte sink.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: W,
    current: u8,
    filled: u8,
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Creates a bit writer over `inner`.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            current: 0,
            filled: 0,
            bytes_written: 0,
        }
    }

    /// Writes one bit, which must be 0 or 1.
    pub fn write(&mut self, bit: u8) -> Result<()> {
        if bit > 1 {
            return Err(Error::InvalidArgument(format!(
                "bit value must be 0 or 1, got {}",
                bit
            )));
        }
        self.current = (self.current << 1) | bit;
        self.filled += 1;
        if self.filled == 8 {
            self.inner.write_all(&[self.current])?;
            self.bytes_written += 1;
            self.current = 0;
            self.filled = 0;
        }
        Ok(())
    }

    /// Number of whole bytes emitted to the sink so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Pads the final byte with zero bits, flushes the sink and returns it.
    pub fn finish(mut self) -> Result<W> {
        while self.filled != 0 {
            self.write(0)?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}
