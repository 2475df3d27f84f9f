//! Compression and decompression drivers.
//!
//! Each input byte is coded with the PPM model conditioned on the preceding
//! bytes, after which the model is updated and the byte enters the history.
//! The end of the data is signalled in-band by coding [`END_OF_STREAM`]; the
//! stream carries no header or length.
//!
//! # Example
//!
//! ```rust
//! use ppmz::{PpmOptions, compress_bytes, decompress_bytes};
//!
//! let options = PpmOptions::new().order(2)?;
//! let data = b"abracadabra abracadabra abracadabra";
//! let packed = compress_bytes(data, &options)?;
//! assert!(packed.len() < data.len());
//! assert_eq!(decompress_bytes(&packed, &options)?, data);
//! # Ok::<(), ppmz::Error>(())
//! ```

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::coder::{Decoder, Encoder};
use crate::model::PpmModel;
use crate::options::{END_OF_STREAM, ESCAPE_SYMBOL, PpmOptions, SYMBOL_LIMIT};
use crate::{Error, Result};

/// Statistics of a finished compression or decompression session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodingResult {
    /// Bytes of plain data read (compression) or produced (decompression).
    pub uncompressed_size: u64,
    /// Bytes of coded data produced (compression) or read (decompression).
    pub compressed_size: u64,
    /// Number of contexts the model created, root included.
    pub contexts: usize,
}

impl CodingResult {
    /// Returns the compression ratio (compressed / uncompressed).
    pub fn compression_ratio(&self) -> f64 {
        if self.uncompressed_size == 0 {
            1.0
        } else {
            self.compressed_size as f64 / self.uncompressed_size as f64
        }
    }

    /// Returns the space savings as a fraction (0.0-1.0).
    pub fn space_savings(&self) -> f64 {
        1.0 - self.compression_ratio()
    }
}

/// The most recent symbols, newest first, bounded by the model order.
#[derive(Debug, Clone)]
pub struct History {
    symbols: Vec<usize>,
    capacity: usize,
}

impl History {
    /// Creates an empty history holding at most `capacity` symbols.
    pub fn new(capacity: usize) -> Self {
        Self {
            symbols: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepends `symbol`, evicting the oldest symbol when full.
    pub fn push(&mut self, symbol: usize) {
        if self.capacity == 0 {
            return;
        }
        if self.symbols.len() == self.capacity {
            self.symbols.pop();
        }
        self.symbols.insert(0, symbol);
    }

    /// The symbols, most recent first.
    pub fn as_slice(&self) -> &[usize] {
        &self.symbols
    }
}

struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

struct CountingReader<R> {
    inner: R,
    count: u64,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

/// Compresses everything readable from `input` into `output`.
///
/// Both ends are buffered internally.
///
/// # Errors
///
/// Fails on invalid options, I/O errors, or a context whose total outgrows
/// the coder precision (see [`Precision::maximum_total`](crate::Precision::maximum_total)).
pub fn compress<R: Read, W: Write>(
    input: R,
    output: W,
    options: &PpmOptions,
) -> Result<CodingResult> {
    options.validate()?;
    let mut model = PpmModel::new(options.order, SYMBOL_LIMIT, ESCAPE_SYMBOL)?;
    let mut history = History::new(model.max_history());
    let sink = CountingWriter {
        inner: BufWriter::new(output),
        count: 0,
    };
    let mut encoder = Encoder::new(options.precision()?, sink);
    log::debug!(
        "compressing with order {} and {} state bits",
        options.order,
        options.state_bits
    );

    let mut uncompressed_size = 0u64;
    for byte in BufReader::new(input).bytes() {
        let symbol = usize::from(byte?);
        model.encode_symbol(history.as_slice(), symbol, &mut encoder)?;
        model.increment_contexts(history.as_slice(), symbol)?;
        history.push(symbol);
        uncompressed_size += 1;
    }
    model.encode_symbol(history.as_slice(), END_OF_STREAM, &mut encoder)?;
    let sink = encoder.finish()?;

    let result = CodingResult {
        uncompressed_size,
        compressed_size: sink.count,
        contexts: model.context_count(),
    };
    log::debug!(
        "compressed {} bytes to {} bytes using {} contexts",
        result.uncompressed_size,
        result.compressed_size,
        result.contexts
    );
    Ok(result)
}

/// Decompresses a stream produced by [`compress`] with the same options.
///
/// # Errors
///
/// Besides I/O errors, a corrupt stream or mismatched options may surface as
/// [`Error::InvariantViolation`] or [`Error::InvalidArgument`]. Decoding stops
/// with [`Error::ResourceLimitExceeded`] once more than
/// [`PpmOptions::output_limit`] bytes would be written.
pub fn decompress<R: Read, W: Write>(
    input: R,
    output: W,
    options: &PpmOptions,
) -> Result<CodingResult> {
    options.validate()?;
    let mut model = PpmModel::new(options.order, SYMBOL_LIMIT, ESCAPE_SYMBOL)?;
    let mut history = History::new(model.max_history());
    let source = CountingReader {
        inner: BufReader::new(input),
        count: 0,
    };
    let mut decoder = Decoder::new(options.precision()?, source)?;
    let mut output = BufWriter::new(output);
    log::debug!(
        "decompressing with order {} and {} state bits",
        options.order,
        options.state_bits
    );

    let mut uncompressed_size = 0u64;
    loop {
        let symbol = model.decode_symbol(history.as_slice(), &mut decoder)?;
        if symbol == END_OF_STREAM {
            break;
        }
        if let Some(limit) = options.output_limit {
            if uncompressed_size >= limit {
                return Err(Error::ResourceLimitExceeded(format!(
                    "decompressed output exceeds {} bytes",
                    limit
                )));
            }
        }
        // END_OF_STREAM is the only symbol above the byte range.
        output.write_all(&[symbol as u8])?;
        model.increment_contexts(history.as_slice(), symbol)?;
        history.push(symbol);
        uncompressed_size += 1;
    }
    output.flush()?;

    let result = CodingResult {
        uncompressed_size,
        compressed_size: decoder.into_inner().count,
        contexts: model.context_count(),
    };
    log::debug!(
        "decompressed {} bytes from {} bytes",
        result.uncompressed_size,
        result.compressed_size
    );
    Ok(result)
}

/// Compresses an in-memory buffer.
pub fn compress_bytes(data: &[u8], options: &PpmOptions) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    compress(data, &mut out, options)?;
    Ok(out)
}

/// Decompresses an in-memory buffer.
pub fn decompress_bytes(data: &[u8], options: &PpmOptions) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decompress(data, &mut out, options)?;
    Ok(out)
}

/// Compresses the file at `input` into a new file at `output`.
pub fn compress_path(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &PpmOptions,
) -> Result<CodingResult> {
    let reader = File::open(input.as_ref())?;
    let writer = File::create(output.as_ref())?;
    compress(reader, writer, options)
}

/// Decompresses the file at `input` into a new file at `output`.
pub fn decompress_path(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &PpmOptions,
) -> Result<CodingResult> {
    let reader = File::open(input.as_ref())?;
    let writer = File::create(output.as_ref())?;
    decompress(reader, writer, options)
}
