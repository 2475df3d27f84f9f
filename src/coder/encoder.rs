//! Range encoder.

use std::io::Write;

use super::{Precision, RangeCoder, Renormalize};
use crate::Result;
use crate::bitio::BitWriter;
use crate::frequency::{CheckedFrequencyTable, FrequencyTable};

/// Encodes symbols into a range-coded bit stream.
///
/// # Example
///
/// ```rust
/// use ppmz::{Decoder, Encoder, FlatFrequencyTable, Precision};
///
/// let table = FlatFrequencyTable::new(4)?;
/// let mut encoder = Encoder::new(Precision::default(), Vec::new());
/// for symbol in [3, 0, 2] {
///     encoder.write(&table, symbol)?;
/// }
/// let bytes = encoder.finish()?;
///
/// let mut decoder = Decoder::new(Precision::default(), bytes.as_slice())?;
/// assert_eq!(decoder.read(&table)?, 3);
/// assert_eq!(decoder.read(&table)?, 0);
/// assert_eq!(decoder.read(&table)?, 2);
/// # Ok::<(), ppmz::Error>(())
/// ```
#[derive(Debug)]
pub struct Encoder<W: Write> {
    coder: RangeCoder,
    sink: BitSink<W>,
}

#[derive(Debug)]
struct BitSink<W: Write> {
    output: BitWriter<W>,
    // Underflow bits awaiting the next shifted bit.
    pending: u64,
}

impl<W: Write> Renormalize for BitSink<W> {
    fn shift(&mut self, _precision: &Precision, bit: u8) -> Result<()> {
        self.output.write(bit)?;
        for _ in 0..self.pending {
            self.output.write(bit ^ 1)?;
        }
        self.pending = 0;
        Ok(())
    }

    fn underflow(&mut self, _precision: &Precision) -> Result<()> {
        self.pending += 1;
        Ok(())
    }
}

impl<W: Write> Encoder<W> {
    /// Creates an encoder writing to `output`.
    pub fn new(precision: Precision, output: W) -> Self {
        Self {
            coder: RangeCoder::new(precision),
            sink: BitSink {
                output: BitWriter::new(output),
                pending: 0,
            },
        }
    }

    /// The shared coder state.
    pub fn coder(&self) -> &RangeCoder {
        &self.coder
    }

    /// Number of whole bytes emitted so far.
    pub fn bytes_written(&self) -> u64 {
        self.sink.output.bytes_written()
    }

    /// Encodes `symbol` against `table`.
    ///
    /// With debug assertions enabled, the table is verified through a
    /// [`CheckedFrequencyTable`] first.
    pub fn write<T: FrequencyTable + ?Sized>(&mut self, table: &T, symbol: usize) -> Result<()> {
        if cfg!(debug_assertions) {
            self.coder
                .update(&CheckedFrequencyTable::new(table), symbol, &mut self.sink)
        } else {
            self.coder.update(table, symbol, &mut self.sink)
        }
    }

    /// Terminates the stream and returns the underlying sink.
    ///
    /// A single 1 bit disambiguates the final interval; the decoder reads
    /// everything after it as zeros. The last byte is then zero-padded.
    pub fn finish(mut self) -> Result<W> {
        self.sink.output.write(1)?;
        self.sink.output.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::frequency::{FlatFrequencyTable, SimpleFrequencyTable};

    #[test]
    fn test_empty_stream_is_one_byte() {
        let encoder = Encoder::new(Precision::default(), Vec::new());
        assert_eq!(encoder.finish().unwrap(), vec![0x80]);
    }

    #[test]
    fn test_certain_symbol_costs_nothing() {
        // A symbol holding the whole total never narrows the interval.
        let table = SimpleFrequencyTable::new(&[0, 5, 0]).unwrap();
        let mut encoder = Encoder::new(Precision::default(), Vec::new());
        for _ in 0..1000 {
            encoder.write(&table, 1).unwrap();
        }
        assert_eq!(encoder.bytes_written(), 0);
        assert_eq!(encoder.finish().unwrap(), vec![0x80]);
    }

    #[test]
    fn test_flat_symbols_cost_their_entropy() {
        let table = FlatFrequencyTable::new(256).unwrap();
        let mut encoder = Encoder::new(Precision::default(), Vec::new());
        for symbol in 0..256 {
            encoder.write(&table, symbol).unwrap();
        }
        let bytes = encoder.finish().unwrap();
        // 256 symbols at 8 bits each, plus termination.
        assert!(bytes.len() >= 256 && bytes.len() <= 262, "{}", bytes.len());
    }

    #[test]
    fn test_write_rejects_zero_frequency() {
        let table = SimpleFrequencyTable::new(&[1, 0]).unwrap();
        let mut encoder = Encoder::new(Precision::default(), Vec::new());
        assert!(matches!(
            encoder.write(&table, 1),
            Err(Error::InvalidArgument(_))
        ));
    }
}
