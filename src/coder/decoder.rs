//! Range decoder.

use std::io::Read;

use super::{Precision, RangeCoder, Renormalize};
use crate::bitio::BitReader;
use crate::frequency::{CheckedFrequencyTable, FrequencyTable};
use crate::{Error, Result};

/// Decodes symbols from a range-coded bit stream.
///
/// The decoder mirrors the [`Encoder`](super::Encoder): given the same
/// sequence of tables it reproduces the same symbols. Reads past the end of
/// the input yield zero bits, matching how the encoder terminates a stream.
#[derive(Debug)]
pub struct Decoder<R: Read> {
    coder: RangeCoder,
    source: BitSource<R>,
}

#[derive(Debug)]
struct BitSource<R: Read> {
    input: BitReader<R>,
    // The next state_bits bits of the stream, aligned with low/high.
    code: u64,
}

impl<R: Read> Renormalize for BitSource<R> {
    fn shift(&mut self, precision: &Precision, _bit: u8) -> Result<()> {
        let bit = u64::from(self.input.read_or_zero()?);
        self.code = ((self.code << 1) & precision.state_mask()) | bit;
        Ok(())
    }

    fn underflow(&mut self, precision: &Precision) -> Result<()> {
        let bit = u64::from(self.input.read_or_zero()?);
        self.code = (self.code & precision.half_range())
            | ((self.code << 1) & (precision.state_mask() >> 1))
            | bit;
        Ok(())
    }
}

impl<R: Read> Decoder<R> {
    /// Creates a decoder reading from `input`, priming the code register with
    /// the first `state_bits` bits.
    pub fn new(precision: Precision, input: R) -> Result<Self> {
        let mut input = BitReader::new(input);
        let mut code = 0u64;
        for _ in 0..precision.state_bits() {
            code = (code << 1) | u64::from(input.read_or_zero()?);
        }
        Ok(Self {
            coder: RangeCoder::new(precision),
            source: BitSource { input, code },
        })
    }

    /// The shared coder state.
    pub fn coder(&self) -> &RangeCoder {
        &self.coder
    }

    /// Decodes the next symbol against `table`.
    ///
    /// With debug assertions enabled, the table is verified through a
    /// [`CheckedFrequencyTable`] first.
    pub fn read<T: FrequencyTable + ?Sized>(&mut self, table: &T) -> Result<usize> {
        if cfg!(debug_assertions) {
            self.decode(&CheckedFrequencyTable::new(table))
        } else {
            self.decode(table)
        }
    }

    fn decode<T: FrequencyTable + ?Sized>(&mut self, table: &T) -> Result<usize> {
        let max_total = self.coder.precision().maximum_total();
        let total = u64::from(table.total());
        if total > max_total {
            return Err(Error::InvalidArgument(format!(
                "table total {} exceeds maximum {}",
                total, max_total
            )));
        }
        if total == 0 {
            return Err(Error::InvalidArgument(
                "cannot decode against a table with zero total".into(),
            ));
        }

        let low = self.coder.low();
        let range = self.coder.range();
        let code = self.source.code;
        if code < low || code > self.coder.high() {
            return Err(Error::InvariantViolation(format!(
                "code {:#x} outside interval [{:#x}, {:#x}]",
                code,
                low,
                self.coder.high()
            )));
        }
        let offset = code - low;
        let value = ((offset + 1) * total - 1) / range;
        if value >= total {
            return Err(Error::InvariantViolation(format!(
                "scaled code {} outside total {}",
                value, total
            )));
        }

        // Largest symbol whose low bound does not exceed the scaled code.
        let mut start = 0;
        let mut end = table.symbol_limit();
        while end - start > 1 {
            let middle = (start + end) / 2;
            if u64::from(table.low(middle)?) > value {
                end = middle;
            } else {
                start = middle;
            }
        }
        let symbol = start;

        let sym_low = u64::from(table.low(symbol)?) * range / total;
        let sym_high = u64::from(table.high(symbol)?) * range / total;
        if !(sym_low <= offset && offset < sym_high) {
            return Err(Error::InvariantViolation(format!(
                "decoded symbol {} does not cover code offset {:#x}",
                symbol, offset
            )));
        }

        self.coder.update(table, symbol, &mut self.source)?;
        let code = self.source.code;
        if code < self.coder.low() || code > self.coder.high() {
            return Err(Error::InvariantViolation(format!(
                "code {:#x} left interval [{:#x}, {:#x}]",
                code,
                self.coder.low(),
                self.coder.high()
            )));
        }
        Ok(symbol)
    }

    /// Consumes the decoder, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.source.input.into_inner()
    }
}
