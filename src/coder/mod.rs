//! Carry-free range coding.
//!
//! This module provides the state machine shared by the [`Encoder`] and the
//! [`Decoder`]. It supports:
//! - Coding one symbol against any [`FrequencyTable`]
//! - Renormalization by shifting out matching top bits
//! - Underflow handling for intervals straddling the midpoint
//!
//! # Range Coding Overview
//!
//! Range coding represents a whole message as a sub-interval of `[0, 1)`,
//! scaled to the integers `[0, 2^state_bits)`. Each symbol narrows the
//! interval `[low, high]` in proportion to its frequency. Whenever the top
//! bit of `low` and `high` agree it can never change again, so it is shifted
//! out (emitted by the encoder, consumed by the decoder). When the interval
//! straddles the midpoint with `low = 01...` and `high = 10...`, the second
//! highest bit is dropped and remembered as pending underflow. Together these
//! keep `high - low + 1` at or above `quarter_range + 2`, which bounds the
//! precision lost per symbol.
//!
//! The encoder and decoder differ only in what they do when a bit is shifted
//! out or an underflow bit is dropped; those two hooks form the
//! [`Renormalize`] trait.

mod decoder;
mod encoder;

pub use decoder::Decoder;
pub use encoder::Encoder;

use crate::frequency::FrequencyTable;
use crate::{Error, Result};

/// Largest supported state width in bits.
///
/// Intermediate products `cumulative * range` are computed in 64 bits, which
/// stays exact up to this width.
pub const MAX_STATE_BITS: u32 = 32;

/// Default state width used by the compression driver.
pub const DEFAULT_STATE_BITS: u32 = 32;

/// Fixed-precision parameters derived from the state width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    state_bits: u32,
    full_range: u64,
    half_range: u64,
    quarter_range: u64,
    minimum_range: u64,
    maximum_total: u64,
    state_mask: u64,
}

impl Precision {
    /// Derives the coding parameters for `low`/`high` registers of
    /// `state_bits` bits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] unless `1 <= state_bits <= 32`.
    pub fn new(state_bits: u32) -> Result<Self> {
        if !(1..=MAX_STATE_BITS).contains(&state_bits) {
            return Err(Error::InvalidConfig(format!(
                "state bits {} out of range [1-{}]",
                state_bits, MAX_STATE_BITS
            )));
        }
        let full_range = 1u64 << state_bits;
        let half_range = full_range >> 1;
        // Zero when state_bits == 1.
        let quarter_range = half_range >> 1;
        let minimum_range = quarter_range + 2;
        Ok(Self {
            state_bits,
            full_range,
            half_range,
            quarter_range,
            minimum_range,
            maximum_total: minimum_range,
            state_mask: full_range - 1,
        })
    }

    /// Width of the `low` and `high` registers.
    pub fn state_bits(&self) -> u32 {
        self.state_bits
    }

    /// `2^state_bits`, the widest possible interval.
    pub fn full_range(&self) -> u64 {
        self.full_range
    }

    /// The top bit of the state, `100...0`.
    pub fn half_range(&self) -> u64 {
        self.half_range
    }

    /// The second highest bit of the state, `010...0`.
    pub fn quarter_range(&self) -> u64 {
        self.quarter_range
    }

    /// Narrowest interval the coder ever holds between symbols.
    pub fn minimum_range(&self) -> u64 {
        self.minimum_range
    }

    /// Largest table total that can be coded without losing symbols.
    pub fn maximum_total(&self) -> u64 {
        self.maximum_total
    }

    /// `state_bits` one bits.
    pub fn state_mask(&self) -> u64 {
        self.state_mask
    }
}

impl Default for Precision {
    fn default() -> Self {
        let full_range = 1u64 << DEFAULT_STATE_BITS;
        let half_range = full_range >> 1;
        let quarter_range = half_range >> 1;
        Self {
            state_bits: DEFAULT_STATE_BITS,
            full_range,
            half_range,
            quarter_range,
            minimum_range: quarter_range + 2,
            maximum_total: quarter_range + 2,
            state_mask: full_range - 1,
        }
    }
}

/// Direction-specific reactions to renormalization.
pub trait Renormalize {
    /// Called once per matching top bit, before it is shifted out of the state.
    fn shift(&mut self, precision: &Precision, bit: u8) -> Result<()>;

    /// Called once per dropped underflow bit.
    fn underflow(&mut self, precision: &Precision) -> Result<()>;
}

/// The `low`/`high` interval shared by both coding directions.
#[derive(Debug, Clone)]
pub struct RangeCoder {
    precision: Precision,
    low: u64,
    high: u64,
}

impl RangeCoder {
    /// Creates a coder spanning the full interval.
    pub fn new(precision: Precision) -> Self {
        Self {
            precision,
            low: 0,
            high: precision.state_mask,
        }
    }

    /// The coding parameters.
    pub fn precision(&self) -> &Precision {
        &self.precision
    }

    /// Low end of the current interval (inclusive).
    pub fn low(&self) -> u64 {
        self.low
    }

    /// High end of the current interval (inclusive).
    pub fn high(&self) -> u64 {
        self.high
    }

    /// Width of the current interval, `high - low + 1`.
    pub fn range(&self) -> u64 {
        self.high - self.low + 1
    }

    /// Narrows the interval to `symbol`'s slice of `table` and renormalizes.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if the table total exceeds
    ///   [`Precision::maximum_total`] or `symbol` has zero frequency
    /// - [`Error::InvariantViolation`] if the interval is already corrupt
    /// - whatever the hooks return
    pub fn update<T, H>(&mut self, table: &T, symbol: usize, hooks: &mut H) -> Result<()>
    where
        T: FrequencyTable + ?Sized,
        H: Renormalize,
    {
        let p = self.precision;
        let (low, high) = (self.low, self.high);
        if low >= high || low & !p.state_mask != 0 || high & !p.state_mask != 0 {
            return Err(Error::InvariantViolation(format!(
                "interval [{:#x}, {:#x}] out of range",
                low, high
            )));
        }
        let range = high - low + 1;
        if !(p.minimum_range..=p.full_range).contains(&range) {
            return Err(Error::InvariantViolation(format!(
                "interval width {:#x} out of range",
                range
            )));
        }

        let total = u64::from(table.total());
        if total > p.maximum_total {
            return Err(Error::InvalidArgument(format!(
                "table total {} exceeds maximum {}",
                total, p.maximum_total
            )));
        }
        let sym_low = u64::from(table.low(symbol)?);
        let sym_high = u64::from(table.high(symbol)?);
        if sym_low == sym_high {
            return Err(Error::InvalidArgument(format!(
                "symbol {} has zero frequency",
                symbol
            )));
        }

        self.low = low + sym_low * range / total;
        self.high = low + sym_high * range / total - 1;

        // Top bits agree: they are final.
        while (self.low ^ self.high) & p.half_range == 0 {
            hooks.shift(&p, (self.low >> (p.state_bits - 1)) as u8)?;
            self.low = (self.low << 1) & p.state_mask;
            self.high = ((self.high << 1) & p.state_mask) | 1;
        }

        // low = 01..., high = 10...: drop the second highest bit.
        while self.low & !self.high & p.quarter_range != 0 {
            hooks.underflow(&p)?;
            self.low = (self.low << 1) ^ p.half_range;
            self.high = ((self.high ^ p.half_range) << 1) | p.half_range | 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::{FlatFrequencyTable, SimpleFrequencyTable};

    #[derive(Default)]
    struct Recorder {
        shifted: Vec<u8>,
        underflows: usize,
    }

    impl Renormalize for Recorder {
        fn shift(&mut self, _precision: &Precision, bit: u8) -> Result<()> {
            self.shifted.push(bit);
            Ok(())
        }

        fn underflow(&mut self, _precision: &Precision) -> Result<()> {
            self.underflows += 1;
            Ok(())
        }
    }

    #[test]
    fn test_precision_constants() {
        let p = Precision::new(32).unwrap();
        assert_eq!(p.full_range(), 1 << 32);
        assert_eq!(p.half_range(), 1 << 31);
        assert_eq!(p.quarter_range(), 1 << 30);
        assert_eq!(p.minimum_range(), (1 << 30) + 2);
        assert_eq!(p.maximum_total(), p.minimum_range());
        assert_eq!(p.state_mask(), 0xFFFF_FFFF);
        assert_eq!(p, Precision::default());
    }

    #[test]
    fn test_precision_single_bit() {
        let p = Precision::new(1).unwrap();
        assert_eq!(p.half_range(), 1);
        assert_eq!(p.quarter_range(), 0);
        assert_eq!(p.minimum_range(), 2);
    }

    #[test]
    fn test_precision_rejects_bad_widths() {
        assert!(matches!(Precision::new(0), Err(Error::InvalidConfig(_))));
        assert!(matches!(Precision::new(33), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_update_shifts_matching_top_bits() {
        let p = Precision::new(8).unwrap();
        let mut coder = RangeCoder::new(p);
        let table = SimpleFrequencyTable::new(&[1, 1, 1, 1]).unwrap();
        let mut rec = Recorder::default();

        // Symbol 0 of 4 selects [0x00, 0x3F]: top two bits are 00.
        coder.update(&table, 0, &mut rec).unwrap();
        assert_eq!(rec.shifted, vec![0, 0]);
        assert_eq!(rec.underflows, 0);
        assert_eq!(coder.low(), 0);
        assert_eq!(coder.high(), 0xFF);
    }

    #[test]
    fn test_update_handles_underflow() {
        let p = Precision::new(8).unwrap();
        let mut coder = RangeCoder::new(p);
        // Middle symbol spans [0x40, 0xBF], straddling the midpoint.
        let table = SimpleFrequencyTable::new(&[1, 2, 1]).unwrap();
        let mut rec = Recorder::default();

        coder.update(&table, 1, &mut rec).unwrap();
        assert!(rec.shifted.is_empty());
        assert_eq!(rec.underflows, 1);
        assert_eq!(coder.low(), 0x00);
        assert_eq!(coder.high(), 0xFF);
    }

    #[test]
    fn test_update_keeps_minimum_range() {
        let p = Precision::new(16).unwrap();
        let mut coder = RangeCoder::new(p);
        let table = SimpleFrequencyTable::new(&[1, 1000, 3, 7]).unwrap();
        let mut rec = Recorder::default();
        for i in 0..500 {
            coder.update(&table, [0, 1, 2, 3][i % 4], &mut rec).unwrap();
            assert!(coder.range() >= p.minimum_range());
            assert!(coder.range() <= p.full_range());
            assert!(coder.high() <= p.state_mask());
        }
    }

    #[test]
    fn test_update_rejects_zero_width_symbol() {
        let mut coder = RangeCoder::new(Precision::default());
        let table = SimpleFrequencyTable::new(&[0, 1]).unwrap();
        let err = coder.update(&table, 0, &mut Recorder::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        // State untouched.
        assert_eq!(coder.low(), 0);
        assert_eq!(coder.high(), 0xFFFF_FFFF);
    }

    #[test]
    fn test_update_rejects_oversized_total() {
        let p = Precision::new(8).unwrap();
        let mut coder = RangeCoder::new(p);
        // maximum_total for 8 bits is 66.
        let table = FlatFrequencyTable::new(67).unwrap();
        let err = coder.update(&table, 3, &mut Recorder::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let table = FlatFrequencyTable::new(66).unwrap();
        coder.update(&table, 3, &mut Recorder::default()).unwrap();
    }
}
