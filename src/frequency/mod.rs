//! Symbol frequency tables.
//!
//! A frequency table maps every symbol of a bounded alphabet `0..symbol_limit`
//! to a non-negative frequency and answers cumulative queries: `low(s)` is the
//! sum of the frequencies of all symbols below `s`, and `high(s)` is
//! `low(s) + get(s)`. The range coder narrows its interval to
//! `[low(s), high(s))` out of `total()`.
//!
//! Three implementations are provided:
//!
//! - [`FlatFrequencyTable`]: every symbol has frequency 1, immutable
//! - [`SimpleFrequencyTable`]: mutable, cumulative sums cached between mutations
//! - [`CheckedFrequencyTable`]: a decorator re-verifying every answer

mod checked;

pub use checked::CheckedFrequencyTable;

use std::cell::OnceCell;

use crate::{Error, Result};

/// Read access to a table of symbol frequencies.
///
/// Implementations must guarantee `0 <= low(s) <= high(s) <= total()` for
/// every in-range symbol, and that `total()` equals `high(symbol_limit() - 1)`.
/// Out-of-range symbols fail with [`Error::InvalidArgument`].
pub trait FrequencyTable {
    /// Number of symbols in the alphabet; always at least 1.
    fn symbol_limit(&self) -> usize;

    /// Frequency of `symbol`.
    fn get(&self, symbol: usize) -> Result<u32>;

    /// Sum of all frequencies.
    fn total(&self) -> u32;

    /// Sum of the frequencies of all symbols strictly below `symbol`.
    fn low(&self, symbol: usize) -> Result<u32>;

    /// Sum of the frequencies of `symbol` and all symbols below it.
    fn high(&self, symbol: usize) -> Result<u32>;
}

/// Mutation of a frequency table.
///
/// A call that fails leaves the table unchanged.
pub trait FrequencyTableMut: FrequencyTable {
    /// Sets the frequency of `symbol`.
    fn set(&mut self, symbol: usize, freq: u32) -> Result<()>;

    /// Adds one to the frequency of `symbol`.
    fn increment(&mut self, symbol: usize) -> Result<()>;
}

impl<T: FrequencyTable + ?Sized> FrequencyTable for &T {
    fn symbol_limit(&self) -> usize {
        (**self).symbol_limit()
    }

    fn get(&self, symbol: usize) -> Result<u32> {
        (**self).get(symbol)
    }

    fn total(&self) -> u32 {
        (**self).total()
    }

    fn low(&self, symbol: usize) -> Result<u32> {
        (**self).low(symbol)
    }

    fn high(&self, symbol: usize) -> Result<u32> {
        (**self).high(symbol)
    }
}

fn symbol_out_of_range(symbol: usize, limit: usize) -> Error {
    Error::InvalidArgument(format!(
        "symbol {} out of range [0-{})",
        symbol, limit
    ))
}

/// An immutable table in which every symbol has frequency 1.
///
/// Used as the order −1 fallback of the PPM model, where it guarantees that
/// every symbol of the alphabet can be coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatFrequencyTable {
    symbols: u32,
}

impl FlatFrequencyTable {
    /// Creates a flat table over `symbols` symbols.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `symbols` is zero or does not fit
    /// in a 32-bit total.
    pub fn new(symbols: usize) -> Result<Self> {
        if symbols == 0 {
            return Err(Error::InvalidConfig(
                "flat table needs at least 1 symbol".into(),
            ));
        }
        let symbols = u32::try_from(symbols).map_err(|_| {
            Error::InvalidConfig(format!("flat table of {} symbols is too large", symbols))
        })?;
        Ok(Self { symbols })
    }

    fn check(&self, symbol: usize) -> Result<u32> {
        if symbol < self.symbols as usize {
            Ok(symbol as u32)
        } else {
            Err(symbol_out_of_range(symbol, self.symbols as usize))
        }
    }
}

impl FrequencyTable for FlatFrequencyTable {
    fn symbol_limit(&self) -> usize {
        self.symbols as usize
    }

    fn get(&self, symbol: usize) -> Result<u32> {
        self.check(symbol)?;
        Ok(1)
    }

    fn total(&self) -> u32 {
        self.symbols
    }

    fn low(&self, symbol: usize) -> Result<u32> {
        self.check(symbol)
    }

    fn high(&self, symbol: usize) -> Result<u32> {
        Ok(self.check(symbol)? + 1)
    }
}

/// A mutable frequency table with a fixed number of symbols.
///
/// Cumulative sums are computed lazily on the first `low`/`high` query and
/// discarded by every mutation.
#[derive(Debug, Clone)]
pub struct SimpleFrequencyTable {
    frequencies: Vec<u32>,
    total: u32,
    cumulative: OnceCell<Box<[u32]>>,
}

impl SimpleFrequencyTable {
    /// Creates a table holding a copy of `frequencies`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `frequencies` is empty or its sum
    /// overflows a 32-bit total.
    pub fn new(frequencies: &[u32]) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(Error::InvalidConfig(
                "frequency table needs at least 1 symbol".into(),
            ));
        }
        let total = frequencies
            .iter()
            .try_fold(0u32, |acc, &f| acc.checked_add(f))
            .ok_or_else(|| Error::InvalidConfig("frequency total overflows".into()))?;
        Ok(Self {
            frequencies: frequencies.to_vec(),
            total,
            cumulative: OnceCell::new(),
        })
    }

    /// Creates a table of `symbols` zero frequencies.
    pub fn zeroed(symbols: usize) -> Result<Self> {
        Self::new(&vec![0; symbols])
    }

    /// Creates a mutable copy of any other table.
    pub fn from_table<T: FrequencyTable + ?Sized>(table: &T) -> Result<Self> {
        let frequencies = (0..table.symbol_limit())
            .map(|s| table.get(s))
            .collect::<Result<Vec<_>>>()?;
        Self::new(&frequencies)
    }

    fn check(&self, symbol: usize) -> Result<()> {
        if symbol < self.frequencies.len() {
            Ok(())
        } else {
            Err(symbol_out_of_range(symbol, self.frequencies.len()))
        }
    }

    fn cumulative(&self) -> &[u32] {
        self.cumulative.get_or_init(|| {
            let mut sums = Vec::with_capacity(self.frequencies.len() + 1);
            let mut sum = 0u32;
            sums.push(sum);
            for &freq in &self.frequencies {
                // Cannot overflow: the running total is kept within u32.
                sum += freq;
                sums.push(sum);
            }
            debug_assert_eq!(sum, self.total);
            sums.into_boxed_slice()
        })
    }
}

impl FrequencyTable for SimpleFrequencyTable {
    fn symbol_limit(&self) -> usize {
        self.frequencies.len()
    }

    fn get(&self, symbol: usize) -> Result<u32> {
        self.check(symbol)?;
        Ok(self.frequencies[symbol])
    }

    fn total(&self) -> u32 {
        self.total
    }

    fn low(&self, symbol: usize) -> Result<u32> {
        self.check(symbol)?;
        Ok(self.cumulative()[symbol])
    }

    fn high(&self, symbol: usize) -> Result<u32> {
        self.check(symbol)?;
        Ok(self.cumulative()[symbol + 1])
    }
}

impl FrequencyTableMut for SimpleFrequencyTable {
    fn set(&mut self, symbol: usize, freq: u32) -> Result<()> {
        self.check(symbol)?;
        let total = (self.total - self.frequencies[symbol])
            .checked_add(freq)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "frequency {} for symbol {} overflows the table total",
                    freq, symbol
                ))
            })?;
        self.total = total;
        self.frequencies[symbol] = freq;
        self.cumulative.take();
        Ok(())
    }

    fn increment(&mut self, symbol: usize) -> Result<()> {
        self.check(symbol)?;
        let total = self.total.checked_add(1).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "incrementing symbol {} overflows the table total",
                symbol
            ))
        })?;
        self.total = total;
        self.frequencies[symbol] += 1;
        self.cumulative.take();
        Ok(())
    }
}
