//! Validating decorator for frequency tables.

use super::{FrequencyTable, FrequencyTableMut};
use crate::{Error, Result};

/// Wraps another table and re-verifies every answer it gives.
///
/// Each query re-derives `low`, `high` and `total` from the inner table and
/// fails with [`Error::InvariantViolation`] if `0 <= low <= high <= total`
/// does not hold, or if the inner table accepted an out-of-range symbol.
/// This doubles the work of every query; the coder only applies it in builds
/// with debug assertions enabled.
#[derive(Debug, Clone)]
pub struct CheckedFrequencyTable<T> {
    inner: T,
}

impl<T: FrequencyTable> CheckedFrequencyTable<T> {
    /// Wraps `inner`.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Returns the wrapped table.
    pub fn into_inner(self) -> T {
        self.inner
    }

    fn in_range(&self, symbol: usize) -> bool {
        symbol < self.inner.symbol_limit()
    }

    fn checked_bounds(&self, symbol: usize) -> Result<(u32, u32)> {
        if !self.in_range(symbol) {
            // The inner table must reject the symbol itself.
            self.inner.low(symbol)?;
            return Err(Error::InvariantViolation(format!(
                "out-of-range symbol {} was accepted",
                symbol
            )));
        }
        let low = self.inner.low(symbol)?;
        let high = self.inner.high(symbol)?;
        let total = self.inner.total();
        if low > high || high > total {
            return Err(Error::InvariantViolation(format!(
                "symbol {} has cumulative range [{}, {}) outside total {}",
                symbol, low, high, total
            )));
        }
        Ok((low, high))
    }
}

impl<T: FrequencyTable> FrequencyTable for CheckedFrequencyTable<T> {
    fn symbol_limit(&self) -> usize {
        // An empty alphabet is reported by `get`.
        self.inner.symbol_limit()
    }

    fn get(&self, symbol: usize) -> Result<u32> {
        if self.inner.symbol_limit() == 0 {
            return Err(Error::InvariantViolation("table has no symbols".into()));
        }
        let freq = self.inner.get(symbol)?;
        if !self.in_range(symbol) {
            return Err(Error::InvariantViolation(format!(
                "out-of-range symbol {} was accepted",
                symbol
            )));
        }
        let (low, high) = self.checked_bounds(symbol)?;
        if high - low != freq {
            return Err(Error::InvariantViolation(format!(
                "symbol {} has frequency {} but cumulative width {}",
                symbol,
                freq,
                high - low
            )));
        }
        Ok(freq)
    }

    fn total(&self) -> u32 {
        self.inner.total()
    }

    fn low(&self, symbol: usize) -> Result<u32> {
        Ok(self.checked_bounds(symbol)?.0)
    }

    fn high(&self, symbol: usize) -> Result<u32> {
        Ok(self.checked_bounds(symbol)?.1)
    }
}

impl<T: FrequencyTableMut> FrequencyTableMut for CheckedFrequencyTable<T> {
    fn set(&mut self, symbol: usize, freq: u32) -> Result<()> {
        self.inner.set(symbol, freq)?;
        if !self.in_range(symbol) {
            return Err(Error::InvariantViolation(format!(
                "set accepted out-of-range symbol {}",
                symbol
            )));
        }
        Ok(())
    }

    fn increment(&mut self, symbol: usize) -> Result<()> {
        self.inner.increment(symbol)?;
        if !self.in_range(symbol) {
            return Err(Error::InvariantViolation(format!(
                "increment accepted out-of-range symbol {}",
                symbol
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::{FlatFrequencyTable, SimpleFrequencyTable};

    /// Reports a high below its low for every symbol.
    struct Broken;

    impl FrequencyTable for Broken {
        fn symbol_limit(&self) -> usize {
            2
        }
        fn get(&self, _symbol: usize) -> Result<u32> {
            Ok(1)
        }
        fn total(&self) -> u32 {
            2
        }
        fn low(&self, _symbol: usize) -> Result<u32> {
            Ok(1)
        }
        fn high(&self, _symbol: usize) -> Result<u32> {
            Ok(0)
        }
    }

    /// Accepts any symbol.
    struct Lenient;

    impl FrequencyTable for Lenient {
        fn symbol_limit(&self) -> usize {
            1
        }
        fn get(&self, _symbol: usize) -> Result<u32> {
            Ok(1)
        }
        fn total(&self) -> u32 {
            1
        }
        fn low(&self, _symbol: usize) -> Result<u32> {
            Ok(0)
        }
        fn high(&self, _symbol: usize) -> Result<u32> {
            Ok(1)
        }
    }

    #[test]
    fn test_checked_passes_through_valid_tables() {
        let table = CheckedFrequencyTable::new(SimpleFrequencyTable::new(&[2, 0, 3]).unwrap());
        assert_eq!(table.total(), 5);
        assert_eq!(table.get(2).unwrap(), 3);
        assert_eq!(table.low(2).unwrap(), 2);
        assert_eq!(table.high(1).unwrap(), 2);

        let flat = CheckedFrequencyTable::new(FlatFrequencyTable::new(3).unwrap());
        assert_eq!(flat.high(2).unwrap(), 3);
    }

    #[test]
    fn test_checked_propagates_argument_errors() {
        let table = CheckedFrequencyTable::new(FlatFrequencyTable::new(3).unwrap());
        assert!(matches!(table.low(3), Err(Error::InvalidArgument(_))));
        assert!(matches!(table.get(7), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_checked_detects_inverted_range() {
        let table = CheckedFrequencyTable::new(Broken);
        assert!(matches!(table.low(0), Err(Error::InvariantViolation(_))));
        assert!(matches!(table.get(1), Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn test_checked_detects_accepted_out_of_range_symbol() {
        let table = CheckedFrequencyTable::new(Lenient);
        assert!(matches!(table.high(4), Err(Error::InvariantViolation(_))));
        assert!(matches!(table.get(4), Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn test_checked_mutation() {
        let mut table = CheckedFrequencyTable::new(SimpleFrequencyTable::zeroed(2).unwrap());
        table.increment(1).unwrap();
        table.set(0, 4).unwrap();
        assert_eq!(table.total(), 5);
        assert!(matches!(table.increment(2), Err(Error::InvalidArgument(_))));
        assert_eq!(table.into_inner().total(), 5);
    }
}
