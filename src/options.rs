//! Options shared by compression and decompression.
//!
//! Nothing in this struct is written to the compressed stream. The producer
//! and the consumer must agree on the same values out of band; a mismatch
//! does not produce a clean error but garbage output or an
//! [`Error::InvariantViolation`](crate::Error::InvariantViolation).

use crate::coder::{DEFAULT_STATE_BITS, MAX_STATE_BITS, Precision};
use crate::{Error, Result};

/// Size of the byte alphabet plus the end-of-stream marker.
pub const SYMBOL_LIMIT: usize = 257;

/// Symbol reserved for escaping to a lower order.
pub const ESCAPE_SYMBOL: usize = 256;

/// Symbol terminating a stream. Shares its value with [`ESCAPE_SYMBOL`]: it
/// can only be coded by escaping to the order −1 table.
pub const END_OF_STREAM: usize = 256;

/// Default model order.
pub const DEFAULT_ORDER: i32 = 3;

/// Highest supported model order.
pub const MAX_ORDER: i32 = 16;

/// Options for a compression or decompression session.
///
/// # Example
///
/// ```rust
/// use ppmz::PpmOptions;
///
/// let options = PpmOptions::new().order(2)?.output_limit(1 << 20);
/// assert_eq!(options.order, 2);
///
/// // Out-of-range values are rejected, never clamped.
/// assert!(PpmOptions::new().order(-2).is_err());
/// # Ok::<(), ppmz::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PpmOptions {
    /// Model order (-1 to 16, default 3).
    pub order: i32,
    /// Width of the range coder state in bits (default 32).
    pub state_bits: u32,
    /// Maximum number of bytes decompression may produce.
    pub output_limit: Option<u64>,
}

impl Default for PpmOptions {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            state_bits: DEFAULT_STATE_BITS,
            output_limit: None,
        }
    }
}

impl PpmOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model order.
    ///
    /// Order −1 codes every byte with a flat distribution; order `n` conditions
    /// on up to `n` preceding bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] unless `-1 <= order <= 16`.
    pub fn order(mut self, order: i32) -> Result<Self> {
        check_order(order)?;
        self.order = order;
        Ok(self)
    }

    /// Sets the width of the range coder state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the width is outside `1..=32` or
    /// too narrow to code the 257-symbol order −1 table.
    pub fn state_bits(mut self, state_bits: u32) -> Result<Self> {
        check_state_bits(state_bits)?;
        self.state_bits = state_bits;
        Ok(self)
    }

    /// Caps the number of bytes decompression may produce.
    pub fn output_limit(mut self, limit: u64) -> Self {
        self.output_limit = Some(limit);
        self
    }

    /// Re-checks every field; fields are public and may have been set directly.
    pub fn validate(&self) -> Result<()> {
        check_order(self.order)?;
        check_state_bits(self.state_bits)?;
        Ok(())
    }

    /// Coder parameters for these options.
    pub fn precision(&self) -> Result<Precision> {
        check_state_bits(self.state_bits)
    }
}

fn check_order(order: i32) -> Result<()> {
    if !(-1..=MAX_ORDER).contains(&order) {
        return Err(Error::InvalidConfig(format!(
            "model order {} out of range [-1-{}]",
            order, MAX_ORDER
        )));
    }
    Ok(())
}

fn check_state_bits(state_bits: u32) -> Result<Precision> {
    let precision = Precision::new(state_bits)?;
    if precision.maximum_total() < SYMBOL_LIMIT as u64 {
        return Err(Error::InvalidConfig(format!(
            "{} state bits cannot code {} symbols (need at least 10, at most {})",
            state_bits, SYMBOL_LIMIT, MAX_STATE_BITS
        )));
    }
    Ok(precision)
}
