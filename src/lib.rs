//! # ppmz
//!
//! Adaptive statistical compression: a Prediction by Partial Matching (PPM)
//! context model driving a carry-free range coder.
//!
//! The compressed format is a bare bit stream with no header. The model
//! order and coder width are agreed out of band through [`PpmOptions`]; the
//! end of the data is coded in-band as a dedicated symbol.
//!
//! ## Quick Start
//!
//! ```rust
//! use ppmz::{PpmOptions, compress_bytes, decompress_bytes};
//!
//! let options = PpmOptions::default(); // order 3, 32-bit coder
//! let packed = compress_bytes(b"to be or not to be, that is the question", &options)?;
//! let unpacked = decompress_bytes(&packed, &options)?;
//! assert_eq!(unpacked, b"to be or not to be, that is the question");
//! # Ok::<(), ppmz::Error>(())
//! ```
//!
//! ## Building Blocks
//!
//! The layers below the driver are public and usable on their own:
//!
//! | Layer | Types |
//! |-------|-------|
//! | Bit I/O | [`BitReader`], [`BitWriter`] |
//! | Frequency tables | [`FlatFrequencyTable`], [`SimpleFrequencyTable`], [`CheckedFrequencyTable`] |
//! | Range coding | [`RangeCoder`], [`Encoder`], [`Decoder`], [`Precision`] |
//! | Context model | [`PpmModel`] |
//!
//! ```rust
//! use ppmz::{Decoder, Encoder, FrequencyTableMut, Precision, SimpleFrequencyTable};
//!
//! // An adaptive order-0 model over a 3-symbol alphabet.
//! let message = [0, 2, 2, 1, 2, 2, 2];
//! let mut table = SimpleFrequencyTable::new(&[1, 1, 1])?;
//! let mut encoder = Encoder::new(Precision::default(), Vec::new());
//! for &s in &message {
//!     encoder.write(&table, s)?;
//!     table.increment(s)?;
//! }
//! let bytes = encoder.finish()?;
//!
//! let mut table = SimpleFrequencyTable::new(&[1, 1, 1])?;
//! let mut decoder = Decoder::new(Precision::default(), bytes.as_slice())?;
//! for &s in &message {
//!     let decoded = decoder.read(&table)?;
//!     assert_eq!(decoded, s);
//!     table.increment(decoded)?;
//! }
//! # Ok::<(), ppmz::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | No | Command-line `ppmz` tool |
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade: session
//! summaries at `debug` level and context creation at `trace` level.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bitio;
pub mod coder;
pub mod error;
pub mod frequency;
pub mod model;
pub mod options;
pub mod ppm;

pub use bitio::{BitReader, BitWriter};
pub use coder::{Decoder, Encoder, Precision, RangeCoder, Renormalize};
pub use error::{Error, Result};
pub use frequency::{
    CheckedFrequencyTable, FlatFrequencyTable, FrequencyTable, FrequencyTableMut,
    SimpleFrequencyTable,
};
pub use model::{Context, ContextId, PpmModel};
pub use options::{END_OF_STREAM, ESCAPE_SYMBOL, MAX_ORDER, PpmOptions, SYMBOL_LIMIT};
pub use ppm::{
    CodingResult, History, compress, compress_bytes, compress_path, decompress,
    decompress_bytes, decompress_path,
};
