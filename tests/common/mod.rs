//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use ppmz::{PpmOptions, compress_bytes, decompress_bytes};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Model orders every roundtrip test covers.
pub const ORDERS: [i32; 5] = [-1, 0, 1, 2, 3];

/// Default options with the given model order.
pub fn options(order: i32) -> PpmOptions {
    PpmOptions::new()
        .order(order)
        .expect("order should be in range")
}

/// Compresses and decompresses `data`, asserting the result matches.
///
/// Returns the compressed bytes so callers can inspect the size.
pub fn roundtrip(data: &[u8], options: &PpmOptions) -> Vec<u8> {
    let packed = compress_bytes(data, options).expect("compression failed");
    let unpacked = decompress_bytes(&packed, options).expect("decompression failed");
    assert_eq!(
        unpacked.len(),
        data.len(),
        "length mismatch at order {}",
        options.order
    );
    assert!(unpacked == data, "content mismatch at order {}", options.order);
    packed
}

/// Every byte value once, in ascending order.
pub fn all_byte_values() -> Vec<u8> {
    (0..=255u8).collect()
}

/// A few kilobytes of English-like text.
pub fn sample_text() -> Vec<u8> {
    let paragraph = "It was the best of times, it was the worst of times, it was the age \
                     of wisdom, it was the age of foolishness, it was the epoch of belief, \
                     it was the epoch of incredulity, it was the season of Light, it was \
                     the season of Darkness.\n";
    paragraph.repeat(16).into_bytes()
}

/// Reproducible pseudo-random bytes.
pub fn random_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; len];
    rng.fill(data.as_mut_slice());
    data
}
