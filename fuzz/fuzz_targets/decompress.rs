//! Fuzz target for decompression of arbitrary byte input.
//!
//! Any byte string is a syntactically valid stream, so decoding must either
//! produce output or fail cleanly. The first byte selects the model order.
//!
//! Run with: cargo +nightly fuzz run decompress

#![no_main]

use libfuzzer_sys::fuzz_target;
use ppmz::PpmOptions;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, stream)) = data.split_first() else {
        return;
    };
    let order = i32::from(selector % 6) - 1;
    let Ok(options) = PpmOptions::new().order(order) else {
        return;
    };
    // Garbage can decode to an endless run of symbols.
    let options = options.output_limit(1 << 16);

    let _ = ppmz::decompress_bytes(stream, &options);
});
