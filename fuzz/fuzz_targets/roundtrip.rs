//! Fuzz target checking that compression roundtrips arbitrary input.
//!
//! Run with: cargo +nightly fuzz run roundtrip

#![no_main]

use libfuzzer_sys::fuzz_target;
use ppmz::PpmOptions;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };
    let order = i32::from(selector % 6) - 1;
    let state_bits = 16 + u32::from(selector / 6 % 17);
    let Ok(options) = PpmOptions::new()
        .order(order)
        .and_then(|o| o.state_bits(state_bits))
    else {
        return;
    };

    // Long inputs may legitimately outgrow a narrow coder.
    let Ok(packed) = ppmz::compress_bytes(payload, &options) else {
        return;
    };
    let unpacked = ppmz::decompress_bytes(&packed, &options).expect("own output must decode");
    assert_eq!(unpacked, payload);
});
