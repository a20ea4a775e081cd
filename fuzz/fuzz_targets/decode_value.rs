#![no_main]

use libfuzzer_sys::fuzz_target;

use bindoc::{decode_with, encode_value, DecodeLimits, KeyOrder};

fn fuzz_limits(input_len: usize) -> DecodeLimits {
    let max = input_len.min(1 << 20);
    DecodeLimits {
        max_depth: 64,
        max_total_items: 1 << 16,
        max_array_len: 1 << 12,
        max_object_len: 1 << 12,
        max_bytes_len: max,
        max_text_len: max,
    }
}

fuzz_target!(|data: &[u8]| {
    let limits = fuzz_limits(data.len());

    for order in [KeyOrder::Sorted, KeyOrder::Insertion] {
        if let Ok(v) = decode_with(data, order, limits) {
            // Whatever decodes must re-encode byte-stably. Bytes are compared
            // rather than values so NaN payloads cannot trip the oracle.
            let bytes = encode_value(&v);
            let again = decode_with(&bytes, order, limits).expect("re-decode");
            assert_eq!(encode_value(&again), bytes);
        }
    }
});
