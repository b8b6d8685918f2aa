#![no_main]
use arithcode::{compress_ppm, decompress_ppm};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<u8>, u8)| {
    let (input, order_seed) = data;
    // Orders -1 through 3, matching what the drivers can be built with.
    let order = i32::from(order_seed % 5) - 1;

    let mut compressed = Vec::new();
    compress_ppm(&input[..], &mut compressed, order).unwrap();

    let mut decompressed = Vec::new();
    decompress_ppm(&compressed[..], &mut decompressed, order).unwrap();

    assert_eq!(input, decompressed);
});
