#![no_main]
use arithcode::{compress_static, decompress_static};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: Vec<u8>| {
    let mut compressed = Vec::new();
    compress_static(&input, &mut compressed).unwrap();

    let mut decompressed = Vec::new();
    decompress_static(&compressed[..], &mut decompressed).unwrap();

    assert_eq!(input, decompressed);
});
