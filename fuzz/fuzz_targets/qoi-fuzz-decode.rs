#![no_main]
use libfuzzer_sys::fuzz_target;
use qoif::decode;

// Feeds arbitrary bytes straight to the decoder. A conformant decoder never
// panics on malformed input — it returns `Err(DecodeError::...)`.
fuzz_target!(|data: &[u8]| {
    let _ = decode(data, None);
});
