#![no_main]
use libfuzzer_sys::fuzz_target;
use qoif::{decode, encode, Channels, ColorSpace, Qoi};

fuzz_target!(|pixels: &[u8]| {
    if pixels.len() % 3 != 0 || pixels.len() < 3 || pixels.len() / 3 >= 400_000_000 {
        return;
    }
    let desc = Qoi {
        width: (pixels.len() / 3) as u32,
        height: 1,
        channels: Channels::Rgb,
        colorspace: ColorSpace::Linear,
    };
    let bytes = encode(pixels, &desc).unwrap();
    let (_desc, pixels_) = decode(&bytes, None).unwrap();
    assert_eq!(pixels_, pixels);
});
