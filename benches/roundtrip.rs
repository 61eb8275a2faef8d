use criterion::{black_box, criterion_group, criterion_main, Criterion};
use qoif::{decode, encode, Channels, ColorSpace, Qoi};

fn gradient_pixels(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            pixels.push((x * 3 + y) as u8);
            pixels.push((x.wrapping_mul(y + 1)) as u8);
            pixels.push((y * 5).wrapping_sub(x) as u8);
            pixels.push(255);
        }
    }
    pixels
}

fn bench_roundtrip(c: &mut Criterion) {
    let desc = Qoi { width: 256, height: 256, channels: Channels::Rgba, colorspace: ColorSpace::Srgb };
    let pixels = gradient_pixels(desc.width, desc.height);
    let encoded = encode(&pixels, &desc).unwrap();

    c.bench_function("encode 256x256 rgba gradient", |b| {
        b.iter(|| encode(black_box(&pixels), black_box(&desc)).unwrap())
    });

    c.bench_function("decode 256x256 rgba gradient", |b| {
        b.iter(|| decode(black_box(&encoded), None).unwrap())
    });
}

criterion_group!(benches, bench_roundtrip);
criterion_main!(benches);
