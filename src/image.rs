//! A 2D pixel grid bridging the codec to whole-file load/save. It only
//! marshals between a flat pixel buffer and `(x, y)` coordinates, and
//! between that buffer and a `.qoi` file on disk.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::decode::decode;
use crate::encode::encode;
use crate::error::{DecodeError, EncodeError};
use crate::header::{Channels, ColorSpace, Qoi};
use crate::pixel::Pixel;

/// An in-memory raster image: a flat, row-major pixel buffer plus the
/// descriptor that gives it meaning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub channels: Channels,
    pub colorspace: ColorSpace,
    pixels: Vec<Pixel>,
}

impl Image {
    /// Creates a blank (opaque black) image of the given size.
    pub fn new(width: u32, height: u32, channels: Channels, colorspace: ColorSpace) -> Self {
        let count = width as usize * height as usize;
        Image { width, height, channels, colorspace, pixels: vec![Pixel::BASELINE; count] }
    }

    #[inline]
    fn clamp(&self, x: i64, y: i64) -> (u32, u32) {
        let x = x.clamp(0, self.width as i64 - 1) as u32;
        let y = y.clamp(0, self.height as i64 - 1) as u32;
        (x, y)
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        x as usize + y as usize * self.width as usize
    }

    /// Returns the pixel at `(x, y)`, clamping out-of-range coordinates into
    /// the image's rectangle.
    pub fn get(&self, x: i64, y: i64) -> Pixel {
        let (x, y) = self.clamp(x, y);
        self.pixels[self.offset(x, y)]
    }

    /// Sets the pixel at `(x, y)`, clamping out-of-range coordinates into
    /// the image's rectangle.
    pub fn set(&mut self, x: i64, y: i64, pixel: Pixel) {
        let (x, y) = self.clamp(x, y);
        let offset = self.offset(x, y);
        self.pixels[offset] = pixel;
    }

    /// Builds an `Image` from a flat QOI-decoded pixel buffer.
    fn from_raw(desc: Qoi, raw: &[u8]) -> Self {
        let channels = desc.channels.count();
        let pixels = raw
            .chunks_exact(channels)
            .map(|chunk| match channels {
                4 => Pixel::new(chunk[0], chunk[1], chunk[2], chunk[3]),
                _ => Pixel::new(chunk[0], chunk[1], chunk[2], 255),
            })
            .collect();

        Image { width: desc.width, height: desc.height, channels: desc.channels, colorspace: desc.colorspace, pixels }
    }

    /// Flattens this image's pixels into a raw buffer matching `self.channels`.
    fn to_raw(&self) -> Vec<u8> {
        let channels = self.channels.count();
        let mut raw = Vec::with_capacity(self.pixels.len() * channels);
        for pixel in &self.pixels {
            raw.push(pixel.r);
            raw.push(pixel.g);
            raw.push(pixel.b);
            if channels == 4 {
                raw.push(pixel.a);
            }
        }
        raw
    }

    /// Loads a `.qoi` file, replacing this image's entire pixel buffer and
    /// descriptor with what was decoded. Never appends to a pre-existing
    /// buffer.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let mut file = File::open(path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        let (desc, raw) = decode(&bytes, None)?;
        Ok(Self::from_raw(desc, &raw))
    }

    /// Serializes this image to a `.qoi` file, fully honoring its
    /// descriptor, including the color-space byte.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<usize, SaveError> {
        let desc = Qoi { width: self.width, height: self.height, channels: self.channels, colorspace: self.colorspace };
        let raw = self.to_raw();
        let bytes = encode(&raw, &desc)?;

        let mut file = File::create(path)?;
        file.write_all(&bytes)?;
        Ok(bytes.len())
    }
}

/// Errors from [`Image::load`].
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Errors from [`Image::save`].
#[derive(thiserror::Error, Debug)]
pub enum SaveError {
    #[error("could not write file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}
