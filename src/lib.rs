//! QOI — the "Quite OK Image" format for fast, lossless image compression.
//!
//! <https://qoiformat.org>
//!
//! A QOI stream has a 14-byte header, followed by any number of data
//! "chunks", and an 8-byte end marker.
//!
//! ```text
//! qoi_header {
//!     magic:      u8[4]  // "qoif"
//!     width:      u32    // image width in pixels (big-endian)
//!     height:     u32    // image height in pixels (big-endian)
//!     channels:   u8     // 3 = RGB, 4 = RGBA
//!     colorspace: u8      // 0 = sRGB with linear alpha, 1 = all channels linear
//! }
//! ```
//!
//! Images are encoded top-to-bottom, left-to-right. Both encoder and decoder
//! start with `{r: 0, g: 0, b: 0, a: 255}` as the previous pixel value. Each
//! pixel is encoded as one of: a run of the previous pixel, an index into a
//! 64-slot table of previously seen pixels, a small delta from the previous
//! pixel, or a full literal pixel. See [`encode`] and [`decode`] for the
//! exact op-code layout.
//!
//! This crate implements the codec only: byte I/O, the op-code state
//! machines, and a thin [`image::Image`] adapter for whole-file load/save.
//! It does not implement a CLI, general image-format conversion, or any
//! form of partial/streaming/multi-threaded decode of a single image.
//!
//! # Examples
//!
//! ```
//! use qoif::{decode, encode, Channels, ColorSpace, Qoi};
//!
//! let pixels = [255u8, 0, 0, 255, 0, 255, 0, 255];
//! let desc = Qoi { width: 2, height: 1, channels: Channels::Rgba, colorspace: ColorSpace::Srgb };
//!
//! let bytes = encode(&pixels, &desc).unwrap();
//! let (decoded_desc, decoded_pixels) = decode(&bytes, None).unwrap();
//!
//! assert_eq!(decoded_desc, desc);
//! assert_eq!(decoded_pixels, pixels);
//! ```

mod decode;
mod encode;
mod error;
mod header;
pub mod image;
mod index;
mod io;
mod ops;
mod pixel;

pub use decode::decode;
pub use encode::{encode, encoded_size_limit};
pub use error::{DecodeError, EncodeError};
pub use header::{Channels, ColorSpace, Qoi, HEADER_SIZE, PADDING, PADDING_SIZE, PIXELS_MAX};
pub use image::Image;
pub use pixel::Pixel;
