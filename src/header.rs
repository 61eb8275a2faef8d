//! The image descriptor and the 14-byte header that carries it on the wire.

use crate::io::{read_u32, read_u8, write_u32, write_u8};

/// Size in bytes of the fixed header prefix.
pub const HEADER_SIZE: usize = 14;

/// Size in bytes of the trailing padding sentinel.
pub const PADDING_SIZE: usize = 8;

/// The 8-byte padding sentinel every encoded stream must end with.
pub const PADDING: [u8; PADDING_SIZE] = [0, 0, 0, 0, 0, 0, 0, 1];

const MAGIC: [u8; 4] = *b"qoif";

/// Upper bound on total pixel count a descriptor may describe (400 million).
pub const PIXELS_MAX: u64 = 400_000_000;

/// Number of color channels per pixel on the wire.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Channels {
    Rgb = 3,
    Rgba = 4,
}

impl Channels {
    #[inline]
    pub const fn count(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for Channels {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(Channels::Rgb),
            4 => Ok(Channels::Rgba),
            other => Err(format!("channels must be 3 or 4, got {other}")),
        }
    }
}

/// Color-space tag carried in the header. The codec itself is color-space
/// agnostic; this byte is round-tripped for callers.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ColorSpace {
    Srgb = 0,
    Linear = 1,
}

impl TryFrom<u8> for ColorSpace {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ColorSpace::Srgb),
            1 => Ok(ColorSpace::Linear),
            other => Err(format!("colorspace must be 0 or 1, got {other}")),
        }
    }
}

/// The tuple identifying an image's geometry and semantics: width, height,
/// channel count, and color space.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Qoi {
    pub width: u32,
    pub height: u32,
    pub channels: Channels,
    pub colorspace: ColorSpace,
}

impl Qoi {
    /// Validates width > 0, height > 0, and the pixel-count bound
    /// `height < 400_000_000 / width`. Channel count and color space are
    /// validated separately, at parse time, since on the wire they arrive
    /// as raw bytes that may not correspond to a valid enum variant at all.
    pub fn validate_dimensions(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("width and height must both be non-zero".to_string());
        }
        if self.height as u64 >= PIXELS_MAX / self.width as u64 {
            return Err(format!(
                "image exceeds the maximum safe pixel count ({PIXELS_MAX})"
            ));
        }
        Ok(())
    }

    /// Total pixel count, `width * height`, as a `u64` to avoid overflow
    /// before [`Qoi::validate_dimensions`] has run.
    #[inline]
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Length in bytes of the raw pixel buffer this descriptor describes.
    #[inline]
    pub fn raw_len(&self) -> usize {
        self.width as usize * self.height as usize * self.channels.count()
    }

    /// Writes the 14-byte header into `buf` at `*offset`, advancing it.
    pub fn write_header(&self, buf: &mut [u8], offset: &mut usize) {
        write_u32(buf, offset, u32::from_be_bytes(MAGIC));
        write_u32(buf, offset, self.width);
        write_u32(buf, offset, self.height);
        write_u8(buf, offset, self.channels as u8);
        write_u8(buf, offset, self.colorspace as u8);
    }

    /// Reads and validates the 14-byte header at the start of `buf`.
    /// Returns the descriptor and the offset just past the header.
    pub fn read_header(buf: &[u8]) -> Result<(Qoi, usize), String> {
        if buf.len() < HEADER_SIZE {
            return Err("buffer shorter than the 14-byte header".to_string());
        }

        let mut offset = 0;
        let magic = read_u32(buf, &mut offset);
        if magic != u32::from_be_bytes(MAGIC) {
            return Err("magic bytes do not match \"qoif\"".to_string());
        }

        let width = read_u32(buf, &mut offset);
        let height = read_u32(buf, &mut offset);
        let channels = Channels::try_from(read_u8(buf, &mut offset))?;
        let colorspace = ColorSpace::try_from(read_u8(buf, &mut offset))?;

        let qoi = Qoi { width, height, channels, colorspace };
        qoi.validate_dimensions()?;

        Ok((qoi, offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Qoi {
        Qoi { width: 4, height: 3, channels: Channels::Rgba, colorspace: ColorSpace::Srgb }
    }

    #[test]
    fn header_round_trips() {
        let qoi = sample();
        let mut buf = [0u8; HEADER_SIZE];
        let mut offset = 0;
        qoi.write_header(&mut buf, &mut offset);
        assert_eq!(offset, HEADER_SIZE);

        let (parsed, read_offset) = Qoi::read_header(&buf).unwrap();
        assert_eq!(parsed, qoi);
        assert_eq!(read_offset, HEADER_SIZE);
    }

    #[test]
    fn header_bytes_match_wire_format() {
        let qoi = sample();
        let mut buf = [0u8; HEADER_SIZE];
        let mut offset = 0;
        qoi.write_header(&mut buf, &mut offset);
        assert_eq!(&buf[0..4], b"qoif");
        assert_eq!(&buf[4..8], &4u32.to_be_bytes());
        assert_eq!(&buf[8..12], &3u32.to_be_bytes());
        assert_eq!(buf[12], 4);
        assert_eq!(buf[13], 0);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(b"xoif");
        assert!(Qoi::read_header(&buf).is_err());
    }

    #[test]
    fn rejects_zero_dimensions() {
        let mut qoi = sample();
        qoi.width = 0;
        assert!(qoi.validate_dimensions().is_err());
    }

    #[test]
    fn rejects_invalid_channels_byte() {
        let mut buf = [0u8; HEADER_SIZE];
        let mut offset = 0;
        sample().write_header(&mut buf, &mut offset);
        buf[12] = 5;
        assert!(Qoi::read_header(&buf).is_err());
    }

    #[test]
    fn rejects_invalid_colorspace_byte() {
        let mut buf = [0u8; HEADER_SIZE];
        let mut offset = 0;
        sample().write_header(&mut buf, &mut offset);
        buf[13] = 2;
        assert!(Qoi::read_header(&buf).is_err());
    }

    #[test]
    fn rejects_pixel_count_overflow() {
        let qoi = Qoi {
            width: 30_000,
            height: 30_000,
            channels: Channels::Rgb,
            colorspace: ColorSpace::Srgb,
        };
        assert!(qoi.validate_dimensions().is_err());
    }
}
