//! The encoder state machine: raw pixels in, a complete QOI byte stream out.

use crate::error::EncodeError;
use crate::header::{Qoi, HEADER_SIZE, PADDING, PADDING_SIZE};
use crate::index::Index;
use crate::ops::{QOI_OP_DIFF, QOI_OP_INDEX, QOI_OP_LUMA, QOI_OP_RGB, QOI_OP_RGBA, QOI_OP_RUN, RUN_MAX};
use crate::pixel::Pixel;

/// Encodes raw pixel bytes (length `width * height * channels`) into a
/// complete QOI byte stream: header, op-codes, padding.
///
/// Fails with [`EncodeError::InvalidArgument`] if `desc` violates one of the
/// data model's invariants or `pixels` doesn't match `desc`'s expected
/// length, and with [`EncodeError::OutOfMemory`] if the worst-case output
/// buffer cannot be allocated.
pub fn encode(pixels: &[u8], desc: &Qoi) -> Result<Vec<u8>, EncodeError> {
    desc.validate_dimensions()
        .map_err(EncodeError::InvalidArgument)?;

    let channels = desc.channels.count();
    if pixels.len() != desc.raw_len() {
        return Err(EncodeError::InvalidArgument(format!(
            "pixel buffer has {} bytes, expected {} for a {}x{} image with {} channels",
            pixels.len(),
            desc.raw_len(),
            desc.width,
            desc.height,
            channels
        )));
    }

    let mut output = Vec::new();
    output
        .try_reserve_exact(encoded_size_limit(desc))
        .map_err(|_| EncodeError::OutOfMemory)?;
    output.resize(encoded_size_limit(desc), 0);

    let mut offset = 0;
    desc.write_header(&mut output, &mut offset);

    let mut previous = Pixel::BASELINE;
    let mut index = Index::new();
    let mut run: u8 = 0;

    let total_pixels = desc.width as usize * desc.height as usize;

    for (pos, chunk) in pixels.chunks_exact(channels).enumerate() {
        let is_last_pixel = pos == total_pixels - 1;

        let cur = match channels {
            4 => Pixel::new(chunk[0], chunk[1], chunk[2], chunk[3]),
            _ => Pixel::new(chunk[0], chunk[1], chunk[2], previous.a),
        };

        if cur == previous {
            run += 1;
            if run == RUN_MAX || is_last_pixel {
                output[offset] = QOI_OP_RUN | (run - 1);
                offset += 1;
                run = 0;
            }
        } else {
            if run > 0 {
                output[offset] = QOI_OP_RUN | (run - 1);
                offset += 1;
                run = 0;
            }

            if index.get(&cur) == cur {
                output[offset] = QOI_OP_INDEX | cur.hash();
                offset += 1;
            } else {
                index.insert(cur);

                if cur.a == previous.a {
                    let (dr, dg, db) = cur.delta(&previous);

                    if (-2..=1).contains(&dr) && (-2..=1).contains(&dg) && (-2..=1).contains(&db) {
                        output[offset] = QOI_OP_DIFF
                            | (((dr + 2) as u8) << 4)
                            | (((dg + 2) as u8) << 2)
                            | ((db + 2) as u8);
                        offset += 1;
                    } else {
                        let dr_dg = dr.wrapping_sub(dg);
                        let db_dg = db.wrapping_sub(dg);

                        if (-32..=31).contains(&dg) && (-8..=7).contains(&dr_dg) && (-8..=7).contains(&db_dg) {
                            output[offset] = QOI_OP_LUMA | ((dg + 32) as u8);
                            output[offset + 1] = (((dr_dg + 8) as u8) << 4) | ((db_dg + 8) as u8);
                            offset += 2;
                        } else {
                            output[offset] = QOI_OP_RGB;
                            output[offset + 1] = cur.r;
                            output[offset + 2] = cur.g;
                            output[offset + 3] = cur.b;
                            offset += 4;
                        }
                    }
                } else {
                    output[offset] = QOI_OP_RGBA;
                    output[offset + 1] = cur.r;
                    output[offset + 2] = cur.g;
                    output[offset + 3] = cur.b;
                    output[offset + 4] = cur.a;
                    offset += 5;
                }
            }
        }

        previous = cur;
    }

    output[offset..offset + PADDING_SIZE].copy_from_slice(&PADDING);
    offset += PADDING_SIZE;

    output.truncate(offset);
    Ok(output)
}

/// Worst-case size of an encoded stream for `desc`: one literal op per pixel
/// plus the header and padding.
#[inline]
pub fn encoded_size_limit(desc: &Qoi) -> usize {
    desc.width as usize * desc.height as usize * (desc.channels.count() + 1) + HEADER_SIZE + PADDING_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::header::{Channels, ColorSpace};

    fn desc(width: u32, height: u32, channels: Channels) -> Qoi {
        Qoi { width, height, channels, colorspace: ColorSpace::Srgb }
    }

    #[test]
    fn single_black_pixel_is_a_run_of_one() {
        let pixels = [0u8, 0, 0];
        let d = desc(1, 1, Channels::Rgb);
        let bytes = encode(&pixels, &d).unwrap();

        assert_eq!(&bytes[0..4], b"qoif");
        assert_eq!(&bytes[4..8], &1u32.to_be_bytes());
        assert_eq!(&bytes[8..12], &1u32.to_be_bytes());
        assert_eq!(bytes[12], 3);
        assert_eq!(bytes[13], 0);
        assert_eq!(bytes[14], 0xc0); // RUN length 1
        assert_eq!(&bytes[15..], &PADDING);
    }

    #[test]
    fn gradient_uses_diff_op() {
        let pixels = [10u8, 10, 10, 255, 11, 11, 11, 255];
        let d = desc(2, 1, Channels::Rgba);
        let bytes = encode(&pixels, &d).unwrap();
        // second pixel: dr=dg=db=1, biased +2 = 3 -> 0b01_11_11_11 = 0x7f
        assert!(bytes.contains(&0x7f));
    }

    #[test]
    fn luma_boundary_falls_back_to_rgb() {
        // dg = 30 is in range, but dr-dg = -20 is not: must be a literal RGB
        // op carrying the exact (110, 130, 145) triple, not a LUMA chunk.
        let pixels = [100u8, 100, 100, 255, 110, 130, 145, 255];
        let d = desc(2, 1, Channels::Rgba);
        let bytes = encode(&pixels, &d).unwrap();
        let needle = [QOI_OP_RGB, 110, 130, 145];
        assert!(bytes.windows(4).any(|w| w == needle));
    }

    #[test]
    fn alpha_change_forces_rgba_literal() {
        let pixels = [0u8, 0, 0, 255, 0, 0, 0, 0];
        let d = desc(2, 1, Channels::Rgba);
        let bytes = encode(&pixels, &d).unwrap();
        assert!(bytes.contains(&QOI_OP_RGBA));
    }

    #[test]
    fn max_run_splits_at_62() {
        // 100 pixels identical to the (0,0,0,255) baseline: the whole run is
        // counted from the first pixel, split into a run of 62 and 38.
        let mut pixels = Vec::new();
        for _ in 0..100 {
            pixels.extend_from_slice(&[0, 0, 0]);
        }
        let d = desc(100, 1, Channels::Rgb);
        let bytes = encode(&pixels, &d).unwrap();

        let ops = &bytes[HEADER_SIZE..bytes.len() - PADDING_SIZE];
        assert_eq!(ops, &[0xfd, 0xe5]);
    }

    #[test]
    fn round_trips_through_decode() {
        let mut pixels = Vec::new();
        for i in 0..16u8 {
            pixels.extend_from_slice(&[i, i.wrapping_mul(3), i.wrapping_add(7)]);
        }
        let d = desc(4, 4, Channels::Rgb);
        let bytes = encode(&pixels, &d).unwrap();
        let (decoded_desc, decoded_pixels) = decode(&bytes, None).unwrap();
        assert_eq!(decoded_desc, d);
        assert_eq!(decoded_pixels, pixels);
    }

    #[test]
    fn rejects_mismatched_pixel_buffer_length() {
        let pixels = [0u8; 5];
        let d = desc(2, 1, Channels::Rgb);
        assert!(matches!(encode(&pixels, &d), Err(EncodeError::InvalidArgument(_))));
    }
}
