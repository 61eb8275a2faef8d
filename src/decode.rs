//! The decoder state machine: a complete QOI byte stream in, raw pixels out.

use crate::error::DecodeError;
use crate::header::{Qoi, PADDING_SIZE};
use crate::index::Index;
use crate::ops::{QOI_MASK_2, QOI_OP_DIFF, QOI_OP_INDEX, QOI_OP_LUMA, QOI_OP_RGB, QOI_OP_RGBA, QOI_OP_RUN};
use crate::pixel::Pixel;

/// Decodes a complete QOI byte stream, producing the descriptor parsed from
/// its header and a raw pixel buffer.
///
/// `channels` requests the channel count of the *output* buffer: `Some(3)`
/// or `Some(4)` override the header's own channel count (dropping alpha
/// silently if a stored pixel has one but only 3 channels were requested),
/// and `None` uses whatever the header specifies.
///
/// Fails with [`DecodeError::InvalidHeader`] if the header is missing or
/// invalid, and with [`DecodeError::Truncated`] if the buffer runs out
/// mid-op or is shorter than the header plus the 8-byte padding sentinel.
pub fn decode(
    bytes: &[u8],
    channels: Option<u8>,
) -> Result<(Qoi, Vec<u8>), DecodeError> {
    let (desc, header_len) = Qoi::read_header(bytes).map_err(DecodeError::InvalidHeader)?;

    if bytes.len() < header_len + PADDING_SIZE {
        return Err(DecodeError::Truncated);
    }

    let out_channels = match channels {
        Some(0) | None => desc.channels.count(),
        Some(3) => 3,
        Some(4) => 4,
        Some(other) => {
            return Err(DecodeError::InvalidHeader(format!(
                "requested channel count must be 0, 3, or 4, got {other}"
            )))
        }
    };

    let total_pixels = desc.width as usize * desc.height as usize;
    let out_len = total_pixels * out_channels;

    let mut output = Vec::new();
    output
        .try_reserve_exact(out_len)
        .map_err(|_| DecodeError::OutOfMemory)?;
    output.resize(out_len, 0);

    let op_bytes = &bytes[header_len..];
    let stop = op_bytes.len().saturating_sub(PADDING_SIZE);

    let mut index = Index::new();
    let mut px = Pixel::BASELINE;
    let mut run: u32 = 0;
    let mut cursor = 0usize;

    for pos in 0..total_pixels {
        if run > 0 {
            run -= 1;
        } else if cursor >= stop {
            return Err(DecodeError::Truncated);
        } else {
            let b1 = read_byte(op_bytes, &mut cursor)?;
            let mut was_run = false;

            if b1 == QOI_OP_RGB {
                px.r = read_byte(op_bytes, &mut cursor)?;
                px.g = read_byte(op_bytes, &mut cursor)?;
                px.b = read_byte(op_bytes, &mut cursor)?;
            } else if b1 == QOI_OP_RGBA {
                px.r = read_byte(op_bytes, &mut cursor)?;
                px.g = read_byte(op_bytes, &mut cursor)?;
                px.b = read_byte(op_bytes, &mut cursor)?;
                px.a = read_byte(op_bytes, &mut cursor)?;
            } else {
                match b1 & QOI_MASK_2 {
                    QOI_OP_INDEX => {
                        px = index.get_slot(b1 & 0x3f);
                    }
                    QOI_OP_DIFF => {
                        let dr = ((b1 >> 4) & 0x03) as i8 - 2;
                        let dg = ((b1 >> 2) & 0x03) as i8 - 2;
                        let db = (b1 & 0x03) as i8 - 2;
                        px.apply_diff(dr, dg, db);
                    }
                    QOI_OP_LUMA => {
                        let b2 = read_byte(op_bytes, &mut cursor)?;
                        let dg = (b1 & 0x3f) as i8 - 32;
                        let dr = dg - 8 + ((b2 >> 4) & 0x0f) as i8;
                        let db = dg - 8 + (b2 & 0x0f) as i8;
                        px.apply_diff(dr, dg, db);
                    }
                    QOI_OP_RUN => {
                        run = (b1 & 0x3f) as u32;
                        was_run = true;
                    }
                    _ => unreachable!("top two bits exhaust all remaining tags"),
                }
            }

            // Store on every reconstructed non-RUN pixel, including INDEX
            // hits, which re-store the looked-up value: a no-op, but kept
            // on the code path so encoder and decoder stay symmetric.
            if !was_run {
                index.insert(px);
            }
        }

        write_pixel(&mut output, pos, out_channels, px);
    }

    Ok((desc, output))
}

#[inline]
fn read_byte(bytes: &[u8], cursor: &mut usize) -> Result<u8, DecodeError> {
    let b = *bytes.get(*cursor).ok_or(DecodeError::Truncated)?;
    *cursor += 1;
    Ok(b)
}

#[inline]
fn write_pixel(output: &mut [u8], pos: usize, out_channels: usize, px: Pixel) {
    let base = pos * out_channels;
    output[base] = px.r;
    output[base + 1] = px.g;
    output[base + 2] = px.b;
    if out_channels == 4 {
        output[base + 3] = px.a;
    }
}
