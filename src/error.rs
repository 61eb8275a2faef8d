use thiserror::Error;

/// Errors that can occur while encoding raw pixels into a QOI byte stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The descriptor or pixel buffer violates one of the invariants in the
    /// data model: zero width/height, a channel count outside `{3, 4}`, a
    /// colorspace byte outside `{0, 1}`, a pixel buffer whose length doesn't
    /// match `width * height * channels`, or a pixel count above the
    /// 400,000,000 pixel bound.
    #[error("invalid encoder argument: {0}")]
    InvalidArgument(String),

    /// The worst-case output buffer could not be allocated.
    #[error("could not allocate output buffer")]
    OutOfMemory,
}

/// Errors that can occur while decoding a QOI byte stream into raw pixels.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The 14-byte header is missing, has the wrong magic, or has fields
    /// that violate the data model's invariants.
    #[error("invalid QOI header: {0}")]
    InvalidHeader(String),

    /// The encoded buffer ends before the header, an in-progress op-code, or
    /// the 8-byte padding sentinel is fully present.
    #[error("encoded buffer is truncated")]
    Truncated,

    /// The decoded pixel buffer could not be allocated.
    #[error("could not allocate output buffer")]
    OutOfMemory,
}
