use alloc::string::String;

/// Errors from decoding and raster allocation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RasterError {
    /// The leading bytes do not belong to the format that was tried.
    ///
    /// This is the only recoverable error: the stream has been rewound and a
    /// different decoder may be tried on the same data.
    #[error("unrecognized format magic bytes")]
    UnrecognizedFormat,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("invalid pixel data: {0}")]
    InvalidData(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("seek to {0} is outside the stream")]
    SeekOutOfRange(i128),

    #[error("buffer too small: need {needed} elements, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("out of memory allocating {bytes} bytes")]
    OutOfMemory { bytes: usize },

    #[cfg(feature = "std")]
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl RasterError {
    /// Whether this error only means "not this format".
    ///
    /// Format probing moves on to the next decoder for these and stops at
    /// anything else.
    pub fn is_format_mismatch(&self) -> bool {
        matches!(self, RasterError::UnrecognizedFormat)
    }
}
