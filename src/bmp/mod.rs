//! Windows and OS/2 BMP.
//!
//! Decodes uncompressed 1, 4, 8, 16, 24 and 32 bit images, bottom-up or
//! top-down, with default or bit-field channel masks. RLE and embedded
//! JPEG/PNG payloads are rejected. BMP has no transparency, so decoded
//! rasters are opaque.

mod decode;
mod encode;
mod utils;

pub use utils::{bit_width, trailing_zero_count};

use alloc::vec::Vec;

use crate::error::RasterError;
use crate::info::{ImageFormat, ImageInfo};
use crate::limits::Limits;
use crate::raster::Raster;
use crate::stream::{SeekFrom, Stream, rewind_on_error};

/// Whether `prefix` starts with the BMP magic.
pub(crate) fn sniff(prefix: &[u8]) -> bool {
    prefix.starts_with(b"BM")
}

/// Decode a BMP starting at the current stream position.
///
/// On any error the stream is rewound to where decoding began;
/// [`RasterError::UnrecognizedFormat`] means the data is not a BMP at all.
pub fn decode(stream: &mut dyn Stream, limits: Option<&Limits>) -> Result<Raster<'static>, RasterError> {
    rewind_on_error(stream, |stream, start| {
        decode::decode_bmp(stream, start, limits)
    })
}

/// Read the BMP headers without decoding pixels. The stream position is
/// always restored.
pub fn probe(stream: &mut dyn Stream) -> Result<ImageInfo, RasterError> {
    let start = stream.tell();
    let header = decode::read_header(stream);
    stream.seek(SeekFrom::Start(start))?;
    let header = header?;
    Ok(ImageInfo {
        width: header.width,
        height: header.height,
        format: ImageFormat::Bmp,
        transparent: false,
    })
}

/// Encode a raster as an uncompressed 24-bit BMP.
pub fn encode(raster: &Raster<'_>) -> Result<Vec<u8>, RasterError> {
    encode::encode_bmp(raster)
}
