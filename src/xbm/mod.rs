//! X11 bitmaps (XBM), including the older X10 `short` variant.
//!
//! XBM is monochrome: set bits take the caller's foreground color and clear
//! bits are [`Color::NONE`]. Decoded rasters are always transparent with
//! `Color::NONE` as the color key, so they work as stencils when blitted.

mod decode;

pub use decode::XbmHeader;

use crate::color::Color;
use crate::error::RasterError;
use crate::info::{ImageFormat, ImageInfo};
use crate::limits::Limits;
use crate::raster::{Raster, check_dimensions};
use crate::stream::{SeekFrom, Stream, rewind_on_error};

pub(crate) fn sniff(prefix: &[u8]) -> bool {
    prefix.starts_with(b"#define")
}

/// Decode an XBM starting at the current stream position.
///
/// On any error the stream is rewound to where decoding began.
pub fn decode(
    stream: &mut dyn Stream,
    foreground: Color,
    limits: Option<&Limits>,
) -> Result<Raster<'static>, RasterError> {
    rewind_on_error(stream, |stream, start| {
        decode::decode_xbm(stream, start, foreground, limits)
    })
}

/// Read the `#define` header, including the hotspot. The stream position is
/// always restored.
pub fn header(stream: &mut dyn Stream) -> Result<XbmHeader, RasterError> {
    let start = stream.tell();
    let header = decode::read_header(stream);
    stream.seek(SeekFrom::Start(start))?;
    header
}

/// Read the header without decoding pixels. The stream position is always
/// restored.
pub fn probe(stream: &mut dyn Stream) -> Result<ImageInfo, RasterError> {
    let header = header(stream)?;
    Ok(ImageInfo {
        width: header.width,
        height: header.height,
        format: ImageFormat::Xbm,
        transparent: true,
    })
}

/// Build a raster from compiled-in X11 bitmap bytes (`foo_bits[]`), rows
/// padded to whole bytes.
pub fn from_bits(
    bits: &[u8],
    width: u32,
    height: u32,
    foreground: Color,
) -> Result<Raster<'static>, RasterError> {
    check_dimensions(width, height)?;
    let row_bytes = (width as usize).div_ceil(8);
    let needed = row_bytes * height as usize;
    if bits.len() < needed {
        return Err(RasterError::BufferTooSmall {
            needed,
            actual: bits.len(),
        });
    }
    decode::build_raster(&bits[..needed], width, height, row_bytes, foreground)
}
