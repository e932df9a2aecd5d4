//! X11 pixmaps (XPM3).
//!
//! Supports 1 to 4 characters per pixel and the `c`, `g`, `g4` and `m`
//! color keys, preferred in that order. A `None` color makes the raster
//! transparent: those pixels hold [`Color::NONE`], which becomes the color
//! key.
//!
//! Color names other than `black` and `white` are not looked up and decode
//! as black; named-color databases belong to the display layer.
//!
//! Unlike BMP and XBM, only a missing `/* XPM */` comment rewinds the
//! stream. Once the comment matched, any later problem is a real decode
//! error and the stream is left where it stopped.

mod decode;
mod palette;

pub use decode::MAX_XPM_DIMENSION;

use crate::error::RasterError;
use crate::info::{ImageFormat, ImageInfo};
use crate::limits::Limits;
use crate::raster::Raster;
use crate::stream::{SeekFrom, Stream};

use decode::{LineSource, SliceLines, StreamLines};

const MAGIC: &[u8; 9] = b"/* XPM */";

pub(crate) fn sniff(prefix: &[u8]) -> bool {
    prefix.starts_with(MAGIC)
}

/// Consume the magic comment, rewinding and failing with
/// `UnrecognizedFormat` if it is not there.
fn expect_magic(stream: &mut dyn Stream) -> Result<(), RasterError> {
    let start = stream.tell();
    let mut magic = [0u8; 9];
    let matched = match stream.read_up_to(&mut magic) {
        Ok(n) => n == magic.len() && &magic == MAGIC,
        Err(e) => {
            stream.seek(SeekFrom::Start(start))?;
            return Err(e);
        }
    };
    if !matched {
        stream.seek(SeekFrom::Start(start))?;
        return Err(RasterError::UnrecognizedFormat);
    }
    Ok(())
}

/// Decode an XPM starting at the current stream position.
pub fn decode(stream: &mut dyn Stream, limits: Option<&Limits>) -> Result<Raster<'static>, RasterError> {
    expect_magic(stream)?;
    decode::decode_lines(&mut StreamLines::new(stream), limits)
}

/// Decode a compiled-in XPM string table (the contents of the
/// `static char *name[]` array, one entry per string).
pub fn from_lines<S: AsRef<str>>(lines: &[S], limits: Option<&Limits>) -> Result<Raster<'static>, RasterError> {
    decode::decode_lines(&mut SliceLines::new(lines), limits)
}

/// Read the values line without decoding pixels. The stream position is
/// always restored.
pub fn probe(stream: &mut dyn Stream) -> Result<ImageInfo, RasterError> {
    let start = stream.tell();
    let header = expect_magic(stream).and_then(|()| {
        let mut lines = StreamLines::new(&mut *stream);
        match lines.next_line()? {
            Some(line) => decode::parse_header(line),
            None => Err(RasterError::InvalidData("XPM has no values line".into())),
        }
    });
    stream.seek(SeekFrom::Start(start))?;
    let header = header?;
    Ok(ImageInfo {
        width: header.width,
        height: header.height,
        format: ImageFormat::Xpm,
        transparent: false,
    })
}
