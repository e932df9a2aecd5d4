//! Format probing: try each decoder in a fixed order until one claims the
//! data.

use crate::color::Color;
use crate::error::RasterError;
use crate::info::ImageFormat;
use crate::limits::Limits;
use crate::raster::Raster;
use crate::stream::{SliceStream, Stream, peek};

/// Bytes looked at before choosing which decoders to try.
const SNIFF_LEN: usize = 16;

type DecodeFn = fn(&mut dyn Stream, &DecodeRequest<'_>) -> Result<Raster<'static>, RasterError>;

pub(crate) struct Decoder {
    pub(crate) format: ImageFormat,
    pub(crate) sniff: fn(&[u8]) -> bool,
    decode: DecodeFn,
}

/// Registered decoders in probing order.
pub(crate) const DECODERS: &[Decoder] = &[
    #[cfg(feature = "bmp")]
    Decoder {
        format: ImageFormat::Bmp,
        sniff: crate::bmp::sniff,
        decode: |stream, req| crate::bmp::decode(stream, req.limits),
    },
    #[cfg(feature = "xpm")]
    Decoder {
        format: ImageFormat::Xpm,
        sniff: crate::xpm::sniff,
        decode: |stream, req| crate::xpm::decode(stream, req.limits),
    },
    #[cfg(feature = "xbm")]
    Decoder {
        format: ImageFormat::Xbm,
        sniff: crate::xbm::sniff,
        decode: |stream, req| crate::xbm::decode(stream, req.foreground, req.limits),
    },
];

/// Decode with format auto-detection.
///
/// ```
/// use zenraster::{Color, DecodeRequest, SliceStream};
///
/// let xbm = b"#define dot_width 1\n#define dot_height 1\nstatic char dot_bits[] = { 0x01 };\n";
/// let raster = DecodeRequest::new()
///     .with_foreground(Color::WHITE)
///     .decode(&mut SliceStream::new(xbm))?;
/// assert_eq!(raster.get(0, 0), Some(Color::WHITE));
/// # Ok::<(), zenraster::RasterError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DecodeRequest<'a> {
    limits: Option<&'a Limits>,
    foreground: Color,
}

impl Default for DecodeRequest<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> DecodeRequest<'a> {
    pub fn new() -> Self {
        Self {
            limits: None,
            foreground: Color::BLACK,
        }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Color for set XBM bits. Defaults to black.
    pub fn with_foreground(mut self, foreground: Color) -> Self {
        self.foreground = foreground;
        self
    }

    /// Try BMP, then XPM, then XBM, starting at the current position.
    ///
    /// A decoder that does not recognize the data leaves the stream where it
    /// was and the next one is tried. Any other error ends probing and is
    /// returned as is. If nothing matches the result is
    /// [`RasterError::UnrecognizedFormat`] with the position unchanged.
    pub fn decode(&self, stream: &mut dyn Stream) -> Result<Raster<'static>, RasterError> {
        let mut prefix = [0u8; SNIFF_LEN];
        let n = peek(stream, &mut prefix)?;
        let prefix = &prefix[..n];

        for decoder in DECODERS.iter().filter(|d| (d.sniff)(prefix)) {
            match (decoder.decode)(stream, self) {
                Err(e) if e.is_format_mismatch() => {
                    log::trace!("{:?} decoder did not recognize the data", decoder.format);
                }
                result => return result,
            }
        }
        Err(RasterError::UnrecognizedFormat)
    }

    /// Decode an in-memory image.
    pub fn decode_bytes(&self, data: &[u8]) -> Result<Raster<'static>, RasterError> {
        self.decode(&mut SliceStream::new(data))
    }
}

/// Decode an in-memory image of any supported format with default settings.
pub fn decode_bytes(data: &[u8]) -> Result<Raster<'static>, RasterError> {
    DecodeRequest::new().decode_bytes(data)
}
