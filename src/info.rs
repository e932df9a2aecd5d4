/// Image format detected from leading bytes.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// Windows/OS2 bitmap (`BM`).
    Bmp,
    /// X11 bitmap (`#define`).
    Xbm,
    /// X11 pixmap (`/* XPM */`).
    Xpm,
}

impl ImageFormat {
    /// Guess the format from the first bytes of the data, checking in
    /// probing order (BMP, XPM, XBM).
    ///
    /// Only the magic is looked at; a match does not mean the rest of the
    /// data decodes.
    pub fn detect(prefix: &[u8]) -> Option<ImageFormat> {
        crate::probe::DECODERS
            .iter()
            .find(|d| (d.sniff)(prefix))
            .map(|d| d.format)
    }
}

/// Image metadata read from headers, without decoding pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    /// Whether a decoded raster will carry a transparent color key.
    ///
    /// Always true for XBM, false for BMP, and for XPM only known after the
    /// palette is read, so probing reports false.
    pub transparent: bool,
}
