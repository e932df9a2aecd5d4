//! XPM3 decoding: string extraction, header, palette and pixel grid.

use alloc::vec::Vec;

use super::palette::{CODE_CHARS, CodeTable, is_code_char, parse_color_line};
use crate::color::Color;
use crate::error::RasterError;
use crate::limits::Limits;
use crate::raster::{Raster, alloc_pixels, check_dimensions};
use crate::stream::Stream;

/// Largest width or height accepted from an XPM header.
pub const MAX_XPM_DIMENSION: u32 = 10_000;
const MAX_CHARS_PER_PIXEL: usize = 4;
/// Longest string literal kept; a pixel row is at most `10000 * 4` bytes.
const MAX_LINE_LEN: usize = 64 * 1024;

/// A source of XPM string-table lines.
pub(crate) trait LineSource {
    /// The next line, or `None` when the table ends.
    fn next_line(&mut self) -> Result<Option<&[u8]>, RasterError>;
}

/// Lines from compiled-in string tables.
pub(crate) struct SliceLines<'a, S> {
    lines: core::slice::Iter<'a, S>,
}

impl<'a, S: AsRef<str>> SliceLines<'a, S> {
    pub(crate) fn new(lines: &'a [S]) -> Self {
        Self { lines: lines.iter() }
    }
}

impl<S: AsRef<str>> LineSource for SliceLines<'_, S> {
    fn next_line(&mut self) -> Result<Option<&[u8]>, RasterError> {
        Ok(self.lines.next().map(|s| s.as_ref().as_bytes()))
    }
}

/// Double-quoted C string literals pulled from a stream, in order.
///
/// Text outside strings is ignored, except that `/* ... */` comments are
/// skipped so quotes inside them do not count. Escapes are kept verbatim.
pub(crate) struct StreamLines<'s> {
    stream: &'s mut dyn Stream,
    buf: Vec<u8>,
}

impl<'s> StreamLines<'s> {
    pub(crate) fn new(stream: &'s mut dyn Stream) -> Self {
        Self {
            stream,
            buf: Vec::new(),
        }
    }

    fn skip_comment(&mut self) -> Result<(), RasterError> {
        let mut star = false;
        loop {
            match self.stream.next_byte()? {
                Some(b'/') if star => return Ok(()),
                Some(b) => star = b == b'*',
                None => return Err(RasterError::InvalidData("unterminated XPM comment".into())),
            }
        }
    }
}

impl LineSource for StreamLines<'_> {
    fn next_line(&mut self) -> Result<Option<&[u8]>, RasterError> {
        // find the opening quote
        let mut slash = false;
        loop {
            match self.stream.next_byte()? {
                None => return Ok(None),
                Some(b'"') => break,
                Some(b'*') if slash => {
                    self.skip_comment()?;
                    slash = false;
                }
                Some(b) => slash = b == b'/',
            }
        }

        self.buf.clear();
        let mut escaped = false;
        loop {
            let b = self
                .stream
                .next_byte()?
                .ok_or_else(|| RasterError::InvalidData("unterminated XPM string".into()))?;
            if b == b'"' && !escaped {
                return Ok(Some(&self.buf));
            }
            escaped = b == b'\\' && !escaped;
            if self.buf.len() >= MAX_LINE_LEN {
                return Err(RasterError::InvalidData("XPM string too long".into()));
            }
            self.buf.push(b);
        }
    }
}

/// The `<width> <height> <ncolors> <cpp>` values line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct XpmHeader {
    pub width: u32,
    pub height: u32,
    pub colors: usize,
    pub chars_per_pixel: usize,
}

pub(crate) fn parse_header(line: &[u8]) -> Result<XpmHeader, RasterError> {
    let invalid = |why: &str| {
        RasterError::InvalidHeader(alloc::format!(
            "XPM values {:?}: {why}",
            alloc::string::String::from_utf8_lossy(line)
        ))
    };
    let text = core::str::from_utf8(line).map_err(|_| invalid("not ASCII"))?;
    let mut fields = text.split_ascii_whitespace().map(str::parse::<i64>);
    let mut next = || match fields.next() {
        Some(Ok(v)) => Ok(v),
        Some(Err(_)) => Err(invalid("not a number")),
        None => Err(invalid("fewer than four values")),
    };
    let (width, height, colors, cpp) = (next()?, next()?, next()?, next()?);

    let max = i64::from(MAX_XPM_DIMENSION);
    if !(1..=max).contains(&width) || !(1..=max).contains(&height) {
        return Err(invalid("dimensions out of range"));
    }
    if !(1..=MAX_CHARS_PER_PIXEL as i64).contains(&cpp) {
        return Err(invalid("chars per pixel must be 1 to 4"));
    }
    // every color needs a distinct printable code
    let max_colors = (CODE_CHARS as i64).pow(cpp as u32);
    if !(1..=max_colors).contains(&colors) {
        return Err(invalid("color count out of range"));
    }

    Ok(XpmHeader {
        width: width as u32,
        height: height as u32,
        colors: colors as usize,
        chars_per_pixel: cpp as usize,
    })
}

fn missing(what: &str, got: usize, expected: usize) -> RasterError {
    RasterError::InvalidData(alloc::format!(
        "XPM ended after {got} of {expected} {what} lines"
    ))
}

/// Decode header, palette and pixels from a line source.
pub(crate) fn decode_lines(
    lines: &mut dyn LineSource,
    limits: Option<&Limits>,
) -> Result<Raster<'static>, RasterError> {
    let header_line = lines.next_line()?.ok_or_else(|| missing("header", 0, 1))?;
    let header = parse_header(header_line)?;
    check_dimensions(header.width, header.height)?;
    if let Some(limits) = limits {
        limits.check(header.width, header.height)?;
    }
    let cpp = header.chars_per_pixel;

    let mut table = CodeTable::new(cpp);
    let mut transparent = false;
    for i in 0..header.colors {
        let line = lines
            .next_line()?
            .ok_or_else(|| missing("color", i, header.colors))?;
        let (code, color) = parse_color_line(line, cpp)?;
        transparent |= color.is_none();
        table.insert(code, color);
    }

    let w = header.width as usize;
    let h = header.height as usize;
    let mut pixels = alloc_pixels(w * h, Color::BLACK)?;
    for (y, out) in pixels.chunks_exact_mut(w).enumerate() {
        let line = lines.next_line()?.ok_or_else(|| missing("pixel", y, h))?;
        if line.len() < w * cpp {
            return Err(RasterError::InvalidData(alloc::format!(
                "XPM row {y} has {} characters, expected {}",
                line.len(),
                w * cpp
            )));
        }
        for (x, (px, code)) in out.iter_mut().zip(line.chunks_exact(cpp)).enumerate() {
            if !code.iter().all(|&b| is_code_char(b)) {
                log::warn!("XPM row {y} has a non-printable code at column {x}, row cut short");
                break;
            }
            *px = table.get(code).ok_or_else(|| {
                RasterError::InvalidData(alloc::format!(
                    "XPM row {y} uses undefined code {:?}",
                    alloc::string::String::from_utf8_lossy(code)
                ))
            })?;
        }
    }

    log::trace!(
        "decoded {}x{} XPM, {} colors, {} chars per pixel",
        header.width,
        header.height,
        header.colors,
        cpp
    );
    let raster = Raster::from_vec(pixels, header.width, header.height);
    Ok(if transparent {
        raster.with_color_key(Color::NONE)
    } else {
        raster
    })
}
