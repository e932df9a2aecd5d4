//! XBM text parsing.
//!
//! Not a C preprocessor: the header is scanned for `_width`, `_height`
//! and the optional hotspot tokens, then the first brace-delimited list of
//! integer literals is read as bitmap data.

use alloc::vec::Vec;

use crate::color::Color;
use crate::error::RasterError;
use crate::limits::Limits;
use crate::raster::{Raster, alloc_pixels, check_dimensions};
use crate::stream::{SeekFrom, Stream};

/// How much text is searched for the `#define` lines.
const HEADER_CHUNK: usize = 1024;

/// Parsed `#define` block of an XBM file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XbmHeader {
    pub width: u32,
    pub height: u32,
    /// `(x, y)` from `_x_hot` / `_y_hot`, when both are defined.
    pub hotspot: Option<(u32, u32)>,
    /// X10 bitmaps store 16-bit `short` words instead of bytes.
    pub x10: bool,
}

impl XbmHeader {
    /// Bytes per row of unpacked bitmap data.
    fn row_bytes(&self) -> usize {
        if self.x10 {
            (self.width as usize).div_ceil(16) * 2
        } else {
            (self.width as usize).div_ceil(8)
        }
    }
}

/// Parse the header from the current position. The stream is left wherever
/// the header chunk ended.
pub(crate) fn read_header(stream: &mut dyn Stream) -> Result<XbmHeader, RasterError> {
    let mut chunk = [0u8; HEADER_CHUNK];
    let n = stream.read_up_to(&mut chunk)?;
    let text = &chunk[..n];
    if !text.starts_with(b"#define") {
        return Err(RasterError::UnrecognizedFormat);
    }

    let width = define_value(text, b"_width")
        .ok_or_else(|| RasterError::InvalidHeader("XBM width not defined".into()))?;
    let height = define_value(text, b"_height")
        .ok_or_else(|| RasterError::InvalidHeader("XBM height not defined".into()))?;
    check_dimensions(width, height)?;

    let hotspot = define_value(text, b"_x_hot").zip(define_value(text, b"_y_hot"));
    let x10 = find(text, b" short ").is_some();

    Ok(XbmHeader {
        width,
        height,
        hotspot,
        x10,
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// The decimal number following the first `token` that is followed by one.
fn define_value(text: &[u8], token: &[u8]) -> Option<u32> {
    let mut rest = text;
    while let Some(at) = find(rest, token) {
        rest = &rest[at + token.len()..];
        let digits_at = rest
            .iter()
            .position(|b| !matches!(b, b' ' | b'\t'))
            .unwrap_or(rest.len());
        let digits = &rest[digits_at..];
        let len = digits.iter().take_while(|b| b.is_ascii_digit()).count();
        // `_width` inside a longer identifier (`foo_widthx 3`) is not the define
        if digits_at == 0 || len == 0 {
            continue;
        }
        let mut value: u32 = 0;
        for &d in &digits[..len] {
            value = value.checked_mul(10)?.checked_add(u32::from(d - b'0'))?;
        }
        return Some(value);
    }
    None
}

/// Read the bitmap array, starting the search for `{` at `start`.
pub(crate) fn read_bits(
    stream: &mut dyn Stream,
    start: u64,
    header: &XbmHeader,
) -> Result<Vec<u8>, RasterError> {
    stream.seek(SeekFrom::Start(start))?;
    loop {
        match stream.next_byte()? {
            Some(b'{') => break,
            Some(_) => {}
            None => return Err(RasterError::InvalidData("XBM data has no '{'".into())),
        }
    }

    let expected = header.row_bytes() * header.height as usize;
    let max_value: u32 = if header.x10 { 0xFFFF } else { 0xFF };
    let mut bits = Vec::new();
    bits.try_reserve_exact(expected)
        .map_err(|_| RasterError::OutOfMemory { bytes: expected })?;
    let mut extra = 0usize;
    let mut token = Vec::new();

    let mut pending = stream.next_byte()?;
    loop {
        let Some(b) = pending else {
            return Err(RasterError::InvalidData("XBM data has no closing '}'".into()));
        };
        match b {
            b'}' => break,
            b' ' | b'\t' | b'\r' | b'\n' | b',' => pending = stream.next_byte()?,
            b'/' => {
                skip_comment(stream)?;
                pending = stream.next_byte()?;
            }
            b'0'..=b'9' => {
                token.clear();
                pending = Some(b);
                while let Some(c) = pending.filter(u8::is_ascii_alphanumeric) {
                    if token.len() > 16 {
                        return Err(RasterError::InvalidData("XBM literal too long".into()));
                    }
                    token.push(c);
                    pending = stream.next_byte()?;
                }
                let value = parse_literal(&token)
                    .filter(|&v| v <= max_value)
                    .ok_or_else(|| {
                        RasterError::InvalidData(alloc::format!(
                            "bad XBM value {:?}",
                            alloc::string::String::from_utf8_lossy(&token)
                        ))
                    })?;
                if bits.len() >= expected {
                    extra += 1;
                } else if header.x10 {
                    bits.extend_from_slice(&(value as u16).to_le_bytes());
                } else {
                    bits.push(value as u8);
                }
            }
            other => {
                return Err(RasterError::InvalidData(alloc::format!(
                    "unexpected byte 0x{other:02x} in XBM data"
                )));
            }
        }
    }

    if bits.len() < expected {
        return Err(RasterError::InvalidData(alloc::format!(
            "XBM data has {} bytes, expected {expected}",
            bits.len()
        )));
    }
    if extra > 0 {
        log::debug!("ignoring {extra} trailing XBM values");
    }
    Ok(bits)
}

/// Skip a `/* */` or `//` comment whose leading `/` was already read.
fn skip_comment(stream: &mut dyn Stream) -> Result<(), RasterError> {
    match stream.next_byte()? {
        Some(b'*') => {
            let mut star = false;
            loop {
                match stream.next_byte()? {
                    Some(b'/') if star => return Ok(()),
                    Some(b) => star = b == b'*',
                    None => return Err(RasterError::InvalidData("unterminated XBM comment".into())),
                }
            }
        }
        Some(b'/') => {
            while !matches!(stream.next_byte()?, Some(b'\n') | None) {}
            Ok(())
        }
        _ => Err(RasterError::InvalidData("stray '/' in XBM data".into())),
    }
}

/// Parse a C integer literal: `0x` hex, leading-zero octal, or decimal.
fn parse_literal(token: &[u8]) -> Option<u32> {
    let (digits, radix) = match token {
        [b'0', b'x' | b'X', rest @ ..] => (rest, 16),
        [b'0', rest @ ..] if !rest.is_empty() => (rest, 8),
        _ => (token, 10),
    };
    if digits.is_empty() {
        return None;
    }
    let text = core::str::from_utf8(digits).ok()?;
    u32::from_str_radix(text, radix).ok()
}

/// Turn unpacked bitmap rows into a color-keyed raster.
///
/// Bits are least significant first; set bits become `foreground` and the
/// rest [`Color::NONE`], which is also the color key.
pub(crate) fn build_raster(
    bits: &[u8],
    width: u32,
    height: u32,
    row_bytes: usize,
    foreground: Color,
) -> Result<Raster<'static>, RasterError> {
    let w = width as usize;
    let mut pixels = alloc_pixels(w * height as usize, Color::NONE)?;
    for (out, row) in pixels.chunks_exact_mut(w).zip(bits.chunks(row_bytes)) {
        for (x, px) in out.iter_mut().enumerate() {
            let byte = row.get(x / 8).copied().unwrap_or(0);
            if (byte >> (x % 8)) & 1 == 1 {
                *px = foreground;
            }
        }
    }
    Ok(Raster::from_vec(pixels, width, height).with_color_key(Color::NONE))
}

pub(crate) fn decode_xbm(
    stream: &mut dyn Stream,
    start: u64,
    foreground: Color,
    limits: Option<&Limits>,
) -> Result<Raster<'static>, RasterError> {
    let header = read_header(stream)?;
    if let Some(limits) = limits {
        limits.check(header.width, header.height)?;
    }
    let bits = read_bits(stream, start, &header)?;
    log::trace!(
        "decoded {}x{} XBM{}",
        header.width,
        header.height,
        if header.x10 { " (X10)" } else { "" }
    );
    build_raster(&bits, header.width, header.height, header.row_bytes(), foreground)
}
