//! BMP decoder for uncompressed and bit-field images.
//!
//! Header handling forked from zune-bmp 0.5.2 by Caleb Etemesi
//! (MIT/Apache-2.0/Zlib). Adapted: byte cursor → [`Stream`], output →
//! [`Raster`], RLE removed, OS/2 palettes sized from the bit depth.

use alloc::vec::Vec;

use super::utils::{ChannelMask, expand_indices};
use crate::color::Color;
use crate::error::RasterError;
use crate::limits::Limits;
use crate::raster::{Raster, alloc_pixels, check_dimensions};
use crate::stream::{Endian, SeekFrom, Stream};

const FILE_HEADER_SIZE: u64 = 14;
/// Bit-field masks sit right after a 40-byte info header, which is also
/// where V4/V5 headers keep them.
const MASKS_OFFSET: u64 = FILE_HEADER_SIZE + 40;
const OS2_V1_HEADER_SIZE: u32 = 12;
const OS2_V2_HEADER_SIZE: u32 = 64;

const LE: Endian = Endian::Little;

// ── Compression enum ────────────────────────────────────────────────

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
enum BmpCompression {
    Rgb,
    Bitfields,
}

impl BmpCompression {
    fn from_u32(num: u32, header_size: u32) -> Result<Self, RasterError> {
        match num {
            0 => Ok(Self::Rgb),
            3 if header_size == OS2_V2_HEADER_SIZE => Err(RasterError::UnsupportedVariant(
                "OS/2 Huffman 1D compression".into(),
            )),
            3 => Ok(Self::Bitfields),
            1 | 2 => Err(RasterError::UnsupportedVariant(
                "RLE-compressed BMP".into(),
            )),
            4 | 5 => Err(RasterError::UnsupportedVariant(
                "JPEG/PNG-in-BMP".into(),
            )),
            n => Err(RasterError::UnsupportedVariant(alloc::format!(
                "unknown BMP compression scheme {n}"
            ))),
        }
    }
}

// ── Parsed BMP header info ──────────────────────────────────────────

/// Header fields that decide how the pixel data is laid out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BmpHeader {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u16,
    pub top_down: bool,
    /// Pixel data offset from the start of the `BM` structure.
    data_offset: u32,
    header_size: u32,
    compression: BmpCompression,
    colors_used: u32,
}

impl BmpHeader {
    fn is_os2(&self) -> bool {
        self.header_size == OS2_V1_HEADER_SIZE
    }

    fn row_stride(&self) -> usize {
        (self.width as usize * usize::from(self.bits_per_pixel)).div_ceil(32) * 4
    }
}

/// Read the file and info headers. The stream must sit on the `B` of `BM`.
///
/// A missing magic is `UnrecognizedFormat`; everything after it is a
/// structural error.
pub(crate) fn read_header(stream: &mut dyn Stream) -> Result<BmpHeader, RasterError> {
    let mut magic = [0u8; 2];
    if stream.read_up_to(&mut magic)? < 2 || &magic != b"BM" {
        return Err(RasterError::UnrecognizedFormat);
    }

    let _file_size = stream.read_u32(LE)?;
    stream.skip(4)?; // reserved
    let data_offset = stream.read_u32(LE)?;
    let header_size = stream.read_u32(LE)?;

    if u64::from(header_size) + FILE_HEADER_SIZE > u64::from(data_offset) {
        return Err(RasterError::InvalidHeader(alloc::format!(
            "pixel data offset {data_offset} lies inside the {header_size}-byte header"
        )));
    }

    let (width, height, bpp, compression, colors_used);
    match header_size {
        OS2_V1_HEADER_SIZE => {
            width = i64::from(stream.read_u16(LE)?);
            height = i64::from(stream.read_u16(LE)?);
            let _planes = stream.read_u16(LE)?;
            bpp = stream.read_u16(LE)?;
            compression = BmpCompression::Rgb;
            colors_used = 0;
        }
        16.. => {
            width = i64::from(stream.read_i32(LE)?);
            height = i64::from(stream.read_i32(LE)?);
            let _planes = stream.read_u16(LE)?;
            bpp = stream.read_u16(LE)?;
            compression = if header_size >= 20 {
                BmpCompression::from_u32(stream.read_u32(LE)?, header_size)?
            } else {
                BmpCompression::Rgb
            };
            colors_used = if header_size >= 36 {
                // image size, horizontal and vertical resolution
                stream.skip(12)?;
                stream.read_u32(LE)?
            } else {
                0
            };
        }
        _ => {
            return Err(RasterError::InvalidHeader(alloc::format!(
                "unknown BMP info header size: {header_size}"
            )));
        }
    }

    let top_down = height < 0;
    let (width, height) = match (u32::try_from(width), u32::try_from(height.abs())) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(RasterError::InvalidHeader(alloc::format!(
                "BMP dimensions {width}x{height} out of range"
            )));
        }
    };
    check_dimensions(width, height)?;

    match (bpp, compression) {
        (1 | 4 | 8 | 24, BmpCompression::Rgb) | (16 | 32, _) => {}
        (1 | 4 | 8 | 24, BmpCompression::Bitfields) => {
            return Err(RasterError::UnsupportedVariant(alloc::format!(
                "bit-field masks with {bpp}-bit pixels"
            )));
        }
        _ => {
            return Err(RasterError::UnsupportedVariant(alloc::format!(
                "BMP bit depth {bpp} unsupported"
            )));
        }
    }

    Ok(BmpHeader {
        width,
        height,
        bits_per_pixel: bpp,
        top_down,
        data_offset,
        header_size,
        compression,
        colors_used,
    })
}

// ── Full decode ─────────────────────────────────────────────────────

/// How a decoded row of raw bytes turns into colors.
enum PixelSource {
    Palette(Vec<Color>),
    Masked16([ChannelMask; 3]),
    Bgr24,
    Masked32([ChannelMask; 3]),
}

/// Decode a BMP whose `BM` magic starts at `start`.
pub(crate) fn decode_bmp(
    stream: &mut dyn Stream,
    start: u64,
    limits: Option<&Limits>,
) -> Result<Raster<'static>, RasterError> {
    let header = read_header(stream)?;
    if let Some(limits) = limits {
        limits.check(header.width, header.height)?;
    }

    let source = read_pixel_source(stream, start, &header)?;

    let data_start = start + u64::from(header.data_offset);
    stream.seek(SeekFrom::Start(data_start))?;

    let w = header.width as usize;
    let h = header.height as usize;
    let mut pixels = alloc_pixels(w * h, Color::BLACK)?;

    let stride = header.row_stride();
    let mut row_buf = Vec::new();
    row_buf
        .try_reserve_exact(stride)
        .map_err(|_| RasterError::OutOfMemory { bytes: stride })?;
    row_buf.resize(stride, 0);
    let mut index_buf = Vec::new();
    if matches!(source, PixelSource::Palette(_)) {
        index_buf
            .try_reserve_exact(w)
            .map_err(|_| RasterError::OutOfMemory { bytes: w })?;
        index_buf.resize(w, 0);
    }

    for stored_row in 0..h {
        // Row padding is part of the stride, so it is consumed here.
        stream.read_exact(&mut row_buf)?;
        // Positive heights are stored bottom row first.
        let y = if header.top_down {
            stored_row
        } else {
            h - 1 - stored_row
        };
        let out = &mut pixels[y * w..(y + 1) * w];
        match &source {
            PixelSource::Palette(palette) => {
                expand_indices(header.bits_per_pixel, &row_buf, &mut index_buf);
                for (px, &idx) in out.iter_mut().zip(&index_buf) {
                    *px = *palette.get(usize::from(idx)).ok_or_else(|| {
                        RasterError::InvalidData(alloc::format!(
                            "palette index {idx} out of range (palette has {} entries)",
                            palette.len()
                        ))
                    })?;
                }
            }
            PixelSource::Masked16([r, g, b]) => {
                for (px, raw) in out.iter_mut().zip(row_buf.chunks_exact(2)) {
                    let v = u32::from(u16::from_le_bytes([raw[0], raw[1]]));
                    *px = Color::from_rgb(r.extract(v), g.extract(v), b.extract(v));
                }
            }
            PixelSource::Bgr24 => {
                for (px, raw) in out.iter_mut().zip(row_buf.chunks_exact(3)) {
                    *px = Color::from_rgb(raw[2], raw[1], raw[0]);
                }
            }
            PixelSource::Masked32([r, g, b]) => {
                for (px, raw) in out.iter_mut().zip(row_buf.chunks_exact(4)) {
                    let v = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
                    *px = Color::from_rgb(r.extract(v), g.extract(v), b.extract(v));
                }
            }
        }
    }

    log::trace!(
        "decoded {}x{} {}-bit BMP ({})",
        header.width,
        header.height,
        header.bits_per_pixel,
        if header.top_down { "top-down" } else { "bottom-up" }
    );
    Ok(Raster::from_vec(pixels, header.width, header.height))
}

fn read_pixel_source(
    stream: &mut dyn Stream,
    start: u64,
    header: &BmpHeader,
) -> Result<PixelSource, RasterError> {
    let masks = |stream: &mut dyn Stream, default: [u32; 3]| -> Result<[ChannelMask; 3], RasterError> {
        let [r, g, b] = if header.compression == BmpCompression::Bitfields {
            stream.seek(SeekFrom::Start(start + MASKS_OFFSET))?;
            [
                stream.read_u32(LE)?,
                stream.read_u32(LE)?,
                stream.read_u32(LE)?,
            ]
        } else {
            default
        };
        Ok([ChannelMask::new(r), ChannelMask::new(g), ChannelMask::new(b)])
    };

    Ok(match header.bits_per_pixel {
        1 | 4 | 8 => PixelSource::Palette(read_palette(stream, start, header)?),
        16 => PixelSource::Masked16(masks(stream, [0xF800, 0x07E0, 0x001F])?),
        24 => PixelSource::Bgr24,
        32 => PixelSource::Masked32(masks(stream, [0xFF_0000, 0x00_FF00, 0x00_00FF])?),
        bpp => {
            return Err(RasterError::UnsupportedVariant(alloc::format!(
                "BMP bit depth {bpp} unsupported"
            )));
        }
    })
}

fn read_palette(
    stream: &mut dyn Stream,
    start: u64,
    header: &BmpHeader,
) -> Result<Vec<Color>, RasterError> {
    let max_colors = 1u32 << header.bits_per_pixel;
    let colors = match header.colors_used {
        0 => max_colors,
        n if n > max_colors => {
            return Err(RasterError::InvalidHeader(alloc::format!(
                "BMP palette count ({n}) exceeds max for {}-bit depth ({max_colors})",
                header.bits_per_pixel
            )));
        }
        n => n,
    };
    let entry_size = if header.is_os2() { 3 } else { 4 };

    stream.seek(SeekFrom::Start(
        start + FILE_HEADER_SIZE + u64::from(header.header_size),
    ))?;
    let raw = stream.read_bytes(colors as usize * entry_size)?;

    let mut palette = Vec::new();
    palette
        .try_reserve_exact(colors as usize)
        .map_err(|_| RasterError::OutOfMemory {
            bytes: colors as usize * core::mem::size_of::<Color>(),
        })?;
    palette.extend(
        raw.chunks_exact(entry_size)
            .map(|bgr| Color::from_rgb(bgr[2], bgr[1], bgr[0])),
    );
    Ok(palette)
}
