//! BMP encoder: uncompressed 24-bit, bottom-up.

use alloc::vec::Vec;

use crate::error::RasterError;
use crate::raster::Raster;

const HEADER_SIZE: usize = 54;

/// Encode a raster as a 24-bit BMP.
///
/// BMP has no transparency: color-keyed pixels are written with their RGB
/// bits, so [`Color::NONE`](crate::Color::NONE) comes out black.
pub(crate) fn encode_bmp(raster: &Raster<'_>) -> Result<Vec<u8>, RasterError> {
    let (width, height) = (raster.width(), raster.height());
    let w = width as usize;
    let h = height as usize;

    let row_stride = w
        .checked_mul(3)
        .and_then(|r| r.checked_add(3))
        .map(|r| r & !3)
        .ok_or(RasterError::DimensionsTooLarge { width, height })?;
    let pixel_data_size = row_stride
        .checked_mul(h)
        .ok_or(RasterError::DimensionsTooLarge { width, height })?;
    let file_size = pixel_data_size
        .checked_add(HEADER_SIZE)
        .ok_or(RasterError::DimensionsTooLarge { width, height })?;

    let mut out = Vec::new();
    out.try_reserve_exact(file_size)
        .map_err(|_| RasterError::OutOfMemory { bytes: file_size })?;
    write_bmp_header(&mut out, file_size, pixel_data_size, width, height);

    let pad_bytes = row_stride - w * 3;
    for row in (0..height).rev() {
        for c in raster.row(row) {
            out.extend_from_slice(&[c.b(), c.g(), c.r()]);
        }
        out.extend(core::iter::repeat_n(0u8, pad_bytes));
    }

    Ok(out)
}

fn write_bmp_header(
    out: &mut Vec<u8>,
    file_size: usize,
    pixel_data_size: usize,
    width: u32,
    height: u32,
) {
    // File header (14 bytes)
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(file_size as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 4]); // reserved
    out.extend_from_slice(&(HEADER_SIZE as u32).to_le_bytes()); // data offset

    // DIB header (BITMAPINFOHEADER, 40 bytes)
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes()); // positive = bottom-up
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&24u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // compression
    out.extend_from_slice(&(pixel_data_size as u32).to_le_bytes());
    out.extend_from_slice(&2835u32.to_le_bytes()); // h resolution (72 DPI)
    out.extend_from_slice(&2835u32.to_le_bytes()); // v resolution
    out.extend_from_slice(&0u32.to_le_bytes()); // colors used
    out.extend_from_slice(&0u32.to_le_bytes()); // important colors
}
