//! The in-memory pixel grid every decoder produces and every raster
//! operation works on.

use alloc::vec::Vec;

use crate::color::Color;
use crate::error::RasterError;

/// Largest accepted width or height: the signed 16-bit range used by the
/// display layer's coordinates.
pub const MAX_DIMENSION: u32 = i16::MAX as u32;

/// Who owns the pixel memory.
#[derive(Debug)]
enum PixelStore<'a> {
    Owned(Vec<Color>),
    Borrowed(&'a mut [Color]),
}

/// A rectangular grid of [`Color`]s, row-major, top row first.
///
/// A raster either owns its pixels (`Raster<'static>` from [`Raster::new`]
/// and the decoders) or is a view over caller memory
/// ([`Raster::from_buffer`]), which the borrow checker keeps alive for as
/// long as the raster is used.
#[derive(Debug)]
pub struct Raster<'a> {
    width: u32,
    height: u32,
    transparent: bool,
    color_key: Color,
    store: PixelStore<'a>,
}

pub(crate) fn check_dimensions(width: u32, height: u32) -> Result<usize, RasterError> {
    if width == 0 || height == 0 {
        return Err(RasterError::InvalidDimensions { width, height });
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(RasterError::DimensionsTooLarge { width, height });
    }
    // Both factors are below 2^15, so this cannot overflow.
    Ok(width as usize * height as usize)
}

/// Allocate `count` pixels without aborting on allocation failure.
pub(crate) fn alloc_pixels(count: usize, fill: Color) -> Result<Vec<Color>, RasterError> {
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(count)
        .map_err(|_| RasterError::OutOfMemory {
            bytes: count.saturating_mul(core::mem::size_of::<Color>()),
        })?;
    pixels.resize(count, fill);
    Ok(pixels)
}

impl Raster<'static> {
    /// A new owned raster filled with black.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        Self::filled(width, height, Color::BLACK)
    }

    /// A new owned raster filled with `color`.
    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self, RasterError> {
        let count = check_dimensions(width, height)?;
        let pixels = alloc_pixels(count, color)?;
        Ok(Self::from_vec(pixels, width, height))
    }

    /// Wrap an already sized pixel vector. `pixels.len()` must be `width * height`.
    pub(crate) fn from_vec(pixels: Vec<Color>, width: u32, height: u32) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            transparent: false,
            color_key: Color::NONE,
            store: PixelStore::Owned(pixels),
        }
    }
}

impl<'a> Raster<'a> {
    /// A raster viewing caller-owned memory.
    ///
    /// Only the first `width * height` entries of `buffer` are used.
    pub fn from_buffer(buffer: &'a mut [Color], width: u32, height: u32) -> Result<Self, RasterError> {
        let count = check_dimensions(width, height)?;
        if buffer.len() < count {
            return Err(RasterError::BufferTooSmall {
                needed: count,
                actual: buffer.len(),
            });
        }
        Ok(Self {
            width,
            height,
            transparent: false,
            color_key: Color::NONE,
            store: PixelStore::Borrowed(&mut buffer[..count]),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether pixels equal to [`color_key`](Self::color_key) are skipped
    /// when this raster is the source of a blit.
    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    pub fn color_key(&self) -> Color {
        self.color_key
    }

    pub fn set_transparent(&mut self, transparent: bool) {
        self.transparent = transparent;
    }

    /// Set the color key and mark the raster transparent.
    pub fn set_color_key(&mut self, key: Color) {
        self.color_key = key;
        self.transparent = true;
    }

    /// Builder form of [`set_color_key`](Self::set_color_key).
    pub fn with_color_key(mut self, key: Color) -> Self {
        self.set_color_key(key);
        self
    }

    pub fn is_owned(&self) -> bool {
        matches!(self.store, PixelStore::Owned(_))
    }

    pub fn pixels(&self) -> &[Color] {
        match &self.store {
            PixelStore::Owned(v) => v,
            PixelStore::Borrowed(s) => s,
        }
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        match &mut self.store {
            PixelStore::Owned(v) => v,
            PixelStore::Borrowed(s) => s,
        }
    }

    /// One row of pixels. Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[Color] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.pixels()[start..start + w]
    }

    /// One mutable row of pixels. Panics if `y >= height`.
    pub fn row_mut(&mut self, y: u32) -> &mut [Color] {
        let w = self.width as usize;
        let start = y as usize * w;
        &mut self.pixels_mut()[start..start + w]
    }

    /// The pixel at `(x, y)`, or `None` outside the raster.
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        let idx = self.index(x, y)?;
        Some(self.pixels()[idx])
    }

    /// Set the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn put(&mut self, x: i32, y: i32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            self.pixels_mut()[idx] = color;
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(y as usize * self.width as usize + x as usize)
    }

    /// The whole raster as a rectangle at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Detach from borrowed memory, copying the pixels if needed.
    pub fn into_owned(self) -> Result<Raster<'static>, RasterError> {
        let pixels = match self.store {
            PixelStore::Owned(v) => v,
            PixelStore::Borrowed(s) => {
                let mut v = Vec::new();
                v.try_reserve_exact(s.len())
                    .map_err(|_| RasterError::OutOfMemory {
                        bytes: s.len() * core::mem::size_of::<Color>(),
                    })?;
                v.extend_from_slice(s);
                v
            }
        };
        Ok(Raster {
            width: self.width,
            height: self.height,
            transparent: self.transparent,
            color_key: self.color_key,
            store: PixelStore::Owned(pixels),
        })
    }

    /// Zero-copy view as an [`imgref::ImgRef`].
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, Color> {
        imgref::ImgRef::new(self.pixels(), self.width as usize, self.height as usize)
    }

    /// Zero-copy mutable view as an [`imgref::ImgRefMut`].
    #[cfg(feature = "imgref")]
    pub fn as_imgref_mut(&mut self) -> imgref::ImgRefMut<'_, Color> {
        let (w, h) = (self.width as usize, self.height as usize);
        imgref::ImgRefMut::new(self.pixels_mut(), w, h)
    }
}

/// An axis-aligned rectangle in raster coordinates.
///
/// Coordinates may be negative and sizes may extend past a raster; raster
/// operations clip before touching pixels. A non-positive width or height is
/// an empty rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// The overlap of two rectangles; empty if they do not meet.
    pub fn intersect(&self, other: Rect) -> Rect {
        let x0 = i64::from(self.x).max(i64::from(other.x));
        let y0 = i64::from(self.y).max(i64::from(other.y));
        let x1 = (i64::from(self.x) + i64::from(self.width))
            .min(i64::from(other.x) + i64::from(other.width));
        let y1 = (i64::from(self.y) + i64::from(self.height))
            .min(i64::from(other.y) + i64::from(other.height));
        if x1 <= x0 || y1 <= y0 {
            return Rect::default();
        }
        // The overlap lies inside `self`, so every value fits in i32.
        Rect::new(x0 as i32, y0 as i32, (x1 - x0) as i32, (y1 - y0) as i32)
    }
}
