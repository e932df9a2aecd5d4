//! Raster primitives: fills, color-keyed blits, area extraction and the
//! brightness tricks used for 3D widgets.
//!
//! Geometry is never an error here. Every rectangle is clipped against the
//! rasters involved first, and whatever is left (possibly nothing) is drawn.

use crate::color::Color;
use crate::error::RasterError;
use crate::raster::{Raster, Rect, alloc_pixels};

/// Channel delta between a bevel's base color and its light and dark edges.
pub const BEVEL_AMOUNT: u8 = 64;

/// Fill the whole raster.
pub fn fill(raster: &mut Raster<'_>, color: Color) {
    raster.pixels_mut().fill(color);
}

/// Fill `rect`, clipped to the raster.
pub fn fill_rect(raster: &mut Raster<'_>, rect: Rect, color: Color) {
    map_area(raster, rect, |_| color);
}

/// Subtract `amount` from every channel of the pixels in `rect`.
pub fn darken_area(raster: &mut Raster<'_>, rect: Rect, amount: u8) {
    map_area(raster, rect, |c| c.darken(amount));
}

/// Add `amount` to every channel of the pixels in `rect`.
pub fn brighten_area(raster: &mut Raster<'_>, rect: Rect, amount: u8) {
    map_area(raster, rect, |c| c.brighten(amount));
}

fn map_area(raster: &mut Raster<'_>, rect: Rect, f: impl Fn(Color) -> Color) {
    let area = rect.intersect(raster.bounds());
    if area.is_empty() {
        return;
    }
    let (x0, x1) = (area.x as usize, (area.x + area.width) as usize);
    for y in area.y..area.y + area.height {
        for px in &mut raster.row_mut(y as u32)[x0..x1] {
            *px = f(*px);
        }
    }
}

/// Draw a button-like box: `rect` filled with `base` and a `border` pixel
/// wide frame, light on the top and left edges and dark on the bottom and
/// right. `pressed` swaps the two tones.
///
/// Bottom and right edges are drawn last, so they own the top-right and
/// bottom-left corners.
pub fn bevel(raster: &mut Raster<'_>, rect: Rect, base: Color, border: u32, pressed: bool) {
    let light = base.brighten(BEVEL_AMOUNT);
    let dark = base.darken(BEVEL_AMOUNT);
    let (top_left, bottom_right) = if pressed { (dark, light) } else { (light, dark) };

    fill_rect(raster, rect, base);
    for i in ring_indices(rect, (raster.width(), raster.height()), border) {
        let ring = Rect::new(
            rect.x.saturating_add(i),
            rect.y.saturating_add(i),
            rect.width.saturating_sub(2 * i),
            rect.height.saturating_sub(2 * i),
        );
        let right = ring.x.saturating_add(ring.width - 1);
        let bottom = ring.y.saturating_add(ring.height - 1);
        fill_rect(raster, Rect::new(ring.x, ring.y, ring.width, 1), top_left);
        fill_rect(raster, Rect::new(ring.x, ring.y, 1, ring.height), top_left);
        fill_rect(raster, Rect::new(ring.x, bottom, ring.width, 1), bottom_right);
        fill_rect(raster, Rect::new(right, ring.y, 1, ring.height), bottom_right);
    }
}

/// Indices of the non-empty bevel rings with at least one edge row or
/// column inside a raster of `size`, in ascending order.
fn ring_indices(rect: Rect, size: (u32, u32), border: u32) -> impl Iterator<Item = i32> {
    let (x, y) = (i64::from(rect.x), i64::from(rect.y));
    let (w, h) = (i64::from(rect.width), i64::from(rect.height));
    let (rw, rh) = (i64::from(size.0), i64::from(size.1));
    // ring i is empty once 2i reaches the shorter side
    let rings = i64::from(border).min((w.min(h) + 1) / 2).max(0);

    // ring i has top row y+i, left column x+i, bottom row y+h-1-i and
    // right column x+w-1-i
    let mut spans = [
        (-y, rh - y),
        (-x, rw - x),
        (y + h - rh, y + h),
        (x + w - rw, x + w),
    ]
    .map(|(lo, hi)| (lo.max(0), hi.min(rings)));
    spans.sort_unstable();

    let mut next = 0i64;
    spans.into_iter().flat_map(move |(lo, hi)| {
        let lo = lo.max(next);
        next = next.max(hi);
        // i < rings <= 2^30, so the cast is lossless
        (lo..hi).map(|i| i as i32)
    })
}

/// A clipped copy: `w`×`h` pixels from `(sx, sy)` to `(dx, dy)`.
#[derive(Debug, PartialEq, Eq)]
struct CopyPlan {
    sx: usize,
    sy: usize,
    dx: usize,
    dy: usize,
    w: usize,
    h: usize,
}

fn plan_copy(
    src_size: (u32, u32),
    src_rect: Rect,
    dst_size: (u32, u32),
    dst_x: i32,
    dst_y: i32,
) -> Option<CopyPlan> {
    let (mut sx, mut sy) = (i64::from(src_rect.x), i64::from(src_rect.y));
    let (mut dx, mut dy) = (i64::from(dst_x), i64::from(dst_y));
    let (mut w, mut h) = (i64::from(src_rect.width), i64::from(src_rect.height));

    // Shift both origins until neither is negative.
    let cut = (-sx).max(-dx).max(0);
    sx += cut;
    dx += cut;
    w -= cut;
    let cut = (-sy).max(-dy).max(0);
    sy += cut;
    dy += cut;
    h -= cut;

    w = w
        .min(i64::from(src_size.0) - sx)
        .min(i64::from(dst_size.0) - dx);
    h = h
        .min(i64::from(src_size.1) - sy)
        .min(i64::from(dst_size.1) - dy);
    if w <= 0 || h <= 0 {
        return None;
    }
    Some(CopyPlan {
        sx: sx as usize,
        sy: sy as usize,
        dx: dx as usize,
        dy: dy as usize,
        w: w as usize,
        h: h as usize,
    })
}

fn copy_row(src: &[Color], dst: &mut [Color], key: Option<Color>) {
    match key {
        None => dst.copy_from_slice(src),
        Some(key) => {
            for (d, &s) in dst.iter_mut().zip(src) {
                if s != key {
                    *d = s;
                }
            }
        }
    }
}

fn source_key(src: &Raster<'_>) -> Option<Color> {
    src.is_transparent().then(|| src.color_key())
}

/// Copy `src_rect` of `src` into `dst` with its top-left corner at
/// `(dst_x, dst_y)`.
///
/// The rectangle is clipped against both rasters. If `src` is transparent,
/// pixels equal to its color key leave the destination untouched.
pub fn blit(src: &Raster<'_>, src_rect: Rect, dst: &mut Raster<'_>, dst_x: i32, dst_y: i32) {
    let Some(plan) = plan_copy(
        (src.width(), src.height()),
        src_rect,
        (dst.width(), dst.height()),
        dst_x,
        dst_y,
    ) else {
        return;
    };
    let key = source_key(src);
    for row in 0..plan.h {
        let s = &src.row((plan.sy + row) as u32)[plan.sx..plan.sx + plan.w];
        let d = &mut dst.row_mut((plan.dy + row) as u32)[plan.dx..plan.dx + plan.w];
        copy_row(s, d, key);
    }
}

/// Copy `src_rect` to `(dst_x, dst_y)` inside the same raster.
///
/// Source and destination may overlap arbitrarily; the result is the same as
/// copying the source area out to a temporary first. Scanning runs backward
/// (bottom row first, right to left) when the destination lies after the
/// source in memory and forward otherwise.
pub fn blit_within(raster: &mut Raster<'_>, src_rect: Rect, dst_x: i32, dst_y: i32) {
    let size = (raster.width(), raster.height());
    let Some(plan) = plan_copy(size, src_rect, size, dst_x, dst_y) else {
        return;
    };
    let key = source_key(raster);
    let stride = raster.width() as usize;
    let backward = (plan.dy, plan.dx) > (plan.sy, plan.sx);
    let pixels = raster.pixels_mut();

    let copy_one_row = |pixels: &mut [Color], row: usize| {
        let src = (plan.sy + row) * stride + plan.sx;
        let dst = (plan.dy + row) * stride + plan.dx;
        match key {
            // memmove semantics within the row
            None => pixels.copy_within(src..src + plan.w, dst),
            Some(key) => {
                let mut step = |i: usize| {
                    let c = pixels[src + i];
                    if c != key {
                        pixels[dst + i] = c;
                    }
                };
                if backward {
                    (0..plan.w).rev().for_each(&mut step);
                } else {
                    (0..plan.w).for_each(&mut step);
                }
            }
        }
    };

    if backward {
        for row in (0..plan.h).rev() {
            copy_one_row(&mut *pixels, row);
        }
    } else {
        for row in 0..plan.h {
            copy_one_row(&mut *pixels, row);
        }
    }
}

/// Copy `rect` of `src` into a new owned raster.
///
/// The rectangle is clipped to `src` first; an empty result is
/// `InvalidDimensions`. Pixels are copied verbatim (color-keyed pixels
/// included) and the new raster inherits the source's color key settings.
pub fn extract(src: &Raster<'_>, rect: Rect) -> Result<Raster<'static>, RasterError> {
    let area = rect.intersect(src.bounds());
    if area.is_empty() {
        return Err(RasterError::InvalidDimensions {
            width: rect.width.max(0) as u32,
            height: rect.height.max(0) as u32,
        });
    }
    let (w, h) = (area.width as u32, area.height as u32);
    let mut out = Raster::from_vec(alloc_pixels(w as usize * h as usize, Color::BLACK)?, w, h);
    let (x0, x1) = (area.x as usize, (area.x + area.width) as usize);
    for row in 0..h {
        let s = &src.row(area.y as u32 + row)[x0..x1];
        copy_row(s, out.row_mut(row), None);
    }
    out.set_color_key(src.color_key());
    out.set_transparent(src.is_transparent());
    Ok(out)
}
