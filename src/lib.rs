//! # zenraster
//!
//! BMP, XBM and XPM decoders plus the raster primitives an avatar or
//! sprite renderer needs: fills, bevels, shading and color-keyed blits.
//!
//! ## Rasters
//!
//! A [`Raster`] is a width x height grid of [`Color`] (`0x00RRGGBB`). It owns
//! its pixels or borrows a caller buffer ([`Raster::from_buffer`]), so
//! decoded images can be copied straight into preallocated frame memory.
//! A transparent raster has a color key; pixels equal to it are skipped by
//! [`ops::blit`]. Decoders use [`Color::NONE`], which no RGB value can
//! equal, for "no pixel here".
//!
//! ## Supported Formats
//!
//! ### BMP (`bmp` feature)
//! - Windows v3+ and OS/2 headers, 1/4/8/16/24/32 bits, bit-field masks
//! - Uncompressed only, plus a 24-bit encoder for snapshots
//!
//! ### XBM (`xbm` feature)
//! - X11 `char` and X10 `short` bitmaps, hotspot parsing
//!
//! ### XPM (`xpm` feature)
//! - XPM3, 1 to 4 characters per pixel, `None` transparency
//!
//! ## Non-Goals
//!
//! - Named-color databases for XPM (only black, white and hex)
//! - RLE or embedded JPEG/PNG BMPs
//! - Alpha blending; transparency is a single color key
//!
//! ## Credits
//!
//! The BMP header and bit-field handling derives from
//! [zune-bmp](https://github.com/etemesi254/zune-image) by Caleb Etemesi
//! (MIT/Apache-2.0/Zlib licensed).
//!
//! ## Usage
//!
//! ```
//! use zenraster::{DecodeRequest, Limits, Raster, SliceStream, ops};
//!
//! # fn main() -> Result<(), zenraster::RasterError> {
//! let sprite = [
//!     "2 2 2 1",
//!     ". c None",
//!     "# c #FF0000",
//!     ".#",
//!     "#.",
//! ];
//! let sprite = zenraster::xpm::from_lines(&sprite, None)?;
//!
//! let mut frame = Raster::new(4, 4)?;
//! ops::blit(&sprite, sprite.bounds(), &mut frame, 1, 1);
//!
//! // Or let the decoder pick the format
//! let limits = Limits {
//!     max_pixels: Some(1 << 20),
//!     ..Limits::default()
//! };
//! let data = b"/* XPM */\nstatic char *x[] = {\"1 1 1 1\", \"a c white\", \"a\"};";
//! let decoded = DecodeRequest::new()
//!     .with_limits(&limits)
//!     .decode(&mut SliceStream::new(data))?;
//! assert_eq!(decoded.width(), 1);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod color;
mod error;
mod info;
mod limits;
mod probe;
mod raster;

pub mod ops;
pub mod stream;

#[cfg(feature = "bmp")]
pub mod bmp;

#[cfg(feature = "xbm")]
pub mod xbm;

#[cfg(feature = "xpm")]
pub mod xpm;

// Re-exports
pub use color::Color;
pub use error::RasterError;
pub use info::{ImageFormat, ImageInfo};
pub use limits::Limits;
pub use probe::{DecodeRequest, decode_bytes};
pub use raster::{MAX_DIMENSION, Raster, Rect};
#[cfg(feature = "std")]
pub use stream::IoStream;
pub use stream::{Endian, SeekFrom, SliceStream, Stream};
