//! Seekable byte source shared by every decoder.
//!
//! Decoders never touch a file or a slice directly; they read through
//! [`Stream`], so the same code path serves memory buffers, files and archive
//! members. All reads are synchronous. A short read from [`Stream::read_exact`]
//! (and everything built on it) is `UnexpectedEof`, never zero-filled data.

use alloc::vec::Vec;

use crate::error::RasterError;

/// Byte order for multi-byte reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// Seek origin, mirroring `std::io::SeekFrom` for `no_std` builds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeekFrom {
    Start(u64),
    End(i64),
    Current(i64),
}

/// A position-tracking, seekable byte reader.
pub trait Stream {
    /// Read up to `buf.len()` bytes. Returns 0 only at end of stream.
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize, RasterError>;

    /// Move the read position, returning the new absolute position.
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, RasterError>;

    /// Current absolute read position.
    fn tell(&self) -> u64;

    /// Fill `buf` completely or fail with `UnexpectedEof`.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), RasterError> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read_some(&mut buf[filled..])?;
            if n == 0 {
                return Err(RasterError::UnexpectedEof);
            }
            filled += n;
        }
        Ok(())
    }

    /// Read as many bytes as are available, up to `buf.len()`.
    fn read_up_to(&mut self, buf: &mut [u8]) -> Result<usize, RasterError> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read_some(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }

    /// Next byte, or `None` at end of stream.
    fn next_byte(&mut self) -> Result<Option<u8>, RasterError> {
        let mut b = [0u8; 1];
        match self.read_some(&mut b)? {
            0 => Ok(None),
            _ => Ok(Some(b[0])),
        }
    }

    fn read_u8(&mut self) -> Result<u8, RasterError> {
        let mut b = [0u8; 1];
        self.read_exact(&mut b)?;
        Ok(b[0])
    }

    fn read_u16(&mut self, endian: Endian) -> Result<u16, RasterError> {
        let mut b = [0u8; 2];
        self.read_exact(&mut b)?;
        Ok(match endian {
            Endian::Little => u16::from_le_bytes(b),
            Endian::Big => u16::from_be_bytes(b),
        })
    }

    fn read_u32(&mut self, endian: Endian) -> Result<u32, RasterError> {
        let mut b = [0u8; 4];
        self.read_exact(&mut b)?;
        Ok(match endian {
            Endian::Little => u32::from_le_bytes(b),
            Endian::Big => u32::from_be_bytes(b),
        })
    }

    fn read_i32(&mut self, endian: Endian) -> Result<i32, RasterError> {
        Ok(self.read_u32(endian)? as i32)
    }

    /// Read exactly `n` bytes into a new buffer.
    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, RasterError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(n)
            .map_err(|_| RasterError::OutOfMemory { bytes: n })?;
        buf.resize(n, 0);
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn skip(&mut self, n: u64) -> Result<(), RasterError> {
        let offset = i64::try_from(n).map_err(|_| RasterError::SeekOutOfRange(i128::from(n)))?;
        self.seek(SeekFrom::Current(offset))?;
        Ok(())
    }
}

impl<S: Stream + ?Sized> Stream for &mut S {
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize, RasterError> {
        (**self).read_some(buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, RasterError> {
        (**self).seek(pos)
    }

    fn tell(&self) -> u64 {
        (**self).tell()
    }
}

/// Read up to `buf.len()` bytes and restore the position.
pub(crate) fn peek(stream: &mut dyn Stream, buf: &mut [u8]) -> Result<usize, RasterError> {
    let start = stream.tell();
    let n = stream.read_up_to(buf);
    stream.seek(SeekFrom::Start(start))?;
    n
}

/// Run `f`, restoring the stream position if it fails.
pub(crate) fn rewind_on_error<T>(
    stream: &mut dyn Stream,
    f: impl FnOnce(&mut dyn Stream, u64) -> Result<T, RasterError>,
) -> Result<T, RasterError> {
    let start = stream.tell();
    let result = f(stream, start);
    if result.is_err()
        && let Err(e) = stream.seek(SeekFrom::Start(start))
    {
        log::warn!("could not rewind stream to {start}: {e}");
    }
    result
}

fn resolve(base: u64, offset: i64, len: u64) -> Result<u64, RasterError> {
    let target = i128::from(base) + i128::from(offset);
    if target < 0 || target > i128::from(len) {
        return Err(RasterError::SeekOutOfRange(target));
    }
    Ok(target as u64)
}

// ── Memory ──────────────────────────────────────────────────────────

/// A [`Stream`] over an in-memory buffer.
///
/// Seeking past the end of the buffer is an error rather than a silent
/// clamp, so a bogus BMP pixel offset fails at the seek.
#[derive(Clone, Debug)]
pub struct SliceStream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// The bytes not read yet.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl Stream for SliceStream<'_> {
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize, RasterError> {
        let rest = self.remaining();
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, RasterError> {
        let len = self.data.len() as u64;
        let target = match pos {
            SeekFrom::Start(p) => resolve(p, 0, len)?,
            SeekFrom::End(off) => resolve(len, off, len)?,
            SeekFrom::Current(off) => resolve(self.pos as u64, off, len)?,
        };
        self.pos = target as usize;
        Ok(target)
    }

    fn tell(&self) -> u64 {
        self.pos as u64
    }
}

// ── std::io ─────────────────────────────────────────────────────────

/// A [`Stream`] over any `Read + Seek` source (files, archive members).
///
/// Reads go straight to the inner reader; wrap unbuffered sources in a
/// `BufReader` because the text decoders pull one byte at a time.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoStream<R> {
    inner: R,
    pos: u64,
}

#[cfg(feature = "std")]
impl<R: std::io::Read + std::io::Seek> IoStream<R> {
    pub fn new(mut inner: R) -> Result<Self, RasterError> {
        let pos = inner.stream_position()?;
        Ok(Self { inner, pos })
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read + std::io::Seek> Stream for IoStream<R> {
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize, RasterError> {
        loop {
            match self.inner.read(buf) {
                Ok(n) => {
                    self.pos += n as u64;
                    return Ok(n);
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, RasterError> {
        let pos = match pos {
            SeekFrom::Start(p) => std::io::SeekFrom::Start(p),
            SeekFrom::End(off) => std::io::SeekFrom::End(off),
            SeekFrom::Current(off) => std::io::SeekFrom::Current(off),
        };
        self.pos = self.inner.seek(pos)?;
        Ok(self.pos)
    }

    fn tell(&self) -> u64 {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endian_reads() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x12, 0x34, 0x56, 0x78];
        let mut s = SliceStream::new(&data);
        assert_eq!(s.read_u16(Endian::Little).unwrap(), 0x3412);
        assert_eq!(s.read_u16(Endian::Big).unwrap(), 0x5678);
        assert_eq!(s.read_u32(Endian::Big).unwrap(), 0x1234_5678);
        assert_eq!(s.tell(), 8);
    }

    #[test]
    fn short_read_is_eof_not_partial() {
        let data = [1, 2, 3];
        let mut s = SliceStream::new(&data);
        assert!(matches!(
            s.read_u32(Endian::Little),
            Err(RasterError::UnexpectedEof)
        ));

        let mut s = SliceStream::new(&data);
        let mut buf = [0u8; 8];
        assert_eq!(s.read_up_to(&mut buf).unwrap(), 3);
        assert_eq!(s.next_byte().unwrap(), None);
    }

    #[test]
    fn seek_bounds() {
        let data = [0u8; 10];
        let mut s = SliceStream::new(&data);
        assert_eq!(s.seek(SeekFrom::End(-2)).unwrap(), 8);
        assert_eq!(s.seek(SeekFrom::Current(-8)).unwrap(), 0);
        assert_eq!(s.seek(SeekFrom::Start(10)).unwrap(), 10);
        assert!(s.seek(SeekFrom::Start(11)).is_err());
        assert!(s.seek(SeekFrom::Current(-11)).is_err());
        assert_eq!(s.tell(), 10);
    }

    #[test]
    fn read_bytes_exact() {
        let data = [9u8, 8, 7, 6];
        let mut s = SliceStream::new(&data);
        s.skip(1).unwrap();
        assert_eq!(s.read_bytes(2).unwrap(), [8, 7]);
        assert!(s.read_bytes(2).is_err());
    }

    #[test]
    fn rewind_restores_position_on_failure() {
        let data = [0u8; 16];
        let mut s = SliceStream::new(&data);
        s.skip(3).unwrap();
        let r: Result<(), _> = rewind_on_error(&mut s, |st, start| {
            assert_eq!(start, 3);
            st.skip(5)?;
            Err(RasterError::UnrecognizedFormat)
        });
        assert!(r.is_err());
        assert_eq!(s.tell(), 3);
    }

    #[cfg(feature = "std")]
    #[test]
    fn io_stream_tracks_position() {
        let cursor = std::io::Cursor::new(alloc::vec![1u8, 2, 3, 4, 5]);
        let mut s = IoStream::new(cursor).unwrap();
        assert_eq!(s.read_u16(Endian::Big).unwrap(), 0x0102);
        assert_eq!(s.tell(), 2);
        s.seek(SeekFrom::Start(4)).unwrap();
        assert_eq!(s.read_u8().unwrap(), 5);
        assert!(s.read_u8().is_err());
    }
}
