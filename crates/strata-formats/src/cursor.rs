//! Offset-tracked reader over an in-memory byte source
//!
//! [`ByteCursor`] is the only way decoders touch raw bytes. Primitive reads
//! are endian-explicit, every read advances the position by exactly the
//! number of bytes consumed, and a read that would run past the end fails
//! with [`DecodeError::OutOfBounds`] without moving the position.
//!
//! The cursor also implements [`std::io::Read`] and [`std::io::Seek`], so
//! fixed-shape records derived with `binrw` are read straight from it through
//! [`ByteCursor::read`] and friends.

use crate::error::{DecodeError, Result};
use binrw::{BinRead, Endian};
use std::io::{self, Read, Seek, SeekFrom};
use tracing::trace;

/// Text encoding used by string reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// 7-bit ASCII, high bytes mapped as Latin-1
    Ascii,
    /// ISO-8859-1
    Latin1,
    /// UTF-8, invalid sequences replaced
    Utf8,
    /// UTF-16 little-endian, invalid surrogates replaced
    Utf16Le,
}

impl Encoding {
    /// Decode `bytes`, never failing on malformed input
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Ascii | Self::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Utf16Le => {
                let units = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
                char::decode_utf16(units)
                    .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                    .collect()
            }
        }
    }

    /// Decode a fixed-width, NUL-padded field
    pub fn decode_fixed(self, bytes: &[u8]) -> String {
        self.decode(trim_at_nul(bytes, self.unit_size()))
    }

    const fn unit_size(self) -> usize {
        match self {
            Self::Utf16Le => 2,
            Self::Ascii | Self::Latin1 | Self::Utf8 => 1,
        }
    }
}

/// Sequential reader with bounds-checked random access
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

macro_rules! read_primitive {
    ($($name:ident => $ty:ty, $conv:ident;)*) => {
        $(
            #[doc = concat!("Read a `", stringify!($ty), "` (", stringify!($conv), ")")]
            pub fn $name(&mut self) -> Result<$ty> {
                Ok(<$ty>::$conv(self.read_array()?))
            }
        )*
    };
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Create a cursor positioned at `offset`
    pub fn at(data: &'a [u8], offset: u64) -> Result<Self> {
        let mut cursor = Self::new(data);
        cursor.seek_to(offset)?;
        Ok(cursor)
    }

    /// The whole underlying byte source
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Current absolute position
    pub const fn position(&self) -> u64 {
        self.position as u64
    }

    /// Total length of the byte source
    pub const fn len(&self) -> u64 {
        self.data.len() as u64
    }

    /// Whether the byte source is empty
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the position and the end
    pub const fn remaining(&self) -> u64 {
        self.data.len().saturating_sub(self.position) as u64
    }

    /// Move to an absolute offset; the end of the data is a valid target
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        match usize::try_from(offset) {
            Ok(target) if target <= self.data.len() => {
                self.position = target;
                Ok(())
            }
            _ => Err(self.out_of_bounds(offset, 0)),
        }
    }

    /// Advance by `count` bytes
    pub fn skip(&mut self, count: u64) -> Result<()> {
        self.take(count).map(|_| ())
    }

    /// Round the position up to a multiple of `boundary`
    pub fn align(&mut self, boundary: u64) -> Result<()> {
        if boundary <= 1 {
            return Ok(());
        }
        let position = self.position();
        let padding = (boundary - position % boundary) % boundary;
        self.seek_to(position + padding)
    }

    /// Borrow the next `count` bytes and advance past them
    pub fn take(&mut self, count: u64) -> Result<&'a [u8]> {
        let start = self.position;
        let end = usize::try_from(count)
            .ok()
            .and_then(|count| start.checked_add(count))
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| self.out_of_bounds(start as u64, count))?;
        self.position = end;
        Ok(&self.data[start..end])
    }

    /// Borrow the next `count` bytes without advancing
    pub fn peek(&self, count: u64) -> Result<&'a [u8]> {
        Self::take(&mut self.clone(), count)
    }

    /// Read `count` bytes into an owned buffer
    pub fn read_bytes(&mut self, count: u64) -> Result<Vec<u8>> {
        self.take(count).map(<[u8]>::to_vec)
    }

    /// Read a fixed-size byte array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N as u64)?);
        Ok(out)
    }

    read_primitive! {
        read_u8 => u8, from_le_bytes;
        read_i8 => i8, from_le_bytes;
        read_u16_le => u16, from_le_bytes;
        read_u16_be => u16, from_be_bytes;
        read_i16_le => i16, from_le_bytes;
        read_u32_le => u32, from_le_bytes;
        read_u32_be => u32, from_be_bytes;
        read_i32_le => i32, from_le_bytes;
        read_i32_be => i32, from_be_bytes;
        read_u64_le => u64, from_le_bytes;
        read_u64_be => u64, from_be_bytes;
        read_i64_le => i64, from_le_bytes;
    }

    /// Read a 24-bit big-endian integer
    pub fn read_u24_be(&mut self) -> Result<u32> {
        let [a, b, c] = self.read_array()?;
        Ok(u32::from_be_bytes([0, a, b, c]))
    }

    /// Read a 16-bit integer in the given byte order
    pub fn read_u16(&mut self, endian: Endian) -> Result<u16> {
        match endian {
            Endian::Big => self.read_u16_be(),
            Endian::Little => self.read_u16_le(),
        }
    }

    /// Read a 32-bit integer in the given byte order
    pub fn read_u32(&mut self, endian: Endian) -> Result<u32> {
        match endian {
            Endian::Big => self.read_u32_be(),
            Endian::Little => self.read_u32_le(),
        }
    }

    /// Read `length` bytes of text, cut at the first NUL unit
    pub fn read_fixed_string(&mut self, length: u64, encoding: Encoding) -> Result<String> {
        let bytes = self.take(length)?;
        Ok(encoding.decode_fixed(bytes))
    }

    /// Read a NUL-terminated string, consuming the terminator
    pub fn read_cstring(&mut self, encoding: Encoding) -> Result<String> {
        let unit = encoding.unit_size();
        let rest = &self.data[self.position.min(self.data.len())..];
        let length = rest
            .chunks_exact(unit)
            .position(|chunk| chunk.iter().all(|&b| b == 0))
            .ok_or_else(|| self.out_of_bounds(self.position(), rest.len() as u64 + 1))?;
        let bytes = self.take((length * unit) as u64)?;
        self.skip(unit as u64)?;
        Ok(encoding.decode(bytes))
    }

    /// Read a string prefixed with an 8-bit length
    pub fn read_prefixed_u8(&mut self, encoding: Encoding) -> Result<String> {
        let start = self.position;
        let length = self.read_u8()?;
        self.take(u64::from(length))
            .map(|bytes| encoding.decode(bytes))
            .inspect_err(|_| self.position = start)
    }

    /// Read a string prefixed with a 16-bit little-endian length
    pub fn read_prefixed_u16(&mut self, encoding: Encoding) -> Result<String> {
        let start = self.position;
        let length = self.read_u16_le()?;
        self.take(u64::from(length))
            .map(|bytes| encoding.decode(bytes))
            .inspect_err(|_| self.position = start)
    }

    /// Read a `binrw` record whose arguments have a default
    pub fn read<T>(&mut self) -> Result<T>
    where
        T: BinRead,
        for<'b> T::Args<'b>: Default,
    {
        self.read_with(Endian::Little, Default::default())
    }

    /// Read a `binrw` record in an explicit byte order
    pub fn read_endian<T>(&mut self, endian: Endian) -> Result<T>
    where
        T: BinRead,
        for<'b> T::Args<'b>: Default,
    {
        self.read_with(endian, Default::default())
    }

    /// Read a `binrw` record with explicit byte order and arguments
    ///
    /// Records that fix their own byte order ignore `endian`. A failed read
    /// restores the position to where the record started.
    pub fn read_with<T: BinRead>(&mut self, endian: Endian, args: T::Args<'_>) -> Result<T> {
        let start = self.position;
        T::read_options(self, endian, args).map_err(|err| {
            self.position = start;
            DecodeError::from_binrw::<T>(err, start as u64)
        })
    }

    /// Read up to `count` entries, keeping whatever was read before a failure
    ///
    /// The count stated by a header is a hint: it is clamped to `limit`, and
    /// the first recoverable error ends the table instead of failing it.
    pub fn read_counted<T, F>(&mut self, count: u64, limit: usize, mut read: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let count = usize::try_from(count).unwrap_or(usize::MAX).min(limit);
        let mut entries = Vec::with_capacity(count.min(1024));
        for index in 0..count {
            match read(self) {
                Ok(entry) => entries.push(entry),
                Err(err) if err.is_recoverable() => {
                    trace!(index, expected = count, %err, "table ended early");
                    break;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(entries)
    }

    /// Read entries until `read` reports the terminator with `Ok(None)`
    pub fn read_until<T, F>(&mut self, limit: usize, mut read: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<Option<T>>,
    {
        let mut entries = Vec::new();
        while entries.len() < limit {
            match read(self) {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => break,
                Err(err) if err.is_recoverable() => {
                    trace!(read = entries.len(), %err, "sequence ended without terminator");
                    break;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(entries)
    }

    fn out_of_bounds(&self, offset: u64, requested: u64) -> DecodeError {
        DecodeError::OutOfBounds {
            offset,
            requested,
            available: self.len(),
        }
    }
}

fn trim_at_nul(bytes: &[u8], unit: usize) -> &[u8] {
    let end = bytes
        .chunks_exact(unit)
        .position(|chunk| chunk.iter().all(|&b| b == 0))
        .map_or(bytes.len(), |units| units * unit);
    &bytes[..end]
}

impl Read for ByteCursor<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let rest = self.data.get(self.position..).unwrap_or_default();
        let count = rest.len().min(buf.len());
        buf[..count].copy_from_slice(&rest[..count]);
        self.position += count;
        Ok(count)
    }
}

impl Seek for ByteCursor<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => self.len().checked_add_signed(delta),
            SeekFrom::Current(delta) => self.position().checked_add_signed(delta),
        };
        let target = target
            .and_then(|t| usize::try_from(t).ok())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "seek before start"))?;
        self.position = target;
        Ok(target as u64)
    }
}
