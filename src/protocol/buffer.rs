//! Buffer utilities for reading and writing protocol data.
//!
//! All fixed-width integers are little-endian. The read side is a
//! forward-only cursor: it never rewinds, and the first short read latches
//! so that every later read fails the same way (see [`ReadBuffer::check`]).

use std::panic::Location;

use crate::error::{Error, Result};
use bytes::{BufMut, Bytes, BytesMut};

/// First failure seen by a [`ReadBuffer`].
#[derive(Debug, Clone, Copy)]
struct ShortRead {
    needed: usize,
    available: usize,
    location: &'static Location<'static>,
}

impl ShortRead {
    fn to_error(self) -> Error {
        Error::BufferTooSmall {
            needed: self.needed,
            available: self.available,
            location: self.location,
        }
    }
}

/// A buffer for reading protocol data.
pub struct ReadBuffer {
    data: Bytes,
    pos: usize,
    failed: Option<ShortRead>,
}

impl ReadBuffer {
    /// Create a new read buffer from bytes.
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            pos: 0,
            failed: None,
        }
    }

    /// Get the current position in the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get the remaining bytes in the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Check if the buffer has at least `n` bytes remaining.
    pub fn has_remaining(&self, n: usize) -> bool {
        self.remaining() >= n
    }

    /// Whether a read has already failed on this buffer.
    pub fn is_failed(&self) -> bool {
        self.failed.is_some()
    }

    /// Return the latched error of the first failed read, if any.
    pub fn check(&self) -> Result<()> {
        match self.failed {
            Some(short) => Err(short.to_error()),
            None => Ok(()),
        }
    }

    /// Claim `n` bytes and return their start position.
    #[track_caller]
    fn take(&mut self, n: usize) -> Result<usize> {
        if let Some(short) = self.failed {
            return Err(short.to_error());
        }
        if !self.has_remaining(n) {
            let short = ShortRead {
                needed: n,
                available: self.remaining(),
                location: Location::caller(),
            };
            self.failed = Some(short);
            return Err(short.to_error());
        }
        let start = self.pos;
        self.pos += n;
        Ok(start)
    }

    #[track_caller]
    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let start = self.take(N)?;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[start..start + N]);
        Ok(bytes)
    }

    /// Skip `n` bytes.
    #[track_caller]
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Read a single byte.
    #[track_caller]
    pub fn read_u8(&mut self) -> Result<u8> {
        let start = self.take(1)?;
        Ok(self.data[start])
    }

    /// Read a signed byte.
    #[track_caller]
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read a one-byte boolean (any non-zero value is true).
    #[track_caller]
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    #[track_caller]
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.take_array()?))
    }

    #[track_caller]
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    #[track_caller]
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    #[track_caller]
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    #[track_caller]
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.take_array()?))
    }

    #[track_caller]
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    #[track_caller]
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.take_array()?))
    }

    #[track_caller]
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.take_array()?))
    }

    /// Read a fixed-size byte array.
    #[track_caller]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.take_array()
    }

    /// Read raw bytes.
    #[track_caller]
    pub fn read_bytes(&mut self, n: usize) -> Result<Bytes> {
        let start = self.take(n)?;
        Ok(self.data.slice(start..start + n))
    }

    /// Read a short byte string: one length byte followed by that many bytes.
    #[track_caller]
    pub fn read_short_bytes(&mut self) -> Result<Bytes> {
        let len = self.read_u8()? as usize;
        self.read_bytes(len)
    }

    /// Read a short string.
    ///
    /// Returns the decoded text together with the number of text bytes on
    /// the wire (the length byte excluded). Invalid UTF-8 is replaced, so
    /// the returned size is the only reliable measure of bytes consumed.
    #[track_caller]
    pub fn read_short_string(&mut self) -> Result<(String, usize)> {
        let bytes = self.read_short_bytes()?;
        let size = bytes.len();
        Ok((String::from_utf8_lossy(&bytes).into_owned(), size))
    }
}

/// A buffer for writing protocol data.
pub struct WriteBuffer {
    data: BytesMut,
}

impl WriteBuffer {
    /// Create a new write buffer with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a new write buffer with specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
        }
    }

    /// Get the current length of the buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the buffer contents as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Freeze the buffer into immutable bytes.
    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }

    pub fn write_u8(&mut self, val: u8) {
        self.data.put_u8(val);
    }

    pub fn write_i8(&mut self, val: i8) {
        self.data.put_i8(val);
    }

    pub fn write_i16(&mut self, val: i16) {
        self.data.put_i16_le(val);
    }

    pub fn write_u16(&mut self, val: u16) {
        self.data.put_u16_le(val);
    }

    pub fn write_i32(&mut self, val: i32) {
        self.data.put_i32_le(val);
    }

    pub fn write_u32(&mut self, val: u32) {
        self.data.put_u32_le(val);
    }

    pub fn write_i64(&mut self, val: i64) {
        self.data.put_i64_le(val);
    }

    pub fn write_u64(&mut self, val: u64) {
        self.data.put_u64_le(val);
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Write padding zeros.
    pub fn write_zeros(&mut self, count: usize) {
        self.data.put_bytes(0, count);
    }

    /// Write a short byte string. Input longer than 255 bytes is an error.
    pub fn write_short_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let len = u8::try_from(bytes.len()).map_err(|_| {
            Error::protocol(format!("short string too long: {} bytes", bytes.len()))
        })?;
        self.write_u8(len);
        self.write_bytes(bytes);
        Ok(())
    }
}

impl Default for WriteBuffer {
    fn default() -> Self {
        Self::new()
    }
}
