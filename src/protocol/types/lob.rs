//! LOB (Large Object) values for CLOB, NCLOB, BLOB and TEXT columns.
//!
//! A LOB column value arrives as a descriptor: a locator id naming the LOB
//! on the server, its total length, and the first chunk of its content.
//! When the whole LOB fits in that chunk the `LAST_DATA` option is set and
//! no further reads are needed. Streaming the remainder is done by the
//! session layer with the locator id; this crate only carries the handle.

use bytes::Bytes;

use crate::error::Result;
use crate::protocol::buffer::ReadBuffer;
use crate::protocol::decode::non_negative;

use super::type_code::TypeCode;

/// LOB descriptor options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LobOptions(pub i8);

impl LobOptions {
    pub const NULL_INDICATOR: i8 = 0x01;
    pub const DATA_INCLUDED: i8 = 0x02;
    pub const LAST_DATA: i8 = 0x04;

    pub fn contains(self, option: i8) -> bool {
        self.0 & option != 0
    }

    pub fn is_null(self) -> bool {
        self.contains(Self::NULL_INDICATOR)
    }
}

/// Server-side handle of a LOB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LobLocator {
    /// Locator id used to fetch further chunks.
    pub id: u64,
    /// Total length in characters (character LOBs only).
    pub char_length: i64,
    /// Total length in bytes.
    pub byte_length: i64,
}

/// LOB value with the chunk sent inline with the row.
#[derive(Debug, Clone, PartialEq)]
pub struct LobValue {
    pub type_code: TypeCode,
    pub options: LobOptions,
    pub locator: LobLocator,
    /// Inline chunk (may be empty).
    pub data: Bytes,
}

impl LobValue {
    /// Read a LOB descriptor. Returns `None` for a NULL LOB.
    ///
    /// Wire format:
    /// ```text
    /// type code:   i8
    /// options:     i8
    /// filler:      2 bytes
    /// char length: i64
    /// byte length: i64
    /// locator id:  u64
    /// chunk len:   i32
    /// chunk:       chunk len bytes
    /// ```
    /// A NULL LOB stops after the options byte.
    pub fn decode(buf: &mut ReadBuffer) -> Result<Option<Self>> {
        let type_code = TypeCode(buf.read_i8()?);
        let options = LobOptions(buf.read_i8()?);
        if options.is_null() {
            return Ok(None);
        }
        buf.skip(2)?;
        let char_length = buf.read_i64()?;
        let byte_length = buf.read_i64()?;
        let id = buf.read_u64()?;
        let chunk_length = buf.read_i32()?;
        let data = buf.read_bytes(non_negative(chunk_length)?)?;

        Ok(Some(Self {
            type_code,
            options,
            locator: LobLocator {
                id,
                char_length,
                byte_length,
            },
            data,
        }))
    }

    /// Check if the inline chunk holds the complete LOB.
    pub fn is_complete(&self) -> bool {
        self.options.contains(LobOptions::LAST_DATA)
    }

    /// Check if any content was sent inline.
    pub fn has_data(&self) -> bool {
        self.options.contains(LobOptions::DATA_INCLUDED) && !self.data.is_empty()
    }

    /// Inline chunk as text (character LOBs only).
    pub fn as_string(&self) -> Option<String> {
        self.type_code
            .is_char_type()
            .then(|| String::from_utf8_lossy(&self.data).into_owned())
    }

    /// Inline chunk as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Total LOB size: characters for character LOBs, bytes otherwise.
    pub fn size(&self) -> i64 {
        if self.type_code.is_char_type() {
            self.locator.char_length
        } else {
            self.locator.byte_length
        }
    }
}
