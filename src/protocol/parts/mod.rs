//! Parts: the framed units inside a reply segment.
//!
//! Every part starts with a 16-byte [`PartHeader`] naming its kind and
//! element count, followed by its payload padded to 8 bytes. The framing
//! layer reads the header, builds the matching [`Part`], hands it the
//! element count and lets it decode exactly its own payload.

mod result_metadata;
mod resultset;
mod resultset_id;

pub use result_metadata::ResultMetadata;
pub use resultset::Resultset;
pub use resultset_id::ResultsetId;

use std::fmt;

use crate::error::{Error, Result};
use crate::protocol::buffer::{ReadBuffer, WriteBuffer};

/// Part header size.
pub const PART_HEADER_SIZE: usize = 16;
/// Part payloads are padded to this alignment.
pub const PART_ALIGNMENT: usize = 8;

/// Kind tag of a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum PartKind {
    Command = 3,
    Resultset = 5,
    Error = 6,
    StatementId = 10,
    TransactionId = 11,
    RowsAffected = 12,
    ResultsetId = 13,
    TopologyInformation = 15,
    TableLocation = 16,
    ReadLobRequest = 17,
    ReadLobReply = 18,
    Parameters = 32,
    Authentication = 33,
    ClientId = 35,
    StatementContext = 39,
    OutputParameters = 41,
    ConnectOptions = 42,
    FetchSize = 45,
    ParameterMetadata = 47,
    ResultMetadata = 48,
    TransactionFlags = 64,
}

impl PartKind {
    /// Map a wire code to a kind. Unknown codes yield `None`.
    pub fn from_i8(code: i8) -> Option<Self> {
        let kind = match code {
            3 => Self::Command,
            5 => Self::Resultset,
            6 => Self::Error,
            10 => Self::StatementId,
            11 => Self::TransactionId,
            12 => Self::RowsAffected,
            13 => Self::ResultsetId,
            15 => Self::TopologyInformation,
            16 => Self::TableLocation,
            17 => Self::ReadLobRequest,
            18 => Self::ReadLobReply,
            32 => Self::Parameters,
            33 => Self::Authentication,
            35 => Self::ClientId,
            39 => Self::StatementContext,
            41 => Self::OutputParameters,
            42 => Self::ConnectOptions,
            45 => Self::FetchSize,
            47 => Self::ParameterMetadata,
            48 => Self::ResultMetadata,
            64 => Self::TransactionFlags,
            _ => return None,
        };
        Some(kind)
    }

    pub fn code(self) -> i8 {
        self as i8
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Command => "command",
            Self::Resultset => "resultset",
            Self::Error => "error",
            Self::StatementId => "statement id",
            Self::TransactionId => "transaction id",
            Self::RowsAffected => "rows affected",
            Self::ResultsetId => "resultset id",
            Self::TopologyInformation => "topology information",
            Self::TableLocation => "table location",
            Self::ReadLobRequest => "read lob request",
            Self::ReadLobReply => "read lob reply",
            Self::Parameters => "parameters",
            Self::Authentication => "authentication",
            Self::ClientId => "client id",
            Self::StatementContext => "statement context",
            Self::OutputParameters => "output parameters",
            Self::ConnectOptions => "connect options",
            Self::FetchSize => "fetch size",
            Self::ParameterMetadata => "parameter metadata",
            Self::ResultMetadata => "result metadata",
            Self::TransactionFlags => "transaction flags",
        };
        write!(f, "{}", name)
    }
}

/// Part attribute bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartAttributes(pub i8);

impl PartAttributes {
    pub const LAST_PACKET: i8 = 0x01;
    pub const NEXT_PACKET: i8 = 0x02;
    pub const FIRST_PACKET: i8 = 0x04;
    pub const ROW_NOT_FOUND: i8 = 0x08;
    pub const RESULTSET_CLOSED: i8 = 0x10;

    pub fn contains(self, attribute: i8) -> bool {
        self.0 & attribute != 0
    }

    /// No more rows follow for this result set.
    pub fn is_last_packet(self) -> bool {
        self.contains(Self::LAST_PACKET)
    }

    pub fn is_resultset_closed(self) -> bool {
        self.contains(Self::RESULTSET_CLOSED)
    }
}

/// Header preceding each part.
///
/// Wire format (16 bytes):
/// ```text
/// kind:               i8
/// attributes:         i8
/// argument count:     i16  (-1: use big argument count)
/// big argument count: i32
/// buffer length:      i32  (payload bytes, without padding)
/// buffer size:        i32
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartHeader {
    pub kind: i8,
    pub attributes: PartAttributes,
    pub argument_count: i16,
    pub big_argument_count: i32,
    pub buffer_length: i32,
    pub buffer_size: i32,
}

impl PartHeader {
    pub fn new(kind: PartKind, num_arg: usize, buffer_length: usize) -> Self {
        let mut header = Self {
            kind: kind.code(),
            buffer_length: buffer_length as i32,
            buffer_size: buffer_length as i32,
            ..Self::default()
        };
        header.set_num_arg(num_arg);
        header
    }

    pub fn decode(buf: &mut ReadBuffer) -> Result<Self> {
        let header = Self {
            kind: buf.read_i8()?,
            attributes: PartAttributes(buf.read_i8()?),
            argument_count: buf.read_i16()?,
            big_argument_count: buf.read_i32()?,
            buffer_length: buf.read_i32()?,
            buffer_size: buf.read_i32()?,
        };
        buf.check()?;
        Ok(header)
    }

    pub fn encode(&self, buf: &mut WriteBuffer) {
        buf.write_i8(self.kind);
        buf.write_i8(self.attributes.0);
        buf.write_i16(self.argument_count);
        buf.write_i32(self.big_argument_count);
        buf.write_i32(self.buffer_length);
        buf.write_i32(self.buffer_size);
    }

    /// Known part kind, `None` for kinds this crate does not model.
    pub fn part_kind(&self) -> Option<PartKind> {
        PartKind::from_i8(self.kind)
    }

    /// Element count of the part.
    pub fn num_arg(&self) -> Result<usize> {
        let count = if self.argument_count == -1 {
            self.big_argument_count
        } else {
            self.argument_count as i32
        };
        usize::try_from(count)
            .map_err(|_| Error::protocol(format!("Invalid part argument count: {}", count)))
    }

    pub fn set_num_arg(&mut self, num_arg: usize) {
        match i16::try_from(num_arg) {
            Ok(count) => {
                self.argument_count = count;
                self.big_argument_count = 0;
            }
            Err(_) => {
                self.argument_count = -1;
                self.big_argument_count = num_arg as i32;
            }
        }
    }

    /// Payload length in bytes.
    pub fn buffer_length(&self) -> Result<usize> {
        usize::try_from(self.buffer_length).map_err(|_| {
            Error::protocol(format!("Invalid part buffer length: {}", self.buffer_length))
        })
    }

    /// Padding bytes following the payload.
    pub fn padding(&self) -> Result<usize> {
        Ok(padding(self.buffer_length()?))
    }
}

/// Bytes needed to pad `len` to the part alignment.
pub fn padding(len: usize) -> usize {
    (PART_ALIGNMENT - len % PART_ALIGNMENT) % PART_ALIGNMENT
}

/// A part that can be framed.
pub trait Part {
    /// Kind tag written in the part header.
    fn kind(&self) -> PartKind;

    /// Payload size in bytes. Fails if the size is not known yet.
    fn size(&self) -> Result<usize>;

    /// Number of elements in the part.
    fn num_arg(&self) -> usize;

    /// Set the element count from the part header before decoding.
    fn set_num_arg(&mut self, num_arg: usize);

    /// Decode the payload. Consumes exactly this part's bytes.
    fn decode(&mut self, buf: &mut ReadBuffer) -> Result<()>;

    /// Encode the payload.
    fn encode(&self, buf: &mut WriteBuffer) -> Result<()>;
}

/// Encode `part` with its header and padding.
pub fn encode_part(part: &dyn Part, buf: &mut WriteBuffer) -> Result<()> {
    let size = part.size()?;
    PartHeader::new(part.kind(), part.num_arg(), size).encode(buf);
    part.encode(buf)?;
    buf.write_zeros(padding(size));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_part_kind_round_trip() {
        for code in i8::MIN..=i8::MAX {
            if let Some(kind) = PartKind::from_i8(code) {
                assert_eq!(kind.code(), code);
            }
        }
        assert_eq!(PartKind::from_i8(48), Some(PartKind::ResultMetadata));
        assert_eq!(PartKind::from_i8(1), None);
        assert_eq!(PartKind::ResultsetId.to_string(), "resultset id");
    }

    #[test]
    fn test_header_decode() {
        let mut data = vec![13, 0x01];
        data.extend_from_slice(&1i16.to_le_bytes());
        data.extend_from_slice(&0i32.to_le_bytes());
        data.extend_from_slice(&8i32.to_le_bytes());
        data.extend_from_slice(&8i32.to_le_bytes());
        let mut buf = ReadBuffer::new(Bytes::from(data));

        let header = PartHeader::decode(&mut buf).unwrap();
        assert_eq!(header.part_kind(), Some(PartKind::ResultsetId));
        assert!(header.attributes.is_last_packet());
        assert_eq!(header.num_arg().unwrap(), 1);
        assert_eq!(header.buffer_length().unwrap(), 8);
        assert_eq!(header.padding().unwrap(), 0);
    }

    #[test]
    fn test_big_argument_count() {
        let mut header = PartHeader::new(PartKind::Resultset, 40_000, 13);
        assert_eq!(header.argument_count, -1);
        assert_eq!(header.big_argument_count, 40_000);
        assert_eq!(header.num_arg().unwrap(), 40_000);
        assert_eq!(header.padding().unwrap(), 3);

        header.set_num_arg(2);
        assert_eq!(header.argument_count, 2);
        assert_eq!(header.num_arg().unwrap(), 2);
    }

    #[test]
    fn test_header_encode_decode() {
        let header = PartHeader::new(PartKind::ResultMetadata, 3, 100);
        let mut out = WriteBuffer::new();
        header.encode(&mut out);
        assert_eq!(out.len(), PART_HEADER_SIZE);

        let mut buf = ReadBuffer::new(out.freeze());
        assert_eq!(PartHeader::decode(&mut buf).unwrap(), header);
    }

    #[test]
    fn test_negative_counts_rejected() {
        let header = PartHeader {
            argument_count: -5,
            buffer_length: -1,
            ..PartHeader::default()
        };
        assert!(header.num_arg().is_err());
        assert!(header.buffer_length().is_err());
    }

    #[test]
    fn test_truncated_header() {
        let mut buf = ReadBuffer::new(Bytes::from_static(&[13, 0, 1]));
        assert!(PartHeader::decode(&mut buf).unwrap_err().is_io());
    }

    #[test]
    fn test_padding() {
        assert_eq!(padding(0), 0);
        assert_eq!(padding(1), 7);
        assert_eq!(padding(8), 0);
        assert_eq!(padding(30), 2);
    }
}
