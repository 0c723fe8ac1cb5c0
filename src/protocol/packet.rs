//! Reply message framing and I/O.
//!
//! A reply message is a 32-byte [`MessageHeader`] followed by a variable
//! part holding one or more segments. Each segment starts with a 24-byte
//! [`SegmentHeader`] and carries the parts of one reply.

use crate::error::{Error, Result};
use crate::protocol::buffer::{ReadBuffer, WriteBuffer};
use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Message header size.
pub const MESSAGE_HEADER_SIZE: usize = 32;
/// Segment header size.
pub const SEGMENT_HEADER_SIZE: usize = 24;

/// Segment kind of a reply segment.
pub const SEGMENT_KIND_REPLY: i8 = 2;
/// Segment kind of an error segment.
pub const SEGMENT_KIND_ERROR: i8 = 5;

/// Header of a message.
///
/// Wire format (32 bytes):
/// ```text
/// session id:       i64
/// packet count:     i32
/// varpart length:   u32
/// varpart size:     u32
/// segment count:    i16
/// filler:           10 bytes
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageHeader {
    pub session_id: i64,
    pub packet_count: i32,
    pub varpart_length: u32,
    pub varpart_size: u32,
    pub segment_count: i16,
}

impl MessageHeader {
    pub fn decode(buf: &mut ReadBuffer) -> Result<Self> {
        let header = Self {
            session_id: buf.read_i64()?,
            packet_count: buf.read_i32()?,
            varpart_length: buf.read_u32()?,
            varpart_size: buf.read_u32()?,
            segment_count: buf.read_i16()?,
        };
        buf.skip(10)?;
        buf.check()?;
        Ok(header)
    }

    pub fn encode(&self, buf: &mut WriteBuffer) {
        buf.write_i64(self.session_id);
        buf.write_i32(self.packet_count);
        buf.write_u32(self.varpart_length);
        buf.write_u32(self.varpart_size);
        buf.write_i16(self.segment_count);
        buf.write_zeros(10);
    }
}

/// Header of a reply segment.
///
/// Wire format (24 bytes):
/// ```text
/// segment length:   i32
/// segment offset:   i32
/// part count:       i16
/// segment number:   i16
/// segment kind:     i8
/// filler:           1 byte
/// function code:    i16
/// filler:           8 bytes
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentHeader {
    pub segment_length: i32,
    pub segment_offset: i32,
    pub part_count: i16,
    pub segment_number: i16,
    pub segment_kind: i8,
    pub function_code: i16,
}

impl SegmentHeader {
    pub fn decode(buf: &mut ReadBuffer) -> Result<Self> {
        let segment_length = buf.read_i32()?;
        let segment_offset = buf.read_i32()?;
        let part_count = buf.read_i16()?;
        let segment_number = buf.read_i16()?;
        let segment_kind = buf.read_i8()?;
        buf.skip(1)?;
        let function_code = buf.read_i16()?;
        buf.skip(8)?;
        buf.check()?;
        Ok(Self {
            segment_length,
            segment_offset,
            part_count,
            segment_number,
            segment_kind,
            function_code,
        })
    }

    pub fn encode(&self, buf: &mut WriteBuffer) {
        buf.write_i32(self.segment_length);
        buf.write_i32(self.segment_offset);
        buf.write_i16(self.part_count);
        buf.write_i16(self.segment_number);
        buf.write_i8(self.segment_kind);
        buf.write_zeros(1);
        buf.write_i16(self.function_code);
        buf.write_zeros(8);
    }

    pub fn part_count(&self) -> Result<usize> {
        usize::try_from(self.part_count)
            .map_err(|_| Error::protocol(format!("Invalid part count: {}", self.part_count)))
    }
}

/// Reads whole reply messages from a byte stream.
pub struct MessageReader<S> {
    stream: S,
    /// Partial buffer for incomplete messages.
    partial_buf: BytesMut,
}

impl<S: AsyncRead + Unpin> MessageReader<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            partial_buf: BytesMut::new(),
        }
    }

    /// Get a mutable reference to the underlying stream.
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    async fn fill_to(&mut self, len: usize) -> Result<()> {
        while self.partial_buf.len() < len {
            let mut buf = [0u8; 4096];
            let n = self.stream.read(&mut buf).await?;
            if n == 0 {
                return Err(Error::ConnectionClosed);
            }
            self.partial_buf.extend_from_slice(&buf[..n]);
        }
        Ok(())
    }

    /// Read one message: header plus variable part.
    pub async fn read_message(&mut self) -> Result<Bytes> {
        self.fill_to(MESSAGE_HEADER_SIZE).await?;

        let varpart_length = u32::from_le_bytes([
            self.partial_buf[12],
            self.partial_buf[13],
            self.partial_buf[14],
            self.partial_buf[15],
        ]) as usize;
        let message_len = MESSAGE_HEADER_SIZE + varpart_length;
        self.fill_to(message_len).await?;

        Ok(self.partial_buf.split_to(message_len).freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_header_encode_decode() {
        let header = MessageHeader {
            session_id: 0x0102_0304,
            packet_count: 3,
            varpart_length: 48,
            varpart_size: 48,
            segment_count: 1,
        };
        let mut out = WriteBuffer::new();
        header.encode(&mut out);
        assert_eq!(out.len(), MESSAGE_HEADER_SIZE);

        let mut buf = ReadBuffer::new(out.freeze());
        assert_eq!(MessageHeader::decode(&mut buf).unwrap(), header);
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_segment_header_encode_decode() {
        let header = SegmentHeader {
            segment_length: 64,
            segment_offset: 0,
            part_count: 2,
            segment_number: 1,
            segment_kind: SEGMENT_KIND_REPLY,
            function_code: 5,
        };
        let mut out = WriteBuffer::new();
        header.encode(&mut out);
        assert_eq!(out.len(), SEGMENT_HEADER_SIZE);

        let mut buf = ReadBuffer::new(out.freeze());
        let decoded = SegmentHeader::decode(&mut buf).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(decoded.part_count().unwrap(), 2);
    }

    fn message(varpart: &[u8]) -> Vec<u8> {
        let header = MessageHeader {
            varpart_length: varpart.len() as u32,
            varpart_size: varpart.len() as u32,
            segment_count: 1,
            ..MessageHeader::default()
        };
        let mut out = WriteBuffer::new();
        header.encode(&mut out);
        out.write_bytes(varpart);
        out.as_bytes().to_vec()
    }

    #[tokio::test]
    async fn test_read_message_across_reads() {
        let wire = message(&[9; 40]);
        let stream = tokio_test::io::Builder::new()
            .read(&wire[..20])
            .read(&wire[20..50])
            .read(&wire[50..])
            .build();

        let mut reader = MessageReader::new(stream);
        let msg = reader.read_message().await.unwrap();
        assert_eq!(msg.len(), MESSAGE_HEADER_SIZE + 40);
        assert_eq!(&msg[..], &wire[..]);
    }

    #[tokio::test]
    async fn test_read_two_messages_in_one_read() {
        let mut wire = message(&[1; 8]);
        wire.extend(message(&[2; 16]));
        let stream = tokio_test::io::Builder::new().read(&wire).build();

        let mut reader = MessageReader::new(stream);
        let first = reader.read_message().await.unwrap();
        let second = reader.read_message().await.unwrap();
        assert_eq!(first.len(), MESSAGE_HEADER_SIZE + 8);
        assert_eq!(second[MESSAGE_HEADER_SIZE], 2);
    }

    #[tokio::test]
    async fn test_read_message_eof() {
        let wire = message(&[9; 40]);
        let stream = tokio_test::io::Builder::new().read(&wire[..40]).build();

        let mut reader = MessageReader::new(stream);
        assert!(matches!(
            reader.read_message().await,
            Err(Error::ConnectionClosed)
        ));
    }
}
