//! Reply decoding: walks segments and parts and collects a query result.
//!
//! Result parts are dispatched on the kind in their header. Metadata must
//! arrive before the row data that depends on it. Parts of other kinds are
//! skipped by length.

use std::sync::Arc;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::protocol::buffer::ReadBuffer;
use crate::protocol::decode::{FieldValueDecoder, RowDecoder};
use crate::protocol::packet::{MessageHeader, SegmentHeader, SEGMENT_KIND_ERROR};
use crate::protocol::parts::{
    Part, PartAttributes, PartHeader, PartKind, ResultMetadata, Resultset, ResultsetId,
};
use crate::protocol::trace::SharedTraceSink;
use crate::protocol::types::{FieldSet, Row};

/// Options for decoding replies.
#[derive(Clone)]
pub struct ReplyOptions {
    trace: Option<SharedTraceSink>,
    row_decoder: Arc<dyn RowDecoder>,
}

impl ReplyOptions {
    pub fn new() -> Self {
        Self {
            trace: None,
            row_decoder: Arc::new(FieldValueDecoder),
        }
    }

    /// Report decoded parts to `sink`.
    ///
    /// # Example
    ///
    /// ```
    /// use hdb_result::{ReplyOptions, TracingSink};
    /// use std::sync::Arc;
    ///
    /// let options = ReplyOptions::new().with_trace(Arc::new(TracingSink));
    /// ```
    pub fn with_trace(mut self, sink: SharedTraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    /// Decode row values with `decoder` instead of [`FieldValueDecoder`].
    pub fn with_row_decoder(mut self, decoder: Arc<dyn RowDecoder>) -> Self {
        self.row_decoder = decoder;
        self
    }
}

impl Default for ReplyOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A result part, selected by the kind in its header.
#[derive(Debug)]
pub enum ResultPart {
    ResultsetId(ResultsetId),
    ResultMetadata(ResultMetadata),
    Resultset(Resultset),
}

impl ResultPart {
    /// Build the part for `kind`. `None` for kinds that are not result parts.
    ///
    /// Row data needs the columns of an earlier metadata part.
    pub fn for_kind(
        kind: PartKind,
        field_set: Option<&Arc<FieldSet>>,
        options: &ReplyOptions,
    ) -> Result<Option<Self>> {
        let part = match kind {
            PartKind::ResultsetId => {
                let mut part = ResultsetId::default();
                if let Some(sink) = &options.trace {
                    part = part.with_trace(sink.clone());
                }
                ResultPart::ResultsetId(part)
            }
            PartKind::ResultMetadata => {
                let mut part = ResultMetadata::new();
                if let Some(sink) = &options.trace {
                    part = part.with_trace(sink.clone());
                }
                ResultPart::ResultMetadata(part)
            }
            PartKind::Resultset => {
                let field_set = field_set
                    .ok_or_else(|| Error::protocol("Row data received before column metadata"))?;
                let mut part = Resultset::new(field_set.clone())
                    .with_row_decoder(options.row_decoder.clone());
                if let Some(sink) = &options.trace {
                    part = part.with_trace(sink.clone());
                }
                ResultPart::Resultset(part)
            }
            _ => return Ok(None),
        };
        Ok(Some(part))
    }

    pub fn as_part(&self) -> &dyn Part {
        match self {
            ResultPart::ResultsetId(part) => part,
            ResultPart::ResultMetadata(part) => part,
            ResultPart::Resultset(part) => part,
        }
    }

    pub fn as_part_mut(&mut self) -> &mut dyn Part {
        match self {
            ResultPart::ResultsetId(part) => part,
            ResultPart::ResultMetadata(part) => part,
            ResultPart::Resultset(part) => part,
        }
    }
}

/// Result parts collected from one reply.
#[derive(Debug, Default)]
pub struct QueryResult {
    /// Server-side cursor of the result set.
    pub resultset_id: Option<u64>,
    /// Column metadata.
    pub field_set: Option<Arc<FieldSet>>,
    /// Rows received in this reply.
    pub rows: Vec<Row>,
    /// Attributes of the last resultset part.
    pub attributes: PartAttributes,
}

impl QueryResult {
    /// Whether the server has sent the final rows of the result set.
    pub fn is_last_packet(&self) -> bool {
        self.attributes.is_last_packet()
    }

    /// Column display names, empty without metadata.
    pub fn column_names(&self) -> Vec<&str> {
        self.field_set
            .as_ref()
            .map(|fields| fields.column_names())
            .unwrap_or_default()
    }
}

/// Decode a complete reply message.
///
/// Any failure aborts the decode; no partial result is returned.
pub fn decode_reply(message: Bytes, options: &ReplyOptions) -> Result<QueryResult> {
    let mut buf = ReadBuffer::new(message);
    let header = MessageHeader::decode(&mut buf)?;
    let mut result = QueryResult::default();

    for _ in 0..header.segment_count.max(0) {
        let segment = SegmentHeader::decode(&mut buf)?;
        if segment.segment_kind == SEGMENT_KIND_ERROR {
            return Err(Error::protocol("Server returned an error segment"));
        }
        for _ in 0..segment.part_count()? {
            decode_part(&mut buf, &mut result, options)?;
        }
    }

    buf.check()?;
    Ok(result)
}

fn decode_part(
    buf: &mut ReadBuffer,
    result: &mut QueryResult,
    options: &ReplyOptions,
) -> Result<()> {
    let header = PartHeader::decode(buf)?;
    let length = header.buffer_length()?;
    let start = buf.position();

    let part = match header.part_kind() {
        Some(kind) => ResultPart::for_kind(kind, result.field_set.as_ref(), options)?,
        None => None,
    };

    match part {
        Some(mut part) => {
            let inner = part.as_part_mut();
            inner.set_num_arg(header.num_arg()?);
            inner.decode(buf)?;

            let consumed = buf.position() - start;
            if consumed > length {
                return Err(Error::protocol(format!(
                    "{} part overran its buffer: read {} of {} bytes",
                    inner.kind(),
                    consumed,
                    length
                )));
            }
            buf.skip(length - consumed)?;

            match part {
                ResultPart::ResultsetId(part) => result.resultset_id = Some(part.id()),
                ResultPart::ResultMetadata(part) => result.field_set = part.into_field_set(),
                ResultPart::Resultset(part) => {
                    result.attributes = header.attributes;
                    result.rows.extend(part.into_rows());
                }
            }
        }
        None => {
            tracing::debug!(kind = header.kind, length, "skipping part");
            buf.skip(length)?;
        }
    }

    // The last part of a message may be sent without padding.
    let padding = header.padding()?.min(buf.remaining());
    buf.skip(padding)
}
