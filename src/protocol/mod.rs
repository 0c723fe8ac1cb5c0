//! Wire protocol: buffers, reply framing, parts and value decoding.

pub mod buffer;
pub mod decode;
pub mod packet;
pub mod parts;
pub mod reply;
pub mod trace;
pub mod types;

pub use buffer::{ReadBuffer, WriteBuffer};
pub use decode::{FieldValueDecoder, RowDecoder};
pub use packet::{MessageHeader, MessageReader, SegmentHeader};
pub use parts::{
    Part, PartAttributes, PartHeader, PartKind, ResultMetadata, Resultset, ResultsetId,
};
pub use reply::{decode_reply, QueryResult, ReplyOptions, ResultPart};
pub use trace::{SharedTraceSink, TraceSink, TracingSink};
pub use types::{Field, FieldSet, HdbValue, NameTable, ResultField, Row, TypeCode};
