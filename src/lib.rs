//! Result decoding for the HANA SQL command network protocol.
//!
//! Decodes the parts of a query reply: the result set identifier, the
//! column metadata with its offset-addressed name block, and the row data.
//! Reading whole messages from an async stream is supported through
//! [`MessageReader`]; connection setup and authentication are not.
//!
//! # Example
//!
//! ```no_run
//! use hdb_result::{decode_reply, MessageReader, ReplyOptions, Result};
//! use tokio::net::TcpStream;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let stream = TcpStream::connect("localhost:30015").await?;
//!     let mut reader = MessageReader::new(stream);
//!
//!     let message = reader.read_message().await?;
//!     let result = decode_reply(message, &ReplyOptions::default())?;
//!
//!     println!("columns: {:?}", result.column_names());
//!     for row in &result.rows {
//!         let values: Vec<String> = row.iter().map(|v| v.to_string()).collect();
//!         println!("{}", values.join(" | "));
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod protocol;

pub use error::{Error, Result};
pub use protocol::buffer::{ReadBuffer, WriteBuffer};
pub use protocol::decode::{FieldValueDecoder, RowDecoder};
pub use protocol::packet::MessageReader;
pub use protocol::parts::{self as parts, Part, PartKind};
pub use protocol::reply::{decode_reply, QueryResult, ReplyOptions};
pub use protocol::trace::{SharedTraceSink, TraceSink, TracingSink};
pub use protocol::types::{
    self as types, ColumnOptions, Field, FieldSet, HdbValue, LobValue, NameTable, ResultField,
    Row, TypeCode,
};
