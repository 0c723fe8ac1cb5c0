//! Error types for the result decoding layer.

use std::io;
use std::panic::Location;
use thiserror::Error;

use crate::protocol::parts::PartKind;

/// Result type alias for decode operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for result decoding.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from the underlying transport.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Short read: the frame ended before the requested bytes.
    #[error("Buffer too small: need {needed} bytes, have {available} filed at {location}")]
    BufferTooSmall {
        needed: usize,
        available: usize,
        location: &'static Location<'static>,
    },

    /// Connection closed while a message was being read.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Result metadata is read-only.
    #[error("read-only metadata; binary/character large-object streaming must be attached externally")]
    LobReaderUnsupported,

    /// Operation not available on this part.
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: &'static str },

    /// Wire size of a part cannot be determined yet.
    #[error("Size of {kind} part is unknown")]
    SizeUnknown { kind: PartKind },

    /// Row value of a type the decoder does not handle.
    #[error("Unsupported type code: {type_code}")]
    UnsupportedType { type_code: i8 },

    /// Protocol error.
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// Column index out of bounds.
    #[error("Column index {index} out of bounds (columns: {count})")]
    ColumnIndexOutOfBounds { index: usize, count: usize },
}

impl Error {
    /// Create a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Whether this error came from reading the byte stream.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Error::Io(_) | Error::BufferTooSmall { .. } | Error::ConnectionClosed
        )
    }

    /// Whether this error reports a missing capability rather than bad data.
    pub fn is_capability(&self) -> bool {
        matches!(self, Error::LobReaderUnsupported | Error::Unsupported { .. })
    }
}
