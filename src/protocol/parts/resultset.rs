//! Resultset part: row data of a query result.
//!
//! Rows are laid out according to the columns of a previously decoded
//! [`ResultMetadata`](super::ResultMetadata) part. Value decoding is done by
//! a [`RowDecoder`]; this part only threads the row count and the columns
//! through and wraps the values into [`Row`]s.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::protocol::buffer::{ReadBuffer, WriteBuffer};
use crate::protocol::decode::{FieldValueDecoder, RowDecoder};
use crate::protocol::trace::{emit, SharedTraceSink};
use crate::protocol::types::{FieldSet, Row};

use super::{Part, PartKind};

#[derive(Clone)]
pub struct Resultset {
    num_arg: usize,
    field_set: Arc<FieldSet>,
    decoder: Arc<dyn RowDecoder>,
    rows: Vec<Row>,
    trace: Option<SharedTraceSink>,
}

impl Resultset {
    /// Create a resultset part for rows of `field_set`.
    pub fn new(field_set: Arc<FieldSet>) -> Self {
        Self {
            num_arg: 0,
            field_set,
            decoder: Arc::new(FieldValueDecoder),
            rows: Vec::new(),
            trace: None,
        }
    }

    pub fn with_row_decoder(mut self, decoder: Arc<dyn RowDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_trace(mut self, sink: SharedTraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    pub fn field_set(&self) -> &Arc<FieldSet> {
        &self.field_set
    }

    /// Decoded rows. Empty until a decode has completed successfully.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl std::fmt::Debug for Resultset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resultset")
            .field("num_arg", &self.num_arg)
            .field("columns", &self.field_set.len())
            .field("rows", &self.rows)
            .finish()
    }
}

impl Part for Resultset {
    fn kind(&self) -> PartKind {
        PartKind::Resultset
    }

    fn size(&self) -> Result<usize> {
        Err(Error::SizeUnknown { kind: self.kind() })
    }

    fn num_arg(&self) -> usize {
        self.num_arg
    }

    fn set_num_arg(&mut self, num_arg: usize) {
        self.num_arg = num_arg;
    }

    fn decode(&mut self, buf: &mut ReadBuffer) -> Result<()> {
        self.rows.clear();
        let values = self
            .decoder
            .decode_rows(self.num_arg, &self.field_set, buf)?;
        buf.check()?;

        self.rows = values
            .into_iter()
            .map(|values| Row::new(values, self.field_set.clone()))
            .collect();

        if self.trace.is_some() {
            emit(
                self.trace.as_ref(),
                &format_args!("resultset: {} rows", self.rows.len()),
            );
            for row in &self.rows {
                let values: Vec<String> = row.iter().map(|value| value.to_string()).collect();
                emit(self.trace.as_ref(), &format_args!("[{}]", values.join(", ")));
            }
        }
        Ok(())
    }

    fn encode(&self, _buf: &mut WriteBuffer) -> Result<()> {
        Err(Error::Unsupported {
            operation: "encode resultset",
        })
    }
}
