//! Result metadata part: column descriptors plus their name block.
//!
//! Wire layout:
//! ```text
//! descriptor * num_arg   (24 bytes each, see ResultField::decode)
//! name block             short strings addressed by offset, with gaps
//! ```
//! Descriptors reference names by offset into the name block, so the block
//! can only be read after all descriptors are known. Names are read in
//! ascending offset order, skipping any gap between the end of one name
//! and the start of the next.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::protocol::buffer::{ReadBuffer, WriteBuffer};
use crate::protocol::trace::{emit, SharedTraceSink};
use crate::protocol::types::{FieldSet, NameTable, ResultField, RESULT_FIELD_SIZE};

use super::{Part, PartKind};

#[derive(Clone, Default)]
pub struct ResultMetadata {
    num_arg: usize,
    field_set: Option<Arc<FieldSet>>,
    size: Option<usize>,
    trace: Option<SharedTraceSink>,
}

impl ResultMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace(mut self, sink: SharedTraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    /// Decoded columns. `None` until a decode has completed successfully.
    pub fn field_set(&self) -> Option<&Arc<FieldSet>> {
        self.field_set.as_ref()
    }

    pub fn into_field_set(self) -> Option<Arc<FieldSet>> {
        self.field_set
    }
}

impl std::fmt::Debug for ResultMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultMetadata")
            .field("num_arg", &self.num_arg)
            .field("field_set", &self.field_set)
            .finish()
    }
}

/// Read the name block for every offset registered in `names`.
fn resolve_names(buf: &mut ReadBuffer, names: &mut NameTable) -> Result<()> {
    let offsets: Vec<u32> = names.offsets().collect();
    let mut pos: u64 = 0;
    for offset in offsets {
        let offset = offset as u64;
        if offset < pos {
            // Points into a name already read; left unresolved.
            continue;
        }
        buf.skip((offset - pos) as usize)?;
        let (name, size) = buf.read_short_string()?;
        names.set_name(offset as u32, name);
        pos = offset + 1 + size as u64;
    }
    Ok(())
}

impl Part for ResultMetadata {
    fn kind(&self) -> PartKind {
        PartKind::ResultMetadata
    }

    /// Known only once the part has been decoded.
    fn size(&self) -> Result<usize> {
        self.size.ok_or(Error::SizeUnknown { kind: self.kind() })
    }

    fn num_arg(&self) -> usize {
        self.num_arg
    }

    fn set_num_arg(&mut self, num_arg: usize) {
        self.num_arg = num_arg;
    }

    fn decode(&mut self, buf: &mut ReadBuffer) -> Result<()> {
        self.field_set = None;
        self.size = None;
        let start = buf.position();

        let mut names = NameTable::new();
        // The count comes from the part header; reserve no more than the
        // buffer can actually hold.
        let capacity = self.num_arg.min(buf.remaining() / RESULT_FIELD_SIZE);
        let mut fields = Vec::with_capacity(capacity);
        for _ in 0..self.num_arg {
            fields.push(ResultField::decode(buf, &mut names)?);
        }
        resolve_names(buf, &mut names)?;
        buf.check()?;

        let field_set = FieldSet::new(fields, names);
        if self.trace.is_some() {
            emit(
                self.trace.as_ref(),
                &format_args!("result metadata: {} fields", field_set.len()),
            );
            for field in field_set.iter() {
                emit(self.trace.as_ref(), &field);
            }
        }

        self.size = Some(buf.position() - start);
        self.field_set = Some(Arc::new(field_set));
        Ok(())
    }

    fn encode(&self, _buf: &mut WriteBuffer) -> Result<()> {
        Err(Error::Unsupported {
            operation: "encode result metadata",
        })
    }
}
