//! Resultset id part.

use crate::error::Result;
use crate::protocol::buffer::{ReadBuffer, WriteBuffer};
use crate::protocol::trace::{emit, SharedTraceSink};

use super::{Part, PartKind};

/// Wire size of a resultset id.
pub const RESULTSET_ID_SIZE: usize = 8;

/// Opaque handle of a server-side result set cursor.
#[derive(Clone, Default)]
pub struct ResultsetId {
    id: u64,
    trace: Option<SharedTraceSink>,
}

impl ResultsetId {
    pub fn new(id: u64) -> Self {
        Self { id, trace: None }
    }

    pub fn with_trace(mut self, sink: SharedTraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl std::fmt::Debug for ResultsetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultsetId").field("id", &self.id).finish()
    }
}

impl Part for ResultsetId {
    fn kind(&self) -> PartKind {
        PartKind::ResultsetId
    }

    fn size(&self) -> Result<usize> {
        Ok(RESULTSET_ID_SIZE)
    }

    fn num_arg(&self) -> usize {
        1
    }

    /// A resultset id part always carries exactly one id. The count from
    /// the header is not validated: the server sends one id per part and
    /// any other count is ignored rather than reported.
    fn set_num_arg(&mut self, _num_arg: usize) {}

    fn decode(&mut self, buf: &mut ReadBuffer) -> Result<()> {
        self.id = buf.read_u64()?;
        emit(self.trace.as_ref(), &format_args!("resultset id: {}", self.id));
        buf.check()
    }

    fn encode(&self, buf: &mut WriteBuffer) -> Result<()> {
        buf.write_u64(self.id);
        emit(self.trace.as_ref(), &format_args!("resultset id: {}", self.id));
        Ok(())
    }
}
