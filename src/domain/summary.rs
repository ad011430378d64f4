/// Outcome of a successful push.
///
/// A push can succeed while the endpoint rejected some of its chunks; those
/// are counted in `rejected_chunks` rather than surfaced as an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushSummary {
    pub lines: usize,
    pub chunks: usize,
    pub rejected_chunks: usize,
    /// Uncompressed bytes across all sent documents.
    pub bytes: usize,
}

impl PushSummary {
    pub fn record_chunk(&mut self, lines: usize, bytes: usize, rejected: bool) {
        self.lines += lines;
        self.chunks += 1;
        self.bytes += bytes;
        if rejected {
            self.rejected_chunks += 1;
        }
    }

    pub fn all_accepted(&self) -> bool {
        self.rejected_chunks == 0
    }
}
