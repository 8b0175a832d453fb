use bytes::{BufMut, Bytes, BytesMut};
use slotlink_core::checksum::xor_checksum;
use tracing::{debug, warn};

/// Accumulates payload chunks for the one logical message currently in
/// flight and gates delivery on the whole-message checksum.
///
/// At most one message is ever under assembly. A `new=1` frame discards
/// whatever partial state exists; the sender has moved on, so must the
/// receiver. Completion clears the assembler whether or not the checksum
/// holds; a mismatch is dropped silently and the sender never learns.
#[derive(Debug, Default)]
pub struct MessageAssembler {
    chunks: Vec<Bytes>,
    expected_checksum: u8,
}

impl MessageAssembler {
    /// Create an empty assembler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over for a new logical message, capturing its announced
    /// checksum.
    pub fn begin_new(&mut self, checksum: u8) {
        self.chunks.clear();
        self.expected_checksum = checksum;
    }

    /// Push one payload chunk at the tail.
    pub fn append(&mut self, payload: Bytes) {
        self.chunks.push(payload);
    }

    /// If `remaining` says the message is complete, concatenate and verify.
    ///
    /// Returns the assembled message bytes when the final chunk has
    /// arrived and the XOR over the concatenation equals the captured
    /// checksum. Returns `None` while the message is still partial and on
    /// checksum mismatch; either way the buffered chunks are gone once the
    /// final chunk has been seen.
    pub fn try_complete(&mut self, remaining: u16) -> Option<Bytes> {
        if remaining > 0 {
            return None;
        }

        let mut message = BytesMut::with_capacity(self.chunks.iter().map(Bytes::len).sum());
        for chunk in self.chunks.drain(..) {
            message.put_slice(&chunk);
        }
        let message = message.freeze();

        let actual = xor_checksum(&message);
        if actual != self.expected_checksum {
            warn!(
                expected = self.expected_checksum,
                actual,
                len = message.len(),
                "dropping assembled message on checksum mismatch"
            );
            return None;
        }

        debug!(len = message.len(), "assembled message passed checksum");
        Some(message)
    }

    /// Drop any partial assembly.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.expected_checksum = 0;
    }

    /// Number of chunks buffered so far.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}
