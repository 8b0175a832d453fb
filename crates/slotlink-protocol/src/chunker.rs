use bytes::Bytes;
use slotlink_core::{Error, Result, checksum::xor_checksum, constants::MAX_CHUNKS};

/// One payload slice of a logical message, ready to be stamped with a
/// sequence number and encoded as a Data frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// `true` on the first chunk only.
    pub first: bool,

    /// Chunks still to follow after this one.
    pub remaining: u16,

    /// Whole-message XOR checksum on the first chunk, 0 otherwise.
    pub checksum: u8,

    /// The payload slice.
    pub payload: Bytes,
}

/// Splits serialized messages into frame-sized chunks.
///
/// The chunker owns the per-transport payload budget (`block_size - 13`)
/// and nothing else; sequence stamping and frame encoding stay with the
/// stream's output queue so that control frames interleave correctly.
///
/// # Examples
///
/// ```
/// use slotlink_protocol::Chunker;
///
/// let chunker = Chunker::new(4);
/// let chunks = chunker.split(b"abcdefgh.").unwrap();
///
/// assert_eq!(chunks.len(), 3);
/// assert!(chunks[0].first);
/// assert_eq!(chunks[0].remaining, 2);
/// assert_eq!(chunks[2].remaining, 0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    data_size: usize,
}

impl Chunker {
    /// Create a chunker with the given per-frame payload budget.
    #[must_use]
    pub fn new(data_size: usize) -> Self {
        debug_assert!(data_size > 0);
        Chunker { data_size }
    }

    /// Get the per-frame payload budget.
    #[must_use]
    pub fn data_size(&self) -> usize {
        self.data_size
    }

    /// Split a serialized message into chunks with descending remaining
    /// counts.
    ///
    /// An empty message still produces one empty chunk; the peer needs a
    /// frame to assemble and deliver. The whole-message checksum is
    /// computed here, once, and attached to the first chunk.
    ///
    /// # Errors
    /// Returns `Error::MessageTooLarge` if the message would not fit in
    /// 999 chunks. Nothing is produced in that case.
    pub fn split(&self, message: &[u8]) -> Result<Vec<Chunk>> {
        let count = message.len().div_ceil(self.data_size).max(1);
        if count > MAX_CHUNKS as usize {
            return Err(Error::MessageTooLarge);
        }

        let checksum = xor_checksum(message);
        let message = Bytes::copy_from_slice(message);

        let mut chunks = Vec::with_capacity(count);
        for index in 0..count {
            let start = index * self.data_size;
            let end = (start + self.data_size).min(message.len());
            let first = index == 0;
            chunks.push(Chunk {
                first,
                remaining: (count - 1 - index) as u16,
                checksum: if first { checksum } else { 0 },
                payload: message.slice(start..end),
            });
        }
        Ok(chunks)
    }
}
