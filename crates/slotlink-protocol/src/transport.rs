use bytes::Bytes;

/// The five-operation contract a host transport must satisfy.
///
/// The underlying channel is a pair of single-slot mailboxes, one per
/// direction: `send` atomically replaces this endpoint's outbound slot and
/// `read` returns whatever currently sits in the inbound slot. Neither side
/// can tell whether a slot has been read by the peer, and reading does not
/// drain: successive `read` calls may return the same frame, which is why
/// the engine suppresses duplicates by sequence number instead of relying
/// on destructive consumption.
///
/// Real hosts supply a screen input/output surface or a radio
/// emitter/receiver pair; the test suite uses the in-memory loopback from
/// `slotlink-emulator`.
pub trait Transport {
    /// Atomically replace the outbound slot with `frame`. Infallible; the
    /// host surface has no error path.
    fn send(&mut self, frame: Bytes);

    /// Return the current inbound slot. Idempotent and non-destructive; an
    /// empty result means no frame has ever been written.
    fn read(&mut self) -> Bytes;

    /// Best-effort drain of the outbound slot; may be a no-op.
    fn clear(&mut self);

    /// Maximum frame size this transport transmits intact.
    fn block_size(&self) -> usize;

    /// The role this endpoint plays on the link.
    fn is_controller(&self) -> bool;
}
