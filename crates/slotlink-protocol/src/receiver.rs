use serde_json::Value;
use slotlink_core::StreamId;

/// The upward-facing contract application code implements to consume a
/// stream.
///
/// All three callbacks run inside `Stream::tick` (or `Stream::new` for
/// registration) on the single cooperative thread; implementations must
/// not call back into the stream from within them.
pub trait StreamReceiver {
    /// Invoked exactly once per successfully assembled, checksum-valid
    /// logical message.
    fn on_data(&mut self, value: Value);

    /// Link-health signal. Invoked with `false` on every tick that
    /// delivers a fresh frame, and with `true` each time the timeout
    /// window elapses with nothing parseable arriving.
    fn on_timeout(&mut self, timed_out: bool, stream: StreamId);

    /// Invoked once at engine construction with the handle the
    /// application should use to route later `write`/`tick` calls. The
    /// default implementation ignores the handle.
    fn register_stream(&mut self, stream: StreamId) {
        let _ = stream;
    }
}
