use serde_json::Value;
use slotlink_core::StreamId;
use slotlink_protocol::StreamReceiver;

/// A receiver that records everything the engine hands it.
///
/// Used by the test suite to assert on delivered values, the order of
/// link-health signals, and the registered handle.
#[derive(Debug, Default)]
pub struct RecordingReceiver {
    registered: Option<StreamId>,
    data: Vec<Value>,
    timeout_signals: Vec<bool>,
}

impl RecordingReceiver {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle delivered at registration, if any.
    #[must_use]
    pub fn registered(&self) -> Option<StreamId> {
        self.registered
    }

    /// All values delivered so far, in arrival order.
    #[must_use]
    pub fn data(&self) -> &[Value] {
        &self.data
    }

    /// The most recently delivered value.
    #[must_use]
    pub fn last_data(&self) -> Option<&Value> {
        self.data.last()
    }

    /// Every `on_timeout` signal observed, in order.
    #[must_use]
    pub fn timeout_signals(&self) -> &[bool] {
        &self.timeout_signals
    }

    /// `true` if a timeout expiry has ever been signalled.
    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.timeout_signals.contains(&true)
    }

    /// Forget everything recorded so far (the registration survives).
    pub fn reset_recording(&mut self) {
        self.data.clear();
        self.timeout_signals.clear();
    }
}

impl StreamReceiver for RecordingReceiver {
    fn on_data(&mut self, value: Value) {
        self.data.push(value);
    }

    fn on_timeout(&mut self, timed_out: bool, _stream: StreamId) {
        self.timeout_signals.push(timed_out);
    }

    fn register_stream(&mut self, stream: StreamId) {
        self.registered = Some(stream);
    }
}
