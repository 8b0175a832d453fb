//! In-memory link emulation for the slot-link stream engine.
//!
//! This crate stands in for the host surfaces (screen, radio) the engine
//! runs against in production. It provides the loopback transport the test
//! suite drives, a receiver that records everything it is handed, and a
//! harness that wires two engines over one link with asymmetric tick
//! scheduling.

pub mod harness;
pub mod loopback;
pub mod receiver;

pub use harness::{EmulatedStream, StreamPair};
pub use loopback::{LoopbackLink, LoopbackTransport};
pub use receiver::RecordingReceiver;
