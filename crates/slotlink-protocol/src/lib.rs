pub mod assembler;
pub mod chunker;
pub mod frame;
pub mod receiver;
pub mod serializer;
pub mod stream;
pub mod transport;

pub use assembler::MessageAssembler;
pub use chunker::{Chunk, Chunker};
pub use frame::Frame;
pub use receiver::StreamReceiver;
pub use serializer::{JsonSerializer, Serializer};
pub use stream::Stream;
pub use transport::Transport;

// The application value type used throughout the receiver and serializer
// contracts.
pub use serde_json::Value;
