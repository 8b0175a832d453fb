use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Wire errors
    #[error("Malformed frame: {message}")]
    MalformedFrame { message: String },

    #[error("Invalid command code: {code}")]
    InvalidCommandCode { code: u8 },

    #[error("Checksum mismatch: expected {expected:02x}, got {actual:02x}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    // Write errors
    //
    // The Display text of `MessageTooLarge` is part of the public contract;
    // callers match on it verbatim.
    #[error("Too large data")]
    MessageTooLarge,

    // Configuration errors
    #[error("Block size {block_size} cannot fit a frame header")]
    BlockSizeTooSmall { block_size: usize },

    // Serializer errors
    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Deserialization failed: {0}")]
    Deserialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;
