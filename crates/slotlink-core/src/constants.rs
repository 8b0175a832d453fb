//! Core constants for the slot-link wire protocol.
//!
//! This module defines all protocol-level constants used throughout the
//! workspace. The wire unit is a single frame, an ASCII header followed by
//! an opaque payload:
//!
//! ```text
//! #<new>|<cksum>|<remaining>|<seq>|<cmd>|<payload>
//! ```
//!
//! Where:
//! - `#` - frame lead-in byte
//! - `new` - 1 digit, `1` on the first chunk of a logical message
//! - `cksum` - 2 lowercase hex digits, XOR of the whole message's bytes
//! - `remaining` - 3 digits, chunks still to follow after this one
//! - `seq` - 1 digit, per-sender frame counter cycling 0-9
//! - `cmd` - 2 digits, command kind
//! - `|` - field separator
//!
//! # Header budget
//!
//! The header charged against a transport's block size is [`HEADER_SIZE`]
//! (13 bytes: the five numeric fields plus the four separators between
//! them). The lead-in byte and the separator preceding the payload sit
//! outside that figure, so the literal prefix before the payload is
//! [`ENCODED_HEADER_LEN`] (15 bytes). The 13-byte budget is load-bearing:
//! it fixes the guaranteed message ceiling at
//! `999 × (block_size - 13)` bytes.

// ============================================================================
// Frame layout
// ============================================================================

/// Frame lead-in byte.
///
/// Every well-formed frame starts with this byte; anything else is
/// discarded as line noise.
pub const FRAME_LEAD_IN: u8 = b'#';

/// Field separator inside the frame header.
///
/// The payload is opaque and may itself contain this byte, which is why
/// decoding is positional rather than split-based.
pub const FIELD_SEPARATOR: u8 = b'|';

/// Header budget charged against the transport block size.
///
/// # Examples
///
/// ```
/// use slotlink_core::constants::HEADER_SIZE;
///
/// let block_size = 1024;
/// let data_size = block_size - HEADER_SIZE;
/// assert_eq!(data_size, 1011);
/// ```
pub const HEADER_SIZE: usize = 13;

/// Exact byte length of the encoded prefix before the payload.
///
/// Lead-in + 13-byte header + the separator preceding the payload.
pub const ENCODED_HEADER_LEN: usize = 15;

/// Width of the `new` flag field (digits).
pub const NEW_FLAG_WIDTH: usize = 1;

/// Width of the checksum field (lowercase hex digits).
pub const CHECKSUM_WIDTH: usize = 2;

/// Width of the remaining-chunk-count field (zero-padded digits).
pub const REMAINING_WIDTH: usize = 3;

/// Width of the sequence-number field (digits).
pub const SEQ_WIDTH: usize = 1;

/// Width of the command field (zero-padded digits).
pub const COMMAND_WIDTH: usize = 2;

// ============================================================================
// Protocol limits
// ============================================================================

/// Maximum number of chunks a single logical message may occupy.
///
/// Bounded by the 3-digit `remaining` field. A write that would need more
/// chunks is rejected outright; nothing is queued.
///
/// # Examples
///
/// ```
/// use slotlink_core::constants::{HEADER_SIZE, MAX_CHUNKS};
///
/// // The design ceiling for a 1024-byte block transport: ~1 MB.
/// let ceiling = MAX_CHUNKS as usize * (1024 - HEADER_SIZE);
/// assert_eq!(ceiling, 1_009_989);
/// ```
pub const MAX_CHUNKS: u16 = 999;

/// Modulus of the per-sender sequence counter.
///
/// One decimal digit suffices because each side has at most one frame
/// outstanding; the counter exists purely for duplicate suppression on a
/// non-destructive transport.
pub const SEQ_MODULO: u8 = 10;

// ============================================================================
// Transport expectations
// ============================================================================

/// Smallest block size the engine accepts.
///
/// A transport must at least fit the header plus one payload byte per
/// frame; in practice hosts offer 256, 512, or 1024.
pub const MIN_BLOCK_SIZE: usize = HEADER_SIZE + 1;

/// Block size of the common host surface.
pub const DEFAULT_BLOCK_SIZE: usize = 1024;

// ============================================================================
// Timeouts
// ============================================================================

/// Default link timeout in milliseconds.
///
/// If no parseable frame arrives within this window the engine signals the
/// receiver, drops queued output, and keeps polling. Timeout signals are
/// rate-limited to once per window.
pub const DEFAULT_TIMEOUT_MILLIS: u64 = 1000;
