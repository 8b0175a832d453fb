use bytes::{BufMut, Bytes, BytesMut};
use slotlink_core::{Command, Error, Result, constants::*};
use std::fmt;

/// Frame represents the byte-level wire unit of the slot-link protocol.
///
/// Exactly one frame sits on the transport in each direction at any time;
/// the peer overwrites its slot on every send and a read may observe the
/// same frame repeatedly. A frame is an ASCII header followed by an opaque
/// payload:
///
/// ```text
/// #<new>|<cksum>|<remaining>|<seq>|<cmd>|<payload>
///  ^     ^       ^           ^     ^     ^
///  1dig  2hex    3dig        1dig  2dig  0..data_size bytes
/// ```
///
/// Width discipline is mandatory: the header is fixed-position, so decoding
/// never scans for separators and the payload is free to contain `|`.
///
/// # Basic Usage
///
/// ```
/// use slotlink_protocol::Frame;
/// use slotlink_core::Command;
///
/// let frame = Frame::data(true, 0x5a, 2, 7, b"chunk".as_ref().into());
/// let wire = frame.encode();
/// assert_eq!(&wire[..], b"#1|5a|002|7|03|chunk");
///
/// let decoded = Frame::decode(&wire).unwrap();
/// assert_eq!(decoded.command, Command::Data);
/// assert_eq!(decoded.remaining, 2);
/// assert_eq!(&decoded.payload[..], b"chunk");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// `true` on the first chunk of a new logical message. Control frames
    /// always carry `true`, which doubles as an assembly reset.
    pub new: bool,

    /// XOR of the whole logical message's bytes; nonzero only on the
    /// `new` frame of a Data message.
    pub checksum: u8,

    /// Chunks still to follow after this one; the final chunk carries 0.
    pub remaining: u16,

    /// Sender-side frame counter, cycling 0-9.
    pub seq: u8,

    /// Command kind.
    pub command: Command,

    /// Opaque payload bytes; empty on control frames.
    pub payload: Bytes,
}

// Fixed byte positions inside the encoded header.
const NEW_POS: usize = 1;
const CHECKSUM_POS: usize = 3;
const REMAINING_POS: usize = 6;
const SEQ_POS: usize = 10;
const COMMAND_POS: usize = 12;
const SEPARATOR_POS: [usize; 5] = [2, 5, 9, 11, 14];

impl Frame {
    /// Create a Data frame.
    pub fn data(new: bool, checksum: u8, remaining: u16, seq: u8, payload: Bytes) -> Self {
        Frame {
            new,
            checksum,
            remaining,
            seq,
            command: Command::Data,
            payload,
        }
    }

    /// Create a content-free control frame (`Reset`, `Poll`, or `Ack`).
    ///
    /// Control frames use `new=1`, `remaining=0`, checksum 0, and an empty
    /// payload.
    pub fn control(command: Command, seq: u8) -> Self {
        Frame {
            new: true,
            checksum: 0,
            remaining: 0,
            seq,
            command,
            payload: Bytes::new(),
        }
    }

    /// Encode the frame to its wire form.
    ///
    /// The caller is responsible for field ranges; the chunker never
    /// produces more than 999 remaining chunks and sequence stamping is
    /// already reduced mod 10.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        debug_assert!(self.remaining <= MAX_CHUNKS);
        debug_assert!(self.seq < SEQ_MODULO);

        let mut buf = BytesMut::with_capacity(ENCODED_HEADER_LEN + self.payload.len());
        let header = format!(
            "#{}|{:02x}|{:03}|{}|{:02}|",
            u8::from(self.new),
            self.checksum,
            self.remaining,
            self.seq,
            self.command.to_u8(),
        );
        buf.put_slice(header.as_bytes());
        buf.put_slice(&self.payload);
        buf.freeze()
    }

    /// Decode a candidate wire string.
    ///
    /// Parsing is total: anything that does not match the full fixed-width
    /// pattern is an error, which the tick loop treats as "no frame this
    /// tick".
    ///
    /// # Errors
    /// Returns `Error::MalformedFrame` for structural violations and
    /// `Error::InvalidCommandCode` for an unknown command.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        if raw.len() < ENCODED_HEADER_LEN {
            return Err(malformed(format!(
                "{} bytes is shorter than the {ENCODED_HEADER_LEN}-byte prefix",
                raw.len()
            )));
        }
        if raw[0] != FRAME_LEAD_IN {
            return Err(malformed(format!("missing lead-in, got 0x{:02x}", raw[0])));
        }
        for pos in SEPARATOR_POS {
            if raw[pos] != FIELD_SEPARATOR {
                return Err(malformed(format!("missing separator at byte {pos}")));
            }
        }

        let new = match raw[NEW_POS] {
            b'0' => false,
            b'1' => true,
            other => return Err(malformed(format!("new flag must be 0 or 1, got 0x{other:02x}"))),
        };
        let checksum = hex_pair(&raw[CHECKSUM_POS..CHECKSUM_POS + CHECKSUM_WIDTH])?;
        let remaining = decimal(&raw[REMAINING_POS..REMAINING_POS + REMAINING_WIDTH])?;
        let seq = decimal(&raw[SEQ_POS..SEQ_POS + SEQ_WIDTH])? as u8;
        let command = Command::from_u8(decimal(&raw[COMMAND_POS..COMMAND_POS + COMMAND_WIDTH])? as u8)?;
        let payload = Bytes::copy_from_slice(&raw[ENCODED_HEADER_LEN..]);

        Ok(Frame {
            new,
            checksum,
            remaining,
            seq,
            command,
            payload,
        })
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame[{} seq={} new={} remaining={} cksum={:02x} payload={}B]",
            self.command,
            self.seq,
            u8::from(self.new),
            self.remaining,
            self.checksum,
            self.payload.len()
        )
    }
}

fn malformed(message: String) -> Error {
    Error::MalformedFrame { message }
}

/// Parse a fixed-width run of ASCII decimal digits.
fn decimal(digits: &[u8]) -> Result<u16> {
    let mut value: u16 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return Err(malformed(format!("expected digit, got 0x{b:02x}")));
        }
        value = value * 10 + u16::from(b - b'0');
    }
    Ok(value)
}

/// Parse the two-digit hex checksum field (either case accepted).
fn hex_pair(digits: &[u8]) -> Result<u8> {
    let mut value: u8 = 0;
    for &b in digits {
        let nibble = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            b'A'..=b'F' => b - b'A' + 10,
            _ => return Err(malformed(format!("expected hex digit, got 0x{b:02x}"))),
        };
        value = (value << 4) | nibble;
    }
    Ok(value)
}
