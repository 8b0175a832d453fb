use crate::{Result, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Command kind carried by every frame.
///
/// Two of the four kinds flow controller→worker only (`Reset`, `Poll`);
/// `Ack` flows worker→controller; `Data` flows both ways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Command {
    /// Instruct the peer to drop its queues and partial assembly.
    Reset = 0,
    /// Content-free controller frame soliciting queued data or an `Ack`.
    Poll = 1,
    /// Content-free worker frame: nothing to send, still alive.
    Ack = 2,
    /// One chunk of a logical message.
    Data = 3,
}

impl Command {
    /// Create a command from its wire code.
    ///
    /// # Errors
    /// Returns `Error::InvalidCommandCode` if the value is not 0-3.
    #[inline]
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Command::Reset),
            1 => Ok(Command::Poll),
            2 => Ok(Command::Ack),
            3 => Ok(Command::Data),
            _ => Err(Error::InvalidCommandCode { code: value }),
        }
    }

    /// Convert the command to its wire code.
    #[inline]
    #[must_use]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Returns `true` for `Data` frames.
    #[inline]
    #[must_use]
    pub fn is_data(self) -> bool {
        matches!(self, Command::Data)
    }

    /// Returns `true` for the content-free control kinds.
    #[inline]
    #[must_use]
    pub fn is_control(self) -> bool {
        !self.is_data()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Command::Reset => write!(f, "Reset"),
            Command::Poll => write!(f, "Poll"),
            Command::Ack => write!(f, "Ack"),
            Command::Data => write!(f, "Data"),
        }
    }
}

/// The role an endpoint plays on the link.
///
/// The controller is the sole initiator; the worker speaks only in reply.
/// Both run the same engine with this discriminator consulted at tick
/// entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Controller,
    Worker,
}

impl Role {
    /// Derive the role from a transport's controller flag.
    #[inline]
    #[must_use]
    pub fn from_controller_flag(is_controller: bool) -> Self {
        if is_controller {
            Role::Controller
        } else {
            Role::Worker
        }
    }

    /// Returns `true` for the initiating side.
    #[inline]
    #[must_use]
    pub fn is_controller(self) -> bool {
        matches!(self, Role::Controller)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Role::Controller => write!(f, "controller"),
            Role::Worker => write!(f, "worker"),
        }
    }
}

/// Opaque handle identifying one stream engine.
///
/// Delivered by value to the receiver at registration so the application
/// can route later `write`/`tick` calls without holding a reference into
/// the engine. Handles are unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamId(u32);

static NEXT_STREAM_ID: AtomicU32 = AtomicU32::new(1);

impl StreamId {
    /// Allocate the next process-unique handle.
    #[must_use]
    pub fn next() -> Self {
        StreamId(NEXT_STREAM_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw handle value.
    #[must_use]
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "stream-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Command::Reset)]
    #[case(1, Command::Poll)]
    #[case(2, Command::Ack)]
    #[case(3, Command::Data)]
    fn test_command_from_u8_valid(#[case] code: u8, #[case] expected: Command) {
        assert_eq!(Command::from_u8(code).unwrap(), expected);
        assert_eq!(expected.to_u8(), code);
    }

    #[rstest]
    #[case(4)]
    #[case(99)]
    #[case(255)]
    fn test_command_from_u8_invalid(#[case] code: u8) {
        assert!(Command::from_u8(code).is_err());
    }

    #[test]
    fn test_command_classification() {
        assert!(Command::Data.is_data());
        assert!(!Command::Data.is_control());
        assert!(Command::Poll.is_control());
        assert!(Command::Ack.is_control());
        assert!(Command::Reset.is_control());
    }

    #[test]
    fn test_role_from_controller_flag() {
        assert_eq!(Role::from_controller_flag(true), Role::Controller);
        assert_eq!(Role::from_controller_flag(false), Role::Worker);
        assert!(Role::Controller.is_controller());
        assert!(!Role::Worker.is_controller());
    }

    #[test]
    fn test_stream_ids_are_unique() {
        let a = StreamId::next();
        let b = StreamId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_stream_id_display() {
        let id = StreamId::next();
        assert_eq!(format!("{}", id), format!("stream-{}", id.as_u32()));
    }
}
