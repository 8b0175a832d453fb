//! The stream engine: a reliable, chunked, half-duplex message stream over
//! a single-slot poll/response transport.
//!
//! # Why the controller drives
//!
//! The transport is not a FIFO: each side only ever sees the peer's most
//! recent write, and reads do not drain. A request/response shape is
//! emulated by making one endpoint (the controller) the sole initiator:
//! the worker transmits only in reply to a `Poll` or `Data` frame. The
//! controller keeps at most one frame in flight, which bounds buffering on
//! both sides and lets a one-digit sequence counter resolve re-reads of a
//! frame that was never consumed destructively.
//!
//! # Tick anatomy
//!
//! `tick` runs once per host scheduler callback and performs, in order:
//! read + decode, duplicate suppression, role dispatch, timeout detection,
//! and (controller only) the keepalive send. The engine does no background
//! work and holds no locks; all state mutation happens inside `tick` and
//! `write` on the caller's thread.

use crate::{
    assembler::MessageAssembler,
    chunker::Chunker,
    frame::Frame,
    receiver::StreamReceiver,
    serializer::{JsonSerializer, Serializer},
    transport::Transport,
};
use bytes::Bytes;
use serde_json::Value;
use slotlink_core::{
    Command, Error, Result, Role, StreamId,
    constants::{HEADER_SIZE, SEQ_MODULO},
};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Pre-encoded frames awaiting transmission plus the sender-side
/// bookkeeping for the one-outstanding discipline.
#[derive(Debug, Default)]
struct OutputQueue {
    frames: VecDeque<Bytes>,
    waiting_for_reply: bool,
    seq: u8,
}

impl OutputQueue {
    /// Stamp of the next outgoing frame. Advances by exactly one (mod 10)
    /// per encoded frame, control frames included.
    fn next_seq(&mut self) -> u8 {
        let seq = self.seq;
        self.seq = (self.seq + 1) % SEQ_MODULO;
        seq
    }

    fn push(&mut self, frame: Bytes) {
        self.frames.push_back(frame);
    }

    fn pop(&mut self) -> Option<Bytes> {
        self.frames.pop_front()
    }

    fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drop queued frames and release the in-flight slot. The sequence
    /// counter survives: the peer's duplicate filter tracks it.
    fn drop_frames(&mut self) {
        self.frames.clear();
        self.waiting_for_reply = false;
    }
}

/// One endpoint of the stream, bound to a transport, a receiver, and a
/// timeout.
///
/// Both peers run this same engine; the role flag read from the transport
/// at construction selects the controller or worker branch at tick entry.
///
/// # Example
///
/// ```ignore
/// let mut stream = Stream::new(transport, receiver, Duration::from_secs(1))?;
/// stream.write(&serde_json::json!({"cmd": "status"}))?;
/// // ...from the host's per-frame callback:
/// stream.tick()?;
/// ```
pub struct Stream<T: Transport, R: StreamReceiver, S: Serializer = JsonSerializer> {
    id: StreamId,
    role: Role,
    transport: T,
    receiver: R,
    serializer: S,
    timeout: Duration,
    chunker: Chunker,
    output: OutputQueue,
    /// Sequence of the last accepted inbound frame; `None` until the first
    /// frame arrives.
    input_seq: Option<u8>,
    assembler: MessageAssembler,
    /// When the last parseable frame arrived, duplicates included.
    last_received: Instant,
}

impl<T: Transport, R: StreamReceiver> Stream<T, R> {
    /// Create an engine with the default JSON serializer.
    ///
    /// Clears the transport's outbound slot and hands the receiver its
    /// stream handle before returning.
    ///
    /// # Errors
    /// Returns `Error::BlockSizeTooSmall` if the transport's block size
    /// cannot fit a frame header plus at least one payload byte.
    pub fn new(transport: T, receiver: R, timeout: Duration) -> Result<Self> {
        Self::with_serializer(transport, receiver, timeout, JsonSerializer)
    }
}

impl<T: Transport, R: StreamReceiver, S: Serializer> Stream<T, R, S> {
    /// Create an engine with a custom serializer implementation.
    ///
    /// # Errors
    /// Returns `Error::BlockSizeTooSmall` if the transport's block size
    /// cannot fit a frame header plus at least one payload byte.
    pub fn with_serializer(
        mut transport: T,
        mut receiver: R,
        timeout: Duration,
        serializer: S,
    ) -> Result<Self> {
        let block_size = transport.block_size();
        if block_size <= HEADER_SIZE {
            return Err(Error::BlockSizeTooSmall { block_size });
        }

        transport.clear();
        let id = StreamId::next();
        receiver.register_stream(id);
        let role = Role::from_controller_flag(transport.is_controller());
        debug!(stream = %id, %role, block_size, "stream created");

        Ok(Stream {
            id,
            role,
            transport,
            receiver,
            serializer,
            timeout,
            chunker: Chunker::new(block_size - HEADER_SIZE),
            output: OutputQueue::default(),
            input_seq: None,
            assembler: MessageAssembler::new(),
            last_received: Instant::now(),
        })
    }

    /// The handle delivered to the receiver at registration.
    #[must_use]
    pub fn id(&self) -> StreamId {
        self.id
    }

    /// The role this endpoint plays.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// `true` while queued frames remain untransmitted.
    #[must_use]
    pub fn waiting_to_send(&self) -> bool {
        !self.output.is_empty()
    }

    /// Borrow the receiver.
    #[must_use]
    pub fn receiver(&self) -> &R {
        &self.receiver
    }

    /// Mutably borrow the receiver.
    pub fn receiver_mut(&mut self) -> &mut R {
        &mut self.receiver
    }

    /// Queue a value for transmission.
    ///
    /// The value is serialized, split into frame-sized chunks, and each
    /// chunk is sequence-stamped and encoded immediately; delivery order
    /// across `write` calls is call order. Transmission happens from
    /// subsequent ticks.
    ///
    /// # Errors
    /// Returns `Error::MessageTooLarge` (Display text `Too large data`) if
    /// the serialized value would need more than 999 chunks; nothing is
    /// queued. Serializer failures propagate as `Error::Serialization`.
    pub fn write(&mut self, value: &Value) -> Result<()> {
        let serialized = self.serializer.serialize(value)?;
        let chunks = self.chunker.split(&serialized)?;
        debug!(
            stream = %self.id,
            len = serialized.len(),
            chunks = chunks.len(),
            "message queued"
        );
        for chunk in chunks {
            let frame = Frame::data(
                chunk.first,
                chunk.checksum,
                chunk.remaining,
                self.output.next_seq(),
                chunk.payload,
            );
            self.output.push(frame.encode());
        }
        Ok(())
    }

    /// Drop all local queue state and instruct the peer to do the same.
    ///
    /// Queues a `Reset` frame; the peer answers with an `Ack` after
    /// clearing its own queues. Sequence counters on both sides are left
    /// alone so duplicate suppression keeps working across the reset.
    pub fn reset(&mut self) {
        debug!(stream = %self.id, "local reset requested");
        self.output.drop_frames();
        self.assembler.clear();
        let frame = Frame::control(Command::Reset, self.output.next_seq()).encode();
        self.output.push(frame);
    }

    /// Run one protocol step. Call once per host scheduler tick.
    ///
    /// Non-blocking; work per invocation is bounded by one frame parse,
    /// one frame emission, and at most one message delivery.
    ///
    /// # Errors
    /// Only deserialization failures bubble (the checksum already passed,
    /// so the bytes were transported faithfully; the sender and receiver
    /// disagree about the format). Line noise, duplicates, and checksum
    /// mismatches are recovered silently.
    pub fn tick(&mut self) -> Result<()> {
        let now = Instant::now();

        let raw = self.transport.read();
        let mut fresh = None;
        if !raw.is_empty() {
            match Frame::decode(&raw) {
                Ok(frame) => {
                    // Any parseable frame proves the peer is alive,
                    // duplicate or not.
                    self.last_received = now;
                    if self.input_seq == Some(frame.seq) {
                        trace!(stream = %self.id, seq = frame.seq, "duplicate frame suppressed");
                    } else {
                        self.input_seq = Some(frame.seq);
                        fresh = Some(frame);
                    }
                }
                Err(err) => {
                    trace!(stream = %self.id, %err, "unparseable frame discarded");
                }
            }
        }

        if let Some(frame) = fresh {
            trace!(stream = %self.id, %frame, "frame accepted");
            self.receiver.on_timeout(false, self.id);
            if frame.new {
                self.assembler.begin_new(frame.checksum);
            }
            match self.role {
                Role::Controller => self.dispatch_controller(frame)?,
                Role::Worker => self.dispatch_worker(frame)?,
            }
        }

        if now.duration_since(self.last_received) >= self.timeout {
            warn!(stream = %self.id, timeout_ms = self.timeout.as_millis() as u64, "link timed out");
            self.receiver.on_timeout(true, self.id);
            // Restarting the window rate-limits the signal to once per
            // timeout interval.
            self.last_received = now;
            self.output.drop_frames();
            self.assembler.clear();
        }

        if self.role.is_controller() && !self.output.waiting_for_reply {
            let frame = match self.output.pop() {
                Some(frame) => frame,
                None => Frame::control(Command::Poll, self.output.next_seq()).encode(),
            };
            self.transport.send(frame);
            self.output.waiting_for_reply = true;
        }

        Ok(())
    }

    fn dispatch_controller(&mut self, frame: Frame) -> Result<()> {
        let remaining = frame.remaining;
        if frame.command.is_data() {
            self.assembler.append(frame.payload);
            if let Some(message) = self.assembler.try_complete(remaining) {
                self.deliver(message)?;
            }
        }
        // Any reply, Data or control, releases the in-flight slot.
        self.output.waiting_for_reply = false;
        Ok(())
    }

    fn dispatch_worker(&mut self, frame: Frame) -> Result<()> {
        match frame.command {
            Command::Data => {
                let remaining = frame.remaining;
                self.assembler.append(frame.payload);
                if let Some(message) = self.assembler.try_complete(remaining) {
                    self.deliver(message)?;
                }
                self.reply();
            }
            Command::Poll => self.reply(),
            Command::Reset => {
                debug!(stream = %self.id, "peer requested reset");
                self.output.drop_frames();
                self.assembler.clear();
                let ack = Frame::control(Command::Ack, self.output.next_seq()).encode();
                self.transport.send(ack);
            }
            Command::Ack => {
                // The worker never initiates, so a stray Ack carries no
                // obligation.
            }
        }
        Ok(())
    }

    /// Answer the controller with the head of the output queue, or an
    /// `Ack` when there is nothing to send.
    fn reply(&mut self) {
        let frame = match self.output.pop() {
            Some(frame) => frame,
            None => Frame::control(Command::Ack, self.output.next_seq()).encode(),
        };
        self.transport.send(frame);
    }

    fn deliver(&mut self, message: Bytes) -> Result<()> {
        let value = self.serializer.deserialize(&message)?;
        debug!(stream = %self.id, len = message.len(), "message delivered");
        self.receiver.on_data(value);
        Ok(())
    }
}
