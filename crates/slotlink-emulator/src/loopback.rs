use bytes::Bytes;
use slotlink_core::Role;
use slotlink_protocol::Transport;
use std::sync::{Arc, Mutex};

/// The two mailbox slots of an emulated link, one per direction.
#[derive(Debug, Default)]
struct Slots {
    from_controller: Bytes,
    from_worker: Bytes,
}

/// An in-memory link: two single-slot mailboxes shared by a controller
/// endpoint and a worker endpoint.
///
/// The loopback reproduces the awkward properties of the real host
/// surfaces: a send overwrites whatever the previous send left in the
/// slot, a read returns the current slot without draining it, and neither
/// side can tell whether the peer has looked. The link handle itself
/// doubles as the fault injector: tests can inspect, corrupt, or drop the
/// frame currently in flight in either direction.
///
/// # Examples
///
/// ```
/// use slotlink_emulator::LoopbackLink;
/// use slotlink_protocol::Transport;
/// use bytes::Bytes;
///
/// let link = LoopbackLink::new(1024);
/// let (mut controller, mut worker) = link.endpoints();
///
/// controller.send(Bytes::from_static(b"#1|00|000|0|01|"));
/// assert_eq!(&worker.read()[..], b"#1|00|000|0|01|");
/// // Reads do not drain.
/// assert_eq!(&worker.read()[..], b"#1|00|000|0|01|");
/// ```
#[derive(Debug, Clone)]
pub struct LoopbackLink {
    slots: Arc<Mutex<Slots>>,
    block_size: usize,
}

impl LoopbackLink {
    /// Create a link with the given block size.
    #[must_use]
    pub fn new(block_size: usize) -> Self {
        LoopbackLink {
            slots: Arc::new(Mutex::new(Slots::default())),
            block_size,
        }
    }

    /// Get the controller and worker endpoints, in that order.
    #[must_use]
    pub fn endpoints(&self) -> (LoopbackTransport, LoopbackTransport) {
        (
            LoopbackTransport {
                slots: Arc::clone(&self.slots),
                role: Role::Controller,
                block_size: self.block_size,
            },
            LoopbackTransport {
                slots: Arc::clone(&self.slots),
                role: Role::Worker,
                block_size: self.block_size,
            },
        )
    }

    /// The frame currently in flight from the given side.
    #[must_use]
    pub fn in_flight(&self, from: Role) -> Bytes {
        let slots = self.lock();
        match from {
            Role::Controller => slots.from_controller.clone(),
            Role::Worker => slots.from_worker.clone(),
        }
    }

    /// Corrupt the frame currently in flight from the given side, as if
    /// the channel damaged it mid-transit.
    pub fn tamper<F>(&self, from: Role, tamper: F)
    where
        F: FnOnce(&mut Vec<u8>),
    {
        let mut slots = self.lock();
        let slot = match from {
            Role::Controller => &mut slots.from_controller,
            Role::Worker => &mut slots.from_worker,
        };
        let mut bytes = slot.to_vec();
        tamper(&mut bytes);
        *slot = Bytes::from(bytes);
    }

    /// Lose the frame currently in flight from the given side.
    pub fn drop_frame(&self, from: Role) {
        let mut slots = self.lock();
        match from {
            Role::Controller => slots.from_controller = Bytes::new(),
            Role::Worker => slots.from_worker = Bytes::new(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slots> {
        self.slots.lock().expect("loopback link lock poisoned")
    }
}

/// One endpoint of a [`LoopbackLink`].
#[derive(Debug)]
pub struct LoopbackTransport {
    slots: Arc<Mutex<Slots>>,
    role: Role,
    block_size: usize,
}

impl Transport for LoopbackTransport {
    fn send(&mut self, frame: Bytes) {
        let mut slots = self.slots.lock().expect("loopback link lock poisoned");
        match self.role {
            Role::Controller => slots.from_controller = frame,
            Role::Worker => slots.from_worker = frame,
        }
    }

    fn read(&mut self) -> Bytes {
        let slots = self.slots.lock().expect("loopback link lock poisoned");
        match self.role {
            Role::Controller => slots.from_worker.clone(),
            Role::Worker => slots.from_controller.clone(),
        }
    }

    fn clear(&mut self) {
        let mut slots = self.slots.lock().expect("loopback link lock poisoned");
        match self.role {
            Role::Controller => slots.from_controller = Bytes::new(),
            Role::Worker => slots.from_worker = Bytes::new(),
        }
    }

    fn block_size(&self) -> usize {
        self.block_size
    }

    fn is_controller(&self) -> bool {
        self.role.is_controller()
    }
}
