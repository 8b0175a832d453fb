use crate::{LoopbackLink, LoopbackTransport, RecordingReceiver};
use slotlink_core::Result;
use slotlink_protocol::Stream;
use std::time::Duration;

/// A stream engine bound to a loopback endpoint and a recording receiver.
pub type EmulatedStream = Stream<LoopbackTransport, RecordingReceiver>;

/// Two engines wired over one loopback link.
///
/// The harness exists so tests can interleave the two tick loops any way
/// they like: strictly alternating, controller-only (a dead worker), or
/// skewed ratios that approximate the asynchrony of two real hosts.
///
/// # Examples
///
/// ```
/// use slotlink_emulator::StreamPair;
/// use serde_json::json;
/// use std::time::Duration;
///
/// let mut pair = StreamPair::new(1024, Duration::from_secs(1)).unwrap();
/// pair.controller.write(&json!("1234567890")).unwrap();
/// pair.tick_both(5).unwrap();
/// assert_eq!(pair.worker.receiver().data(), &[json!("1234567890")]);
/// ```
pub struct StreamPair {
    pub link: LoopbackLink,
    pub controller: EmulatedStream,
    pub worker: EmulatedStream,
}

impl StreamPair {
    /// Build a link plus both engines.
    ///
    /// # Errors
    /// Propagates engine construction failure (block size too small).
    pub fn new(block_size: usize, timeout: Duration) -> Result<Self> {
        let link = LoopbackLink::new(block_size);
        let (controller_transport, worker_transport) = link.endpoints();
        let controller = Stream::new(controller_transport, RecordingReceiver::new(), timeout)?;
        let worker = Stream::new(worker_transport, RecordingReceiver::new(), timeout)?;
        Ok(StreamPair {
            link,
            controller,
            worker,
        })
    }

    /// Tick the controller then the worker, `rounds` times.
    ///
    /// # Errors
    /// Propagates the first engine error encountered.
    pub fn tick_both(&mut self, rounds: usize) -> Result<()> {
        for _ in 0..rounds {
            self.controller.tick()?;
            self.worker.tick()?;
        }
        Ok(())
    }

    /// Tick only the controller, leaving the worker dead.
    ///
    /// # Errors
    /// Propagates the first engine error encountered.
    pub fn tick_controller(&mut self, rounds: usize) -> Result<()> {
        for _ in 0..rounds {
            self.controller.tick()?;
        }
        Ok(())
    }

    /// Tick only the worker.
    ///
    /// # Errors
    /// Propagates the first engine error encountered.
    pub fn tick_worker(&mut self, rounds: usize) -> Result<()> {
        for _ in 0..rounds {
            self.worker.tick()?;
        }
        Ok(())
    }

    /// Tick until the worker has delivered `count` messages, bounded by
    /// `max_rounds`. Returns the number of rounds used.
    ///
    /// # Errors
    /// Propagates the first engine error encountered.
    pub fn run_until_worker_delivered(&mut self, count: usize, max_rounds: usize) -> Result<usize> {
        for round in 0..max_rounds {
            if self.worker.receiver().data().len() >= count {
                return Ok(round);
            }
            self.controller.tick()?;
            self.worker.tick()?;
        }
        Ok(max_rounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pair_round_trip() {
        let mut pair = StreamPair::new(1024, Duration::from_secs(1)).unwrap();
        pair.controller.write(&json!("ping")).unwrap();
        pair.tick_both(3).unwrap();
        assert_eq!(pair.worker.receiver().data(), &[json!("ping")]);
    }

    #[test]
    fn test_run_until_worker_delivered_stops_early() {
        let mut pair = StreamPair::new(1024, Duration::from_secs(1)).unwrap();
        pair.controller.write(&json!("ping")).unwrap();
        let rounds = pair.run_until_worker_delivered(1, 50).unwrap();
        assert!(rounds < 50);
        assert_eq!(pair.worker.receiver().data().len(), 1);
    }
}
