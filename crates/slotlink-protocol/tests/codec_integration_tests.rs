//! Integration tests for the wire path below the stream engine: chunking,
//! frame encoding, decoding, and reassembly, without a transport in the
//! loop.

use bytes::Bytes;
use slotlink_core::{Command, checksum::xor_checksum, constants::HEADER_SIZE};
use slotlink_protocol::{Chunker, Frame, MessageAssembler};

/// Encode every chunk of a message as a Data frame, stamping sequence
/// numbers the way the output queue would.
fn frames_for(message: &[u8], data_size: usize) -> Vec<Bytes> {
    let chunker = Chunker::new(data_size);
    let mut seq = 0u8;
    chunker
        .split(message)
        .unwrap()
        .into_iter()
        .map(|chunk| {
            let frame = Frame::data(chunk.first, chunk.checksum, chunk.remaining, seq, chunk.payload);
            seq = (seq + 1) % 10;
            frame.encode()
        })
        .collect()
}

/// Feed decoded frames through an assembler the way the tick loop does.
fn reassemble(frames: &[Bytes]) -> Option<Bytes> {
    let mut assembler = MessageAssembler::new();
    let mut result = None;
    for wire in frames {
        let frame = Frame::decode(wire).unwrap();
        assert_eq!(frame.command, Command::Data);
        if frame.new {
            assembler.begin_new(frame.checksum);
        }
        let remaining = frame.remaining;
        assembler.append(frame.payload);
        if let Some(message) = assembler.try_complete(remaining) {
            result = Some(message);
        }
    }
    result
}

#[test]
fn test_multi_chunk_wire_round_trip() {
    let message: Vec<u8> = (0u8..=255).cycle().take(5000).collect();
    let frames = frames_for(&message, 1024 - HEADER_SIZE);

    assert_eq!(frames.len(), 5);
    let reassembled = reassemble(&frames).expect("message should assemble");
    assert_eq!(&reassembled[..], &message[..]);
}

#[test]
fn test_frame_sizes_respect_payload_budget() {
    let chunker = Chunker::new(256 - HEADER_SIZE);
    assert_eq!(chunker.data_size(), 243);

    let message = vec![b'm'; 1000];
    for chunk in chunker.split(&message).unwrap() {
        let wire = Frame::data(chunk.first, chunk.checksum, chunk.remaining, 0, chunk.payload)
            .encode();
        let frame = Frame::decode(&wire).unwrap();
        assert!(frame.payload.len() <= chunker.data_size());
    }
}

#[test]
fn test_only_first_frame_announces_checksum() {
    let message = b"spread across several frames".repeat(20);
    let frames = frames_for(&message, 64);

    let decoded: Vec<Frame> = frames.iter().map(|w| Frame::decode(w).unwrap()).collect();
    assert!(decoded.len() > 2);
    assert!(decoded[0].new);
    assert_eq!(decoded[0].checksum, xor_checksum(&message));
    for frame in &decoded[1..] {
        assert!(!frame.new);
        assert_eq!(frame.checksum, 0);
    }
}

#[test]
fn test_corrupted_checksum_blocks_delivery() {
    let message = b"precious cargo".to_vec();
    let mut frames = frames_for(&message, 8);

    // Flip the announced checksum on the first frame, in transit.
    let mut tampered = frames[0].to_vec();
    tampered[3] = if tampered[3] == b'0' { b'1' } else { b'0' };
    frames[0] = Bytes::from(tampered);

    assert!(reassemble(&frames).is_none());
}

#[test]
fn test_corrupted_payload_blocks_delivery() {
    let message = b"precious cargo".to_vec();
    let mut frames = frames_for(&message, 8);

    let last = frames.len() - 1;
    let mut tampered = frames[last].to_vec();
    let len = tampered.len();
    tampered[len - 1] ^= 0x20;
    frames[last] = Bytes::from(tampered);

    assert!(reassemble(&frames).is_none());
}

#[test]
fn test_restarted_message_discards_stale_chunks() {
    let abandoned = b"the sender gave up on this one".to_vec();
    let replacement = b"and sent this instead".to_vec();

    let stale = frames_for(&abandoned, 8);
    let fresh = frames_for(&replacement, 8);

    // First chunk of the abandoned message, then the full replacement:
    // exactly what the wire looks like after a sender-side reset.
    let mut observed = vec![stale[0].clone()];
    observed.extend(fresh.iter().cloned());

    let reassembled = reassemble(&observed).expect("replacement should assemble");
    assert_eq!(&reassembled[..], &replacement[..]);
}

#[test]
fn test_message_following_corrupt_one_is_unaffected() {
    let poisoned = frames_for(b"poisoned", 8);
    let healthy = frames_for(b"healthy message", 8);

    let mut tampered = poisoned[0].to_vec();
    tampered[3] = if tampered[3] == b'f' { b'e' } else { b'f' };

    let mut observed = vec![Bytes::from(tampered)];
    observed.extend(poisoned[1..].iter().cloned());
    observed.extend(healthy.iter().cloned());

    let reassembled = reassemble(&observed).expect("second message should assemble");
    assert_eq!(&reassembled[..], b"healthy message");
}
