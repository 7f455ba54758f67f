//! LWNX frame codec (encode/decode)
//!
//! Whole-frame counterpart to the incremental parser.

use bytes::Bytes;

use super::{
    CRC_SIZE, Direction, Error, FLAGS_END, FlagsWord, HEADER_SIZE, MAX_ENCODED_PAYLOAD,
    MIN_FRAME_SIZE, Packet, Result, START_BYTE, crc16,
};

/// Encode a frame into a new buffer
///
/// # Format
///
/// ```text
/// [0xAA] [FLAGS (2, LE)] [COMMAND ID] [DATA (N)] [CRC-16 (2, LE)]
/// ```
///
/// # Errors
///
/// Returns [`Error::PayloadTooLarge`] if the command ID plus `data` exceeds
/// the 1023 bytes the flags word can describe.
pub fn encode(command_id: u8, direction: impl Into<Direction>, data: &[u8]) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; MIN_FRAME_SIZE + data.len()];
    let len = encode_into(command_id, direction, data, &mut bytes)?;
    debug_assert_eq!(len, bytes.len());
    Ok(bytes)
}

/// Encode a frame into `out`, returning the number of bytes written
///
/// # Errors
///
/// Returns [`Error::PayloadTooLarge`] for oversized data and
/// [`Error::BufferTooSmall`] when `out` cannot hold the frame.
pub fn encode_into(
    command_id: u8,
    direction: impl Into<Direction>,
    data: &[u8],
    out: &mut [u8],
) -> Result<usize> {
    let payload_len = 1 + data.len();
    if payload_len > MAX_ENCODED_PAYLOAD {
        return Err(Error::PayloadTooLarge {
            size: data.len(),
            max: MAX_ENCODED_PAYLOAD - 1,
        });
    }

    let total_size = MIN_FRAME_SIZE + data.len();
    if out.len() < total_size {
        return Err(Error::BufferTooSmall {
            needed: total_size,
            got: out.len(),
        });
    }

    let flags = FlagsWord::new(direction.into(), payload_len);
    out[0] = START_BYTE;
    out[1..FLAGS_END].copy_from_slice(&flags.to_le_bytes());
    out[FLAGS_END] = command_id;
    out[HEADER_SIZE..HEADER_SIZE + data.len()].copy_from_slice(data);

    let crc_at = HEADER_SIZE + data.len();
    let crc = crc16(&out[..crc_at]);
    out[crc_at..total_size].copy_from_slice(&crc.to_le_bytes());

    Ok(total_size)
}

/// Decode one complete frame
///
/// # Errors
///
/// Returns an error if:
/// - Buffer is shorter than an empty frame
/// - Start byte is wrong
/// - Frame length disagrees with the flags word
/// - Checksum doesn't match
pub fn decode(bytes: &[u8]) -> Result<Packet> {
    if bytes.len() < MIN_FRAME_SIZE {
        return Err(Error::BufferTooSmall {
            needed: MIN_FRAME_SIZE,
            got: bytes.len(),
        });
    }

    if bytes[0] != START_BYTE {
        return Err(Error::InvalidStartByte { found: bytes[0] });
    }

    let flags = FlagsWord::from_le_bytes([bytes[1], bytes[2]]);
    let expected = FLAGS_END + flags.payload_len() + CRC_SIZE;
    if bytes.len() != expected {
        return Err(Error::LengthMismatch {
            expected,
            got: bytes.len(),
        });
    }

    let crc_at = expected - CRC_SIZE;
    let found = u16::from_le_bytes([bytes[crc_at], bytes[crc_at + 1]]);
    let calculated = crc16(&bytes[..crc_at]);
    if found != calculated {
        return Err(Error::ChecksumMismatch {
            expected: calculated,
            found,
        });
    }

    Ok(Packet::new(
        bytes[FLAGS_END],
        flags.direction(),
        Bytes::copy_from_slice(&bytes[HEADER_SIZE..crc_at]),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_read_request() {
        let frame = encode(0, false, &[]).unwrap();
        assert_eq!(frame, [0xAA, 0x40, 0x00, 0x00, 0x70, 0x9F]);
    }

    #[test]
    fn test_encode_write_request() {
        let frame = encode(27, Direction::Write, &0x185u32.to_le_bytes()).unwrap();
        assert_eq!(
            frame,
            [0xAA, 0x41, 0x01, 27, 0x85, 0x01, 0x00, 0x00, 0x50, 0x89]
        );
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let encoded = encode(44, Direction::Read, b"\x10\x27\x64\x00").unwrap();
        let decoded = decode(&encoded).unwrap();

        assert_eq!(decoded.command_id(), 44);
        assert_eq!(decoded.direction(), Direction::Read);
        assert_eq!(decoded.payload().as_ref(), b"\x10\x27\x64\x00");
    }

    #[test]
    fn test_encode_payload_too_large() {
        let data = vec![0u8; MAX_ENCODED_PAYLOAD];
        let result = encode(1, Direction::Write, &data);
        assert!(matches!(
            result,
            Err(Error::PayloadTooLarge { size: 1023, max: 1022 })
        ));

        // 1022 data bytes is the largest frame the flags field can describe.
        let frame = encode(1, Direction::Write, &data[..1022]).unwrap();
        assert_eq!(frame.len(), 1028);
        assert_eq!(decode(&frame).unwrap().payload().len(), 1022);
    }

    #[test]
    fn test_encode_into_buffer_too_small() {
        let mut out = [0u8; 8];
        let result = encode_into(3, Direction::Read, &[1, 2, 3], &mut out);
        assert!(matches!(
            result,
            Err(Error::BufferTooSmall { needed: 9, got: 8 })
        ));

        let mut out = [0u8; 16];
        let len = encode_into(3, Direction::Read, &[1, 2, 3], &mut out).unwrap();
        assert_eq!(len, 9);
        assert_eq!(decode(&out[..len]).unwrap().payload().as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn test_decode_invalid_start() {
        let mut frame = encode(0, Direction::Read, &[]).unwrap();
        frame[0] = 0x55;
        assert!(matches!(
            decode(&frame),
            Err(Error::InvalidStartByte { found: 0x55 })
        ));
    }

    #[test]
    fn test_decode_checksum_mismatch() {
        let mut frame = encode(12, Direction::Write, &[0x12, 0x34]).unwrap();
        let len = frame.len();
        frame[len - 1] ^= 0xFF;

        assert!(matches!(decode(&frame), Err(Error::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_decode_length_mismatch() {
        let mut frame = encode(12, Direction::Write, &[0x12, 0x34]).unwrap();
        frame.push(0);
        assert!(matches!(
            decode(&frame),
            Err(Error::LengthMismatch { expected: 8, got: 9 })
        ));
        assert!(matches!(
            decode(&frame[..4]),
            Err(Error::BufferTooSmall { .. })
        ));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: whole-frame decode recovers every encodable packet
            #[test]
            fn prop_roundtrip_preserves_data(
                command_id in any::<u8>(),
                is_write in any::<bool>(),
                data in prop::collection::vec(any::<u8>(), 0..MAX_ENCODED_PAYLOAD),
            ) {
                let encoded = encode(command_id, is_write, &data).unwrap();
                prop_assert_eq!(encoded.len(), MIN_FRAME_SIZE + data.len());

                let decoded = decode(&encoded).unwrap();
                prop_assert_eq!(decoded.command_id(), command_id);
                prop_assert_eq!(decoded.is_write(), is_write);
                prop_assert_eq!(decoded.payload().as_ref(), &data[..]);
            }

            /// Property: corrupting any byte after the start byte is detected
            #[test]
            fn prop_corruption_detected(
                data in prop::collection::vec(any::<u8>(), 1..128),
                offset_ratio in 0.0f64..1.0,
                corrupt_value in 1u8..=255,
            ) {
                let mut encoded = encode(5, Direction::Write, &data).unwrap();
                let span = encoded.len() - 1;
                let offset = 1 + ((span as f64 * offset_ratio) as usize).min(span - 1);
                encoded[offset] ^= corrupt_value;

                prop_assert!(decode(&encoded).is_err());
            }

            /// Property: encoding is deterministic
            #[test]
            fn prop_encoding_deterministic(
                command_id in any::<u8>(),
                data in prop::collection::vec(any::<u8>(), 0..256),
            ) {
                let first = encode(command_id, Direction::Read, &data).unwrap();
                let second = encode(command_id, Direction::Read, &data).unwrap();
                prop_assert_eq!(first, second);
            }
        }
    }
}
