//! The wire frame codec:
//!
//! ```text
//! offset  0   1   2        3         4        5         6..6+N-1   6+N
//! byte    FF  FF  topic_lo topic_hi  size_lo  size_hi   payload    checksum
//! ```
//!
//! Uses `byteorder` for the little-endian header fields, the same crate the
//! teacher reaches for in every frame/header struct it defines
//! (`t51core/src/net/frame.rs`, `server/lib/neutronium/src/net/frame.rs`).

use crate::checksum;
use crate::error::{Error, Result};
use byteorder::{LittleEndian, WriteBytesExt};

pub const SYNC_BYTE: u8 = 0xFF;
/// topic_lo, topic_hi, size_lo, size_hi
pub const HEADER_LEN: usize = 4;
/// Two sync bytes + header + trailing checksum byte.
pub const FRAME_OVERHEAD: usize = 2 + HEADER_LEN + 1;

/// Encodes and validates frames against a fixed maximum payload size.
#[derive(Debug, Clone, Copy)]
pub struct FrameCodec {
    max_payload: usize,
}

impl FrameCodec {
    pub fn new(max_payload: usize) -> Self {
        FrameCodec { max_payload }
    }

    /// Encodes `topic_id`/`payload` into `out`, clearing it first. `out`'s
    /// capacity is reused across calls by the caller (typically
    /// `Node`'s scratch buffer) to avoid reallocating per frame.
    pub fn encode(&self, topic_id: u16, payload: &[u8], out: &mut Vec<u8>) -> Result<()> {
        if payload.len() > self.max_payload {
            return Err(Error::PayloadTooLarge {
                len: payload.len(),
                max: self.max_payload,
            });
        }

        out.clear();
        out.reserve(FRAME_OVERHEAD + payload.len());

        out.push(SYNC_BYTE);
        out.push(SYNC_BYTE);
        out.write_u16::<LittleEndian>(topic_id)
            .expect("writing to a Vec never fails");
        out.write_u16::<LittleEndian>(payload.len() as u16)
            .expect("writing to a Vec never fails");
        out.extend_from_slice(payload);

        let header = [out[2], out[3], out[4], out[5]];
        out.push(checksum::compute(header, payload));

        Ok(())
    }

    pub fn max_payload(&self) -> usize {
        self.max_payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_expected_bytes_for_empty_payload() {
        let codec = FrameCodec::new(512);
        let mut out = Vec::new();
        codec.encode(0, &[], &mut out).unwrap();
        assert_eq!(out, vec![0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF]);
    }

    #[test]
    fn encodes_little_endian_topic_and_size() {
        let codec = FrameCodec::new(512);
        let mut out = Vec::new();
        codec.encode(300, &[1, 2, 3], &mut out).unwrap();
        // 300 = 0x012C -> lo=0x2C hi=0x01 ; size=3 -> lo=3 hi=0
        assert_eq!(&out[..6], &[0xFF, 0xFF, 0x2C, 0x01, 0x03, 0x00]);
        assert_eq!(&out[6..9], &[1, 2, 3]);
    }

    #[test]
    fn rejects_oversized_payload() {
        let codec = FrameCodec::new(4);
        let mut out = Vec::new();
        let err = codec.encode(0, &[0u8; 5], &mut out).unwrap_err();
        assert_eq!(
            err,
            Error::PayloadTooLarge { len: 5, max: 4 }
        );
    }
}
