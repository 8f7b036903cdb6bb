//! Payload schemas for the reserved topics. User payload types are opaque
//! bytes to the core and never appear here.
//!
//! Encoded with `serde` + `bincode`, matching the dependency triad the
//! teacher already declares for its own payloads (`t51core/Cargo.toml`).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Declares a publisher or subscriber slot to the peer during negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicInfo {
    pub topic_id: u16,
    pub topic_name: String,
    pub message_type: String,
}

/// Wall-clock time, ROS-style: seconds plus fractional nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    pub sec: u32,
    pub nsec: u32,
}

impl Time {
    pub const ZERO: Time = Time { sec: 0, nsec: 0 };

    /// Total nanoseconds since the ROS epoch, for arithmetic. Saturates
    /// rather than overflowing on pathological input.
    pub fn as_nanos(self) -> u64 {
        (self.sec as u64)
            .saturating_mul(1_000_000_000)
            .saturating_add(self.nsec as u64)
    }

    /// Builds a `Time` back out of a total-nanoseconds count.
    pub fn from_nanos(nanos: u64) -> Time {
        Time {
            sec: (nanos / 1_000_000_000) as u32,
            nsec: (nanos % 1_000_000_000) as u32,
        }
    }

    /// `self + delta_ms`, saturating.
    pub fn add_millis(self, delta_ms: i64) -> Time {
        let nanos = self.as_nanos() as i64;
        let delta_nanos = delta_ms.saturating_mul(1_000_000);
        Time::from_nanos(nanos.saturating_add(delta_nanos).max(0) as u64)
    }
}

/// Severity carried by a [`Log`] frame. Matches common ROS logger levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 1,
    Info = 2,
    Warn = 4,
    Error = 8,
    Fatal = 16,
}

/// A log line forwarded from the device to the host's logging sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub level: u8,
    pub msg: String,
}

/// A request for a named parameter's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParam {
    pub name: String,
}

/// The peer's response to a [`RequestParam`]. Exactly one of the three
/// fields is expected to be populated for a given parameter, but all three
/// are always present on the wire for simplicity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamResponse {
    pub ints: Vec<i32>,
    pub floats: Vec<f32>,
    pub strings: Vec<String>,
}

/// Serializes a message with `bincode` into `out`, returning the number of
/// bytes written. Fails with `PayloadTooLarge` rather than truncating if
/// the encoded message doesn't fit.
pub fn encode<T: Serialize>(msg: &T, out: &mut [u8]) -> Result<usize> {
    let bytes = bincode::serialize(msg).expect("message schema must be serializable");
    if bytes.len() > out.len() {
        return Err(Error::PayloadTooLarge {
            len: bytes.len(),
            max: out.len(),
        });
    }
    out[..bytes.len()].copy_from_slice(&bytes);
    Ok(bytes.len())
}

/// Deserializes a message with `bincode`. Returns `None` on malformed input
/// rather than panicking, since the link is untrusted.
pub fn decode<T: for<'de> Deserialize<'de>>(payload: &[u8]) -> Option<T> {
    bincode::deserialize(payload).ok()
}
