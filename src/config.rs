//! Compile-time-sized bounds for the node, carried at runtime as a plain
//! struct so tests can shrink them without recompiling. Mirrors the constant
//! tables in `Endpoint`/`Channel` (`server/lib/neutronium/src/net/endpoint.rs`)
//! except these are overridable fields rather than `const`s, since the spec
//! calls for them to size buffers at construction.

/// Default maximum payload size, in bytes.
pub const MAX_PAYLOAD: usize = 512;
/// Default maximum number of publisher slots.
pub const MAX_PUBLISHERS: usize = 25;
/// Default maximum number of subscriber slots.
pub const MAX_SUBSCRIBERS: usize = 25;
/// Default cap on bytes drained from the link per `spin`.
pub const MAX_BYTES_PER_SPIN: usize = 512;
/// Default period between time-sync requests while connected.
pub const SYNC_PERIOD_MS: u64 = 5_000;
/// Default liveness timeout since the last completed time-sync.
pub const CONNECTION_TIMEOUT_MS: u64 = 15_000;

/// Runtime-tunable sizing and timing parameters for a [`crate::Node`].
///
/// All static buffers (`FrameCodec`'s encode scratch, `RxStateMachine`'s
/// message buffer, `TopicRegistry`'s slot arrays) are sized from this struct
/// at construction and never reallocated.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct NodeConfig {
    pub max_payload: usize,
    pub max_publishers: usize,
    pub max_subscribers: usize,
    pub max_bytes_per_spin: usize,
    pub sync_period_ms: u64,
    pub connection_timeout_ms: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            max_payload: MAX_PAYLOAD,
            max_publishers: MAX_PUBLISHERS,
            max_subscribers: MAX_SUBSCRIBERS,
            max_bytes_per_spin: MAX_BYTES_PER_SPIN,
            sync_period_ms: SYNC_PERIOD_MS,
            connection_timeout_ms: CONNECTION_TIMEOUT_MS,
        }
    }
}
