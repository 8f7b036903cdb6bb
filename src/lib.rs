//! `firmlink`: a host-side framing, negotiation and time-sync protocol
//! engine for bridging a microcontroller and a pub/sub middleware over a
//! byte link.
//!
//! The crate is transport-agnostic (see [`link::ByteLink`]) and runs on a
//! single thread: all work happens inside [`node::Node::spin`] or the
//! handful of blocking calls (`publish`, `log`, `get_param`) a caller makes
//! directly, following the same no-background-thread discipline as the
//! teacher's `Endpoint` (`server/lib/neutronium/src/net/endpoint.rs`).

pub mod checksum;
pub mod clock;
pub mod config;
pub mod counters;
pub mod dispatch;
pub mod error;
pub mod frame;
pub mod link;
pub mod logging;
pub mod messages;
pub mod node;
pub mod param;
pub mod registry;
pub mod rx;
pub mod timesync;
pub mod topic;

pub use clock::{Clock, SystemClock};
pub use config::NodeConfig;
pub use counters::ErrorCounters;
pub use error::{Error, Result};
pub use link::ByteLink;
pub use messages::{Log, LogLevel, ParamResponse, RequestParam, Time, TopicInfo};
pub use node::Node;
pub use timesync::ConnectionState;
