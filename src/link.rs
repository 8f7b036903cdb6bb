//! The byte-oriented transport the node is driven from. Transport I/O
//! itself (UART, USB-CDC, TCP) is an external collaborator; the core only
//! consumes this trait, modeled on the `io::Read`/`io::Write` split the
//! teacher threads through `Buffer::ingress`/`egress`
//! (`t51core/src/net/buffer.rs`), but byte-at-a-time on the read side since
//! the receive state machine is driven one byte per transition.

use crate::error::{Error, Result};

/// A non-blocking byte source with a blocking/buffered byte sink.
///
/// `read_byte` must never block: it returns `Ok(None)` when no byte is
/// currently available, exactly like a `read()` returning `WouldBlock` in
/// the teacher's channel code. `write_many` may block or buffer
/// internally; the core calls it only from the caller's own thread
/// (`publish`, `log`, time-sync/param requests), never from inside `spin`'s
/// dispatch of an inbound frame.
pub trait ByteLink {
    /// Reads one byte if available. `Ok(None)` means "try again later".
    /// Any `Err`, other than would-block, which is never an error here,
    /// is treated as a fatal link closure.
    fn read_byte(&mut self) -> Result<Option<u8>>;

    /// Writes the full contents of `bytes` to the sink.
    fn write_many(&mut self, bytes: &[u8]) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::VecDeque;

    /// An in-memory `ByteLink` double. EOF is signaled explicitly via
    /// `close` rather than inferred from an empty queue, so tests can
    /// distinguish "no data yet" from "link closed".
    pub struct MockLink {
        inbound: VecDeque<u8>,
        pub outbound: Vec<u8>,
        closed: bool,
    }

    impl MockLink {
        pub fn new() -> Self {
            MockLink {
                inbound: VecDeque::new(),
                outbound: Vec::new(),
                closed: false,
            }
        }

        pub fn push_inbound(&mut self, bytes: &[u8]) {
            self.inbound.extend(bytes.iter().copied());
        }

        pub fn close(&mut self) {
            self.closed = true;
        }
    }

    impl Default for MockLink {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ByteLink for MockLink {
        fn read_byte(&mut self) -> Result<Option<u8>> {
            if let Some(b) = self.inbound.pop_front() {
                return Ok(Some(b));
            }
            if self.closed {
                return Err(Error::LinkClosed);
            }
            Ok(None)
        }

        fn write_many(&mut self, bytes: &[u8]) -> Result<()> {
            self.outbound.extend_from_slice(bytes);
            Ok(())
        }
    }
}
