//! Saturating, monotonic error counters surfaced for observability.
//! Parse-layer problems never propagate as `Result::Err`; they only ever
//! increment one of these.

/// Counts of parse-layer problems observed since the node was created.
/// Every field saturates at `u32::MAX` and is never reset.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ErrorCounters {
    /// Bytes seen where a sync marker (`0xFF 0xFF`) was expected.
    pub invalid_size: u32,
    pub checksum: u32,
    pub state: u32,
    pub malformed_message: u32,
    /// A validated frame addressed to a topic id the dispatcher couldn't
    /// route. Folded into `checksum` for wire compatibility with older
    /// counter consumers, but also tracked separately here so a host can
    /// tell the two apart.
    pub unknown_topic: u32,
}

impl ErrorCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump_invalid_size(&mut self) {
        self.invalid_size = self.invalid_size.saturating_add(1);
    }

    pub fn bump_checksum(&mut self) {
        self.checksum = self.checksum.saturating_add(1);
    }

    pub fn bump_state(&mut self) {
        self.state = self.state.saturating_add(1);
    }

    pub fn bump_malformed_message(&mut self) {
        self.malformed_message = self.malformed_message.saturating_add(1);
    }

    /// An unroutable-but-validated frame: bumps both `checksum` (wire
    /// compatibility) and `unknown_topic` (the clearer signal).
    pub fn bump_unknown_topic(&mut self) {
        self.checksum = self.checksum.saturating_add(1);
        self.unknown_topic = self.unknown_topic.saturating_add(1);
    }
}
