//! The round-trip time-sync handshake and the connection liveness model.
//! Grounded on `Endpoint::housekeeping`
//! (`server/lib/neutronium/src/net/endpoint.rs`), which runs the same
//! shape of keepalive-then-timeout check on a fixed interval.
//!
//! `ConnectionState` is the one enum driving both the handshake and the
//! public API (`Node::connected`).

use crate::error::Result;
use crate::frame::FrameCodec;
use crate::link::ByteLink;
use crate::messages::{self, Time};
use crate::rx::RxStateMachine;
use crate::clock::SyncedClock;
use crate::topic::ID_TIME;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ConnectionState {
    Disconnected,
    Syncing { t_start: u64 },
    Connected { last_sync: u64 },
}

pub struct TimeSync {
    state: ConnectionState,
    synced_clock: SyncedClock,
    sync_period_ms: u64,
    connection_timeout_ms: u64,
}

impl TimeSync {
    pub fn new(sync_period_ms: u64, connection_timeout_ms: u64) -> Self {
        TimeSync {
            state: ConnectionState::Disconnected,
            synced_clock: SyncedClock::new(),
            sync_period_ms,
            connection_timeout_ms,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn connected(&self) -> bool {
        matches!(self.state, ConnectionState::Connected { .. })
    }

    /// The locally synced time, extrapolated from the last completed sync.
    pub fn now(&self, local_now_ms: u64) -> Time {
        self.synced_clock.now(local_now_ms)
    }

    /// Initiates a sync unless one is already in flight. Sends an empty
    /// payload under `ID_TIME`: any frame under that topic triggers the
    /// peer to reply with its current time, so the request body itself
    /// carries no information.
    pub fn request(
        &mut self,
        now_ms: u64,
        codec: &FrameCodec,
        link: &mut dyn ByteLink,
        scratch: &mut Vec<u8>,
    ) -> Result<()> {
        if matches!(self.state, ConnectionState::Syncing { .. }) {
            return Ok(());
        }

        self.state = ConnectionState::Syncing { t_start: now_ms };
        codec.encode(ID_TIME, &[], scratch)?;
        link.write_many(scratch)
    }

    /// Completes a sync using the peer's reply. Silently aborts (stays in
    /// whatever state it was in) if there is no outstanding request or the
    /// payload doesn't deserialize as a `Time`: a stray/corrupted `ID_TIME`
    /// frame must not perturb an already-synced clock.
    pub fn complete(&mut self, now_ms: u64, payload: &[u8]) {
        let t_start = match self.state {
            ConnectionState::Syncing { t_start } => t_start,
            _ => return,
        };

        let remote: Time = match messages::decode(payload) {
            Some(t) => t,
            None => return,
        };

        let t_end = now_ms;
        let offset_ms = t_end.saturating_sub(t_start) / 2;
        self.synced_clock.set(t_end, remote.add_millis(offset_ms as i64));
        self.state = ConnectionState::Connected { last_sync: t_end };
    }

    /// Runs the liveness/re-sync housekeeping for one `spin`. Drops the
    /// connection (and resets the half-parsed receive state) if no sync
    /// completed within `connection_timeout_ms`; otherwise kicks off a new
    /// sync request once `sync_period_ms` has elapsed since the last one.
    pub fn tick(
        &mut self,
        now_ms: u64,
        rx: &mut RxStateMachine,
        codec: &FrameCodec,
        link: &mut dyn ByteLink,
        scratch: &mut Vec<u8>,
    ) -> Result<()> {
        if let ConnectionState::Connected { last_sync } = self.state {
            let elapsed = now_ms.saturating_sub(last_sync);

            if elapsed > self.connection_timeout_ms {
                self.state = ConnectionState::Disconnected;
                rx.reset();
                return Ok(());
            }

            if elapsed > self.sync_period_ms {
                return self.request(now_ms, codec, link, scratch);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::test_support::MockLink;

    #[test]
    fn completes_a_sync_and_reports_connected() {
        let mut ts = TimeSync::new(5_000, 15_000);
        let codec = FrameCodec::new(512);
        let mut link = MockLink::new();
        let mut scratch = Vec::new();

        ts.request(0, &codec, &mut link, &mut scratch).unwrap();
        assert!(!ts.connected());

        let mut buf = [0u8; 64];
        let len = messages::encode(&Time { sec: 1000, nsec: 0 }, &mut buf).unwrap();

        ts.complete(20, &buf[..len]);
        assert!(ts.connected());
    }

    #[test]
    fn disconnects_after_timeout_and_resets_rx() {
        let mut ts = TimeSync::new(5_000, 15_000);
        let codec = FrameCodec::new(512);
        let mut link = MockLink::new();
        let mut scratch = Vec::new();
        let mut rx = RxStateMachine::new(512);

        let mut buf = [0u8; 64];
        let len = messages::encode(&Time { sec: 0, nsec: 0 }, &mut buf).unwrap();

        ts.request(0, &codec, &mut link, &mut scratch).unwrap();
        ts.complete(10, &buf[..len]);
        assert!(ts.connected());

        ts.tick(15_011, &mut rx, &codec, &mut link, &mut scratch).unwrap();
        assert!(!ts.connected());
    }

    #[test]
    fn reissues_sync_after_period_elapses() {
        let mut ts = TimeSync::new(5_000, 15_000);
        let codec = FrameCodec::new(512);
        let mut link = MockLink::new();
        let mut scratch = Vec::new();
        let mut rx = RxStateMachine::new(512);

        let mut buf = [0u8; 64];
        let len = messages::encode(&Time { sec: 0, nsec: 0 }, &mut buf).unwrap();
        ts.request(0, &codec, &mut link, &mut scratch).unwrap();
        ts.complete(10, &buf[..len]);

        link.outbound.clear();
        ts.tick(5_020, &mut rx, &codec, &mut link, &mut scratch).unwrap();
        assert!(matches!(ts.state(), ConnectionState::Syncing { .. }));
        assert!(!link.outbound.is_empty());
    }
}
