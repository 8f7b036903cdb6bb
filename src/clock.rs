//! Monotonic time source and the time-sync derived clock. The clock is an
//! injected capability, never global state, the same discipline the
//! teacher applies to its logger (`server/lib/flux/src/logging.rs`).

use crate::messages::Time;
use std::time::Instant;

/// A monotonic millisecond time source. Implementations must never go
/// backwards.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// The real wall-of-time clock, backed by `std::time::Instant`.
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// The local clock as corrected by the last completed time-sync handshake.
///
/// `now() = remote_epoch + (clock.now_ms() - local_epoch)`.
#[derive(Debug, Clone, Copy)]
pub struct SyncedClock {
    local_epoch_ms: u64,
    remote_epoch: Time,
}

impl SyncedClock {
    pub fn new() -> Self {
        SyncedClock {
            local_epoch_ms: 0,
            remote_epoch: Time::ZERO,
        }
    }

    /// Records a completed sync: `remote` is the peer's clock reading at
    /// the moment `local_now_ms` was sampled on this side.
    pub fn set(&mut self, local_now_ms: u64, remote: Time) {
        self.local_epoch_ms = local_now_ms;
        self.remote_epoch = remote;
    }

    /// The synced time at `local_now_ms`, extrapolated from the last sync.
    pub fn now(&self, local_now_ms: u64) -> Time {
        let elapsed_ms = local_now_ms.saturating_sub(self.local_epoch_ms);
        self.remote_epoch.add_millis(elapsed_ms as i64)
    }
}

impl Default for SyncedClock {
    fn default() -> Self {
        Self::new()
    }
}
