//! A narrow clock seam so backup-filename timestamps are injectable —
//! the writer's determinism invariant ("identical inputs and a fixed
//! clock produce identical output bytes") only holds if tests can pin
//! the clock, the same testability motive behind the teacher's
//! `SyncTransport`/`FakeTransport` split.

pub trait Clock: Send + Sync {
    fn now_utc_ms(&self) -> u64;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc_ms(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Fixed timestamp, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_utc_ms(&self) -> u64 {
        self.0
    }
}
