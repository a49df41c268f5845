use chrono::{DateTime, Utc};

/// Commit-time clock. Injected so tests can control timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock (uses `Date.now()` under wasm via chrono's `wasmbind`)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
