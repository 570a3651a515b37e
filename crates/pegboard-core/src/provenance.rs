//! Clock and unique-id source consulted when a pattern is exported.

use std::sync::atomic::{AtomicU64, Ordering};

/// Supplies timestamps and fresh identifiers.
pub trait Provenance: Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;

    /// A new identifier, distinct from every earlier one.
    fn new_id(&self) -> String;
}

/// Wall clock plus random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProvenance;

impl Provenance for SystemProvenance {
    fn now_millis(&self) -> u64 {
        // web_time keeps this usable on wasm32-unknown-unknown.
        let since_epoch = web_time::SystemTime::now()
            .duration_since(web_time::UNIX_EPOCH)
            .unwrap_or_default();
        u64::try_from(since_epoch.as_millis()).unwrap_or(u64::MAX)
    }

    fn new_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic provenance: a frozen clock and `pattern-1`, `pattern-2`, ...
#[derive(Debug, Default)]
pub struct FixedProvenance {
    now: u64,
    counter: AtomicU64,
}

impl FixedProvenance {
    #[must_use]
    pub fn new(now_millis: u64) -> Self {
        Self {
            now: now_millis,
            counter: AtomicU64::new(0),
        }
    }
}

impl Provenance for FixedProvenance {
    fn now_millis(&self) -> u64 {
        self.now
    }

    fn new_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("pattern-{n}")
    }
}
