// File: livebot-core/src/services/cooldown.rs

use std::time::Duration;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::time::Instant;

/// Which namespace a cooldown entry lives in. Built-ins are keyed by their
/// canonical name, custom commands by the literal invocation text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CooldownKey {
    Builtin(String),
    Static(String),
}

/// Last-use timestamps per (sender user id, key). Entries are never evicted.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    last_use: DashMap<(i64, CooldownKey), Instant>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on_cooldown(&self, subject: i64, key: &CooldownKey, cooldown: Duration) -> bool {
        match self.last_use.get(&(subject, key.clone())) {
            Some(last) => Instant::now().saturating_duration_since(*last) < cooldown,
            None => false,
        }
    }

    pub fn set(&self, subject: i64, key: CooldownKey) {
        self.last_use.insert((subject, key), Instant::now());
    }

    /// Check-and-set under the entry's shard lock. Returns `true` when the
    /// caller may run the command (and the cooldown has been started).
    pub fn try_acquire(&self, subject: i64, key: CooldownKey, cooldown: Duration) -> bool {
        let now = Instant::now();
        match self.last_use.entry((subject, key)) {
            Entry::Occupied(mut e) => {
                if now.saturating_duration_since(*e.get()) < cooldown {
                    false
                } else {
                    e.insert(now);
                    true
                }
            }
            Entry::Vacant(e) => {
                e.insert(now);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.last_use.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_use.is_empty()
    }
}
