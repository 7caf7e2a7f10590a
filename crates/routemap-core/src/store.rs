// ── Snapshot store ──
//
// Holds the latest normalized snapshot. Reads are wait-free (`ArcSwap`),
// writers bump a `watch` version counter so subscribers wake up.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::normalize::Snapshot;

/// Latest-snapshot cell with push-based change notification.
pub struct SnapshotStore {
    current: ArcSwapOption<Snapshot>,
    /// Bumped on every replace/clear.
    version: watch::Sender<u64>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        Self {
            current: ArcSwapOption::empty(),
            version,
        }
    }

    /// The latest snapshot, if any (cheap `Arc` clone).
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.load_full()
    }

    /// Store `snapshot` as the latest and notify subscribers.
    pub fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        self.current.store(Some(Arc::clone(&snapshot)));
        self.bump_version();
        snapshot
    }

    /// Drop the stored snapshot.
    pub fn clear(&self) {
        if self.current.swap(None).is_some() {
            self.bump_version();
        }
    }

    /// When the stored snapshot was fetched.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.current.load().as_ref().and_then(|s| s.fetched_at)
    }

    /// Subscribe to version bumps.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v = v.wrapping_add(1));
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn replace_and_clear_bump_version() {
        let store = SnapshotStore::new();
        let rx = store.subscribe();
        assert!(store.current().is_none());

        let at = Utc::now();
        store.replace(Snapshot {
            fetched_at: Some(at),
            ..Snapshot::default()
        });
        assert_eq!(store.version(), 1);
        assert_eq!(store.last_updated(), Some(at));
        assert!(rx.has_changed().unwrap());

        store.clear();
        assert_eq!(store.version(), 2);
        assert!(store.current().is_none());

        // clearing an empty store is a no-op
        store.clear();
        assert_eq!(store.version(), 2);
    }
}
