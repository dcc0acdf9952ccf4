//! Last-observed timestamp bookkeeping for configuration sources.

use crate::sources::ConfigSource;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, warn};

/// Tracks, per configuration source, the last observed modification
/// timestamp.
///
/// Pure bookkeeping with no concurrency of its own: the `&mut self`
/// receivers make the single-caller discipline a compile-time fact. The
/// scheduler owns one tracker for its whole lifetime, carrying the
/// accumulated state across interval changes.
///
/// The first observation of a source records a baseline and is not counted
/// as a change; after that, any differing timestamp counts once and updates
/// the record, so a source reported changed at one tick is not reported
/// again until its timestamp moves again.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    entries: HashMap<String, SystemTime>,
}

impl ChangeTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan all sources and report whether any of them changed since the
    /// last scan.
    ///
    /// Every source is scanned even after one is found changed, so every
    /// record stays fresh and no source is double-reported on the next
    /// tick. A source whose timestamp cannot be read is logged and treated
    /// as unchanged for this scan; the scan continues with the remaining
    /// sources.
    pub fn has_any_changed(&mut self, sources: &[Arc<dyn ConfigSource>]) -> bool {
        let mut changed = false;
        for source in sources {
            changed |= self.observe(source.as_ref());
        }
        changed
    }

    fn observe(&mut self, source: &dyn ConfigSource) -> bool {
        let identity = source.identity();
        let modified = match source.last_modified() {
            Ok(modified) => modified,
            Err(error) => {
                warn!(source = %identity, %error, "failed to read source timestamp; treating as unchanged");
                return false;
            }
        };

        match self.entries.entry(identity) {
            Entry::Occupied(mut entry) => {
                if *entry.get() == modified {
                    return false;
                }
                debug!(source = %entry.key(), "source modified");
                entry.insert(modified);
                true
            }
            Entry::Vacant(entry) => {
                entry.insert(modified);
                false
            }
        }
    }

    /// Forget all recorded timestamps.
    ///
    /// Used when the configuration-source set is replaced wholesale; the
    /// next scan records fresh baselines without reporting a change.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Number of sources with a recorded timestamp.
    pub fn watched_count(&self) -> usize {
        self.entries.len()
    }
}
