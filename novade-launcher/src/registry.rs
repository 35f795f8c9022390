//! Process-local table of running applications.
//!
//! The registry is a cache, not a source of truth: an entry only says that the
//! broker launched something under that identity. Whether it still runs is
//! decided by a [`ProcessProbe`](crate::process::ProcessProbe) on every use.
//!
//! All four operations are serialized behind one registry-wide lock. Mutation
//! is crate-private; the [`LaunchBroker`](crate::broker::LaunchBroker) is the
//! only writer.

use crate::types::{ExecutableIdentity, ProcessRecord};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct RunningRegistry {
    entries: Mutex<HashMap<ExecutableIdentity, ProcessRecord>>,
}

impl RunningRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, identity: &ExecutableIdentity) -> Option<ProcessRecord> {
        self.entries.lock().get(identity).cloned()
    }

    /// Inserts or replaces the entry for `identity`, stamping it with the current time.
    pub(crate) fn record(&self, identity: ExecutableIdentity, pid: u32, arguments: Vec<String>) {
        self.record_at(identity, pid, arguments, Utc::now());
    }

    pub(crate) fn record_at(
        &self,
        identity: ExecutableIdentity,
        pid: u32,
        arguments: Vec<String>,
        launched_at: DateTime<Utc>,
    ) {
        let record = ProcessRecord {
            identity: identity.clone(),
            pid,
            launched_at,
            last_arguments: arguments,
        };
        if let Some(previous) = self.entries.lock().insert(identity, record) {
            tracing::debug!(
                executable = %previous.identity,
                previous_pid = previous.pid,
                "Replaced registry entry"
            );
        }
    }

    pub(crate) fn remove(&self, identity: &ExecutableIdentity) -> Option<ProcessRecord> {
        self.entries.lock().remove(identity)
    }

    /// All entries, oldest launch first. Ties are broken by identity so the
    /// order is stable.
    pub fn snapshot(&self) -> Vec<ProcessRecord> {
        let mut records: Vec<ProcessRecord> = self.entries.lock().values().cloned().collect();
        records.sort_by(|a, b| {
            a.launched_at
                .cmp(&b.launched_at)
                .then_with(|| a.identity.cmp(&b.identity))
        });
        records
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
