use super::ExecutableIdentity;
use chrono::{DateTime, Utc};

/// What the registry remembers about one running application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pub identity: ExecutableIdentity,
    pub pid: u32,
    pub launched_at: DateTime<Utc>,
    /// Arguments of the launch that created this record.
    pub last_arguments: Vec<String>,
}

impl ProcessRecord {
    /// Wire form used by the `ListRunning` D-Bus method: `(suxas)`.
    pub fn to_wire(&self) -> (String, u32, i64, Vec<String>) {
        (
            self.identity.to_string(),
            self.pid,
            self.launched_at.timestamp_millis(),
            self.last_arguments.clone(),
        )
    }
}
