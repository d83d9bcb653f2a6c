//! Audit log models for the remote store

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Kind of mutating remote operation recorded in the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Create,
    Update,
    Delete,
}

impl SyncAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(Error::InvalidInput(format!(
                "Unknown sync action '{other}'"
            ))),
        }
    }
}

/// One append-only audit log entry, keyed by script id (not by the row,
/// so entries remain valid after the script is deleted)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncLogEntry {
    pub id: String,
    pub script_id: String,
    pub action: SyncAction,
    pub timestamp: i64,
    pub device_id: Option<String>,
}

/// Response of the sync status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Log entries newer than the requested point, newest first
    pub logs: Vec<SyncLogEntry>,
    /// Maximum timestamp across the whole log, 0 if empty
    pub latest_timestamp: i64,
    pub server_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_action_round_trips() {
        for action in [SyncAction::Create, SyncAction::Update, SyncAction::Delete] {
            assert_eq!(action.as_str().parse::<SyncAction>().unwrap(), action);
        }
        assert!("upsert".parse::<SyncAction>().is_err());
    }

    #[test]
    fn sync_log_entry_serde_shape() {
        let entry = SyncLogEntry {
            id: "log-1".to_string(),
            script_id: "script-1".to_string(),
            action: SyncAction::Delete,
            timestamp: 42,
            device_id: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["action"], "delete");
        assert!(json["device_id"].is_null());
    }
}
