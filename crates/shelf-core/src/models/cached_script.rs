//! Local cache mirror of a script

use serde::{Deserialize, Serialize};

use super::script::{Script, ScriptType};

/// A script as mirrored in the local cache.
///
/// Same shape as [`Script`] minus the server id, plus an optional
/// local-modification timestamp set whenever the content is edited
/// outside of a pull.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedScript {
    pub name: String,
    pub content: String,
    pub description: Option<String>,
    pub script_type: ScriptType,
    /// Server timestamp from the last pull or push (unix ms)
    pub updated_at: i64,
    /// Set when the local copy was edited after the last sync point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_modified_at: Option<i64>,
}

impl CachedScript {
    /// Whether the cached copy carries an unpushed local edit.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.local_modified_at
            .is_some_and(|modified| modified > self.updated_at)
    }
}

impl From<&Script> for CachedScript {
    /// A cache entry built from a server record is clean by construction:
    /// the metadata is replaced wholesale with server-sourced fields only.
    fn from(script: &Script) -> Self {
        Self {
            name: script.name.clone(),
            content: script.content.clone(),
            description: script.description.clone(),
            script_type: script.script_type,
            updated_at: script.updated_at,
            local_modified_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(updated_at: i64, local_modified_at: Option<i64>) -> CachedScript {
        CachedScript {
            name: "deploy".to_string(),
            content: "echo deploy".to_string(),
            description: None,
            script_type: ScriptType::Executable,
            updated_at,
            local_modified_at,
        }
    }

    #[test]
    fn dirty_requires_edit_after_sync_point() {
        assert!(!entry(100, None).is_dirty());
        assert!(!entry(100, Some(50)).is_dirty());
        assert!(!entry(100, Some(100)).is_dirty());
        assert!(entry(100, Some(101)).is_dirty());
    }

    #[test]
    fn conversion_from_server_record_drops_dirty_flag() {
        let script = Script {
            id: "id-1".to_string(),
            name: "deploy".to_string(),
            description: Some("ship it".to_string()),
            content: "echo deploy".to_string(),
            script_type: ScriptType::Executable,
            created_at: 1,
            updated_at: 2,
        };
        let cached = CachedScript::from(&script);
        assert_eq!(cached.local_modified_at, None);
        assert_eq!(cached.updated_at, 2);
        assert_eq!(cached.description.as_deref(), Some("ship it"));
    }
}
