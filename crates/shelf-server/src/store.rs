//! SQLite-backed script store with an append-only audit log.
//!
//! All validation happens at this boundary so every route gets the same
//! rules. Mutations record a `sync_log` entry; the delete entry is
//! written before the row goes away so the log survives the script.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use shelf_core::models::{
    is_reserved_command, validate_content_size, validate_script_name, NewScript, Script,
    ScriptListItem, ScriptPatch, ScriptType, SyncAction, SyncLogEntry, SyncStatus,
};
use shelf_core::util::now_millis;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::AppError;

const MIGRATIONS: &str = "
CREATE TABLE IF NOT EXISTS scripts (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    content TEXT NOT NULL,
    script_type TEXT NOT NULL DEFAULT 'executable',
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS sync_log (
    id TEXT PRIMARY KEY,
    script_id TEXT NOT NULL,
    action TEXT NOT NULL,
    timestamp INTEGER NOT NULL,
    device_id TEXT
);
CREATE INDEX IF NOT EXISTS idx_sync_log_timestamp ON sync_log(timestamp);

CREATE TABLE IF NOT EXISTS api_keys (
    id TEXT PRIMARY KEY,
    key_hash TEXT NOT NULL UNIQUE,
    label TEXT,
    created_at INTEGER NOT NULL,
    last_used_at INTEGER
);
";

#[derive(Debug)]
pub struct ScriptStore {
    conn: Mutex<Connection>,
}

impl ScriptStore {
    pub fn open(path: &Path) -> Result<Self, AppError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|error| AppError::internal(error.to_string()))?;
            }
        }
        Self::from_connection(Connection::open(path)?)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, AppError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, AppError> {
        conn.execute_batch(MIGRATIONS)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub async fn list(&self) -> Result<Vec<ScriptListItem>, AppError> {
        let conn = self.conn.lock().await;
        let mut statement = conn.prepare(
            "SELECT id, name, description, script_type, updated_at
             FROM scripts ORDER BY name",
        )?;
        let items = statement
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        items
            .into_iter()
            .map(|(id, name, description, script_type, updated_at)| {
                Ok(ScriptListItem {
                    id,
                    name,
                    description,
                    script_type: parse_script_type(&script_type)?,
                    updated_at,
                })
            })
            .collect()
    }

    pub async fn get(&self, name: &str) -> Result<Option<Script>, AppError> {
        let conn = self.conn.lock().await;
        fetch_script(&conn, name)
    }

    pub async fn create(
        &self,
        new_script: &NewScript,
        device_id: Option<&str>,
    ) -> Result<Script, AppError> {
        validate_script_name(&new_script.name)?;
        if is_reserved_command(&new_script.name) {
            return Err(AppError::ReservedName(new_script.name.clone()));
        }
        validate_content_size(&new_script.content)?;

        let conn = self.conn.lock().await;
        if fetch_script(&conn, &new_script.name)?.is_some() {
            return Err(AppError::Duplicate(new_script.name.clone()));
        }

        let now = now_millis();
        let script = Script {
            id: Uuid::new_v4().to_string(),
            name: new_script.name.clone(),
            description: new_script.description.clone(),
            content: new_script.content.clone(),
            script_type: new_script.script_type.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        conn.execute(
            "INSERT INTO scripts (id, name, description, content, script_type, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                script.id,
                script.name,
                script.description,
                script.content,
                script.script_type.as_str(),
                script.created_at,
                script.updated_at,
            ],
        )?;
        append_log(&conn, &script.id, SyncAction::Create, device_id)?;

        tracing::info!(script = %script.name, "Created script");
        Ok(script)
    }

    /// Apply a partial update. Last write wins: whatever arrives later
    /// overwrites, and the bumped `updated_at` is what clients use for
    /// conflict detection.
    pub async fn update(
        &self,
        name: &str,
        patch: &ScriptPatch,
        device_id: Option<&str>,
    ) -> Result<Script, AppError> {
        if let Some(content) = &patch.content {
            validate_content_size(content)?;
        }

        let conn = self.conn.lock().await;
        let Some(mut script) = fetch_script(&conn, name)? else {
            return Err(AppError::NotFound(name.to_string()));
        };

        if let Some(content) = &patch.content {
            script.content.clone_from(content);
        }
        if let Some(description) = &patch.description {
            script.description = Some(description.clone());
        }
        if let Some(script_type) = patch.script_type {
            script.script_type = script_type;
        }
        script.updated_at = now_millis();

        conn.execute(
            "UPDATE scripts
             SET description = ?1, content = ?2, script_type = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                script.description,
                script.content,
                script.script_type.as_str(),
                script.updated_at,
                script.id,
            ],
        )?;
        append_log(&conn, &script.id, SyncAction::Update, device_id)?;

        tracing::info!(script = %script.name, "Updated script");
        Ok(script)
    }

    /// Delete a script. The audit entry is written first so a delete is
    /// visible in `sync_status` even though the row is gone.
    pub async fn delete(&self, name: &str, device_id: Option<&str>) -> Result<(), AppError> {
        let conn = self.conn.lock().await;
        let Some(script) = fetch_script(&conn, name)? else {
            return Err(AppError::NotFound(name.to_string()));
        };

        append_log(&conn, &script.id, SyncAction::Delete, device_id)?;
        conn.execute("DELETE FROM scripts WHERE id = ?1", params![script.id])?;

        tracing::info!(script = %script.name, "Deleted script");
        Ok(())
    }

    /// Audit entries newer than `since` (newest first), plus the highest
    /// timestamp across the whole log.
    pub async fn sync_status(&self, since: Option<i64>) -> Result<SyncStatus, AppError> {
        let conn = self.conn.lock().await;
        let since = since.unwrap_or(0);

        let mut statement = conn.prepare(
            "SELECT id, script_id, action, timestamp, device_id
             FROM sync_log WHERE timestamp > ?1
             ORDER BY timestamp DESC",
        )?;
        let rows = statement
            .query_map(params![since], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let logs = rows
            .into_iter()
            .map(|(id, script_id, action, timestamp, device_id)| {
                Ok(SyncLogEntry {
                    id,
                    script_id,
                    action: action
                        .parse::<SyncAction>()
                        .map_err(|error| AppError::internal(error.to_string()))?,
                    timestamp,
                    device_id,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        let latest_timestamp: i64 = conn.query_row(
            "SELECT COALESCE(MAX(timestamp), 0) FROM sync_log",
            [],
            |row| row.get(0),
        )?;

        Ok(SyncStatus {
            logs,
            latest_timestamp,
            server_time: now_millis(),
        })
    }

    /// Look up a hashed API key and stamp its last use.
    pub async fn touch_api_key(&self, key_hash: &str) -> Result<bool, AppError> {
        let conn = self.conn.lock().await;
        let id: Option<String> = conn
            .query_row(
                "SELECT id FROM api_keys WHERE key_hash = ?1",
                params![key_hash],
                |row| row.get(0),
            )
            .optional()?;

        let Some(id) = id else {
            return Ok(false);
        };
        conn.execute(
            "UPDATE api_keys SET last_used_at = ?1 WHERE id = ?2",
            params![now_millis(), id],
        )?;
        Ok(true)
    }

    #[cfg(test)]
    pub async fn insert_api_key(&self, key_hash: &str, label: &str) -> Result<(), AppError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO api_keys (id, key_hash, label, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![Uuid::new_v4().to_string(), key_hash, label, now_millis()],
        )?;
        Ok(())
    }
}

fn fetch_script(conn: &Connection, name: &str) -> Result<Option<Script>, AppError> {
    let row = conn
        .query_row(
            "SELECT id, name, description, content, script_type, created_at, updated_at
             FROM scripts WHERE name = ?1",
            params![name],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, i64>(5)?,
                    row.get::<_, i64>(6)?,
                ))
            },
        )
        .optional()?;

    row.map(
        |(id, name, description, content, script_type, created_at, updated_at)| {
            Ok(Script {
                id,
                name,
                description,
                content,
                script_type: parse_script_type(&script_type)?,
                created_at,
                updated_at,
            })
        },
    )
    .transpose()
}

fn parse_script_type(raw: &str) -> Result<ScriptType, AppError> {
    raw.parse::<ScriptType>()
        .map_err(|error| AppError::internal(error.to_string()))
}

fn append_log(
    conn: &Connection,
    script_id: &str,
    action: SyncAction,
    device_id: Option<&str>,
) -> Result<(), AppError> {
    conn.execute(
        "INSERT INTO sync_log (id, script_id, action, timestamp, device_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            Uuid::new_v4().to_string(),
            script_id,
            action.as_str(),
            now_millis(),
            device_id,
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use shelf_core::models::MAX_CONTENT_BYTES;

    use super::*;

    fn new_script(name: &str, content: &str) -> NewScript {
        NewScript {
            name: name.to_string(),
            content: content.to_string(),
            description: None,
            script_type: None,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = ScriptStore::open_in_memory().unwrap();
        let created = store
            .create(&new_script("deploy", "echo hi"), Some("dev-1"))
            .await
            .unwrap();

        let fetched = store.get("deploy").await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.script_type, ScriptType::Executable);
    }

    #[tokio::test]
    async fn create_rejects_duplicates() {
        let store = ScriptStore::open_in_memory().unwrap();
        store
            .create(&new_script("deploy", "echo hi"), None)
            .await
            .unwrap();

        let error = store
            .create(&new_script("deploy", "echo again"), None)
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::Duplicate(_)));
    }

    #[tokio::test]
    async fn create_rejects_bad_names_and_reserved_commands() {
        let store = ScriptStore::open_in_memory().unwrap();

        let error = store
            .create(&new_script("1bad", "echo hi"), None)
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::BadRequest(_)));

        let error = store
            .create(&new_script("git", "echo hi"), None)
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::ReservedName(_)));
    }

    #[tokio::test]
    async fn create_rejects_oversized_content() {
        let store = ScriptStore::open_in_memory().unwrap();
        let error = store
            .create(&new_script("big", &"x".repeat(MAX_CONTENT_BYTES + 1)), None)
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn update_patches_fields_and_bumps_timestamp() {
        let store = ScriptStore::open_in_memory().unwrap();
        let created = store
            .create(&new_script("deploy", "echo v1"), None)
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let patch = ScriptPatch {
            content: Some("echo v2".to_string()),
            description: Some("ship it".to_string()),
            script_type: None,
        };
        let updated = store.update("deploy", &patch, Some("dev-2")).await.unwrap();

        assert_eq!(updated.content, "echo v2");
        assert_eq!(updated.description.as_deref(), Some("ship it"));
        assert_eq!(updated.script_type, created.script_type);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn update_missing_script_is_not_found() {
        let store = ScriptStore::open_in_memory().unwrap();
        let error = store
            .update("ghost", &ScriptPatch::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_log_survives_the_script() {
        let store = ScriptStore::open_in_memory().unwrap();
        let created = store
            .create(&new_script("deploy", "echo hi"), Some("dev-1"))
            .await
            .unwrap();
        store.delete("deploy", Some("dev-1")).await.unwrap();

        assert!(store.get("deploy").await.unwrap().is_none());

        let status = store.sync_status(None).await.unwrap();
        let delete_entry = status
            .logs
            .iter()
            .find(|entry| entry.action == SyncAction::Delete)
            .unwrap();
        assert_eq!(delete_entry.script_id, created.id);
        assert_eq!(delete_entry.device_id.as_deref(), Some("dev-1"));
    }

    #[tokio::test]
    async fn sync_status_filters_by_since_and_reports_latest() {
        let store = ScriptStore::open_in_memory().unwrap();
        store
            .create(&new_script("first", "echo 1"), None)
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let midpoint = now_millis();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        store
            .create(&new_script("second", "echo 2"), None)
            .await
            .unwrap();

        let status = store.sync_status(Some(midpoint)).await.unwrap();
        assert_eq!(status.logs.len(), 1);
        assert!(status.latest_timestamp >= status.logs[0].timestamp);
        assert!(status.server_time >= status.latest_timestamp);

        let full = store.sync_status(None).await.unwrap();
        assert_eq!(full.logs.len(), 2);
        // Newest first.
        assert!(full.logs[0].timestamp >= full.logs[1].timestamp);
    }

    #[tokio::test]
    async fn touch_api_key_reports_presence_and_stamps_use() {
        let store = ScriptStore::open_in_memory().unwrap();
        store.insert_api_key("abc123hash", "laptop").await.unwrap();

        assert!(store.touch_api_key("abc123hash").await.unwrap());
        assert!(!store.touch_api_key("unknown").await.unwrap());
    }
}
