//! Reconciler: drives the cache toward server state and local edits
//! toward the server.
//!
//! Conflict handling is last-write-wins with detection: a batch pull
//! that would overwrite an unpushed local edit skips the script and
//! records a conflict instead, and resolution stays manual (push to
//! keep the local copy, pull one script to discard it).

use crate::api::ApiClient;
use crate::cache::CacheStore;
use crate::config::{set_last_sync_timestamp, Paths};
use crate::error::{Error, Result};
use crate::install::Installer;
use crate::models::{CachedScript, NewScript, Script, ScriptListItem, ScriptPatch, ScriptType};
use crate::util::now_millis;

/// Remote operations the reconciler needs. Implemented by [`ApiClient`];
/// tests substitute an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait RemoteApi {
    async fn list_scripts(&self) -> Result<Vec<ScriptListItem>>;
    async fn get_script(&self, name: &str) -> Result<Script>;
    async fn create_script(&self, script: &NewScript) -> Result<Script>;
    async fn update_script(&self, name: &str, patch: &ScriptPatch) -> Result<Script>;
    async fn delete_script(&self, name: &str) -> Result<()>;
}

impl RemoteApi for ApiClient {
    async fn list_scripts(&self) -> Result<Vec<ScriptListItem>> {
        Self::list_scripts(self).await
    }

    async fn get_script(&self, name: &str) -> Result<Script> {
        Self::get_script(self, name).await
    }

    async fn create_script(&self, script: &NewScript) -> Result<Script> {
        Self::create_script(self, script).await
    }

    async fn update_script(&self, name: &str, patch: &ScriptPatch) -> Result<Script> {
        Self::update_script(self, name, patch).await
    }

    async fn delete_script(&self, name: &str) -> Result<()> {
        Self::delete_script(self, name).await
    }
}

/// A pull that was skipped because both sides advanced independently.
/// Transient: derived during a batch pull, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub name: String,
    pub local_modified: i64,
    pub server_modified: i64,
}

/// A per-script failure that did not abort the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncError {
    pub name: String,
    pub message: String,
}

/// What a batch operation did, script by script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub pulled: Vec<String>,
    pub pushed: Vec<String>,
    pub deleted: Vec<String>,
    pub conflicts: Vec<Conflict>,
    pub errors: Vec<SyncError>,
}

impl SyncOutcome {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty() && self.errors.is_empty()
    }

    pub fn merge(&mut self, other: Self) {
        self.pulled.extend(other.pulled);
        self.pushed.extend(other.pushed);
        self.deleted.extend(other.deleted);
        self.conflicts.extend(other.conflicts);
        self.errors.extend(other.errors);
    }

    fn record_error(&mut self, name: &str, error: &Error) {
        tracing::warn!(script = name, %error, "Sync step failed, continuing");
        self.errors.push(SyncError {
            name: name.to_string(),
            message: error.to_string(),
        });
    }
}

/// Combined local/remote view of one script for status listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStatus {
    pub name: String,
    pub description: Option<String>,
    pub script_type: ScriptType,
    pub cached: bool,
    pub installed: bool,
    pub dirty: bool,
    /// `None` when the server was unreachable and remote presence is
    /// unknown.
    pub on_server: Option<bool>,
    /// Last known mutation (unix ms), from the cache or the listing.
    pub updated_at: i64,
}

/// Single display state derived from the status flags. Display only:
/// sync decisions never consult it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptState {
    /// On the server, never pulled
    NotSynced,
    /// Cached but missing on the server
    LocalOnly,
    /// Cached with an unpushed local edit
    Modified,
    /// Cached and on the executable path
    Installed,
    /// Cached only
    Cached,
}

impl ScriptStatus {
    #[must_use]
    pub fn state(&self) -> ScriptState {
        if !self.cached {
            ScriptState::NotSynced
        } else if self.on_server == Some(false) {
            ScriptState::LocalOnly
        } else if self.dirty {
            ScriptState::Modified
        } else if self.installed {
            ScriptState::Installed
        } else {
            ScriptState::Cached
        }
    }
}

/// Reconciler over an explicit remote client, cache, and layout.
#[derive(Debug)]
pub struct Reconciler<'a, A: RemoteApi> {
    api: &'a A,
    cache: &'a CacheStore,
    paths: &'a Paths,
}

impl<'a, A: RemoteApi> Reconciler<'a, A> {
    #[must_use]
    pub const fn new(api: &'a A, cache: &'a CacheStore, paths: &'a Paths) -> Self {
        Self { api, cache, paths }
    }

    /// Pull one script, unconditionally overwriting the cached entry
    /// with server content. The wholesale metadata replacement discards
    /// any dirty flag, so an explicit single pull is how a conflict is
    /// resolved in the server's favor.
    pub async fn pull_script(&self, name: &str) -> Result<Script> {
        let remote = self.api.get_script(name).await?;
        self.cache.put(&CachedScript::from(&remote))?;
        Ok(remote)
    }

    /// Refresh the cache from the server before a local edit. Takes the
    /// server's copy like [`Self::pull_script`], but a script the server
    /// has never seen keeps its cached local-only entry instead of
    /// failing.
    pub async fn refresh_script(&self, name: &str) -> Result<()> {
        match self.pull_script(name).await {
            Ok(_) => Ok(()),
            Err(Error::NotFound(_)) if self.cache.exists(name) => Ok(()),
            Err(error) => Err(error),
        }
    }

    /// Pull every script on the server.
    ///
    /// Per remote summary: a conflict exists iff the cached entry
    /// carries an unpushed edit AND the server advanced past the cached
    /// sync point; conflicted scripts are skipped and recorded. Clean
    /// entries are pulled only when the remote copy is newer. One bad
    /// script never aborts the batch.
    pub async fn pull_all(&self) -> Result<SyncOutcome> {
        let listing = self.api.list_scripts().await?;
        let mut outcome = SyncOutcome::default();

        for item in listing {
            if let Some(cached) = self.cache.get(&item.name) {
                if cached.is_dirty() && item.updated_at > cached.updated_at {
                    outcome.conflicts.push(Conflict {
                        name: item.name,
                        local_modified: cached.local_modified_at.unwrap_or(cached.updated_at),
                        server_modified: item.updated_at,
                    });
                    continue;
                }
                if item.updated_at <= cached.updated_at {
                    continue;
                }
            }

            match self.pull_script(&item.name).await {
                Ok(_) => outcome.pulled.push(item.name),
                Err(error) => outcome.record_error(&item.name, &error),
            }
        }

        // Display bookkeeping only; conflict detection never reads it.
        set_last_sync_timestamp(self.paths, now_millis())?;
        Ok(outcome)
    }

    /// Push one cached script to the server and re-sync the cache entry
    /// from the canonical record the server returns, clearing the dirty
    /// flag.
    ///
    /// A script the server has never seen is created; an existing one is
    /// updated in place. The server applies last-write-wins on update.
    pub async fn push_script(&self, name: &str) -> Result<()> {
        let Some(cached) = self.cache.get(name) else {
            return Err(Error::NotFound(name.to_string()));
        };

        let patch = ScriptPatch {
            content: Some(cached.content.clone()),
            description: cached.description.clone(),
            script_type: Some(cached.script_type),
        };

        let canonical = match self.api.update_script(name, &patch).await {
            Ok(script) => script,
            Err(Error::NotFound(_)) => {
                let new_script = NewScript {
                    name: name.to_string(),
                    content: cached.content,
                    description: cached.description,
                    script_type: Some(cached.script_type),
                };
                self.api.create_script(&new_script).await?
            }
            Err(error) => return Err(error),
        };

        self.cache.put(&CachedScript::from(&canonical))?;
        Ok(())
    }

    /// Push every cached script with an unpushed edit.
    pub async fn push_all(&self) -> Result<SyncOutcome> {
        let mut outcome = SyncOutcome::default();
        for cached in self.cache.list() {
            if !cached.is_dirty() {
                continue;
            }
            match self.push_script(&cached.name).await {
                Ok(()) => outcome.pushed.push(cached.name),
                Err(error) => outcome.record_error(&cached.name, &error),
            }
        }
        Ok(outcome)
    }

    /// Full sync: push local edits first, then pull the rest.
    ///
    /// Pushing first means a pushed edit is no longer dirty when the
    /// pull pass sees it. The two passes are not atomic; an edit landing
    /// on the server between them is picked up on the next sync.
    pub async fn sync_all(&self) -> Result<SyncOutcome> {
        let mut outcome = self.push_all().await?;
        outcome.merge(self.pull_all().await?);
        Ok(outcome)
    }

    /// Delete a script on the server and drop the cached copy.
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.api.delete_script(name).await?;
        self.cache.remove(name)
    }

    /// Status of every known script, local and remote combined. When the
    /// server is unreachable the view degrades to cache-only with remote
    /// presence unknown.
    pub async fn script_statuses(&self, installer: &Installer) -> Vec<ScriptStatus> {
        let remote = self.api.list_scripts().await.ok();
        script_statuses(&self.cache.list(), remote.as_deref(), installer)
    }
}

/// Pure merge of cached entries and a remote listing into statuses,
/// sorted by name.
#[must_use]
pub fn script_statuses(
    cached: &[CachedScript],
    remote: Option<&[ScriptListItem]>,
    installer: &Installer,
) -> Vec<ScriptStatus> {
    let mut statuses: Vec<ScriptStatus> = cached
        .iter()
        .map(|entry| ScriptStatus {
            name: entry.name.clone(),
            description: entry.description.clone(),
            script_type: entry.script_type,
            cached: true,
            installed: installer.is_installed(&entry.name),
            dirty: entry.is_dirty(),
            on_server: remote.map(|items| items.iter().any(|item| item.name == entry.name)),
            updated_at: entry.local_modified_at.unwrap_or(entry.updated_at),
        })
        .collect();

    if let Some(items) = remote {
        for item in items {
            if cached.iter().any(|entry| entry.name == item.name) {
                continue;
            }
            statuses.push(ScriptStatus {
                name: item.name.clone(),
                description: item.description.clone(),
                script_type: item.script_type,
                cached: false,
                installed: installer.is_installed(&item.name),
                dirty: false,
                on_server: Some(true),
                updated_at: item.updated_at,
            });
        }
    }

    statuses.sort_by(|a, b| a.name.cmp(&b.name));
    statuses
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    /// In-memory server with per-name failure injection.
    #[derive(Debug, Default)]
    struct FakeApi {
        scripts: Mutex<BTreeMap<String, Script>>,
        failing: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn seed(&self, name: &str, content: &str, updated_at: i64) {
            let script = Script {
                id: format!("id-{name}"),
                name: name.to_string(),
                description: None,
                content: content.to_string(),
                script_type: ScriptType::Executable,
                created_at: 1,
                updated_at,
            };
            self.scripts
                .lock()
                .unwrap()
                .insert(name.to_string(), script);
        }

        fn fail_on(&self, name: &str) {
            self.failing.lock().unwrap().push(name.to_string());
        }

        fn check_fail(&self, name: &str) -> Result<()> {
            if self.failing.lock().unwrap().iter().any(|n| n == name) {
                return Err(Error::Api {
                    message: "injected failure".to_string(),
                    status: 500,
                    warning: false,
                });
            }
            Ok(())
        }

        fn content_of(&self, name: &str) -> Option<String> {
            self.scripts
                .lock()
                .unwrap()
                .get(name)
                .map(|s| s.content.clone())
        }
    }

    impl RemoteApi for FakeApi {
        async fn list_scripts(&self) -> Result<Vec<ScriptListItem>> {
            Ok(self
                .scripts
                .lock()
                .unwrap()
                .values()
                .map(|script| ScriptListItem {
                    id: script.id.clone(),
                    name: script.name.clone(),
                    description: script.description.clone(),
                    script_type: script.script_type,
                    updated_at: script.updated_at,
                })
                .collect())
        }

        async fn get_script(&self, name: &str) -> Result<Script> {
            self.check_fail(name)?;
            self.scripts
                .lock()
                .unwrap()
                .get(name)
                .cloned()
                .ok_or_else(|| Error::NotFound(name.to_string()))
        }

        async fn create_script(&self, new_script: &NewScript) -> Result<Script> {
            self.check_fail(&new_script.name)?;
            let mut scripts = self.scripts.lock().unwrap();
            if scripts.contains_key(&new_script.name) {
                return Err(Error::Duplicate(new_script.name.clone()));
            }
            let script = Script {
                id: format!("id-{}", new_script.name),
                name: new_script.name.clone(),
                description: new_script.description.clone(),
                content: new_script.content.clone(),
                script_type: new_script.script_type.unwrap_or_default(),
                created_at: now_millis(),
                updated_at: now_millis(),
            };
            scripts.insert(script.name.clone(), script.clone());
            Ok(script)
        }

        async fn update_script(&self, name: &str, patch: &ScriptPatch) -> Result<Script> {
            self.check_fail(name)?;
            let mut scripts = self.scripts.lock().unwrap();
            let script = scripts
                .get_mut(name)
                .ok_or_else(|| Error::NotFound(name.to_string()))?;
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
            Ok(script.clone())
        }

        async fn delete_script(&self, name: &str) -> Result<()> {
            self.check_fail(name)?;
            self.scripts
                .lock()
                .unwrap()
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| Error::NotFound(name.to_string()))
        }
    }

    struct Fixture {
        _dir: TempDir,
        api: FakeApi,
        cache: CacheStore,
        paths: Paths,
        installer: Installer,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let paths = Paths::new(dir.path().join("shelf"));
            let cache = CacheStore::new(paths.cache_dir.clone());
            let installer = Installer::new(paths.bin_dir.clone());
            Self {
                _dir: dir,
                api: FakeApi::default(),
                cache,
                paths,
                installer,
            }
        }

        fn reconciler(&self) -> Reconciler<'_, FakeApi> {
            Reconciler::new(&self.api, &self.cache, &self.paths)
        }
    }

    #[tokio::test]
    async fn pull_fetches_and_caches_the_script() {
        let fx = Fixture::new();
        fx.api.seed("deploy", "echo v1", 100);

        let script = fx.reconciler().pull_script("deploy").await.unwrap();
        assert_eq!(script.content, "echo v1");
        let cached = fx.cache.get("deploy").unwrap();
        assert_eq!(cached.content, "echo v1");
        assert!(!cached.is_dirty());
    }

    #[tokio::test]
    async fn single_pull_overwrites_even_a_dirty_copy() {
        let fx = Fixture::new();
        fx.api.seed("deploy", "echo v1", 100);
        fx.reconciler().pull_script("deploy").await.unwrap();
        fx.cache.update_content("deploy", "echo local-edit").unwrap();

        fx.reconciler().pull_script("deploy").await.unwrap();
        let cached = fx.cache.get("deploy").unwrap();
        assert_eq!(cached.content, "echo v1");
        assert!(!cached.is_dirty());
    }

    #[tokio::test]
    async fn refresh_starts_a_conflicted_edit_from_the_server_copy() {
        let fx = Fixture::new();
        fx.api.seed("deploy", "echo v1", 100);
        fx.reconciler().pull_script("deploy").await.unwrap();
        fx.cache.update_content("deploy", "echo local-edit").unwrap();
        fx.api.seed("deploy", "echo remote-edit", now_millis() + 10);

        fx.reconciler().refresh_script("deploy").await.unwrap();
        let cached = fx.cache.get("deploy").unwrap();
        assert_eq!(cached.content, "echo remote-edit");
        assert!(!cached.is_dirty());
    }

    #[tokio::test]
    async fn refresh_keeps_scripts_the_server_has_never_seen() {
        let fx = Fixture::new();
        fx.cache
            .put(&CachedScript {
                name: "local-only".to_string(),
                content: "echo mine".to_string(),
                description: None,
                script_type: ScriptType::Executable,
                updated_at: 0,
                local_modified_at: Some(now_millis()),
            })
            .unwrap();

        fx.reconciler().refresh_script("local-only").await.unwrap();
        let cached = fx.cache.get("local-only").unwrap();
        assert_eq!(cached.content, "echo mine");
        assert!(cached.is_dirty());
    }

    #[tokio::test]
    async fn refresh_of_an_unknown_script_is_an_error() {
        let fx = Fixture::new();
        let result = fx.reconciler().refresh_script("ghost").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn pull_all_conflict_leaves_local_copy_untouched() {
        let fx = Fixture::new();
        fx.api.seed("deploy", "echo v1", 100);
        fx.reconciler().pull_script("deploy").await.unwrap();

        fx.cache.update_content("deploy", "echo local-edit").unwrap();
        let server_time = now_millis() + 10;
        fx.api.seed("deploy", "echo remote-edit", server_time);

        let outcome = fx.reconciler().pull_all().await.unwrap();
        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(outcome.conflicts[0].name, "deploy");
        assert_eq!(outcome.conflicts[0].server_modified, server_time);
        assert!(outcome.conflicts[0].local_modified > 100);
        assert!(outcome.pulled.is_empty());
        // The local edit survives untouched.
        assert_eq!(fx.cache.content("deploy").unwrap(), "echo local-edit");
    }

    #[tokio::test]
    async fn pull_all_overwrites_clean_copy_when_remote_is_newer() {
        let fx = Fixture::new();
        fx.api.seed("deploy", "echo v1", 100);
        fx.reconciler().pull_script("deploy").await.unwrap();

        fx.api.seed("deploy", "echo v2", now_millis() + 10);
        let outcome = fx.reconciler().pull_all().await.unwrap();
        assert_eq!(outcome.pulled, vec!["deploy".to_string()]);
        assert_eq!(fx.cache.content("deploy").unwrap(), "echo v2");
    }

    #[tokio::test]
    async fn pull_all_skips_current_entries_dirty_or_not() {
        let fx = Fixture::new();
        fx.api.seed("deploy", "echo v1", 100);
        fx.reconciler().pull_script("deploy").await.unwrap();
        fx.cache.update_content("deploy", "echo local-edit").unwrap();

        // The server has not advanced, so the dirty copy is left alone.
        let outcome = fx.reconciler().pull_all().await.unwrap();
        assert!(outcome.pulled.is_empty());
        assert!(outcome.conflicts.is_empty());
        assert_eq!(fx.cache.content("deploy").unwrap(), "echo local-edit");
    }

    #[tokio::test]
    async fn pull_all_isolates_per_script_failures() {
        let fx = Fixture::new();
        fx.api.seed("good", "echo good", 100);
        fx.api.seed("bad", "echo bad", 100);
        fx.api.fail_on("bad");

        let outcome = fx.reconciler().pull_all().await.unwrap();
        assert_eq!(outcome.pulled, vec!["good".to_string()]);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].name, "bad");
        assert!(fx.cache.exists("good"));
    }

    #[tokio::test]
    async fn pull_all_sets_last_sync_marker() {
        let fx = Fixture::new();
        fx.api.seed("deploy", "echo v1", 100);

        fx.reconciler().pull_all().await.unwrap();
        assert!(crate::config::last_sync_timestamp(&fx.paths) > 0);
    }

    #[tokio::test]
    async fn push_updates_existing_script_and_clears_dirty_flag() {
        let fx = Fixture::new();
        fx.api.seed("deploy", "echo v1", 100);
        fx.reconciler().pull_script("deploy").await.unwrap();
        fx.cache.update_content("deploy", "echo v2").unwrap();

        fx.reconciler().push_script("deploy").await.unwrap();
        assert_eq!(fx.api.content_of("deploy").unwrap(), "echo v2");
        assert!(!fx.cache.get("deploy").unwrap().is_dirty());
    }

    #[tokio::test]
    async fn push_creates_script_the_server_has_never_seen() {
        let fx = Fixture::new();
        fx.cache
            .put(&CachedScript {
                name: "brand-new".to_string(),
                content: "echo hi".to_string(),
                description: Some("fresh".to_string()),
                script_type: ScriptType::Executable,
                updated_at: 0,
                local_modified_at: Some(now_millis()),
            })
            .unwrap();

        fx.reconciler().push_script("brand-new").await.unwrap();
        assert_eq!(fx.api.content_of("brand-new").unwrap(), "echo hi");
        assert!(!fx.cache.get("brand-new").unwrap().is_dirty());
    }

    #[tokio::test]
    async fn push_missing_cache_entry_is_an_error() {
        let fx = Fixture::new();
        let result = fx.reconciler().push_script("ghost").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn push_all_skips_clean_entries() {
        let fx = Fixture::new();
        fx.api.seed("clean", "echo clean", 100);
        fx.api.seed("dirty", "echo v1", 100);
        fx.reconciler().pull_all().await.unwrap();
        fx.cache.update_content("dirty", "echo v2").unwrap();

        let outcome = fx.reconciler().push_all().await.unwrap();
        assert_eq!(outcome.pushed, vec!["dirty".to_string()]);
        assert_eq!(fx.api.content_of("clean").unwrap(), "echo clean");
    }

    #[tokio::test]
    async fn sync_all_pushes_edits_before_pulling() {
        let fx = Fixture::new();
        fx.api.seed("deploy", "echo v1", 100);
        fx.api.seed("other", "echo other", 100);
        fx.reconciler().pull_script("deploy").await.unwrap();
        fx.cache.update_content("deploy", "echo v2").unwrap();

        let outcome = fx.reconciler().sync_all().await.unwrap();
        assert_eq!(outcome.pushed, vec!["deploy".to_string()]);
        assert_eq!(outcome.pulled, vec!["other".to_string()]);
        assert!(outcome.conflicts.is_empty());
        assert_eq!(fx.api.content_of("deploy").unwrap(), "echo v2");
    }

    #[tokio::test]
    async fn delete_removes_server_record_and_cache_entry() {
        let fx = Fixture::new();
        fx.api.seed("deploy", "echo v1", 100);
        fx.reconciler().pull_script("deploy").await.unwrap();

        fx.reconciler().delete("deploy").await.unwrap();
        assert!(fx.api.content_of("deploy").is_none());
        assert!(!fx.cache.exists("deploy"));
    }

    #[tokio::test]
    async fn statuses_merge_local_and_remote_views() {
        let fx = Fixture::new();
        fx.api.seed("remote-only", "echo r", 100);
        fx.api.seed("pulled", "echo p", 100);
        fx.api.seed("edited", "echo e", 100);
        fx.reconciler().pull_script("pulled").await.unwrap();
        fx.reconciler().pull_script("edited").await.unwrap();
        fx.cache.update_content("edited", "echo e2").unwrap();
        fx.api.seed("edited", "echo e3", now_millis() + 10);
        fx.cache
            .put(&CachedScript {
                name: "local-only".to_string(),
                content: "echo l".to_string(),
                description: None,
                script_type: ScriptType::Executable,
                updated_at: 0,
                local_modified_at: Some(1),
            })
            .unwrap();

        let statuses = fx.reconciler().script_statuses(&fx.installer).await;
        let state_of = |name: &str| {
            statuses
                .iter()
                .find(|s| s.name == name)
                .map(ScriptStatus::state)
                .unwrap()
        };
        assert_eq!(state_of("remote-only"), ScriptState::NotSynced);
        assert_eq!(state_of("pulled"), ScriptState::Cached);
        assert_eq!(state_of("edited"), ScriptState::Modified);
        // Local-only takes precedence over the dirty flag.
        assert_eq!(state_of("local-only"), ScriptState::LocalOnly);
    }

    #[test]
    fn offline_statuses_degrade_to_cache_view() {
        let dir = TempDir::new().unwrap();
        let installer = Installer::new(dir.path().join("bin"));
        let cached = vec![CachedScript {
            name: "deploy".to_string(),
            content: "echo d".to_string(),
            description: None,
            script_type: ScriptType::Executable,
            updated_at: 100,
            local_modified_at: None,
        }];

        let statuses = script_statuses(&cached, None, &installer);
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].on_server, None);
        assert_eq!(statuses[0].state(), ScriptState::Cached);
    }
}
