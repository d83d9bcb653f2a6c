//! Local store: the on-disk mirror of scripts.
//!
//! Each script occupies a `{name}.sh` content file and a
//! `{name}.meta.json` metadata file, written as a pair. A pair with
//! missing or corrupt metadata is treated as absent so one damaged entry
//! never blocks an otherwise-healthy sync, but the anomaly is logged
//! distinctly from a plain cache miss.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{validate_script_name, CachedScript, ScriptType};
use crate::util::now_millis;

const CONTENT_SUFFIX: &str = ".sh";
const META_SUFFIX: &str = ".meta.json";

/// Sidecar metadata stored next to each cached script body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheMetadata {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    script_type: ScriptType,
    #[serde(default)]
    updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    local_modified_at: Option<i64>,
}

/// Durable mapping from script name to `(content, metadata)`.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Path of the cached content file; public because installed
    /// wrappers re-read it at run time.
    #[must_use]
    pub fn content_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}{CONTENT_SUFFIX}"))
    }

    fn meta_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}{META_SUFFIX}"))
    }

    /// Fetch a cached script. Fails soft: missing or corrupt entries
    /// return `None` and never raise.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<CachedScript> {
        let content_path = self.content_path(name);
        let meta_path = self.meta_path(name);

        if !content_path.exists() || !meta_path.exists() {
            return None;
        }

        let content = read_or_warn(&content_path, name)?;
        let raw_meta = read_or_warn(&meta_path, name)?;
        let meta = match serde_json::from_str::<CacheMetadata>(&raw_meta) {
            Ok(meta) => meta,
            Err(error) => {
                tracing::warn!(
                    script = name,
                    %error,
                    "Cache metadata is corrupt, treating entry as absent"
                );
                return None;
            }
        };

        Some(CachedScript {
            name: name.to_string(),
            content,
            description: meta.description,
            script_type: meta.script_type,
            updated_at: meta.updated_at,
            local_modified_at: meta.local_modified_at,
        })
    }

    /// Write content and metadata as a pair, overwriting any prior entry
    /// with the same name. The name is validated here because it becomes
    /// a file name; a record with a path-like name must never leave the
    /// cache directory, whatever end served it.
    pub fn put(&self, script: &CachedScript) -> Result<()> {
        validate_script_name(&script.name)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.content_path(&script.name), &script.content)?;

        let meta = CacheMetadata {
            description: script.description.clone(),
            script_type: script.script_type,
            updated_at: script.updated_at,
            local_modified_at: script.local_modified_at,
        };
        std::fs::write(
            self.meta_path(&script.name),
            serde_json::to_string(&meta)?,
        )?;
        Ok(())
    }

    /// Stamp the entry as locally modified. No-op when absent.
    pub fn mark_modified(&self, name: &str) -> Result<()> {
        let meta_path = self.meta_path(name);
        if !meta_path.exists() {
            return Ok(());
        }

        let raw = std::fs::read_to_string(&meta_path)?;
        let mut meta: CacheMetadata = serde_json::from_str(&raw)?;
        meta.local_modified_at = Some(now_millis());
        std::fs::write(&meta_path, serde_json::to_string(&meta)?)?;
        Ok(())
    }

    /// Delete both files. Idempotent.
    pub fn remove(&self, name: &str) -> Result<()> {
        for path in [self.content_path(name), self.meta_path(name)] {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
                Err(error) => return Err(error.into()),
            }
        }
        Ok(())
    }

    /// Every entry whose content and metadata both load; broken pairs
    /// are skipped.
    #[must_use]
    pub fn list(&self) -> Vec<CachedScript> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut scripts: Vec<CachedScript> = entries
            .filter_map(std::result::Result::ok)
            .filter_map(|entry| {
                let file_name = entry.file_name().into_string().ok()?;
                let name = file_name.strip_suffix(CONTENT_SUFFIX)?.to_string();
                self.get(&name)
            })
            .collect();
        scripts.sort_by(|a, b| a.name.cmp(&b.name));
        scripts
    }

    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.content_path(name).exists() && self.meta_path(name).exists()
    }

    /// Raw cached content, metadata not required.
    #[must_use]
    pub fn content(&self, name: &str) -> Option<String> {
        std::fs::read_to_string(self.content_path(name)).ok()
    }

    /// Replace the cached body and stamp the entry dirty. No-op when the
    /// entry is absent.
    pub fn update_content(&self, name: &str, content: &str) -> Result<()> {
        let content_path = self.content_path(name);
        if !content_path.exists() {
            return Ok(());
        }
        std::fs::write(&content_path, content)?;
        self.mark_modified(name)
    }
}

fn read_or_warn(path: &Path, name: &str) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(error) => {
            tracing::warn!(
                script = name,
                path = %path.display(),
                %error,
                "Cache file is unreadable, treating entry as absent"
            );
            None
        }
    }
}
