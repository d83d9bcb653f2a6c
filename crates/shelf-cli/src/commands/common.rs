use std::env;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use shelf_core::api::ApiClient;
use shelf_core::cache::CacheStore;
use shelf_core::config::{Config, Paths};
use shelf_core::install::Installer;
use shelf_core::sync::{Reconciler, SyncOutcome};

use crate::error::CliError;

/// Everything a command needs: resolved layout, loaded config, and the
/// stores rooted under it.
pub struct Context {
    pub paths: Paths,
    pub config: Config,
    pub cache: CacheStore,
    pub installer: Installer,
}

impl Context {
    pub fn load() -> Result<Self, CliError> {
        let paths = Paths::resolve();
        tracing::debug!(base_dir = %paths.base_dir.display(), "Resolved shelf home");
        let config = Config::load_or_init(&paths)?;
        let cache = CacheStore::new(paths.cache_dir.clone());
        let installer = Installer::new(paths.bin_dir.clone());
        Ok(Self {
            paths,
            config,
            cache,
            installer,
        })
    }

    /// Build the API client, failing when no key is configured.
    pub fn client(&self) -> Result<ApiClient, CliError> {
        if self.config.api_key.is_none() {
            return Err(CliError::NotConfigured);
        }
        Ok(ApiClient::new(&self.config)?)
    }

    pub fn reconciler<'a>(&'a self, client: &'a ApiClient) -> Reconciler<'a, ApiClient> {
        Reconciler::new(client, &self.cache, &self.paths)
    }
}

/// Print what a batch sync did, conflicts and failures last.
pub fn print_outcome(outcome: &SyncOutcome) {
    for name in &outcome.pushed {
        println!("pushed   {name}");
    }
    for name in &outcome.pulled {
        println!("pulled   {name}");
    }
    for name in &outcome.deleted {
        println!("deleted  {name}");
    }
    if outcome.pushed.is_empty() && outcome.pulled.is_empty() && outcome.deleted.is_empty() {
        println!("Everything up to date");
    }
    for conflict in &outcome.conflicts {
        println!(
            "conflict {name} (edited locally and on the server; `shelf push {name}` keeps \
             this copy, `shelf pull {name}` takes the server's)",
            name = conflict.name
        );
    }
    for error in &outcome.errors {
        eprintln!("failed   {}: {}", error.name, error.message);
    }
}

/// Ask for confirmation on a terminal. Non-interactive stdin refuses.
pub fn confirm(prompt: &str) -> Result<bool, CliError> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Ok(false);
    }

    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    stdin.read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Script content from an explicit file, piped stdin, or the editor.
pub fn resolve_content(
    file: Option<&Path>,
    initial: &str,
) -> Result<Option<String>, CliError> {
    if let Some(path) = file {
        return Ok(normalize_content(&std::fs::read_to_string(path)?));
    }

    if let Some(content) = read_piped_stdin()? {
        return Ok(Some(content));
    }

    capture_editor_input(initial)
}

fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn capture_editor_input(initial_content: &str) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_script_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_content(&content))
}

fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            // Fallback for editor commands with args, e.g. "code --wait"
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let mut command = Command::new(program);
            command.args(parts).arg(file_path);

            let status = command.status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

fn create_temp_script_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("shelf-edit-{}-{now}.sh", std::process::id()))
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_content_trims_and_rejects_empty() {
        assert_eq!(normalize_content("  echo hi  "), Some("echo hi".to_string()));
        assert_eq!(normalize_content(" \n\t "), None);
    }

    #[test]
    fn normalize_content_keeps_multiline_text() {
        assert_eq!(
            normalize_content("line 1\nline 2\n"),
            Some("line 1\nline 2".to_string())
        );
    }

    #[test]
    fn default_editor_is_defined() {
        assert!(!default_editor().is_empty());
    }

    #[test]
    fn format_relative_time_units() {
        let now = 10_000_000;
        assert_eq!(format_relative_time(now - 30_000, now), "just now");
        assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
        assert_eq!(format_relative_time(now - 2 * 60 * 60_000, now), "2h ago");
    }

    #[test]
    fn resolve_content_reads_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("script.sh");
        std::fs::write(&path, "echo from-file\n").unwrap();

        let content = resolve_content(Some(&path), "").unwrap();
        assert_eq!(content, Some("echo from-file".to_string()));
    }
}
