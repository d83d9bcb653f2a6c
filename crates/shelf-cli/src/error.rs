use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] shelf_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No script content provided")]
    EmptyContent,
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("No API key configured. Run `shelf auth set-key <KEY>` first.")]
    NotConfigured,
    #[error("Aborted")]
    Aborted,
    #[error("Script '{0}' exited with status {1}")]
    ScriptFailed(String, i32),
}
