//! Data models for shelf

mod cached_script;
mod script;
mod sync_log;

pub use cached_script::CachedScript;
pub use script::{
    is_reserved_command, validate_content_size, validate_script_name, NewScript, Script,
    ScriptListItem, ScriptPatch, ScriptType, MAX_CONTENT_BYTES,
};
pub use sync_log::{SyncAction, SyncLogEntry, SyncStatus};
