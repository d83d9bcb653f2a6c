//! Script model and validation

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum script body size accepted at creation/update time.
pub const MAX_CONTENT_BYTES: usize = 100 * 1024;

/// Display/behavior hint for client tooling, not enforced server-side
/// beyond the enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptType {
    /// Standalone script, installed behind a wrapper
    #[default]
    Executable,
    /// Functions/aliases meant to be sourced into a shell
    Source,
    /// A single shell function
    Function,
}

impl ScriptType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Executable => "executable",
            Self::Source => "source",
            Self::Function => "function",
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "executable" => Ok(Self::Executable),
            "source" => Ok(Self::Source),
            "function" => Ok(Self::Function),
            other => Err(Error::InvalidInput(format!(
                "Unknown script type '{other}' (expected executable, source, or function)"
            ))),
        }
    }
}

/// A script as stored on the server (canonical record)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Opaque unique identifier, assigned at creation
    pub id: String,
    /// Unique human key, immutable after creation
    pub name: String,
    /// Optional free text
    pub description: Option<String>,
    /// Script body
    pub content: String,
    pub script_type: ScriptType,
    /// Creation timestamp (unix ms)
    pub created_at: i64,
    /// Last mutation timestamp (unix ms)
    pub updated_at: i64,
}

/// Script summary returned by the list endpoint (no content)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptListItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub script_type: ScriptType,
    pub updated_at: i64,
}

/// Fields for creating a script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScript {
    pub name: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_type: Option<ScriptType>,
}

/// Partial fields for updating a script; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_type: Option<ScriptType>,
}

impl ScriptPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.content.is_none() && self.description.is_none() && self.script_type.is_none()
    }
}

/// Validate a script name against the allowed pattern.
///
/// Names must start with a letter and contain only alphanumerics, hyphens,
/// and underscores, at most 64 characters total.
pub fn validate_script_name(name: &str) -> Result<()> {
    let re = Regex::new(r"^[A-Za-z][A-Za-z0-9_-]{0,63}$").expect("Invalid regex");
    if re.is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidInput(
            "Invalid script name. Use only alphanumeric characters, hyphens, and underscores."
                .to_string(),
        ))
    }
}

/// Validate script content size against [`MAX_CONTENT_BYTES`].
pub fn validate_content_size(content: &str) -> Result<()> {
    if content.len() > MAX_CONTENT_BYTES {
        Err(Error::InvalidInput(
            "Script exceeds 100KB limit. This seems unusually large.".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Check whether a name shadows a common system command.
///
/// Installing a script called `git` or `ls` onto PATH is almost always a
/// mistake, so the server rejects these with a warning-class error.
#[must_use]
pub fn is_reserved_command(name: &str) -> bool {
    let lower = name.to_lowercase();
    RESERVED_COMMANDS.contains(&lower.as_str())
}

const RESERVED_COMMANDS: &[&str] = &[
    "ls", "cd", "cp", "mv", "rm", "mkdir", "rmdir", "cat", "echo", "grep", "find", "sed", "awk",
    "sort", "uniq", "head", "tail", "less", "more", "vi", "vim", "nano", "emacs", "git", "ssh",
    "scp", "curl", "wget", "tar", "zip", "unzip", "gzip", "gunzip", "chmod", "chown", "sudo", "su",
    "ps", "top", "htop", "kill", "killall", "man", "which", "where", "pwd", "whoami", "date",
    "time", "history", "alias", "export", "env", "source", "bash", "sh", "zsh", "fish", "node",
    "npm", "npx", "bun", "python", "python3", "pip", "pip3", "ruby", "gem", "go", "cargo", "rust",
    "docker", "kubectl", "terraform", "aws", "gcloud", "az", "make", "cmake",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_type_round_trips_through_str() {
        for kind in [
            ScriptType::Executable,
            ScriptType::Source,
            ScriptType::Function,
        ] {
            assert_eq!(kind.as_str().parse::<ScriptType>().unwrap(), kind);
        }
        assert!("daemon".parse::<ScriptType>().is_err());
    }

    #[test]
    fn script_type_serde_uses_lowercase() {
        assert_eq!(
            serde_json::to_string(&ScriptType::Executable).unwrap(),
            "\"executable\""
        );
        let parsed: ScriptType = serde_json::from_str("\"function\"").unwrap();
        assert_eq!(parsed, ScriptType::Function);
    }

    #[test]
    fn validate_script_name_accepts_safe_names() {
        assert!(validate_script_name("my-script_2").is_ok());
        assert!(validate_script_name("a").is_ok());
        assert!(validate_script_name(&format!("a{}", "b".repeat(63))).is_ok());
    }

    #[test]
    fn validate_script_name_rejects_bad_names() {
        assert!(validate_script_name("1abc").is_err());
        assert!(validate_script_name("ab cd").is_err());
        assert!(validate_script_name("").is_err());
        assert!(validate_script_name(&"a".repeat(65)).is_err());
        assert!(validate_script_name("dot.name").is_err());
    }

    #[test]
    fn validate_content_size_boundary() {
        assert!(validate_content_size(&"x".repeat(MAX_CONTENT_BYTES)).is_ok());
        assert!(validate_content_size(&"x".repeat(MAX_CONTENT_BYTES + 1)).is_err());
    }

    #[test]
    fn reserved_commands_are_case_insensitive() {
        assert!(is_reserved_command("git"));
        assert!(is_reserved_command("GIT"));
        assert!(!is_reserved_command("git-helper"));
    }

    #[test]
    fn script_patch_is_empty() {
        assert!(ScriptPatch::default().is_empty());
        let patch = ScriptPatch {
            content: Some("echo hi".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
