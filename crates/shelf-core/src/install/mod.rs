//! Installer: materializes cached scripts onto the executable search path.
//!
//! Executable scripts get a wrapper that re-reads the cached file at run
//! time, so pulls take effect without reinstalling. Source/function
//! scripts are linked directly to the cached file.

use std::env;
use std::path::{Path, PathBuf};

use crate::cache::CacheStore;
use crate::error::Result;
use crate::models::ScriptType;

/// Outcome of scanning shell rc files for the PATH export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSetup {
    pub configured: bool,
    pub shell_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Installer {
    bin_dir: PathBuf,
}

impl Installer {
    #[must_use]
    pub const fn new(bin_dir: PathBuf) -> Self {
        Self { bin_dir }
    }

    fn bin_path(&self, name: &str) -> PathBuf {
        self.bin_dir.join(name)
    }

    #[must_use]
    pub fn is_installed(&self, name: &str) -> bool {
        self.bin_path(name).exists()
    }

    /// Install a cached script. Returns `false` when the script is not
    /// in the cache.
    pub fn install(&self, cache: &CacheStore, name: &str) -> Result<bool> {
        let Some(cached) = cache.get(name) else {
            return Ok(false);
        };

        std::fs::create_dir_all(&self.bin_dir)?;
        let bin_path = self.bin_path(name);
        let cache_path = cache.content_path(name);

        if bin_path.exists() {
            std::fs::remove_file(&bin_path)?;
        }

        if cached.script_type == ScriptType::Executable {
            let wrapper = format!(
                "#!/usr/bin/env bash\n# shelf wrapper for: {name}\nexec bash \"{}\" \"$@\"\n",
                cache_path.display()
            );
            std::fs::write(&bin_path, wrapper)?;
            make_executable(&bin_path)?;
        } else {
            link_script(&cache_path, &bin_path)?;
            make_executable(&cache_path)?;
        }

        Ok(true)
    }

    /// Remove the installed entry. Returns `false` when nothing was
    /// installed under that name.
    pub fn uninstall(&self, name: &str) -> Result<bool> {
        let bin_path = self.bin_path(name);
        if !bin_path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&bin_path)?;
        Ok(true)
    }

    #[must_use]
    pub fn list_installed(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.bin_dir) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .filter_map(std::result::Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }

    /// Scan common shell rc files for the bin-dir PATH export.
    #[must_use]
    pub fn check_path_setup(&self) -> PathSetup {
        let Some(home) = dirs::home_dir() else {
            return PathSetup {
                configured: false,
                shell_file: None,
            };
        };

        let needle = self.bin_dir.display().to_string();
        for file in [".bashrc", ".zshrc", ".profile", ".bash_profile"] {
            let path = home.join(file);
            if let Ok(content) = std::fs::read_to_string(&path) {
                if content.contains(&needle) || content.contains(".shelf/bin") {
                    return PathSetup {
                        configured: true,
                        shell_file: Some(path),
                    };
                }
            }
        }

        PathSetup {
            configured: false,
            shell_file: None,
        }
    }

    /// The line to append to a shell rc file to put installed scripts on
    /// the PATH.
    #[must_use]
    pub fn path_export_line(&self) -> String {
        format!(
            "\n# shelf installed scripts\nexport PATH=\"{}:$PATH\"\n",
            self.bin_dir.display()
        )
    }
}

/// Pick the rc file matching the user's shell, defaulting to `.bashrc`.
#[must_use]
pub fn recommended_shell_file() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let shell = env::var("SHELL").unwrap_or_default();
    if shell.contains("zsh") {
        home.join(".zshrc")
    } else {
        home.join(".bashrc")
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(unix)]
fn link_script(cache_path: &Path, bin_path: &Path) -> Result<()> {
    std::os::unix::fs::symlink(cache_path, bin_path)?;
    Ok(())
}

#[cfg(not(unix))]
fn link_script(cache_path: &Path, bin_path: &Path) -> Result<()> {
    std::fs::copy(cache_path, bin_path)?;
    Ok(())
}
