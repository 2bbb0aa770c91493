//! OS directory resolution for the config file and log output.
//!
//! Follows platform conventions through the `dirs` crate: XDG on Linux,
//! Known Folders on Windows, Library on macOS.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

const APP_NAME: &str = "orrery";

/// Errors from directory resolution or creation.
#[derive(Debug, Error)]
pub enum PathsError {
    #[error("could not determine the OS configuration directory")]
    NoConfigDir,
    #[error("failed to create application directory")]
    Io(#[from] io::Error),
}

/// Per-user directories the viewer reads and writes.
#[derive(Debug, Clone)]
pub struct AppDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    /// Holds JSON log files in debug builds.
    pub log_dir: PathBuf,
}

impl AppDirs {
    /// Resolve the platform directories without touching the disk.
    pub fn resolve() -> Result<Self, PathsError> {
        let base = dirs::config_dir()
            .ok_or(PathsError::NoConfigDir)?
            .join(APP_NAME);
        Ok(Self::under(&base))
    }

    /// Resolve the platform directories and create them on disk.
    pub fn resolve_and_create() -> Result<Self, PathsError> {
        let dirs = Self::resolve()?;
        dirs.create_dirs()?;
        Ok(dirs)
    }

    /// Directories rooted under a custom base path, for tests.
    pub fn resolve_with_root(root: &Path) -> Self {
        Self::under(&root.join(APP_NAME))
    }

    /// Create all directories on disk.
    pub fn create_dirs(&self) -> Result<(), PathsError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }

    fn under(base: &Path) -> Self {
        Self {
            config_dir: base.to_path_buf(),
            log_dir: base.join("logs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_nests_under_config_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = AppDirs::resolve_with_root(tmp.path());
        assert!(dirs.log_dir.starts_with(&dirs.config_dir));
        assert!(dirs.config_dir.ends_with(APP_NAME));
    }

    #[test]
    fn test_create_dirs_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = AppDirs::resolve_with_root(tmp.path());
        dirs.create_dirs().unwrap();
        dirs.create_dirs().unwrap();
        assert!(dirs.config_dir.exists());
        assert!(dirs.log_dir.exists());
    }
}
