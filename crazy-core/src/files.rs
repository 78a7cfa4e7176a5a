//! File helpers for assets bundled next to the game.
//!
//! Every helper takes an optional directory and falls back to a well-known
//! location from [`AssetPaths`].  "Nothing to do" outcomes (target already
//! there, source missing) come back as `Ok(false)`; only real I/O failures
//! are errors.

use std::path::{Path, PathBuf};

use crate::errors::Result;

/// Directories the helpers fall back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    /// Bundled, read-only assets shipped with the game.
    pub assets: PathBuf,
    /// The user's desktop.
    pub desktop: PathBuf,
}

impl AssetPaths {
    /// Use `assets` for bundled files and the OS desktop directory (or the
    /// home directory, or `.`, when there is none).
    pub fn new(assets: impl Into<PathBuf>) -> Self {
        let desktop = dirs::desktop_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            assets: assets.into(),
            desktop,
        }
    }

    /// Copy `name` from the assets directory to `target_dir` (default:
    /// desktop) as `target_name` (default: `name`).
    ///
    /// Returns `Ok(false)` when the target already exists or the source is
    /// missing.
    pub fn copy_if_absent(
        &self,
        name: &str,
        target_name: Option<&str>,
        target_dir: Option<&Path>,
    ) -> Result<bool> {
        let from = self.assets.join(name);
        let to = target_dir
            .unwrap_or(self.desktop.as_path())
            .join(target_name.unwrap_or(name));

        if to.exists() || !from.is_file() {
            return Ok(false);
        }
        std::fs::copy(&from, &to)?;
        log::debug!("copied {} -> {}", from.display(), to.display());
        Ok(true)
    }

    /// Delete `name` from `dir` (default: assets).  `Ok(false)` if absent.
    pub fn delete_if_exists(&self, name: &str, dir: Option<&Path>) -> Result<bool> {
        let path = dir.unwrap_or(self.assets.as_path()).join(name);
        if !path.is_file() {
            return Ok(false);
        }
        std::fs::remove_file(&path)?;
        log::debug!("deleted {}", path.display());
        Ok(true)
    }

    /// Read `name` from `dir` (default: desktop) as text.
    pub fn read_text(&self, name: &str, dir: Option<&Path>) -> Result<String> {
        let path = dir.unwrap_or(self.desktop.as_path()).join(name);
        Ok(std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("crazy-files-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("assets")).unwrap();
        std::fs::create_dir_all(dir.join("desktop")).unwrap();
        dir
    }

    fn paths(dir: &Path) -> AssetPaths {
        AssetPaths {
            assets: dir.join("assets"),
            desktop: dir.join("desktop"),
        }
    }

    #[test]
    fn test_copy_if_absent() {
        let dir = scratch("copy");
        let p = paths(&dir);
        std::fs::write(p.assets.join("note.txt"), "hello").unwrap();

        assert!(p.copy_if_absent("note.txt", None, None).unwrap());
        assert_eq!(p.read_text("note.txt", None).unwrap(), "hello");
        // Second copy finds the target already there.
        assert!(!p.copy_if_absent("note.txt", None, None).unwrap());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_copy_renames_into_target_dir() {
        let dir = scratch("rename");
        let p = paths(&dir);
        std::fs::write(p.assets.join("a.txt"), "x").unwrap();

        assert!(p.copy_if_absent("a.txt", Some("b.txt"), Some(dir.as_path())).unwrap());
        assert!(dir.join("b.txt").is_file());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_copy_missing_source() {
        let dir = scratch("missing");
        let p = paths(&dir);
        assert!(!p.copy_if_absent("nope.txt", None, None).unwrap());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_delete_if_exists() {
        let dir = scratch("delete");
        let p = paths(&dir);
        std::fs::write(p.assets.join("tmp.bin"), [0u8; 4]).unwrap();

        assert!(p.delete_if_exists("tmp.bin", None).unwrap());
        assert!(!p.delete_if_exists("tmp.bin", None).unwrap());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = scratch("read");
        let p = paths(&dir);
        assert!(matches!(
            p.read_text("absent.txt", None),
            Err(crate::errors::CrazyInputError::IoError(_))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
