//! Idempotent write and remove of single mirror files.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::error::{FsOpsError, FsOpsResult};

const DEFAULT_FILE_MODE: u32 = 0o644;
const DEFAULT_DIR_MODE: u32 = 0o755;

/// Permission bits applied to mirrored files and the directories created for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileModes {
    /// Mode applied to every written file.
    pub file: u32,
    /// Mode applied to directories created on demand.
    pub dir: u32,
}

impl Default for FileModes {
    fn default() -> Self {
        Self {
            file: DEFAULT_FILE_MODE,
            dir: DEFAULT_DIR_MODE,
        }
    }
}

/// Writes and removes mirror files. One instance is shared by every worker.
///
/// Concurrent calls for different file names are safe; writes to the same path are
/// serialised by the caller's partitioning.
#[derive(Debug, Clone, Default)]
pub struct FileSync {
    modes: FileModes,
}

impl FileSync {
    /// Construct a file sync service with default permissions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the permission bits.
    #[must_use]
    pub const fn with_modes(mut self, modes: FileModes) -> Self {
        self.modes = modes;
        self
    }

    /// Create or overwrite `folder/file_name` with `content`, creating missing directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file name is not a single path segment or any
    /// filesystem call fails.
    pub fn write(&self, folder: &Path, file_name: &str, content: &[u8]) -> FsOpsResult<PathBuf> {
        let path = Self::file_path(folder, file_name)?;
        self.ensure_dir(folder)?;
        fs::write(&path, content).map_err(|source| FsOpsError::io("write.file", &path, source))?;
        self.apply_file_mode(&path)?;
        debug!(path = %path.display(), bytes = content.len(), "mirror file written");
        Ok(path)
    }

    /// Remove `folder/file_name`. A file that does not exist is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file name is invalid or removal fails for a reason
    /// other than the file being absent.
    pub fn remove(&self, folder: &Path, file_name: &str) -> FsOpsResult<PathBuf> {
        let path = Self::file_path(folder, file_name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "mirror file removed");
                Ok(path)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "mirror file already absent");
                Ok(path)
            }
            Err(source) => Err(FsOpsError::io("remove.file", &path, source)),
        }
    }

    fn file_path(folder: &Path, file_name: &str) -> FsOpsResult<PathBuf> {
        let mut components = Path::new(file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(folder.join(file_name)),
            _ => Err(FsOpsError::invalid_input(
                "entry_name",
                "not_a_file_name",
                file_name,
            )),
        }
    }

    fn ensure_dir(&self, folder: &Path) -> FsOpsResult<()> {
        if folder.is_dir() {
            return Ok(());
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            fs::DirBuilder::new()
                .recursive(true)
                .mode(self.modes.dir)
                .create(folder)
                .map_err(|source| FsOpsError::io("write.create_dir", folder, source))
        }
        #[cfg(not(unix))]
        {
            let _ = self.modes.dir;
            fs::create_dir_all(folder)
                .map_err(|source| FsOpsError::io("write.create_dir", folder, source))
        }
    }

    fn apply_file_mode(&self, path: &Path) -> FsOpsResult<()> {
        #[cfg(unix)]
        {
            fs::set_permissions(path, fs::Permissions::from_mode(self.modes.file))
                .map_err(|source| FsOpsError::io("write.set_permissions", path, source))
        }
        #[cfg(not(unix))]
        {
            let _ = (path, self.modes.file);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    #[test]
    fn write_creates_nested_directories() -> Result<()> {
        let temp = TempDir::new()?;
        let folder = temp.path().join("nested").join("subfolder").join("deep");
        let sync = FileSync::new();

        let path = sync.write(&folder, "test.json", b"content")?;

        assert_eq!(path, folder.join("test.json"));
        assert_eq!(fs::read(&path)?, b"content");
        Ok(())
    }

    #[test]
    fn write_is_idempotent_and_overwrites() -> Result<()> {
        let temp = TempDir::new()?;
        let sync = FileSync::new();

        sync.write(temp.path(), "cfg.json", br#"{"a":1}"#)?;
        sync.write(temp.path(), "cfg.json", br#"{"a":1}"#)?;
        assert_eq!(fs::read(temp.path().join("cfg.json"))?, br#"{"a":1}"#);

        sync.write(temp.path(), "cfg.json", br#"{"a":2}"#)?;
        assert_eq!(fs::read(temp.path().join("cfg.json"))?, br#"{"a":2}"#);
        Ok(())
    }

    #[test]
    fn write_preserves_non_utf8_bytes() -> Result<()> {
        let temp = TempDir::new()?;
        let sync = FileSync::new();
        let payload = [0xff_u8, 0x00, 0x7b, 0x7d];
        sync.write(temp.path(), "blob.json", &payload)?;
        assert_eq!(fs::read(temp.path().join("blob.json"))?, payload);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn write_applies_owner_and_group_readable_mode() -> Result<()> {
        let temp = TempDir::new()?;
        let sync = FileSync::new();
        let path = sync.write(temp.path(), "cfg.json", b"{}")?;
        let mode = fs::metadata(path)?.permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn custom_modes_apply_to_files_and_created_dirs() -> Result<()> {
        let temp = TempDir::new()?;
        let folder = temp.path().join("private");
        let sync = FileSync::new().with_modes(FileModes {
            file: 0o600,
            dir: 0o700,
        });
        let path = sync.write(&folder, "secret.json", b"{}")?;
        assert_eq!(fs::metadata(path)?.permissions().mode() & 0o777, 0o600);
        assert_eq!(fs::metadata(&folder)?.permissions().mode() & 0o777, 0o700);
        Ok(())
    }

    #[test]
    fn remove_missing_file_is_not_an_error() -> Result<()> {
        let temp = TempDir::new()?;
        let sync = FileSync::new();
        sync.remove(temp.path(), "never-written.json")?;
        sync.remove(&temp.path().join("missing-dir"), "x.json")?;
        Ok(())
    }

    #[test]
    fn remove_deletes_existing_file() -> Result<()> {
        let temp = TempDir::new()?;
        let sync = FileSync::new();
        let path = sync.write(temp.path(), "x.json", b"{}")?;
        sync.remove(temp.path(), "x.json")?;
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn file_names_must_be_single_segments() {
        let sync = FileSync::new();
        let folder = Path::new("unused");
        for name in ["", "..", ".", "a/b.json", "/abs.json"] {
            assert!(
                matches!(
                    sync.write(folder, name, b"{}"),
                    Err(FsOpsError::InvalidInput {
                        field: "entry_name",
                        ..
                    })
                ),
                "{name:?} should be rejected"
            );
        }
    }
}
