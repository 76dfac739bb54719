use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;

use crate::kernel::error::{Error, Result};

/// File storage addressed by paths relative to a driver-specific root.
///
/// Paths must be relative and may not climb out of the root with `..`.
pub trait Filesystem: Send + Sync {
    fn driver(&self) -> &str;

    fn exists(&self, path: &Path) -> Result<bool>;

    fn get(&self, path: &Path) -> Result<Vec<u8>>;

    fn get_string(&self, path: &Path) -> Result<String> {
        let bytes = self.get(path)?;
        String::from_utf8(bytes).map_err(|e| {
            Error::io(
                std::io::Error::new(ErrorKind::InvalidData, e),
                "get_string",
                Some(path.to_path_buf()),
            )
        })
    }

    /// Write `contents`, replacing any existing file. Missing parent
    /// directories are created.
    fn put(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Returns `false` if there was no such file.
    fn delete(&self, path: &Path) -> Result<bool>;

    /// Files directly under `dir`, sorted. A missing directory is empty.
    fn files(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

/// Filesystem rooted at a local directory.
#[derive(Clone)]
pub struct LocalFilesystem {
    root: PathBuf,
}

impl fmt::Debug for LocalFilesystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalFilesystem")
            .field("root", &self.root)
            .finish()
    }
}

impl LocalFilesystem {
    /// The root is created lazily by the first [`put`](Filesystem::put).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of `path` under the root.
    pub fn path(&self, path: &Path) -> Result<PathBuf> {
        let escapes = path.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(Error::PathOutsideRoot {
                path: path.to_path_buf(),
            });
        }
        Ok(self.root.join(path))
    }
}

impl Filesystem for LocalFilesystem {
    fn driver(&self) -> &str {
        "local"
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        let full_path = self.path(path)?;
        full_path
            .try_exists()
            .map_err(|e| Error::io(e, "exists", Some(full_path)))
    }

    fn get(&self, path: &Path) -> Result<Vec<u8>> {
        let full_path = self.path(path)?;
        fs::read(&full_path).map_err(|e| Error::io(e, "get", Some(full_path)))
    }

    fn put(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let full_path = self.path(path)?;
        let parent = match full_path.parent() {
            Some(parent) if full_path != self.root => parent.to_path_buf(),
            _ => {
                return Err(Error::io(
                    std::io::Error::new(ErrorKind::InvalidInput, "path names no file"),
                    "put",
                    Some(full_path),
                ));
            }
        };
        fs::create_dir_all(&parent)
            .map_err(|e| Error::io(e, "create_dir_all", Some(parent.clone())))?;

        // Written beside the target and renamed over it, so readers never
        // see a partial file.
        let mut temp_file = NamedTempFile::new_in(&parent)
            .map_err(|e| Error::io(e, "create_temp_file", Some(parent.clone())))?;
        temp_file
            .write_all(contents)
            .map_err(|e| Error::io(e, "write_temp_file", Some(temp_file.path().to_path_buf())))?;
        temp_file
            .persist(&full_path)
            .map_err(|e| Error::io(e.error, "persist_temp_file", Some(full_path.clone())))?;

        log::trace!("Wrote {} bytes to {}", contents.len(), full_path.display());
        Ok(())
    }

    fn delete(&self, path: &Path) -> Result<bool> {
        let full_path = self.path(path)?;
        match fs::remove_file(&full_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::io(e, "delete", Some(full_path))),
        }
    }

    fn files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let full_path = self.path(dir)?;
        let entries = match fs::read_dir(&full_path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io(e, "read_dir", Some(full_path))),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(e, "read_dir_entry", Some(full_path.clone())))?;
            let file_type = entry
                .file_type()
                .map_err(|e| Error::io(e, "file_type", Some(entry.path())))?;
            if file_type.is_file() {
                files.push(dir.join(entry.file_name()));
            }
        }
        files.sort();
        Ok(files)
    }
}
