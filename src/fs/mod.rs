// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
///
/// Terminal detection, scratch files and the product-folder cleanup all go
/// through this trait so they can run against [`mock::MockFileSystem`] in
/// tests.
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    /// Raw contents; for files that need not be valid UTF-8.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
    /// Write `contents`, creating parent directories as needed.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// Return a list of entries in a directory.
    /// Returns full paths.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    fn remove_file(&self, path: &Path) -> Result<()>;
    fn remove_dir_all(&self, path: &Path) -> Result<()>;

    /// Mark a file as executable by its owner. No-op where that has no meaning.
    fn set_executable(&self, path: &Path) -> Result<()>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).with_context(|| format!("reading file {:?}", path))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
        }
        let mut file = fs::File::create(path).with_context(|| format!("creating file {:?}", path))?;
        file.write_all(contents).with_context(|| format!("writing to file {:?}", path))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry?;
            entries.push(entry.path());
        }
        Ok(entries)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).with_context(|| format!("removing file {:?}", path))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path).with_context(|| format!("removing dir {:?}", path))
    }

    #[cfg(unix)]
    fn set_executable(&self, path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = fs::metadata(path)
            .with_context(|| format!("reading metadata of {:?}", path))?
            .permissions();
        perms.set_mode(perms.mode() | 0o700);
        fs::set_permissions(path, perms).with_context(|| format!("chmod {:?}", path))
    }

    #[cfg(not(unix))]
    fn set_executable(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Remove `path` if it is a file; missing files are fine.
pub fn remove_if_exists(fs: &dyn FileSystem, path: &Path) -> Result<()> {
    if fs.is_file(path) {
        fs.remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_fs_write_creates_parents_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/script.sh");
        let fs = RealFileSystem;

        fs.write(&path, b"#!/bin/sh\n").unwrap();
        assert!(fs.is_file(&path));

        fs.set_executable(&path).unwrap();
        remove_if_exists(&fs, &path).unwrap();
        assert!(!fs.exists(&path));

        // Second removal is a no-op.
        remove_if_exists(&fs, &path).unwrap();
    }
}
