//! Reading and writing documents.
//!
//! The session never touches the filesystem; this is where bytes become
//! text and back.

use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Where documents are loaded from and saved to.
pub trait Storage {
    /// Reads a document as UTF-8 text.
    fn read(&self, path: &Path) -> io::Result<String>;

    /// Writes text to a document.
    fn write(&self, path: &Path, text: &str) -> io::Result<()>;
}

/// Plain files on the local filesystem.
#[derive(Debug, Clone, Copy)]
pub struct FileStorage {
    atomic: bool,
}

impl FileStorage {
    /// Creates file storage. With `atomic`, saves go through a temporary
    /// file that is renamed over the target.
    pub fn new(atomic: bool) -> Self {
        Self { atomic }
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Storage for FileStorage {
    fn read(&self, path: &Path) -> io::Result<String> {
        let bytes = std::fs::read(path)?;
        String::from_utf8(bytes)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "file is not valid UTF-8"))
    }

    fn write(&self, path: &Path, text: &str) -> io::Result<()> {
        if !self.atomic {
            return std::fs::write(path, text);
        }

        // Unique temp file next to the target, renamed over it once written.
        // Dropping it on any error removes it again.
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(text.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|err| err.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");

        for atomic in [true, false] {
            let storage = FileStorage::new(atomic);
            storage.write(&path, "a\nb").unwrap();
            assert_eq!(storage.read(&path).unwrap(), "a\nb");
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_atomic_save_leaves_neighbours_alone() {
        let dir = tempfile::tempdir().unwrap();
        let neighbour = dir.path().join("report.tmp");
        std::fs::write(&neighbour, "keep me").unwrap();

        let path = dir.path().join("report.txt");
        FileStorage::new(true).write(&path, "doc").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "doc");
        assert_eq!(std::fs::read_to_string(&neighbour).unwrap(), "keep me");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_atomic_save_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "old contents that are longer").unwrap();

        FileStorage::new(true).write(&path, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_atomic_save_into_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("doc.txt");

        let err = FileStorage::new(true).write(&path, "doc").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_read_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.dat");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = FileStorage::default().read(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileStorage::default()
            .read(&dir.path().join("missing.txt"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
