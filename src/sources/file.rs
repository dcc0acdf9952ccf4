//! File-based configuration source.

use super::ConfigSource;
use crate::error::{FactoryError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// File-based configuration source.
///
/// Identity is `"file:{path}"`; the modification timestamp comes from the
/// filesystem metadata of the path as given (no canonicalization, so the
/// identity is stable even if the file is temporarily missing).
///
/// # Examples
///
/// ```rust,no_run
/// use hotswap_factory::sources::FileSource;
///
/// let source = FileSource::new("mappers/user.toml");
/// ```
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileSource {
    fn identity(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn last_modified(&self) -> Result<SystemTime> {
        let metadata = fs::metadata(&self.path)
            .map_err(|e| FactoryError::source_read(self.identity(), e))?;
        metadata
            .modified()
            .map_err(|e| FactoryError::source_read(self.identity(), e))
    }

    fn read_to_string(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| FactoryError::source_read(self.identity(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn identity_includes_path() {
        let source = FileSource::new("mappers/user.toml");
        assert_eq!(source.identity(), "file:mappers/user.toml");
    }

    #[test]
    fn last_modified_tracks_writes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mapper.toml");
        fs::write(&path, "find_user = \"SELECT 1\"").unwrap();

        let source = FileSource::new(&path);
        let first = source.last_modified().unwrap();
        assert!(first <= SystemTime::now());
    }

    #[test]
    fn missing_file_is_source_read_error() {
        let source = FileSource::new("/nonexistent/mapper.toml");
        let err = source.last_modified().unwrap_err();
        assert!(matches!(err, FactoryError::SourceRead { .. }));
    }

    #[test]
    fn read_to_string_returns_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mapper.toml");
        fs::write(&path, "find_user = \"SELECT 1\"").unwrap();

        let source = FileSource::new(&path);
        assert_eq!(source.read_to_string().unwrap(), "find_user = \"SELECT 1\"");
    }
}
