//! Directory-backed key-value store.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use super::{KeyValueStore, StorageError};

/// Stores each key in its own file under a directory.
///
/// Keys are percent-encoded into file names, so `@RocketShoes:cart` becomes
/// `%40RocketShoes%3Acart.json`. Writes land in a temporary sibling first and
/// are renamed into place, so readers never see a partial value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// A store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the store's files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKey` for an empty key.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", urlencoding::encode(key))))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl KeyValueStore for FileStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No stored value");
                Ok(None)
            }
            Err(e) => Err(io_error(&path, e)),
        }
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(&self.dir, e))?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| io_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error(&path, e))?;

        debug!(path = %path.display(), "Stored value");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_percent_encoded() {
        let store = FileStore::new("/data");
        let path = store.path_for("@RocketShoes:cart").unwrap();
        assert_eq!(path, PathBuf::from("/data/%40RocketShoes%3Acart.json"));
    }

    #[test]
    fn test_path_separators_stay_inside_dir() {
        let store = FileStore::new("/data");
        let path = store.path_for("../etc/passwd").unwrap();
        assert_eq!(path.parent(), Some(Path::new("/data")));
    }

    #[test]
    fn test_empty_key_rejected() {
        let store = FileStore::new("/data");
        assert!(matches!(
            store.path_for(""),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("@RocketShoes:cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        store.set("@RocketShoes:cart", "[{\"id\":1}]").await.unwrap();
        assert_eq!(
            store.get("@RocketShoes:cart").await.unwrap().as_deref(),
            Some("[{\"id\":1}]")
        );

        store.set("@RocketShoes:cart", "[]").await.unwrap();
        assert_eq!(
            store.get("@RocketShoes:cart").await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_no_temporary_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("cart", "[]").await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["cart.json".to_string()]);
    }

    #[tokio::test]
    async fn test_unwritable_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        // A regular file where the directory should be.
        let store = FileStore::new(&blocker);
        let err = store.set("cart", "[]").await.unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
