//! File-backed storage.
//!
//! Each key is one JSON file in a directory. Writes go to a temporary file
//! first and are renamed into place, so readers never see a partial document.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use super::{KeyValueStorage, StorageError};

/// Storage rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Store values under `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory values are stored in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.root.join(format!("{key}.json")))
    }
}

fn io_error(key: &str) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        key: key.to_string(),
        source,
    }
}

impl KeyValueStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match fs::read_to_string(path) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(io_error(key)(error)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let staging = path.with_extension("json.tmp");

        fs::create_dir_all(&self.root).map_err(io_error(key))?;
        fs::write(&staging, value).map_err(io_error(key))?;
        fs::rename(&staging, &path).map_err(io_error(key))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(io_error(key)(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn values_survive_a_new_instance() -> TestResult {
        let dir = tempfile::tempdir()?;

        FileStorage::new(dir.path()).write("cart", r#"[{"qty":1}]"#)?;

        let reopened = FileStorage::new(dir.path());

        assert_eq!(
            reopened.read("cart")?.as_deref(),
            Some(r#"[{"qty":1}]"#)
        );

        Ok(())
    }

    #[test]
    fn missing_key_reads_as_none() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.read("cart")?, None);

        storage.remove("cart")?;

        Ok(())
    }

    #[test]
    fn write_leaves_no_staging_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path());

        storage.write("lastOrder", "{}")?;
        storage.write("lastOrder", "{\"orderId\":\"a1\"}")?;

        let names: Vec<String> = fs::read_dir(dir.path())?
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["lastOrder.json".to_string()]);

        Ok(())
    }

    #[test]
    fn path_like_keys_are_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path());

        assert!(matches!(
            storage.write("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));

        Ok(())
    }
}
