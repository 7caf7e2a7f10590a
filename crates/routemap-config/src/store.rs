// ── Configured-URL store ──
//
// A small TOML key/value file. Every write rewrites the whole table
// through a sibling temp file and a rename, so readers never observe a
// half-written file.

use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

use crate::ConfigError;

/// Key holding the proxy URL.
pub const URL_KEY: &str = "url";

/// Upsert-style key/value store on disk.
#[derive(Debug, Clone)]
pub struct UrlStore {
    path: PathBuf,
}

impl UrlStore {
    /// A store backed by `path`. Nothing is touched until the first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store at [`state_path()`](crate::state_path).
    pub fn default_location() -> Self {
        Self::open(crate::state_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let table = self.read()?;
        Ok(table.get(key).and_then(toml::Value::as_str).map(str::to_owned))
    }

    /// Insert or replace `key`.
    pub fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut table = self.read()?;
        table.insert(key.to_owned(), toml::Value::String(value.to_owned()));
        self.write(&table)?;
        debug!(key, path = %self.path.display(), "store updated");
        Ok(())
    }

    /// Remove `key`. Returns whether it was present.
    pub fn remove(&self, key: &str) -> Result<bool, ConfigError> {
        let mut table = self.read()?;
        if table.remove(key).is_none() {
            return Ok(false);
        }
        self.write(&table)?;
        debug!(key, path = %self.path.display(), "store key removed");
        Ok(true)
    }

    pub fn url(&self) -> Result<Option<String>, ConfigError> {
        self.get(URL_KEY)
    }

    pub fn set_url(&self, url: &Url) -> Result<(), ConfigError> {
        self.set(URL_KEY, url.as_str())
    }

    pub fn clear_url(&self) -> Result<bool, ConfigError> {
        self.remove(URL_KEY)
    }

    fn read(&self) -> Result<toml::Table, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(toml::Table::new()),
            Err(e) => return Err(e.into()),
        };
        text.parse::<toml::Table>()
            .map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    fn write(&self, table: &toml::Table) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, toml::to_string(table)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = UrlStore::open(dir.path().join("state.toml"));
        assert_eq!(store.url().unwrap(), None);
        assert!(!store.clear_url().unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn set_is_an_upsert() {
        let dir = tempfile::tempdir().unwrap();
        let store = UrlStore::open(dir.path().join("sub").join("state.toml"));

        store.set(URL_KEY, "http://one:8080").unwrap();
        store.set("other", "kept").unwrap();
        store.set(URL_KEY, "http://two:8080").unwrap();

        // a fresh handle sees the same file
        let reopened = UrlStore::open(store.path());
        assert_eq!(reopened.url().unwrap().as_deref(), Some("http://two:8080"));
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("kept"));
        assert!(!store.path().with_extension("toml.tmp").exists());
    }

    #[test]
    fn remove_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = UrlStore::open(dir.path().join("state.toml"));
        store
            .set_url(&Url::parse("https://proxy.example").unwrap())
            .unwrap();
        store.set("theme", "dark").unwrap();

        assert!(store.clear_url().unwrap());
        assert_eq!(store.url().unwrap(), None);
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        std::fs::write(&path, "url = = nope").unwrap();

        let err = UrlStore::open(&path).url().unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
