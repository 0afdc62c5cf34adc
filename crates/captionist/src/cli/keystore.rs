//! Local API key storage.
//!
//! Keys live in a small TOML file as two flat entries, the key itself and the
//! provider tag. The core library never sees this store; the CLI reads it and
//! hands the core plain `Credentials`.

use anyhow::Context;
use captionist_core::{Credentials, Provider};
use std::path::{Path, PathBuf};

/// Entry holding the API key.
pub const API_KEY_ENTRY: &str = "ai_caption_api_key";

/// Entry holding the provider tag ("openai" or "google").
pub const PROVIDER_ENTRY: &str = "ai_caption_provider";

/// Flat string key-value storage.
pub trait KeyStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&mut self, key: &str) -> anyhow::Result<()>;
}

/// Read saved credentials. Both entries must be present and valid.
pub fn load_credentials(store: &dyn KeyStore) -> anyhow::Result<Option<Credentials>> {
    let (Some(key), Some(provider)) = (store.get(API_KEY_ENTRY)?, store.get(PROVIDER_ENTRY)?)
    else {
        return Ok(None);
    };
    if key.trim().is_empty() {
        return Ok(None);
    }
    match provider.parse::<Provider>() {
        Ok(provider) => Ok(Some(Credentials::new(key.trim(), provider))),
        Err(e) => {
            tracing::warn!("Ignoring saved key: {e}");
            Ok(None)
        }
    }
}

/// Save credentials, trimming the key. Blank keys are rejected.
pub fn save_credentials(store: &mut dyn KeyStore, credentials: &Credentials) -> anyhow::Result<()> {
    let key = credentials.api_key.trim();
    if key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }
    store.set(API_KEY_ENTRY, key)?;
    store.set(PROVIDER_ENTRY, credentials.provider.as_str())?;
    Ok(())
}

/// Forget any saved credentials.
pub fn clear_credentials(store: &mut dyn KeyStore) -> anyhow::Result<()> {
    store.remove(API_KEY_ENTRY)?;
    store.remove(PROVIDER_ENTRY)?;
    Ok(())
}

/// Key store backed by a TOML file. Unrelated content and comments survive edits.
pub struct FileKeyStore {
    path: PathBuf,
}

impl FileKeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> anyhow::Result<toml_edit::DocumentMut> {
        if !self.path.exists() {
            return Ok(toml_edit::DocumentMut::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read key store {}", self.path.display()))?;
        content
            .parse::<toml_edit::DocumentMut>()
            .with_context(|| format!("Key store {} is not valid TOML", self.path.display()))
    }

    fn write_document(&self, doc: &toml_edit::DocumentMut) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, doc.to_string())
            .with_context(|| format!("Failed to write key store {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

impl KeyStore for FileKeyStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let doc = self.read_document()?;
        Ok(doc
            .get(key)
            .and_then(|item| item.as_str())
            .map(String::from))
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut doc = self.read_document()?;
        doc[key] = toml_edit::value(value);
        self.write_document(&doc)
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut doc = self.read_document()?;
        if doc.remove(key).is_some() {
            self.write_document(&doc)?;
        }
        Ok(())
    }
}

/// In-memory key store.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryKeyStore {
    entries: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl KeyStore for MemoryKeyStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips() {
        let mut store = MemoryKeyStore::default();
        save_credentials(&mut store, &Credentials::new("  sk-abc  ", Provider::OpenAi)).unwrap();

        assert_eq!(store.get(API_KEY_ENTRY).unwrap().as_deref(), Some("sk-abc"));
        assert_eq!(store.get(PROVIDER_ENTRY).unwrap().as_deref(), Some("openai"));

        let loaded = load_credentials(&store).unwrap().unwrap();
        assert_eq!(loaded, Credentials::new("sk-abc", Provider::OpenAi));
    }

    #[test]
    fn blank_key_is_not_saved() {
        let mut store = MemoryKeyStore::default();
        assert!(save_credentials(&mut store, &Credentials::new("   ", Provider::Google)).is_err());
        assert!(store.get(API_KEY_ENTRY).unwrap().is_none());
    }

    #[test]
    fn load_requires_both_entries() {
        let mut store = MemoryKeyStore::default();
        store.set(API_KEY_ENTRY, "sk-abc").unwrap();
        assert!(load_credentials(&store).unwrap().is_none());

        store.set(PROVIDER_ENTRY, "google").unwrap();
        let loaded = load_credentials(&store).unwrap().unwrap();
        assert_eq!(loaded.provider, Provider::Google);
    }

    #[test]
    fn unknown_provider_is_ignored() {
        let mut store = MemoryKeyStore::default();
        store.set(API_KEY_ENTRY, "sk-abc").unwrap();
        store.set(PROVIDER_ENTRY, "anthropic").unwrap();
        assert!(load_credentials(&store).unwrap().is_none());
    }

    #[test]
    fn clear_removes_both_entries() {
        let mut store = MemoryKeyStore::default();
        save_credentials(&mut store, &Credentials::new("sk-abc", Provider::OpenAi)).unwrap();
        clear_credentials(&mut store).unwrap();
        assert!(store.get(API_KEY_ENTRY).unwrap().is_none());
        assert!(store.get(PROVIDER_ENTRY).unwrap().is_none());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.toml");

        let mut store = FileKeyStore::new(&path);
        save_credentials(&mut store, &Credentials::new("AIza-key", Provider::Google)).unwrap();

        let reopened = FileKeyStore::new(&path);
        let loaded = load_credentials(&reopened).unwrap().unwrap();
        assert_eq!(loaded, Credentials::new("AIza-key", Provider::Google));
    }

    #[test]
    fn file_store_preserves_comments_and_other_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        std::fs::write(&path, "# my keys\nother = \"keep me\"\n").unwrap();

        let mut store = FileKeyStore::new(&path);
        save_credentials(&mut store, &Credentials::new("sk-abc", Provider::OpenAi)).unwrap();
        clear_credentials(&mut store).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("# my keys"));
        assert!(content.contains("other = \"keep me\""));
        assert!(!content.contains(API_KEY_ENTRY));
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileKeyStore::new(dir.path().join("absent.toml"));
        assert!(load_credentials(&store).unwrap().is_none());
        clear_credentials(&mut store).unwrap();
        assert!(!store.path().exists());
    }
}
