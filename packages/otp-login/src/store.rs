//! Token store implementations.
//!
//! The login flow writes these keys and never reads them back. Downstream
//! pages (signup, dashboard, queue status) consume them.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::TokenStore;

pub const REGISTRATION_TOKEN: &str = "registration_token";
pub const PHONE_FOR_SIGNUP: &str = "phone_for_signup";
pub const ACCESS_TOKEN: &str = "access_token";
pub const REFRESH_TOKEN: &str = "refresh_token";

/// Process-local store, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every stored value
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values
            .read()
            .map(|values| values.clone())
            .unwrap_or_default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.values
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self
            .values
            .read()
            .map_err(|_| StoreError::Poisoned)?
            .get(key)
            .cloned())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.values
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .remove(key);
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> StoreResult<()> {
        let mut values = self.values.write().map_err(|_| StoreError::Poisoned)?;
        for (key, value) in entries {
            values.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

/// JSON object on disk, one key per entry.
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename, so readers never see a half-written file.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file and everything in it.
    pub fn clear(&self) -> StoreResult<()> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn load(&self) -> StoreResult<HashMap<String, String>> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, values: &HashMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(values)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), keys = values.len(), "Token store saved");
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut HashMap<String, String>)) -> StoreResult<()> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut values = self.load()?;
        apply(&mut values);
        self.save(&values)
    }
}

impl TokenStore for FileTokenStore {
    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
        })
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(self.load()?.remove(key))
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.update(|values| {
            values.remove(key);
        })
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> StoreResult<()> {
        self.update(|values| {
            for (key, value) in entries {
                values.insert(key.to_string(), value.to_string());
            }
        })
    }
}
