//! Endpoint configuration and the key-value store it is persisted in.

use std::{
    collections::BTreeMap,
    fmt, fs,
    io::ErrorKind,
    path::PathBuf,
    sync::Mutex,
};

use tracing::warn;

use crate::error::{EndpointError, SettingsError};

/// Key under which the endpoint URL is stored.
pub const API_URL_KEY: &str = "apiUrl";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    url: String,
}

impl EndpointConfig {
    pub fn parse(url: impl Into<String>) -> Result<Self, EndpointError> {
        let url = url.into();
        if url.is_empty() {
            return Err(EndpointError::Empty);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(EndpointError::InvalidScheme(url));
        }
        Ok(Self { url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError>;
}

/// Reads the stored endpoint. A stored value that fails validation is ignored.
pub fn load_endpoint(store: &dyn SettingsStore) -> Result<Option<EndpointConfig>, SettingsError> {
    let Some(raw) = store.get(API_URL_KEY)? else {
        return Ok(None);
    };
    match EndpointConfig::parse(raw) {
        Ok(endpoint) => Ok(Some(endpoint)),
        Err(err) => {
            warn!(error = %err, "ignoring stored endpoint");
            Ok(None)
        }
    }
}

/// Validates and persists a new endpoint, replacing the previous one.
pub fn save_endpoint(store: &dyn SettingsStore, url: &str) -> Result<EndpointConfig, SettingsError> {
    let endpoint = EndpointConfig::parse(url)?;
    store.set(API_URL_KEY, endpoint.url())?;
    Ok(endpoint)
}

/// Flat JSON object of string values on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, SettingsError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| SettingsError::Malformed {
            path: self.path.clone(),
            source,
        })
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());

        let write_err = |source| SettingsError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let serialized = serde_json::to_string_pretty(&values).map_err(|source| {
            SettingsError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, serialized).map_err(write_err)
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl SettingsStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        let values = self
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
