//! Provider connection settings and the local key/value storage they live in.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Storage key the provider settings are kept under.
pub const CONFIG_KEY: &str = "ollamaConfig";

pub const DEFAULT_SERVER_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3";

/// Models offered in the settings picker, as (value, label).
pub const AVAILABLE_MODELS: &[(&str, &str)] = &[
    ("llama3", "Llama 3"),
    ("mistral", "Mistral"),
    ("gemma", "Gemma"),
    ("phi", "Phi-2"),
    ("mixtral", "Mixtral"),
    ("codellama", "Code Llama"),
];

/// Picker label for a model value, falling back to the raw value.
pub fn model_label(value: &str) -> &str {
    for (v, label) in AVAILABLE_MODELS {
        if *v == value {
            return label;
        }
    }
    value
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    pub enabled: bool,
    pub server_url: String,
    pub model: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            server_url: DEFAULT_SERVER_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to write '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("storage rejected '{key}': {reason}")]
    Rejected { key: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("server URL must start with http:// or https:// (got '{0}')")]
pub struct InvalidUrl(pub String);

pub fn validate_server_url(url: &str) -> Result<(), InvalidUrl> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(InvalidUrl(url.to_string()))
    }
}

// --- Storage ---

/// Persistent string key/value storage local to this machine.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// Resolve the data directory: `$GENESIS_HOME`, else `~/.genesis/`.
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("GENESIS_HOME") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".genesis")
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn at_default_location() -> Self {
        Self::new(data_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    /// Writes go to a temp file first and are renamed into place, so a reader
    /// never sees a half-written value.
    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let io_err = |source| PersistError::Io {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, self.path_for(key)).map_err(io_err)
    }
}

/// Process-local storage; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// --- Provider config store ---

/// Read the stored provider settings. Missing or unreadable settings yield the defaults.
pub fn load(storage: &dyn Storage) -> ProviderConfig {
    let Some(raw) = storage.get(CONFIG_KEY) else {
        return ProviderConfig::default();
    };
    match serde_json::from_str(&raw) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "stored provider config is unreadable, using defaults");
            ProviderConfig::default()
        }
    }
}

pub fn save(storage: &dyn Storage, config: &ProviderConfig) -> Result<(), PersistError> {
    let json = serde_json::to_string(config)?;
    storage.set(CONFIG_KEY, &json)?;
    tracing::info!(server_url = %config.server_url, model = %config.model, enabled = config.enabled, "provider config saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FullStorage;

    impl Storage for FullStorage {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), PersistError> {
            Err(PersistError::Rejected {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            })
        }
    }

    #[test]
    fn load_without_stored_value_returns_defaults() {
        let storage = MemoryStorage::new();
        let config = load(&storage);
        assert_eq!(
            config,
            ProviderConfig {
                enabled: false,
                server_url: "http://localhost:11434".to_string(),
                model: "llama3".to_string(),
            }
        );
    }

    #[test]
    fn load_with_garbage_returns_defaults() {
        let storage = MemoryStorage::new();
        storage.set(CONFIG_KEY, "{not json").unwrap();
        assert_eq!(load(&storage), ProviderConfig::default());
    }

    #[test]
    fn save_then_load_uses_camel_case_json() {
        let storage = MemoryStorage::new();
        let config = ProviderConfig {
            enabled: true,
            server_url: "http://customurl:12345".to_string(),
            model: "mistral".to_string(),
        };
        save(&storage, &config).unwrap();
        assert_eq!(
            storage.get(CONFIG_KEY).unwrap(),
            r#"{"enabled":true,"serverUrl":"http://customurl:12345","model":"mistral"}"#
        );
        assert_eq!(load(&storage), config);
    }

    #[test]
    fn save_surfaces_storage_failure() {
        let err = save(&FullStorage, &ProviderConfig::default()).unwrap_err();
        assert!(matches!(err, PersistError::Rejected { .. }));
    }

    #[test]
    fn file_storage_round_trips_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));
        assert!(storage.get(CONFIG_KEY).is_none());
        save(&storage, &ProviderConfig::default()).unwrap();
        assert_eq!(load(&storage), ProviderConfig::default());
        let names: Vec<String> = fs::read_dir(storage.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["ollamaConfig.json".to_string()]);
    }

    #[test]
    fn url_validation() {
        assert!(validate_server_url("http://localhost:11434").is_ok());
        assert!(validate_server_url("https://example.com").is_ok());
        assert_eq!(
            validate_server_url("ftp://bad"),
            Err(InvalidUrl("ftp://bad".to_string()))
        );
        assert!(validate_server_url("localhost:11434").is_err());
    }

    #[test]
    fn model_labels() {
        assert_eq!(model_label("gemma"), "Gemma");
        assert_eq!(model_label("custom-model"), "custom-model");
    }
}
