//! # Configuration
//!
//! A flat string key/value store shared by the server and the client.
//! Values are layered by the application: defaults first, then whatever
//! `load_env` finds.
//!
//! ```rust
//! use parcel_core::ParcelConfig;
//!
//! let mut config = ParcelConfig::new();
//! config.set("http.port", "3030");
//!
//! assert_eq!(config.get("http.port"), Some("3030"));
//! assert_eq!(config.snapshot().get_usize("http.port"), Some(3030));
//! ```
//!
//! ## Environment overrides
//! `load_env("PARCEL__")` maps `PARCEL__HTTP__PORT=8080` to `http.port = 8080`.

use std::collections::HashMap;

pub const HTTP_HOST: &str = "http.host";
pub const HTTP_PORT: &str = "http.port";
pub const UPLOAD_MAX_FILE_BYTES: &str = "upload.max_file_bytes";
pub const UPLOAD_MAX_TOTAL_BYTES: &str = "upload.max_total_bytes";
pub const CLIENT_BASE_URL: &str = "client.base_url";
pub const CLIENT_LABEL: &str = "client.label";

#[derive(Debug, Default, Clone)]
pub struct ParcelConfig {
    values: HashMap<String, String>,
}

impl ParcelConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Defaults for a local server on port 3030.
    pub fn with_defaults() -> Self {
        let mut config = Self::new();
        config.set(HTTP_HOST, "127.0.0.1");
        config.set(HTTP_PORT, "3030");
        config.set(CLIENT_BASE_URL, "http://127.0.0.1:3030");
        config
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Returns None if the key is not present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Copy every `<prefix>A__B=value` variable into `a.b = value`.
    pub fn load_env(&mut self, prefix: &str) {
        self.load_pairs(prefix, std::env::vars());
    }

    fn load_pairs<I>(&mut self, prefix: &str, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                let normalized = stripped.to_lowercase().replace("__", ".");
                self.set(normalized, value);
            }
        }
    }

    pub fn snapshot(&self) -> ParcelConfigSnapshot {
        ParcelConfigSnapshot::new(self.values.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParcelConfigSnapshot {
    map: HashMap<String, String>,
}

impl ParcelConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.trim().parse::<usize>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.trim().parse::<bool>().ok())
    }
}
