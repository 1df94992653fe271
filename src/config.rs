use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where shallow checkouts are stored (created on startup if absent)
    pub clone_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// Host used when generating browsable file URLs
    pub source_host: String,
    /// Blob size limit passed to the clone filter, in bytes
    pub blob_limit_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clone_dir: PathBuf::from("./data/repos"),
            bind_addr: "127.0.0.1:9000".to_string(),
            source_host: "https://github.com".to_string(),
            blob_limit_bytes: 5_000_000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("CODE_SEARCH_CLONE_DIR") {
            config.clone_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("CODE_SEARCH_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(host) = std::env::var("CODE_SEARCH_SOURCE_HOST") {
            config.source_host = host;
        }
        if let Ok(val) = std::env::var("CODE_SEARCH_BLOB_LIMIT_BYTES") {
            if let Ok(v) = val.parse() {
                config.blob_limit_bytes = v;
            }
        }

        config
    }
}
