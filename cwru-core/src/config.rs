//! TOML configuration for where data lives and how it is fetched.
//!
//! ```toml
//! data_dir = "~/Datasets/CWRU"
//! catalog = "my-metadata.txt"   # optional, defaults to the embedded catalog
//! offline = false
//!
//! [download]
//! max_retries = 3
//! base_delay_ms = 500
//! timeout_secs = 60
//! ```
//!
//! Every key is optional.

use crate::catalog::{Catalog, CatalogError};
use crate::data::{default_data_dir, Acquirer, AcquisitionError, HttpFetcher, RecordingCache, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CwruConfig {
    /// Cache root. `~/` is expanded to the home directory.
    pub data_dir: Option<PathBuf>,
    /// Replacement catalog table.
    pub catalog: Option<PathBuf>,
    /// Never download; a cache miss is an error.
    pub offline: bool,
    pub download: DownloadConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DownloadConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_retries: policy.max_retries,
            base_delay_ms: policy.base_delay.as_millis() as u64,
            timeout_secs: policy.timeout.as_secs(),
        }
    }
}

impl DownloadConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.base_delay_ms),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl CwruConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigFileError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigFileError> {
        Ok(toml::from_str(content)?)
    }

    /// Effective cache root.
    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => expand_home(dir),
            None => default_data_dir(),
        }
    }

    /// The configured catalog, or the embedded one.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog {
            Some(path) => Catalog::from_file(&expand_home(path)),
            None => Catalog::embedded(),
        }
    }

    /// An acquirer over the configured cache, online or offline.
    pub fn acquirer(&self) -> Result<Acquirer, AcquisitionError> {
        let cache = RecordingCache::new(self.data_dir());
        if self.offline {
            Ok(Acquirer::offline(cache))
        } else {
            Ok(Acquirer::new(cache, HttpFetcher::new(self.download.retry_policy())?))
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
