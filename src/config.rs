//! Populator configuration.

use std::path::Path;

use serde::Deserialize;

use crate::error::PopulateError;

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

/// A repository whose releases this populator is allowed to fetch, with an
/// optional access token for private repositories.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredSource {
    /// `organization/repository` identifier.
    pub repository: String,
    #[serde(default)]
    pub token: Option<String>,
}

/// Static configuration handed to [`crate::Populator::new`].
///
/// The source list is fixed for the lifetime of the populator; descriptors
/// are matched against it by exact identifier comparison.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Release API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Explicit HTTP/HTTPS proxy URL. Proxy environment variables are
    /// honoured even when this is unset.
    #[serde(default)]
    pub proxy: Option<String>,
    /// Repositories releases may be downloaded for.
    #[serde(default)]
    pub sources: Vec<RegisteredSource>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            proxy: None,
            sources: Vec::new(),
        }
    }
}

impl CacheConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, PopulateError> {
        let raw = std::fs::read_to_string(path)?;
        let config = toml::from_str(&raw).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid config {}: {e}", path.display()),
            )
        })?;
        Ok(config)
    }

    /// Look up the registered source matching a repository identifier.
    pub fn source_for(&self, identifier: &str) -> Option<&RegisteredSource> {
        self.sources.iter().find(|s| s.repository == identifier)
    }
}
