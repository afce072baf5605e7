//! Platform detection for asset selection.

use crate::error::PopulateError;

/// Platforms that release assets are published for.
///
/// Asset names carry one of the identifiers from [`Platform::ident`]; a
/// cached entry is never shared between machines with different OSes, so
/// only the current platform's assets are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
}

impl Platform {
    /// Detect the current platform.
    pub fn detect() -> Result<Self, PopulateError> {
        Self::from_os(std::env::consts::OS)
    }

    fn from_os(os: &str) -> Result<Self, PopulateError> {
        match os {
            "macos" => Ok(Platform::MacOs),
            "linux" => Ok(Platform::Linux),
            "windows" => Ok(Platform::Windows),
            other => Err(PopulateError::UnsupportedPlatform {
                os: other.to_string(),
            }),
        }
    }

    /// Identifier used in asset names for this platform.
    pub fn ident(&self) -> &'static str {
        match self {
            Platform::MacOs => "osx",
            Platform::Linux => "linux",
            Platform::Windows => "win",
        }
    }
}
