//! Bundle-cache population from GitHub releases.
//!
//! A pipeline's bundle-cache manager resolves dependency descriptors into
//! on-disk cache entries. This crate handles descriptors naming versioned,
//! platform-specific release assets: [`Populator::can_populate`] says
//! whether a descriptor is covered by the configured source list, and
//! [`Populator::populate`] downloads and extracts the matching assets into
//! the entry's destination directory.

pub mod config;
pub mod descriptor;
pub mod error;
mod github;
pub mod platform;
mod populate;

pub use config::{CacheConfig, RegisteredSource};
pub use descriptor::Descriptor;
pub use error::PopulateError;
pub use platform::Platform;
pub use populate::Populator;
