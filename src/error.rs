//! Failure kinds surfaced by a populate call.

use std::path::PathBuf;

/// Errors raised while populating a bundle-cache entry.
///
/// A populate call either extracts every matching asset or fails as a whole
/// with one of these; no internal retries are attempted.
#[derive(Debug, thiserror::Error)]
pub enum PopulateError {
    /// The descriptor does not resolve to a registered source.
    #[error("don't know how to cache {descriptor}")]
    Configuration { descriptor: String },

    /// The running OS is not one of the platforms assets are published for.
    #[error("unsupported platform {os}")]
    UnsupportedPlatform { os: String },

    /// The release API reported no release for the requested tag.
    #[error("release {tag} does not exist for {repository}")]
    ReleaseNotFound { repository: String, tag: String },

    /// The release API rejected the request (HTTP 401).
    #[error("not authorised to access release {tag} of {repository}")]
    Unauthorized { repository: String, tag: String },

    /// The release was found but none of its assets match the current
    /// platform. Carries every asset name seen, for diagnostics.
    #[error("couldn't retrieve a suitable asset matching {pattern} from {available:?}")]
    NoMatchingAsset {
        pattern: String,
        available: Vec<String>,
    },

    /// The HTTP client could not be initialised from the configuration.
    #[error("failed to initialise HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },

    /// A redirect response without a usable Location header.
    #[error("redirect from {url} carried no Location header")]
    MissingRedirectTarget { url: String },

    /// A redirect Location that does not resolve to a valid URL.
    #[error("invalid redirect target {location}: {source}")]
    InvalidRedirectTarget {
        location: String,
        source: url::ParseError,
    },

    /// Redirect chain exceeded the follow limit.
    #[error("too many redirects downloading {url}")]
    TooManyRedirects { url: String },

    /// Filesystem error while writing or listing the destination.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The downloaded payload is not a readable zip archive.
    #[error("invalid zip archive {archive}: {source}")]
    Zip {
        archive: PathBuf,
        source: zip::result::ZipError,
    },

    /// The asset-name pattern failed to compile.
    #[error("invalid asset name pattern: {0}")]
    AssetPattern(#[from] regex::Error),

    /// The blocking extraction task was cancelled or panicked.
    #[error("extraction task failed: {0}")]
    ExtractionTask(#[from] tokio::task::JoinError),
}
