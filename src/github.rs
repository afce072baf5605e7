//! GitHub release API interaction.

use log::error;
use serde::Deserialize;

use crate::error::PopulateError;

pub(crate) const USER_AGENT: &str = concat!("bundle-cache/", env!("CARGO_PKG_VERSION"));

/// Release metadata from the release-by-tag endpoint.
#[derive(Deserialize, Debug)]
pub struct Release {
    pub tag_name: String,
    pub assets: Vec<ReleaseAsset>,
}

/// A single downloadable file attached to a release.
#[derive(Deserialize, Debug)]
pub struct ReleaseAsset {
    pub name: String,
    /// API asset endpoint; served as a binary payload when requested with
    /// `Accept: application/octet-stream`.
    pub url: String,
}

/// Fetch the release tagged `tag` from `repository`.
///
/// Sends `Authorization: token <token>` when a token is configured for the
/// repository. A missing tag maps to [`PopulateError::ReleaseNotFound`] and
/// a 401 to [`PopulateError::Unauthorized`]; any other failure propagates as
/// a transport error.
pub(crate) async fn fetch_release(
    client: &reqwest::Client,
    api_base: &str,
    repository: &str,
    tag: &str,
    token: Option<&str>,
) -> Result<Release, PopulateError> {
    let url = format!("{api_base}/repos/{repository}/releases/tags/{tag}");

    let mut request = client
        .get(&url)
        .header(reqwest::header::ACCEPT, "application/vnd.github.v3+json");
    if let Some(token) = token {
        request = request.header(reqwest::header::AUTHORIZATION, format!("token {token}"));
    }

    let response = request.send().await.map_err(|source| PopulateError::Http {
        endpoint: url.clone(),
        source,
    })?;

    match response.status() {
        reqwest::StatusCode::NOT_FOUND => {
            error!("Release {tag} does not exist");
            return Err(PopulateError::ReleaseNotFound {
                repository: repository.to_string(),
                tag: tag.to_string(),
            });
        }
        reqwest::StatusCode::UNAUTHORIZED => {
            error!("Not authorised to access release {tag}.");
            return Err(PopulateError::Unauthorized {
                repository: repository.to_string(),
                tag: tag.to_string(),
            });
        }
        _ => {}
    }

    let response = response
        .error_for_status()
        .map_err(|source| PopulateError::Http {
            endpoint: url.clone(),
            source,
        })?;

    response
        .json::<Release>()
        .await
        .map_err(|source| PopulateError::Http {
            endpoint: url,
            source,
        })
}
