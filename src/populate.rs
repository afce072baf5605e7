//! Bundle-cache entry population.
//!
//! The cache manager calls [`Populator::can_populate`] to ask whether a
//! descriptor is handled here, then [`Populator::populate`] to write the
//! entry. On any error the destination is left as-is for the manager to
//! discard; a populated entry only exists once every matching asset has
//! been extracted.

use std::path::Path;

use futures_util::StreamExt;
use log::{error, info};
use regex::Regex;
use reqwest::header;
use tokio::io::AsyncWriteExt;

use crate::config::{CacheConfig, RegisteredSource};
use crate::descriptor::Descriptor;
use crate::error::PopulateError;
use crate::github::{self, ReleaseAsset};
use crate::platform::Platform;

const REDIRECT_LIMIT: usize = 5;

/// Downloads release assets into bundle-cache entries.
pub struct Populator {
    config: CacheConfig,
    client: reqwest::Client,
}

impl Populator {
    /// Build a populator from static configuration.
    pub fn new(config: CacheConfig) -> Result<Self, PopulateError> {
        // Redirects are followed manually in `get_asset` so the
        // Authorization header is never re-sent to the redirect target.
        let mut builder = reqwest::Client::builder()
            .user_agent(github::USER_AGENT)
            .redirect(reqwest::redirect::Policy::none());
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy).map_err(PopulateError::Client)?);
        }
        let client = builder.build().map_err(PopulateError::Client)?;
        Ok(Self { config, client })
    }

    /// Whether this populator knows how to cache `descriptor`.
    pub fn can_populate(&self, descriptor: &Descriptor) -> bool {
        self.resolve_source(descriptor).is_some()
    }

    /// Populate `destination` with every asset of the descriptor's release
    /// that matches the current platform.
    ///
    /// `destination` is created if absent. Errors propagate after being
    /// logged; partial output is the caller's to discard.
    pub async fn populate(
        &self,
        destination: &Path,
        descriptor: &Descriptor,
    ) -> Result<(), PopulateError> {
        let result = self.populate_inner(destination, descriptor).await;
        if let Err(e) = &result {
            error!("Failed to populate {descriptor}: {e}");
        }
        result
    }

    async fn populate_inner(
        &self,
        destination: &Path,
        descriptor: &Descriptor,
    ) -> Result<(), PopulateError> {
        info!("Treating {descriptor}");
        let source = self
            .resolve_source(descriptor)
            .ok_or_else(|| PopulateError::Configuration {
                descriptor: descriptor.to_string(),
            })?;
        // Sources without a token are public repositories; an empty token
        // string means the same thing.
        let token = source.token.as_deref().filter(|t| !t.is_empty());

        let release = github::fetch_release(
            &self.client,
            &self.config.api_base,
            &source.repository,
            &descriptor.version,
            token,
        )
        .await?;

        let platform = Platform::detect()?;
        let pattern = asset_pattern(&release.tag_name, platform)?;
        let matching = select_assets(&release.assets, &pattern);
        if matching.is_empty() {
            return Err(PopulateError::NoMatchingAsset {
                pattern: pattern.as_str().to_string(),
                available: release.assets.iter().map(|a| a.name.clone()).collect(),
            });
        }

        // One asset at a time, in the order the API returned them.
        for asset in &matching {
            self.download_and_extract(asset, destination, token).await?;
        }

        let mut extracted = Vec::new();
        for entry in std::fs::read_dir(destination)? {
            extracted.push(entry?.file_name().to_string_lossy().into_owned());
        }
        info!(
            "Extracted files: {:?} from {}",
            extracted,
            matching
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(",")
        );
        Ok(())
    }

    fn resolve_source(&self, descriptor: &Descriptor) -> Option<&RegisteredSource> {
        let identifier = descriptor.repo_identifier()?;
        self.config.source_for(&identifier)
    }

    /// Download one asset into `destination` and extract it in place,
    /// removing the archive afterwards.
    async fn download_and_extract(
        &self,
        asset: &ReleaseAsset,
        destination: &Path,
        token: Option<&str>,
    ) -> Result<(), PopulateError> {
        let response = self.get_asset(&asset.url, token).await?;

        if !destination.exists() {
            info!("Creating {}", destination.display());
            tokio::fs::create_dir_all(destination).await?;
        }

        let archive_path = destination.join(&asset.name);
        let mut file = tokio::fs::File::create(&archive_path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| PopulateError::Http {
                endpoint: asset.url.clone(),
                source,
            })?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        drop(file);

        let archive = archive_path.clone();
        let extract_dir = destination.to_path_buf();
        tokio::task::spawn_blocking(move || -> Result<(), PopulateError> {
            let file = std::fs::File::open(&archive)?;
            let mut zip =
                zip::ZipArchive::new(file).map_err(|source| PopulateError::Zip {
                    archive: archive.clone(),
                    source,
                })?;
            zip.extract(&extract_dir).map_err(|source| PopulateError::Zip {
                archive,
                source,
            })
        })
        .await??;

        tokio::fs::remove_file(&archive_path).await?;
        Ok(())
    }

    /// GET an asset payload, following redirects by hand.
    ///
    /// The token only goes out with the initial request; storage backends
    /// the asset endpoint redirects to reject requests carrying it.
    async fn get_asset(
        &self,
        url: &str,
        token: Option<&str>,
    ) -> Result<reqwest::Response, PopulateError> {
        let http_err = |source| PopulateError::Http {
            endpoint: url.to_string(),
            source,
        };

        let mut request = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/octet-stream");
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("token {token}"));
        }
        let mut response = request.send().await.map_err(http_err)?;

        let mut redirects = 0;
        while response.status().is_redirection() {
            if redirects == REDIRECT_LIMIT {
                return Err(PopulateError::TooManyRedirects {
                    url: url.to_string(),
                });
            }
            redirects += 1;

            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .ok_or_else(|| PopulateError::MissingRedirectTarget {
                    url: url.to_string(),
                })?;
            let target = response.url().join(&location).map_err(|source| {
                PopulateError::InvalidRedirectTarget { location, source }
            })?;

            response = self
                .client
                .get(target)
                .header(header::ACCEPT, "application/octet-stream")
                .send()
                .await
                .map_err(http_err)?;
        }

        response.error_for_status().map_err(http_err)
    }
}

/// Pattern asset names follow: `<version>-py<python version>-<platform>.zip`.
/// Every Python-version variant for the current platform matches.
fn asset_pattern(version: &str, platform: Platform) -> Result<Regex, PopulateError> {
    Ok(Regex::new(&format!(
        r"^{}-py\d\.\d-{}\.zip$",
        regex::escape(version),
        platform.ident()
    ))?)
}

fn select_assets<'a>(assets: &'a [ReleaseAsset], pattern: &Regex) -> Vec<&'a ReleaseAsset> {
    assets.iter().filter(|a| pattern.is_match(&a.name)).collect()
}
