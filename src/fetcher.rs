use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::fetch_error::FetchError;
use crate::station_block::{Extraction, StationBlockExtractor};

/// Downloads HKO CSV dumps, optionally keeping a copy on disk
///
/// With a cache directory set, a previously downloaded file is returned as-is
/// and the network is not touched. Delete the cached file to force a refresh.
/// The source URL is recorded next to each cached file; a cached copy taken
/// from a different URL is downloaded again.
#[derive(Clone)]
pub struct StationDataFetcher {
    client: reqwest::Client,
    cache_dir: Option<PathBuf>,
}

impl StationDataFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .expect("Failed to create HTTP client"),
            cache_dir: None,
        }
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    /// Fetch `url` as text, reading from / writing to `<cache_dir>/<cache_name>`
    #[instrument(skip(self), fields(cache_dir = ?self.cache_dir))]
    pub async fn fetch_text(&self, url: &str, cache_name: &str) -> Result<String, FetchError> {
        if let Some(cached) = self.read_cache(url, cache_name)? {
            info!("Using cached copy of {} ({} bytes)", cache_name, cached.len());
            return Ok(cached);
        }

        let text = self.download(url, cache_name).await?;
        self.write_cache(url, cache_name, &text)?;
        Ok(text)
    }

    /// Fetch the dump named by `config` and extract its station blocks
    pub async fn fetch_extraction(&self, config: &Config) -> Result<Extraction, FetchError> {
        let text = self
            .fetch_text(&config.source_url, config.dataset.cache_name())
            .await?;
        info!("Retrieved CSV: {} lines", text.lines().count());

        Ok(StationBlockExtractor::from_config(config).extract(text.lines()))
    }

    async fn download(&self, url: &str, cache_name: &str) -> Result<String, FetchError> {
        debug!("Sending HTTP request to {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!("Received HTTP response with status: {}", status);

        if status.is_success() {
            let text = response.text().await?;
            info!("Downloaded {} ({} bytes)", cache_name, text.len());
            Ok(text)
        } else if status.as_u16() == 404 {
            Err(FetchError::NotFound(format!("{url} not found on server")))
        } else if status.is_server_error() {
            Err(FetchError::ServerError(format!(
                "Server error {status} while downloading {url}"
            )))
        } else {
            Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            })
        }
    }

    fn read_cache(&self, url: &str, cache_name: &str) -> Result<Option<String>, FetchError> {
        let Some(dir) = &self.cache_dir else {
            return Ok(None);
        };
        let path = dir.join(cache_name);
        if !path.is_file() {
            debug!("No cached file at {}", path.display());
            return Ok(None);
        }

        let source = url_record_path(&path);
        if source.is_file() {
            let cached_url = std::fs::read_to_string(&source)?;
            if cached_url.trim() != url {
                warn!(
                    "Cached {} came from {}, not {}; downloading again",
                    path.display(),
                    cached_url.trim(),
                    url
                );
                return Ok(None);
            }
        }

        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn write_cache(&self, url: &str, cache_name: &str, text: &str) -> Result<(), FetchError> {
        let Some(dir) = &self.cache_dir else {
            return Ok(());
        };
        std::fs::create_dir_all(dir)?;

        let path = dir.join(cache_name);
        persist_atomically(dir, &path, text)?;
        persist_atomically(dir, &url_record_path(&path), url)?;
        debug!("Cached response at {}", path.display());
        Ok(())
    }
}

/// `<cache_name>.url`, holding the URL the cached file was downloaded from
fn url_record_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".url");
    PathBuf::from(name)
}

// Write to a sibling temp file first so a failed run never leaves a truncated file
fn persist_atomically(dir: &Path, path: &Path, contents: &str) -> Result<(), FetchError> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl Default for StationDataFetcher {
    fn default() -> Self {
        Self::new()
    }
}
