use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{Client, StatusCode};
use temperature_heatmap::{parse_document, Dataset, LoadError};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Source;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Retrieves the temperature document over HTTP.
#[derive(Debug)]
pub struct DocumentClient {
    client: Client,
}

impl DocumentClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        debug!(url, "requesting temperature document");
        let response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(transport)
    }

    pub async fn fetch_dataset(&self, url: &str) -> Result<Dataset, FetchError> {
        let json = self.fetch_text(url).await?;
        Ok(parse_document(&json)?)
    }
}

pub async fn read_dataset(path: &Path) -> Result<Dataset, FetchError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FetchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(parse_document(&json)?)
}

pub async fn load_dataset(source: &Source, timeout: Duration) -> Result<Dataset, FetchError> {
    let dataset = match source {
        Source::Url(url) => DocumentClient::new(timeout)?.fetch_dataset(url).await?,
        Source::File(path) => read_dataset(path).await?,
    };
    info!(records = dataset.len(), "temperature document loaded");
    Ok(dataset)
}
