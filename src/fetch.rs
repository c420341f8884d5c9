use reqwest::{header, Client};
use tracing::debug;

use crate::error::{FailureKind, ResolutionFailure};

/// Raw bytes of a downloaded media file
#[derive(Debug)]
pub struct FetchedMedia {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Downloads direct media URLs. A single GET, no retries.
#[derive(Debug, Clone)]
pub struct MediaFetcher {
    client: Client,
}

impl MediaFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, direct_url: &str) -> Result<FetchedMedia, ResolutionFailure> {
        let response = self.client.get(direct_url).send().await.map_err(|e| {
            ResolutionFailure::from_request(&e, FailureKind::DownloadFailed, "Download failed")
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolutionFailure::new(
                FailureKind::DownloadFailed,
                format!("Error downloading video (status {})", status.as_u16()),
            ));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let bytes = response.bytes().await.map_err(|e| {
            ResolutionFailure::from_request(&e, FailureKind::DownloadFailed, "Download failed")
        })?;
        debug!(url = direct_url, size = bytes.len(), "downloaded media");

        Ok(FetchedMedia {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
