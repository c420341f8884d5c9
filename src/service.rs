use reqwest::Client;
use tracing::{info, info_span, Instrument};

use crate::client::build_client;
use crate::config::Config;
use crate::error::{FailureKind, ResolutionFailure};
use crate::fetch::MediaFetcher;
use crate::link::{LinkExtractor, Platform, PlatformLink, ShortLinkResolver};
use crate::resolve::{ContentResolver, ResolvedMedia};

/// A downloaded video. Owned by the caller, nothing is kept after it is returned.
#[derive(Debug)]
pub struct DownloadResult {
    bytes: Vec<u8>,
    pub platform: Platform,
    pub title: Option<String>,
    pub author: Option<String>,
    pub duration_seconds: Option<u64>,
    pub content_type: Option<String>,
}

impl DownloadResult {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Text in, video out. Cloning is cheap and clones share one connection pool.
#[derive(Debug, Clone)]
pub struct VideoResolutionService {
    extractor: LinkExtractor,
    short_links: ShortLinkResolver,
    content: ContentResolver,
    fetcher: MediaFetcher,
}

impl VideoResolutionService {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            extractor: LinkExtractor::default(),
            short_links: ShortLinkResolver::new(client.clone(), config.short_link_markers.clone()),
            content: ContentResolver::new(client.clone(), config),
            fetcher: MediaFetcher::new(client),
        }
    }

    /// Build the service together with its own HTTP client
    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        Ok(Self::new(build_client(config)?, config))
    }

    pub fn with_extractor(mut self, extractor: LinkExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn extract(&self, text: &str) -> Option<PlatformLink> {
        self.extractor.extract(text)
    }

    /// Expand the link if it is a short link, then find its direct media URL
    pub async fn resolve_link(
        &self,
        link: &PlatformLink,
    ) -> Result<ResolvedMedia, ResolutionFailure> {
        let url = self.short_links.expand(link.canonical_url()).await;
        self.content.resolve(link.platform(), &url).await
    }

    pub async fn resolve_and_download(
        &self,
        text: &str,
    ) -> Result<DownloadResult, ResolutionFailure> {
        let link = self.extract(text).ok_or_else(ResolutionFailure::no_match)?;
        let span = info_span!(
            "resolve",
            platform = %link.platform(),
            url = link.canonical_url()
        );
        self.download_link(&link).instrument(span).await
    }

    async fn download_link(
        &self,
        link: &PlatformLink,
    ) -> Result<DownloadResult, ResolutionFailure> {
        let media = self.resolve_link(link).await?;
        let fetched = self.fetcher.fetch(media.direct_url()).await?;
        if fetched.bytes.is_empty() {
            return Err(ResolutionFailure::new(
                FailureKind::DownloadFailed,
                "Downloaded video is empty",
            ));
        }
        info!(size = fetched.bytes.len(), "video ready");

        Ok(DownloadResult {
            bytes: fetched.bytes,
            platform: media.source_platform,
            title: media.title,
            author: media.author,
            duration_seconds: media.duration_seconds,
            content_type: fetched.content_type,
        })
    }
}
