mod shopee;
mod tiktok;

use reqwest::Client;
use tracing::debug;

use crate::config::Config;
use crate::error::ResolutionFailure;
use crate::link::Platform;

const MAX_TITLE_CHARS: usize = 100;

/// A direct, playable media URL and whatever metadata the upstream reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    direct_url: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub duration_seconds: Option<u64>,
    pub source_platform: Platform,
}

impl ResolvedMedia {
    /// Returns `None` if `url` can't be turned into an absolute http(s) URL
    pub fn new(source_platform: Platform, url: &str) -> Option<Self> {
        Some(Self {
            direct_url: normalize_media_url(url)?,
            title: None,
            author: None,
            duration_seconds: None,
            source_platform,
        })
    }

    pub fn with_title(mut self, title: Option<&str>) -> Self {
        self.title = title.and_then(clean_title);
        self
    }

    pub fn with_author(mut self, author: Option<&str>) -> Self {
        self.author = author
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_owned);
        self
    }

    pub fn with_duration(mut self, seconds: Option<u64>) -> Self {
        self.duration_seconds = seconds.filter(|&s| s > 0);
        self
    }

    pub fn direct_url(&self) -> &str {
        &self.direct_url
    }
}

fn clean_title(title: &str) -> Option<String> {
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    Some(title.chars().take(MAX_TITLE_CHARS).collect())
}

/// Turn a URL scraped from JSON or HTML into an absolute one. Protocol-relative and
/// scheme-less URLs get `https:`.
pub fn normalize_media_url(raw: &str) -> Option<String> {
    let unescaped = raw
        .trim()
        .replace("\\u002F", "/")
        .replace("\\u002f", "/")
        .replace("\\/", "/")
        .replace("\\u0026", "&");
    if unescaped.is_empty() {
        return None;
    }

    let scheme_less = !unescaped.starts_with("//")
        && !unescaped.starts_with('/')
        && !unescaped.contains("://");
    let absolute = if unescaped.starts_with("//") {
        format!("https:{unescaped}")
    } else if unescaped.starts_with("http://") || unescaped.starts_with("https://") {
        unescaped
    } else if scheme_less {
        format!("https://{unescaped}")
    } else {
        return None;
    };

    let url = url::Url::parse(&absolute).ok()?;
    let host = url.host_str()?;
    // A bare token such as "null" or a video id is not a host
    if scheme_less && !host.contains('.') {
        return None;
    }
    match url.scheme() {
        "http" | "https" => Some(absolute),
        _ => None,
    }
}

/// Outcome of one strategy in a fallback chain
#[derive(Debug)]
pub(crate) enum Attempt {
    Found(ResolvedMedia),
    Missed(String),
}

/// Turns page or share URLs into direct media URLs, one pipeline per platform
#[derive(Debug, Clone)]
pub struct ContentResolver {
    client: Client,
    tiktok_api: String,
    shopee_api: String,
    shopee_item_api: String,
    user_agent: String,
}

impl ContentResolver {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            tiktok_api: config.endpoints.tiktok_api.clone(),
            shopee_api: config.endpoints.shopee_api.clone(),
            shopee_item_api: config.endpoints.shopee_item_api.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    pub async fn resolve(
        &self,
        platform: Platform,
        url: &str,
    ) -> Result<ResolvedMedia, ResolutionFailure> {
        debug!(%platform, url, "resolving media url");
        match platform {
            Platform::TikTok => tiktok::resolve(self, url).await,
            Platform::Shopee => shopee::resolve(self, url).await,
        }
    }
}
