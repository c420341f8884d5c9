mod api;
mod item;
mod page;
mod video_info;

use itertools::Itertools;
use reqwest::header::{self, HeaderMap, HeaderValue};
use tracing::{debug, info, warn};

use super::{Attempt, ContentResolver, ResolvedMedia};
use crate::error::{FailureKind, ResolutionFailure};

/// Strategies for finding a Shopee video, ordered from most reliable and cheapest to most
/// brittle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Api,
    ItemApi,
    PageScrape,
}

impl Stage {
    const CHAIN: [Stage; 3] = [Stage::Api, Stage::ItemApi, Stage::PageScrape];

    fn name(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::ItemApi => "item api",
            Self::PageScrape => "page scrape",
        }
    }

    async fn attempt(
        &self,
        resolver: &ContentResolver,
        url: &str,
    ) -> Result<Attempt, ResolutionFailure> {
        match self {
            Self::Api => api::attempt(resolver, url).await,
            Self::ItemApi => item::attempt(resolver, url).await,
            Self::PageScrape => page::attempt(resolver, url).await,
        }
    }
}

pub(super) async fn resolve(
    resolver: &ContentResolver,
    url: &str,
) -> Result<ResolvedMedia, ResolutionFailure> {
    let mut misses = Vec::new();
    for stage in Stage::CHAIN {
        match stage.attempt(resolver, url).await? {
            Attempt::Found(media) => {
                info!(
                    stage = stage.name(),
                    media = media.direct_url(),
                    "found Shopee video"
                );
                return Ok(media);
            }
            Attempt::Missed(reason) => {
                debug!(stage = stage.name(), %reason, "Shopee stage found nothing");
                misses.push(format!("{}: {}", stage.name(), reason));
            }
        }
    }

    Err(ResolutionFailure::new(
        FailureKind::MediaUrlNotFound,
        format!(
            "Could not download the Shopee video. Check that the link is correct; \
             TikTok links are more reliable. ({})",
            misses.iter().join("; ")
        ),
    ))
}

/// Headers that make requests look like they come from a browser on the product page
fn browser_headers(resolver: &ContentResolver, referer: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(ua) = HeaderValue::from_str(&resolver.user_agent) {
        headers.insert(header::USER_AGENT, ua);
    }
    if let Ok(referer) = HeaderValue::from_str(referer) {
        headers.insert(header::REFERER, referer);
    }
    headers
}

/// Timeouts end the whole chain, any other transport fault only skips the stage
fn stage_error(err: reqwest::Error, context: &str) -> Result<Attempt, ResolutionFailure> {
    let failure = ResolutionFailure::from_request(&err, FailureKind::UpstreamUnavailable, context);
    if failure.is_timeout() {
        return Err(failure);
    }
    warn!(error = %err, "{context} request failed");
    Ok(Attempt::Missed(failure.detail))
}
