use serde_json::Value;
use tracing::debug;

use super::{ContentResolver, ResolvedMedia};
use crate::error::{FailureKind, ResolutionFailure};
use crate::link::Platform;

pub(super) async fn resolve(
    resolver: &ContentResolver,
    url: &str,
) -> Result<ResolvedMedia, ResolutionFailure> {
    let params = [("url", url), ("hd", "1")];
    let response = resolver
        .client
        .post(&resolver.tiktok_api)
        .form(&params)
        .send()
        .await
        .map_err(|e| {
            ResolutionFailure::from_request(&e, FailureKind::UpstreamUnavailable, "TikTok API")
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ResolutionFailure::new(
            FailureKind::UpstreamUnavailable,
            format!("API error (status {})", status.as_u16()),
        ));
    }

    let body = response.text().await.map_err(|e| {
        ResolutionFailure::from_request(&e, FailureKind::UpstreamUnavailable, "TikTok API")
    })?;
    media_from_response(&body)
}

fn media_from_response(body: &str) -> Result<ResolvedMedia, ResolutionFailure> {
    let response: Value = serde_json::from_str(body).map_err(|e| {
        ResolutionFailure::new(
            FailureKind::UpstreamUnavailable,
            format!("malformed API response: {e}"),
        )
    })?;

    // A missing code counts as a rejection
    if response.get("code").and_then(Value::as_i64) != Some(0) {
        let msg = response
            .get("msg")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(ResolutionFailure::new(
            FailureKind::UpstreamRejected,
            format!("Error processing video: {msg}"),
        ));
    }

    let data = response.get("data");
    let field = |key: &str| data.and_then(|d| d.get(key));

    // Prefer HD, fall back to SD
    let media = [field("hdplay"), field("play")]
        .into_iter()
        .filter_map(|v| v.and_then(Value::as_str))
        .find_map(|u| ResolvedMedia::new(Platform::TikTok, u))
        .ok_or_else(|| {
            ResolutionFailure::new(FailureKind::MediaUrlNotFound, "Video URL not found")
        })?;

    debug!(url = media.direct_url(), "TikTok API returned media url");
    let author = field("author")
        .and_then(|a| a.get("unique_id"))
        .and_then(Value::as_str);
    Ok(media
        .with_title(field("title").and_then(Value::as_str))
        .with_author(author)
        .with_duration(field("duration").and_then(seconds)))
}

/// Durations arrive as integers, occasionally as floats
fn seconds(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|s| s.is_finite() && *s >= 0.0)
            .map(|s| s.round() as u64)
    })
}
