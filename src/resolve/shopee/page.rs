use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::super::{Attempt, ContentResolver, ResolvedMedia};
use super::video_info::find_video_url;
use super::{browser_headers, stage_error};
use crate::error::ResolutionFailure;
use crate::link::Platform;

// Script tags that carry the page's preloaded state
static STATE_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?s)<script[^>]*>\s*window\.__INITIAL_STATE__\s*=\s*(\{.*?\})\s*;?\s*</script>",
        r#"(?s)<script[^>]*id="__NEXT_DATA__"[^>]*>\s*(\{.*?\})\s*</script>"#,
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

// Last resort, searched directly against the HTML
static RAW_VIDEO_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#""(?:video_url|play_url|url)"\s*:\s*"([^"]+\.mp4[^"]*)""#,
        r#"(https?:(?:\\?/){2}[^"'\s<>]+\.mp4[^"'\s<>]*)"#,
        r#"(//[\w.-]*(?:vod|video|cv)\.[\w.-]*susercontent\.com/[^"'\s<>]+)"#,
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Scrape the product page itself
pub(super) async fn attempt(
    resolver: &ContentResolver,
    url: &str,
) -> Result<Attempt, ResolutionFailure> {
    let response = match resolver
        .client
        .get(url)
        .headers(browser_headers(resolver, url))
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => return stage_error(e, "Shopee page"),
    };

    let status = response.status();
    if !status.is_success() {
        return Ok(Attempt::Missed(format!(
            "page error (status {})",
            status.as_u16()
        )));
    }

    match response.text().await {
        Ok(html) => Ok(attempt_from_html(&html)),
        Err(e) => stage_error(e, "Shopee page"),
    }
}

fn attempt_from_html(html: &str) -> Attempt {
    let found = embedded_state_url(html).or_else(|| raw_video_url(html));
    found
        .and_then(|u| ResolvedMedia::new(Platform::Shopee, &u))
        .map(Attempt::Found)
        .unwrap_or_else(|| Attempt::Missed("no video found in page".into()))
}

fn embedded_state_url(html: &str) -> Option<String> {
    STATE_RE.iter().find_map(|re| {
        let blob = re.captures(html)?.get(1)?.as_str();
        match serde_json::from_str::<Value>(blob) {
            Ok(state) => find_video_url(&state),
            Err(e) => {
                debug!(error = %e, "embedded page state is not valid JSON");
                None
            }
        }
    })
}

fn raw_video_url(html: &str) -> Option<String> {
    RAW_VIDEO_RE
        .iter()
        .find_map(|re| re.captures(html)?.get(1))
        .map(|m| m.as_str().to_owned())
}
