use serde::Deserialize;

use super::super::{Attempt, ContentResolver, ResolvedMedia};
use super::stage_error;
use crate::error::ResolutionFailure;
use crate::link::Platform;

const DEFAULT_TITLE: &str = "Vídeo Shopee";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    code: i64,
    msg: Option<String>,
    data: Option<VideoData>,
}

#[derive(Debug, Deserialize)]
struct VideoData {
    video_url: Option<String>,
    url: Option<String>,
    title: Option<String>,
}

/// First-party extraction API
pub(super) async fn attempt(
    resolver: &ContentResolver,
    url: &str,
) -> Result<Attempt, ResolutionFailure> {
    let response = match resolver
        .client
        .post(&resolver.shopee_api)
        .form(&[("url", url)])
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => return stage_error(e, "Shopee API"),
    };

    let status = response.status();
    if !status.is_success() {
        return Ok(Attempt::Missed(format!(
            "API error (status {})",
            status.as_u16()
        )));
    }

    match response.text().await {
        Ok(body) => Ok(attempt_from_response(&body)),
        Err(e) => stage_error(e, "Shopee API"),
    }
}

fn attempt_from_response(body: &str) -> Attempt {
    let response: ApiResponse = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => return Attempt::Missed(format!("malformed API response: {e}")),
    };

    if response.code != 0 {
        return Attempt::Missed(format!(
            "API rejected the link: {}",
            response.msg.as_deref().unwrap_or("unknown error")
        ));
    }

    let Some(data) = response.data else {
        return Attempt::Missed("API response has no data".into());
    };

    let VideoData {
        video_url,
        url,
        title,
    } = data;
    let media = [video_url, url]
        .into_iter()
        .flatten()
        .find_map(|u| ResolvedMedia::new(Platform::Shopee, &u));

    match media {
        Some(media) => {
            let title = title.as_deref().unwrap_or(DEFAULT_TITLE);
            Attempt::Found(media.with_title(Some(title)))
        }
        None => Attempt::Missed("API returned no video URL".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_url_found() {
        let attempt = attempt_from_response(
            r#"{"code":0,"data":{"video_url":"https://cdn/v.mp4","url":"https://cdn/other.mp4","title":"Fone"}}"#,
        );
        let media = match attempt {
            Attempt::Found(media) => media,
            Attempt::Missed(reason) => panic!("expected a url, got {reason}"),
        };
        assert_eq!("https://cdn/v.mp4", media.direct_url());
        assert_eq!(Some("Fone".to_owned()), media.title);
        assert_eq!(Platform::Shopee, media.source_platform);
    }

    #[test]
    fn url_fallback_field() {
        let attempt = attempt_from_response(r#"{"code":0,"data":{"url":"//cdn/v.mp4"}}"#);
        assert!(matches!(attempt, Attempt::Found(m) if m.direct_url() == "https://cdn/v.mp4"));
    }

    #[test]
    fn untitled_video_gets_default_title() {
        let attempt = attempt_from_response(
            r#"{"code":0,"data":{"video_url":"https://cdn.example.com/v.mp4"}}"#,
        );
        let media = match attempt {
            Attempt::Found(media) => media,
            Attempt::Missed(reason) => panic!("expected a url, got {reason}"),
        };
        assert_eq!(Some("Vídeo Shopee".to_owned()), media.title);
    }

    #[test]
    fn bare_token_is_not_a_video_url() {
        let attempt = attempt_from_response(
            r#"{"code":0,"data":{"video_url":"null","url":"sg-11110105-6kh4m"}}"#,
        );
        assert!(matches!(attempt, Attempt::Missed(_)));
    }

    #[test]
    fn misses() {
        for body in [
            r#"{"code":-1,"msg":"not supported"}"#,
            r#"{"code":0}"#,
            r#"{"code":0,"data":{"title":"x"}}"#,
            r#"{"code":0,"data":{"video_url":""}}"#,
            "not json",
        ] {
            assert!(
                matches!(attempt_from_response(body), Attempt::Missed(_)),
                "{body}"
            );
        }
    }
}
