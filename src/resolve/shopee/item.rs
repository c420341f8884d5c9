use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header;
use serde_json::Value;

use super::super::{Attempt, ContentResolver, ResolvedMedia};
use super::video_info::{url_from_video_info_list, VIDEO_INFO_KEY};
use super::{browser_headers, stage_error};
use crate::error::ResolutionFailure;
use crate::link::Platform;

// Product URLs look like `/Some-Product-i.<shop>.<item>` or `/product/<shop>/<item>`
static ID_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"-i\.(?P<shop>\d+)\.(?P<item>\d+)",
        r"/product/(?P<shop>\d+)/(?P<item>\d+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

#[derive(Debug, PartialEq, Eq)]
pub(super) struct ItemIds<'a> {
    pub shop_id: &'a str,
    pub item_id: &'a str,
}

pub(super) fn item_ids(url: &str) -> Option<ItemIds<'_>> {
    ID_RE.iter().find_map(|re| {
        let caps = re.captures(url)?;
        Some(ItemIds {
            shop_id: caps.name("shop")?.as_str(),
            item_id: caps.name("item")?.as_str(),
        })
    })
}

/// Shopee's own item lookup endpoint
pub(super) async fn attempt(
    resolver: &ContentResolver,
    url: &str,
) -> Result<Attempt, ResolutionFailure> {
    let Some(ids) = item_ids(url) else {
        return Ok(Attempt::Missed("no shop/item identifiers in URL".into()));
    };

    let mut headers = browser_headers(resolver, url);
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );

    let response = match resolver
        .client
        .get(&resolver.shopee_item_api)
        .headers(headers)
        .query(&[("itemid", ids.item_id), ("shopid", ids.shop_id)])
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => return stage_error(e, "Shopee item API"),
    };

    let status = response.status();
    if !status.is_success() {
        return Ok(Attempt::Missed(format!(
            "item API error (status {})",
            status.as_u16()
        )));
    }

    match response.text().await {
        Ok(body) => Ok(attempt_from_item(&body)),
        Err(e) => stage_error(e, "Shopee item API"),
    }
}

fn attempt_from_item(body: &str) -> Attempt {
    let json: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => return Attempt::Missed(format!("malformed item response: {e}")),
    };

    // v4 nests the item under `data`, older responses under `item`
    let Some(item) = ["data", "item"]
        .iter()
        .filter_map(|key| json.get(key))
        .find(|item| item.get(VIDEO_INFO_KEY).is_some())
    else {
        return Attempt::Missed("item has no video info".into());
    };

    item.get(VIDEO_INFO_KEY)
        .and_then(url_from_video_info_list)
        .and_then(|u| ResolvedMedia::new(Platform::Shopee, &u))
        .map(|media| Attempt::Found(media.with_title(item.get("name").and_then(Value::as_str))))
        .unwrap_or_else(|| Attempt::Missed("item video info has no usable URL".into()))
}
