//! Field lookup in Shopee's nested `video_info_list` structure.
//!
//! These names come from undocumented responses and change without notice. Keep every
//! lookup here so a broken field is a one-line fix.

use serde_json::Value;

use super::super::normalize_media_url;

pub(super) const VIDEO_INFO_KEY: &str = "video_info_list";

/// Paths tried in order on each `video_info_list` entry
const URL_FIELDS: &[&[&str]] = &[
    &["default_format", "url"],
    &["url"],
    &["video_url"],
    &["play_url"],
];

/// First usable, normalized URL in a `video_info_list` array
pub(super) fn url_from_video_info_list(list: &Value) -> Option<String> {
    list.as_array()?.iter().find_map(url_from_video_info)
}

fn url_from_video_info(info: &Value) -> Option<String> {
    URL_FIELDS
        .iter()
        .filter_map(|path| lookup(info, path))
        .chain(
            info.get("formats")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(|f| f.get("url").and_then(Value::as_str)),
        )
        .find_map(normalize_media_url)
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |v, key| v.get(key))?
        .as_str()
}

/// Depth-first search for the first `video_info_list` anywhere in `value` that has a usable URL
pub(super) fn find_video_url(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => map
            .get(VIDEO_INFO_KEY)
            .and_then(url_from_video_info_list)
            .or_else(|| map.values().find_map(find_video_url)),
        Value::Array(items) => items.iter().find_map(find_video_url),
        _ => None,
    }
}
