//! Maps upstream media into the flat post shape the blog page renders.
//!
//! The JSON names (`titulo`, `legenda`, `data`) are the frontend's contract
//! and must not change.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{MediaType, RawMediaItem};

/// Title used when a post has no caption, or nothing is left after cleanup.
pub const UNTITLED: &str = "Post without title";

const MAX_TITLE_CHARS: usize = 50;
const TRUNCATED_TITLE_CHARS: usize = 47;

// Only whole tokens: `contato@clinica.com` is an address, not a mention.
static TAGS_AND_MENTIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)[#@]\w+").expect("valid tag/mention pattern"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPost {
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "data")]
    pub timestamp: Option<String>,
    #[serde(rename = "legenda")]
    pub caption: String,
    pub images: Vec<String>,
    #[serde(rename = "mediaType")]
    pub media_type: MediaType,
    pub permalink: Option<String>,
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NormalizedPost {
    /// Placeholder for an item that could not be normalized. Keeps the id
    /// when it was readable so the frontend can still link or skip it.
    pub fn degraded(err: &PerItemError) -> Self {
        Self {
            id: err.id.clone().unwrap_or_default(),
            title: UNTITLED.to_string(),
            timestamp: None,
            caption: String::new(),
            images: Vec::new(),
            media_type: MediaType::Unknown,
            permalink: None,
            username: None,
            error: Some(err.message.clone()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Failure to normalize one item of a page. Never fails the page itself.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("media item {}: {message}", id.as_deref().unwrap_or("<unknown>"))]
pub struct PerItemError {
    pub id: Option<String>,
    pub message: String,
}

/// Derive a short display title from a caption.
///
/// Hashtags and mentions are dropped first. What remains is used verbatim,
/// line breaks included, when it fits; longer captions fall back to their
/// first sentence, then to a hard truncation.
pub fn derive_title(caption: Option<&str>) -> String {
    let caption = match caption {
        Some(c) if !c.is_empty() => c,
        _ => return UNTITLED.to_string(),
    };

    let cleaned = TAGS_AND_MENTIONS.replace_all(caption, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return UNTITLED.to_string();
    }
    if cleaned.chars().count() <= MAX_TITLE_CHARS {
        return cleaned.to_string();
    }

    let first_sentence = cleaned
        .split(['.', '!', '?'])
        .next()
        .unwrap_or_default()
        .trim();
    if !first_sentence.is_empty() && first_sentence.chars().count() <= MAX_TITLE_CHARS {
        return first_sentence.to_string();
    }

    let truncated: String = cleaned.chars().take(TRUNCATED_TITLE_CHARS).collect();
    format!("{}...", truncated.trim())
}

/// Displayable preview URLs for an item. Videos contribute their thumbnail,
/// never the raw video URL.
///
/// Carousels list their children in order. When the children edge is missing
/// (some permission scopes omit it) or yields nothing, the album's own cover
/// `media_url` is used.
pub fn extract_images(item: &RawMediaItem) -> Vec<String> {
    match item.media_type {
        MediaType::Image => item.media_url.iter().cloned().collect(),
        MediaType::Video => item.thumbnail_url.iter().cloned().collect(),
        MediaType::CarouselAlbum => {
            let children: Vec<String> = item
                .children
                .iter()
                .flat_map(|c| c.data.iter())
                .filter_map(|child| match child.media_type {
                    MediaType::Image => child.media_url.clone(),
                    MediaType::Video => child.thumbnail_url.clone(),
                    _ => None,
                })
                .collect();
            if children.is_empty() {
                item.media_url.iter().cloned().collect()
            } else {
                children
            }
        }
        MediaType::Unknown => Vec::new(),
    }
}

pub fn normalize(item: &RawMediaItem) -> NormalizedPost {
    NormalizedPost {
        id: item.id.clone(),
        title: derive_title(item.caption.as_deref()),
        timestamp: item.timestamp.clone(),
        caption: item.caption.clone().unwrap_or_default(),
        images: extract_images(item),
        media_type: item.media_type,
        permalink: item.permalink.clone(),
        username: item.username.clone(),
        error: None,
    }
}

/// Decode and normalize one raw item from a media page.
pub fn normalize_value(value: serde_json::Value) -> Result<NormalizedPost, PerItemError> {
    let id = value
        .get("id")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    serde_json::from_value::<RawMediaItem>(value)
        .map(|item| normalize(&item))
        .map_err(|e| PerItemError {
            id,
            message: e.to_string(),
        })
}

/// Normalize a whole page, one result per input item, in order.
pub fn normalize_page(values: Vec<serde_json::Value>) -> Vec<Result<NormalizedPost, PerItemError>> {
    values.into_iter().map(normalize_value).collect()
}
