use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// --- Media ---

/// Upstream media kind. Kinds this client does not know about decode to
/// `Unknown` instead of failing the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    Image,
    Video,
    CarouselAlbum,
    #[serde(other)]
    Unknown,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "IMAGE",
            MediaType::Video => "VIDEO",
            MediaType::CarouselAlbum => "CAROUSEL_ALBUM",
            MediaType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single media object as returned by `/me/media` or `/{id}`.
/// Carousel children use the same shape with a reduced field set.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawMediaItem {
    pub id: String,
    pub caption: Option<String>,
    pub media_type: MediaType,
    pub media_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub permalink: Option<String>,
    pub timestamp: Option<String>,
    pub username: Option<String>,
    pub children: Option<Children>,
}

/// Graph API edge wrapper around carousel children.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Children {
    #[serde(default)]
    pub data: Vec<RawMediaItem>,
}

/// One page of `/me/media`. Items stay as raw JSON so a single malformed
/// entry can be reported without losing the rest of the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaPage {
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
    #[serde(default)]
    pub paging: Paging,
}

impl MediaPage {
    /// Cursor to pass as `after` for the next page.
    pub fn next_cursor(&self) -> Option<&str> {
        self.paging
            .cursors
            .as_ref()
            .and_then(|c| c.after.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Paging {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursors: Option<Cursors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Cursors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

// --- Profile ---

/// Account summary from `/me`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProfileSummary {
    pub id: String,
    pub username: String,
    pub account_type: Option<String>,
    pub media_count: Option<u64>,
}

/// Result of the lightweight `/me?fields=id,username` probe.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialProbe {
    pub id: String,
    pub username: Option<String>,
}

// --- Publishing ---

/// Media kinds accepted when creating a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishKind {
    Image,
    Video,
    Reels,
}

impl PublishKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishKind::Image => "IMAGE",
            PublishKind::Video => "VIDEO",
            PublishKind::Reels => "REELS",
        }
    }
}

impl FromStr for PublishKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IMAGE" => Ok(PublishKind::Image),
            "VIDEO" => Ok(PublishKind::Video),
            "REELS" => Ok(PublishKind::Reels),
            other => Err(format!("unsupported media_type: {other}")),
        }
    }
}

/// Input for `POST /me/media`.
#[derive(Debug, Clone)]
pub struct ContainerRequest {
    pub kind: PublishKind,
    pub media_url: String,
    pub caption: Option<String>,
}

impl ContainerRequest {
    /// Form parameters in the shape the Graph API expects: images go in
    /// `image_url`, videos in `video_url` with an explicit `media_type`.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = match self.kind {
            PublishKind::Image => vec![("image_url", self.media_url.clone())],
            PublishKind::Video | PublishKind::Reels => vec![
                ("media_type", self.kind.as_str().to_string()),
                ("video_url", self.media_url.clone()),
            ],
        };
        if let Some(caption) = &self.caption {
            params.push(("caption", caption.clone()));
        }
        params
    }
}

/// `{ "id": "..." }` returned by container creation and publish.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IdResponse {
    pub id: String,
}

/// `{ "success": true }` returned by field updates.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SuccessResponse {
    #[serde(default)]
    pub success: bool,
}

/// Error envelope: `{ "error": { "message": "..." } }`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}
