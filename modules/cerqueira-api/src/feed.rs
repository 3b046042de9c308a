use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use cerqueira_common::{Credential, TokenResolver};
use instagram_graph::{
    normalize, normalize_page, ContainerRequest, GraphClient, GraphError, NormalizedPost, Paging,
    ProfileSummary, PublishKind, DEFAULT_PAGE_LIMIT,
};

use crate::error::ApiError;

/// Upper bound on page size; larger requests are clamped.
pub const MAX_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub profile: ProfileSummary,
    pub posts: Vec<NormalizedPost>,
    pub paging: Paging,
}

// --- Mutation payloads ---

#[derive(Debug, Default, Deserialize)]
pub struct PublishRequest {
    pub media_type: Option<String>,
    pub media_url: Option<String>,
    pub caption: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub success: bool,
    pub media: NormalizedPost,
    pub container_id: String,
    pub media_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CaptionUpdateRequest {
    pub media_id: Option<String>,
    pub caption: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CaptionUpdateResponse {
    pub success: bool,
    pub media: NormalizedPost,
    pub changes: CaptionChanges,
}

#[derive(Debug, Serialize)]
pub struct CaptionChanges {
    pub caption: Change,
}

#[derive(Debug, Serialize)]
pub struct Change {
    pub before: String,
    pub after: String,
}

/// Sequences credential resolution, upstream calls and normalization for the
/// `/api/instagram` routes. Holds no per-request state.
#[derive(Clone)]
pub struct FeedService {
    client: GraphClient,
    tokens: TokenResolver,
    check_credential: bool,
}

impl FeedService {
    pub fn new(client: GraphClient, tokens: TokenResolver) -> Self {
        Self {
            client,
            tokens,
            check_credential: false,
        }
    }

    /// Probe the token with `/me` before every request.
    pub fn with_credential_check(mut self, enabled: bool) -> Self {
        self.check_credential = enabled;
        self
    }

    /// Profile plus one normalized page of media.
    pub async fn feed(&self, limit: u32, after: Option<&str>) -> Result<FeedResponse, ApiError> {
        let credential = self.credential(None).await?;
        let token = credential.expose();

        let (profile, page) = tokio::try_join!(
            self.client.fetch_profile(token),
            self.client.fetch_media_page(token, limit, after),
        )?;

        let posts: Vec<NormalizedPost> = normalize_page(page.data)
            .into_iter()
            .map(|result| {
                result.unwrap_or_else(|err| {
                    warn!(id = ?err.id, error = %err.message, "Media item could not be normalized");
                    NormalizedPost::degraded(&err)
                })
            })
            .collect();

        info!(
            username = %profile.username,
            posts = posts.len(),
            degraded = posts.iter().filter(|p| p.is_degraded()).count(),
            "Served Instagram feed"
        );

        Ok(FeedResponse {
            profile,
            posts,
            paging: page.paging,
        })
    }

    /// A single normalized media item.
    pub async fn post(&self, media_id: &str) -> Result<NormalizedPost, ApiError> {
        validate_media_id(media_id)?;
        let credential = self.credential(None).await?;

        let item = self
            .client
            .fetch_media_item(credential.expose(), media_id)
            .await?;
        Ok(normalize(&item))
    }

    /// Create a container, publish it, and return the normalized result.
    pub async fn publish(&self, request: PublishRequest) -> Result<PublishResponse, ApiError> {
        let (kind, media_url) = match (request.media_type.as_deref(), request.media_url) {
            (Some(kind), Some(url)) if !kind.trim().is_empty() && !url.trim().is_empty() => {
                (kind.parse::<PublishKind>().map_err(ApiError::Validation)?, url)
            }
            _ => {
                return Err(ApiError::Validation(
                    "media_type and media_url are required".to_string(),
                ))
            }
        };

        let credential = self.credential(request.access_token.as_deref()).await?;
        let token = credential.expose();

        let container = ContainerRequest {
            kind,
            media_url,
            caption: request.caption,
        };
        let container_id = self.client.create_media_container(token, &container).await?;
        let media_id = self.client.publish_media(token, &container_id).await?;
        let item = self.client.fetch_media_item(token, &media_id).await?;

        Ok(PublishResponse {
            success: true,
            media: normalize(&item),
            container_id,
            media_id,
        })
    }

    /// Replace a post's caption and report the before/after values.
    pub async fn update_caption(
        &self,
        request: CaptionUpdateRequest,
    ) -> Result<CaptionUpdateResponse, ApiError> {
        let (media_id, caption) = match (request.media_id, request.caption) {
            (Some(id), Some(caption)) if !id.trim().is_empty() => (id, caption),
            _ => {
                return Err(ApiError::Validation(
                    "media_id and caption are required".to_string(),
                ))
            }
        };
        validate_media_id(&media_id)?;

        let credential = self.credential(request.access_token.as_deref()).await?;
        let token = credential.expose();

        let before = self.client.fetch_media_item(token, &media_id).await?;
        let updated = self.client.update_caption(token, &media_id, &caption).await?;
        if !updated {
            return Err(ApiError::Upstream(GraphError::Api {
                status: 502,
                message: "caption update was not applied".to_string(),
            }));
        }
        let after = self.client.fetch_media_item(token, &media_id).await?;
        info!(media_id = %media_id, "Updated caption");

        Ok(CaptionUpdateResponse {
            success: true,
            changes: CaptionChanges {
                caption: Change {
                    before: before.caption.unwrap_or_default(),
                    after: after.caption.clone().unwrap_or_default(),
                },
            },
            media: normalize(&after),
        })
    }

    /// Resolve the token for this request and, if enabled, probe it.
    async fn credential(&self, request_token: Option<&str>) -> Result<Credential, ApiError> {
        let credential = self.tokens.resolve(request_token)?;
        if self.check_credential {
            let probe = self
                .client
                .verify_credential(credential.expose())
                .await
                .map_err(probe_error)?;
            tracing::debug!(account_id = %probe.id, "Credential probe succeeded");
        }
        Ok(credential)
    }
}

/// Any 4xx from the `/me` probe means the token itself was refused.
fn probe_error(err: GraphError) -> ApiError {
    match err.status() {
        Some(status) if (400..500).contains(&status) => ApiError::Credential(err),
        _ => ApiError::Upstream(err),
    }
}

/// Parse the `limit` query value; anything that is not a positive integer
/// falls back to the default page size.
pub fn parse_limit(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .map(|n| n.min(MAX_PAGE_LIMIT))
        .unwrap_or(DEFAULT_PAGE_LIMIT)
}

/// Media ids are numeric in practice; anything that could change the
/// request path is rejected.
fn validate_media_id(id: &str) -> Result<(), ApiError> {
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(ApiError::Validation(format!("Invalid media id: {id}")))
    }
}
