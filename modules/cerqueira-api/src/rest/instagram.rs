use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::feed::{
    parse_limit, CaptionUpdateRequest, CaptionUpdateResponse, PublishRequest, PublishResponse,
};
use crate::AppState;

use super::json_body;

/// Browsers and the edge may cache feed reads for 15 minutes.
const FEED_CACHE_CONTROL: &str = "public, max-age=900";

#[derive(Deserialize)]
pub struct FeedQuery {
    id: Option<String>,
    limit: Option<String>,
    after: Option<String>,
}

/// `GET /api/instagram`: one post when `id` is given, otherwise
/// `{profile, posts, paging}`.
pub async fn api_instagram_feed(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FeedQuery>,
) -> Result<Response, ApiError> {
    let body = match params.id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => Json(state.feed.post(id).await?).into_response(),
        None => {
            let limit = parse_limit(params.limit.as_deref());
            let after = params.after.as_deref().filter(|a| !a.is_empty());
            Json(state.feed.feed(limit, after).await?).into_response()
        }
    };

    Ok((
        [(header::CACHE_CONTROL, HeaderValue::from_static(FEED_CACHE_CONTROL))],
        body,
    )
        .into_response())
}

/// `POST /api/instagram`: create and publish a new post.
pub async fn api_instagram_publish(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    payload: Result<Json<PublishRequest>, JsonRejection>,
) -> Result<Json<PublishResponse>, ApiError> {
    let request = json_body(payload)?;
    info!(sub = %claims.sub, "Publishing Instagram media");
    Ok(Json(state.feed.publish(request).await?))
}

/// `PUT /api/instagram`: replace a post's caption.
pub async fn api_instagram_update_caption(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    payload: Result<Json<CaptionUpdateRequest>, JsonRejection>,
) -> Result<Json<CaptionUpdateResponse>, ApiError> {
    let request = json_body(payload)?;
    info!(sub = %claims.sub, "Updating Instagram caption");
    Ok(Json(state.feed.update_caption(request).await?))
}
