pub mod error;
pub mod normalize;
pub mod types;

pub use error::{GraphError, Result};
pub use normalize::{
    derive_title, extract_images, normalize, normalize_page, normalize_value, NormalizedPost,
    PerItemError, UNTITLED,
};
pub use types::{
    Children, ContainerRequest, CredentialProbe, Cursors, MediaPage, MediaType, Paging,
    ProfileSummary, PublishKind, RawMediaItem,
};

use std::time::Duration;

use reqwest::header::{HeaderValue, CACHE_CONTROL};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use types::{ErrorEnvelope, IdResponse, SuccessResponse};

pub const BASE_URL: &str = "https://graph.instagram.com";

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_LIMIT: u32 = 25;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const CACHE_HINT: &str = "public, max-age=900";

const PROFILE_FIELDS: &str = "id,username,account_type,media_count";
const PROBE_FIELDS: &str = "id,username";
const MEDIA_FIELDS: &str = "id,caption,media_type,media_url,permalink,thumbnail_url,timestamp,username,children{id,media_type,media_url,thumbnail_url}";

/// Instagram Graph API client.
///
/// The access token always travels as the `access_token` query parameter,
/// which is what the Graph API expects. It is never logged.
#[derive(Clone)]
pub struct GraphClient {
    client: reqwest::Client,
    base_url: String,
}

impl GraphClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Point the client at a different host (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the account summary for the token's owner.
    pub async fn fetch_profile(&self, credential: &str) -> Result<ProfileSummary> {
        self.get(credential, "/me", &[("fields", PROFILE_FIELDS.to_string())])
            .await
    }

    /// Cheap `/me` probe used to check a token before doing real work.
    pub async fn verify_credential(&self, credential: &str) -> Result<CredentialProbe> {
        self.get(credential, "/me", &[("fields", PROBE_FIELDS.to_string())])
            .await
    }

    /// Fetch one page of the account's media. `after` is passed through
    /// untouched as the upstream cursor.
    pub async fn fetch_media_page(
        &self,
        credential: &str,
        limit: u32,
        after: Option<&str>,
    ) -> Result<MediaPage> {
        let mut params = vec![
            ("fields", MEDIA_FIELDS.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(after) = after {
            params.push(("after", after.to_string()));
        }

        let page: MediaPage = self.get(credential, "/me/media", &params).await?;
        tracing::debug!(
            count = page.data.len(),
            has_next = page.next_cursor().is_some(),
            "Fetched media page"
        );
        Ok(page)
    }

    pub async fn fetch_media_item(&self, credential: &str, media_id: &str) -> Result<RawMediaItem> {
        let path = format!("/{media_id}");
        self.get(credential, &path, &[("fields", MEDIA_FIELDS.to_string())])
            .await
    }

    /// Create an unpublished media container. Returns the container id.
    pub async fn create_media_container(
        &self,
        credential: &str,
        request: &ContainerRequest,
    ) -> Result<String> {
        let resp: IdResponse = self.post(credential, "/me/media", &request.params()).await?;
        tracing::info!(container_id = %resp.id, kind = request.kind.as_str(), "Created media container");
        Ok(resp.id)
    }

    /// Publish a container. Returns the id of the new media object.
    pub async fn publish_media(&self, credential: &str, container_id: &str) -> Result<String> {
        let resp: IdResponse = self
            .post(
                credential,
                "/me/media_publish",
                &[("creation_id", container_id.to_string())],
            )
            .await?;
        tracing::info!(container_id, media_id = %resp.id, "Published media");
        Ok(resp.id)
    }

    pub async fn update_caption(
        &self,
        credential: &str,
        media_id: &str,
        caption: &str,
    ) -> Result<bool> {
        let path = format!("/{media_id}");
        let resp: SuccessResponse = self
            .post(credential, &path, &[("caption", caption.to_string())])
            .await?;
        Ok(resp.success)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        credential: &str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let req = self.client.get(&url).query(params);
        self.send(req, credential, path).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        credential: &str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let req = self.client.post(&url).query(params);
        self.send(req, credential, path).await
    }

    /// Shared tail of every call: attach token and cache hint, read the body
    /// whatever the status, and unwrap `error.message` on failure.
    async fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        credential: &str,
        path: &str,
    ) -> Result<T> {
        tracing::debug!(path, "Graph API request");

        let resp = req
            .query(&[("access_token", credential)])
            .header(CACHE_CONTROL, HeaderValue::from_static(CACHE_HINT))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        let parsed = serde_json::from_str::<serde_json::Value>(&body);

        if !status.is_success() {
            let message = parsed
                .ok()
                .and_then(|v| serde_json::from_value::<ErrorEnvelope>(v).ok())
                .and_then(|e| e.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("HTTP error {}", status.as_u16()));
            tracing::warn!(path, status = status.as_u16(), error = %message, "Graph API error");
            return Err(GraphError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let value = parsed?;
        serde_json::from_value(value).map_err(Into::into)
    }
}
