use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use cerqueira_common::CommonError;
use instagram_graph::GraphError;

/// Everything a route can fail with. Rendered as `{"error": "..."}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Configuration(String),

    /// Only fixed messages: verification internals are logged, never returned.
    #[error("{0}")]
    Auth(&'static str),

    #[error("Failed to fetch from Instagram: {0}")]
    Upstream(#[from] GraphError),

    /// The credential probe was refused by the Graph API.
    #[error("Instagram rejected the access token: {0}")]
    Credential(GraphError),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Failed to process the request")]
    Store(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Configuration(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(_) | ApiError::Credential(_) => StatusCode::UNAUTHORIZED,
            ApiError::Upstream(e) if e.is_credential_error() => StatusCode::UNAUTHORIZED,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<CommonError> for ApiError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::MissingCredential | CommonError::Config(_) => {
                ApiError::Configuration(err.to_string())
            }
            CommonError::Validation(msg) => ApiError::Validation(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Store(source) => error!(error = ?source, "Store operation failed"),
            _ if status.is_server_error() => error!(error = %self, "Request failed"),
            _ => warn!(status = status.as_u16(), error = %self, "Request rejected"),
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_problems_are_unauthorized() {
        let err = ApiError::from(GraphError::Api {
            status: 400,
            message: "Invalid OAuth access token".into(),
        });
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            err.to_string(),
            "Failed to fetch from Instagram: Invalid OAuth access token"
        );
    }

    #[test]
    fn other_upstream_failures_are_internal() {
        let err = ApiError::from(GraphError::Api {
            status: 503,
            message: "HTTP error 503".into(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let err = ApiError::from(GraphError::Network("timed out".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn rejected_credential_is_unauthorized_whatever_the_message() {
        let err = ApiError::Credential(GraphError::Api {
            status: 400,
            message: "Session has expired".into(),
        });
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            err.to_string(),
            "Instagram rejected the access token: Session has expired"
        );
    }

    #[test]
    fn missing_credential_is_configuration_error() {
        let err = ApiError::from(CommonError::MissingCredential);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("not configured"));
    }

    #[test]
    fn store_errors_hide_detail() {
        let err = ApiError::Store(anyhow::anyhow!("relation \"site_config\" does not exist"));
        assert_eq!(err.to_string(), "Failed to process the request");
    }
}
