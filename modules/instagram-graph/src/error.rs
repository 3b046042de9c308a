use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl GraphError {
    /// Upstream status code, if the failure came back as an HTTP response.
    pub fn status(&self) -> Option<u16> {
        match self {
            GraphError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the upstream message points at the access token
    /// (expired, revoked, malformed, missing permission on the token).
    pub fn is_credential_error(&self) -> bool {
        match self {
            GraphError::Api { message, .. } => message.to_lowercase().contains("token"),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for GraphError {
    fn from(err: reqwest::Error) -> Self {
        GraphError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_messages_are_credential_errors() {
        let err = GraphError::Api {
            status: 400,
            message: "Invalid OAuth access token".to_string(),
        };
        assert!(err.is_credential_error());
        assert_eq!(err.status(), Some(400));

        let err = GraphError::Api {
            status: 190,
            message: "Error validating access Token: session expired".to_string(),
        };
        assert!(err.is_credential_error());
    }

    #[test]
    fn other_failures_are_not_credential_errors() {
        let err = GraphError::Api {
            status: 500,
            message: "HTTP error 500".to_string(),
        };
        assert!(!err.is_credential_error());
        assert!(!GraphError::Network("connection reset".into()).is_credential_error());
    }
}
