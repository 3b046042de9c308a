use std::fmt;

use crate::error::CommonError;

/// Environment variable holding the Instagram Graph API token.
pub const ACCESS_TOKEN_VAR: &str = "INSTAGRAM_ACCESS_TOKEN";

/// Upstream access token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<{} chars>)", self.0.len())
    }
}

/// Where a resolved credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Request,
    Environment,
    Fallback,
}

/// Finds the Instagram token for one request.
///
/// Precedence: a token bound to the request itself, then the process
/// environment (read on every call so rotated tokens are picked up), then the
/// value captured when config was loaded. Blank values are skipped.
#[derive(Clone)]
pub struct TokenResolver {
    env_var: String,
    fallback: Option<String>,
}

impl TokenResolver {
    pub fn new(fallback: Option<String>) -> Self {
        Self {
            env_var: ACCESS_TOKEN_VAR.to_string(),
            fallback,
        }
    }

    pub fn with_env_var(mut self, name: impl Into<String>) -> Self {
        self.env_var = name.into();
        self
    }

    pub fn resolve(&self, request_token: Option<&str>) -> Result<Credential, CommonError> {
        self.resolve_with_source(request_token).map(|(c, _)| c)
    }

    pub fn resolve_with_source(
        &self,
        request_token: Option<&str>,
    ) -> Result<(Credential, CredentialSource), CommonError> {
        let env_token = std::env::var(&self.env_var).ok();

        let candidates = [
            (request_token, CredentialSource::Request),
            (env_token.as_deref(), CredentialSource::Environment),
            (self.fallback.as_deref(), CredentialSource::Fallback),
        ];

        for (value, source) in candidates {
            if let Some(token) = value.map(str::trim).filter(|t| !t.is_empty()) {
                tracing::debug!(?source, "Resolved Instagram credential");
                return Ok((Credential(token.to_string()), source));
            }
        }

        tracing::warn!(env_var = %self.env_var, "No Instagram credential available");
        Err(CommonError::MissingCredential)
    }
}

impl fmt::Debug for TokenResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResolver")
            .field("env_var", &self.env_var)
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}
