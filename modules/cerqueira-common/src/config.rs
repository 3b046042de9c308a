use crate::error::CommonError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Web server
    pub api_host: String,
    pub api_port: u16,

    // Instagram
    pub instagram_access_token: Option<String>,
    pub instagram_api_base: Option<String>,
    pub instagram_timeout_secs: u64,
    pub instagram_validate_token: bool,

    // Auth
    pub jwt_secret: String,

    // Database
    pub database_url: Option<String>,
}

impl Config {
    /// Load from the process environment. The binary reads `.env` first.
    pub fn from_env() -> Result<Self, CommonError> {
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CommonError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            api_host: get("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            api_port: parse_or(get("API_PORT"), "API_PORT", 3000)?,
            instagram_access_token: get(crate::ACCESS_TOKEN_VAR),
            instagram_api_base: get("INSTAGRAM_API_BASE"),
            instagram_timeout_secs: parse_or(get("INSTAGRAM_TIMEOUT_SECS"), "INSTAGRAM_TIMEOUT_SECS", 30)?,
            instagram_validate_token: parse_or(
                get("INSTAGRAM_VALIDATE_TOKEN"),
                "INSTAGRAM_VALIDATE_TOKEN",
                false,
            )?,
            jwt_secret: get("JWT_SECRET").ok_or_else(|| {
                CommonError::Config("JWT_SECRET environment variable is required".to_string())
            })?,
            database_url: get("DATABASE_URL"),
        })
    }

    fn log_keys(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  API: {}:{}", self.api_host, self.api_port);
        tracing::info!(
            "  INSTAGRAM_ACCESS_TOKEN: {}",
            preview_opt(&self.instagram_access_token)
        );
        tracing::info!(
            "  INSTAGRAM_API_BASE: {}",
            self.instagram_api_base.as_deref().unwrap_or("<default>")
        );
        tracing::info!("  INSTAGRAM_VALIDATE_TOKEN: {}", self.instagram_validate_token);
        tracing::info!("  JWT_SECRET: {}", preview(&self.jwt_secret));
        tracing::info!(
            "  DATABASE_URL: {}",
            if self.database_url.is_some() { "<set>" } else { "<not set, using in-memory store>" }
        );
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    key: &str,
    default: T,
) -> Result<T, CommonError> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| CommonError::Config(format!("{key} has an invalid value: {v}"))),
        None => Ok(default),
    }
}

/// Short, non-reversible preview of a secret for startup logs.
pub fn preview(val: &str) -> String {
    let prefix: String = val.chars().take(4).collect();
    format!("{}...({} chars)", prefix, val.chars().count())
}

fn preview_opt(val: &Option<String>) -> String {
    match val {
        Some(v) if !v.is_empty() => preview(v),
        _ => "<not set>".to_string(),
    }
}
