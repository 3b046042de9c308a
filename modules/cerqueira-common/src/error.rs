use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommonError {
    #[error("Instagram access token is not configured")]
    MissingCredential,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),
}
