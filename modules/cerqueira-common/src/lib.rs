pub mod config;
pub mod credentials;
pub mod error;
pub mod site;

pub use config::Config;
pub use credentials::{Credential, CredentialSource, TokenResolver, ACCESS_TOKEN_VAR};
pub use error::CommonError;
pub use site::{ContactMessage, ContactPayload, SiteConfig, SiteConfigPayload, SiteConfigUpdate};
