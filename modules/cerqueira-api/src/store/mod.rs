// SiteStore abstracts the relational store behind the admin and contact routes.
//
// PgStore is the production backend. MemoryStore backs local development
// without DATABASE_URL and the route tests.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use anyhow::Result;
use async_trait::async_trait;

use cerqueira_common::{ContactMessage, SiteConfig, SiteConfigUpdate};

#[async_trait]
pub trait SiteStore: Send + Sync {
    /// The configuration row, if it exists.
    async fn site_config(&self) -> Result<Option<SiteConfig>>;

    /// Overwrite the configuration row. Returns the number of rows changed.
    async fn update_site_config(&self, update: &SiteConfigUpdate) -> Result<u64>;

    async fn insert_contact_message(&self, message: &ContactMessage) -> Result<()>;
}
