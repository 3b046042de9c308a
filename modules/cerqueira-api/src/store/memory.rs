use std::collections::VecDeque;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use cerqueira_common::site::{DEFAULT_MAP_LATITUDE, DEFAULT_MAP_LONGITUDE, DEFAULT_MAP_ZOOM};
use cerqueira_common::{ContactMessage, SiteConfig, SiteConfigUpdate};

use super::SiteStore;

/// Contact messages kept before the oldest are dropped.
pub const MESSAGE_LIMIT: usize = 200;

/// In-process store. Contents are lost on restart, and only the newest
/// `MESSAGE_LIMIT` contact messages are kept.
pub struct MemoryStore {
    config: RwLock<Option<SiteConfig>>,
    messages: Mutex<VecDeque<ContactMessage>>,
    message_limit: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            config: RwLock::new(None),
            messages: Mutex::new(VecDeque::new()),
            message_limit: MESSAGE_LIMIT,
        }
    }
}

impl MemoryStore {
    /// Empty store with no configuration row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the same starter row the migration seeds.
    pub fn seeded() -> Self {
        Self::with_config(SiteConfig {
            id: 1,
            name: "Cerqueira Psicologia".to_string(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            instagram: String::new(),
            whatsapp: String::new(),
            map_latitude: DEFAULT_MAP_LATITUDE,
            map_longitude: DEFAULT_MAP_LONGITUDE,
            map_zoom: DEFAULT_MAP_ZOOM,
        })
    }

    pub fn with_config(config: SiteConfig) -> Self {
        Self {
            config: RwLock::new(Some(config)),
            ..Self::default()
        }
    }

    pub fn with_message_limit(mut self, limit: usize) -> Self {
        self.message_limit = limit.max(1);
        self
    }

    /// Stored messages, oldest first.
    pub async fn messages(&self) -> Vec<ContactMessage> {
        self.messages.lock().await.iter().cloned().collect()
    }
}

#[async_trait]
impl SiteStore for MemoryStore {
    async fn site_config(&self) -> Result<Option<SiteConfig>> {
        Ok(self.config.read().await.clone())
    }

    async fn update_site_config(&self, update: &SiteConfigUpdate) -> Result<u64> {
        let mut guard = self.config.write().await;
        let Some(config) = guard.as_mut() else {
            return Ok(0);
        };

        config.name = update.name.clone();
        config.address = update.address.clone();
        config.phone = update.phone.clone();
        config.email = update.email.clone();
        config.instagram = update.instagram.clone();
        config.whatsapp = update.whatsapp.clone();
        config.map_latitude = update.map_latitude;
        config.map_longitude = update.map_longitude;
        config.map_zoom = update.map_zoom;
        Ok(1)
    }

    async fn insert_contact_message(&self, message: &ContactMessage) -> Result<()> {
        let mut messages = self.messages.lock().await;
        while messages.len() >= self.message_limit {
            messages.pop_front();
            tracing::warn!(limit = self.message_limit, "Contact buffer full, dropped oldest message");
        }
        messages.push_back(message.clone());
        Ok(())
    }
}
