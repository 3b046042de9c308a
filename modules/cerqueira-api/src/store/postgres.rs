use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use cerqueira_common::{ContactMessage, SiteConfig, SiteConfigUpdate};

use super::SiteStore;

const SITE_CONFIG_ID: i32 = 1;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and bring the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        tracing::info!("Connected to database");

        sqlx::migrate!("../../migrations").run(&pool).await?;
        tracing::info!("Migrations complete");

        Ok(Self { pool })
    }
}

fn site_config_from_row(row: &PgRow) -> Result<SiteConfig> {
    Ok(SiteConfig {
        id: row.try_get("id")?,
        name: row.try_get("nome")?,
        address: row.try_get("endereco")?,
        phone: row.try_get("telefone")?,
        email: row.try_get("email")?,
        instagram: row.try_get("instagram")?,
        whatsapp: row.try_get("whatsapp")?,
        map_latitude: row.try_get("mapa_latitude")?,
        map_longitude: row.try_get("mapa_longitude")?,
        map_zoom: row.try_get("mapa_zoom")?,
    })
}

#[async_trait]
impl SiteStore for PgStore {
    async fn site_config(&self) -> Result<Option<SiteConfig>> {
        let row = sqlx::query(
            r#"
            SELECT id, nome, endereco, telefone, email, instagram, whatsapp,
                   mapa_latitude, mapa_longitude, mapa_zoom
            FROM site_config
            WHERE id = $1
            "#,
        )
        .bind(SITE_CONFIG_ID)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(site_config_from_row).transpose()
    }

    async fn update_site_config(&self, update: &SiteConfigUpdate) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE site_config
            SET nome = $1, endereco = $2, telefone = $3, email = $4,
                instagram = $5, whatsapp = $6, mapa_latitude = $7,
                mapa_longitude = $8, mapa_zoom = $9
            WHERE id = $10
            "#,
        )
        .bind(&update.name)
        .bind(&update.address)
        .bind(&update.phone)
        .bind(&update.email)
        .bind(&update.instagram)
        .bind(&update.whatsapp)
        .bind(update.map_latitude)
        .bind(update.map_longitude)
        .bind(update.map_zoom)
        .bind(SITE_CONFIG_ID)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn insert_contact_message(&self, message: &ContactMessage) -> Result<()> {
        sqlx::query("INSERT INTO mensagens_contato (nome, email, mensagem) VALUES ($1, $2, $3)")
            .bind(&message.name)
            .bind(&message.email)
            .bind(&message.message)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
