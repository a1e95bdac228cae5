use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use crate::config;
use crate::models::{Asset, NewAsset};
use crate::store::{AssetStore, StoreError};

/// Postgres-backed asset store. Connects from DATABASE_URL with pool
/// settings taken from config.
pub struct PgAssetStore {
    pool: PgPool,
}

impl PgAssetStore {
    pub async fn connect() -> Result<Self, StoreError> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| StoreError::ConfigMissing("DATABASE_URL"))?;

        let db = &config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(db.max_connections)
            .acquire_timeout(Duration::from_secs(db.connection_timeout))
            .connect(&url)
            .await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the assets table if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS assets (
                id               BIGSERIAL PRIMARY KEY,
                user_id          TEXT NOT NULL,
                name             TEXT NOT NULL,
                category         TEXT,
                description      TEXT,
                maint_interval   INTEGER NOT NULL,
                last_maintenance DATE NOT NULL,
                next_maintenance DATE NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS assets_user_id_idx ON assets (user_id)")
            .execute(&self.pool)
            .await?;

        info!("assets table ready");
        Ok(())
    }
}

#[async_trait]
impl AssetStore for PgAssetStore {
    async fn insert(&self, asset: NewAsset) -> Result<Asset, StoreError> {
        let stored = sqlx::query_as::<_, Asset>(
            r#"
            INSERT INTO assets
                (user_id, name, category, description, maint_interval, last_maintenance, next_maintenance)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&asset.user_id)
        .bind(&asset.name)
        .bind(&asset.category)
        .bind(&asset.description)
        .bind(asset.interval)
        .bind(asset.last_maintenance)
        .bind(asset.next_maintenance)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Asset>, StoreError> {
        let row = sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn find_by_owner(&self, user_id: &str) -> Result<Vec<Asset>, StoreError> {
        let rows = sqlx::query_as::<_, Asset>(
            "SELECT * FROM assets WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn update(&self, asset: &Asset) -> Result<Asset, StoreError> {
        let stored = sqlx::query_as::<_, Asset>(
            r#"
            UPDATE assets
            SET user_id = $2,
                name = $3,
                category = $4,
                description = $5,
                maint_interval = $6,
                last_maintenance = $7,
                next_maintenance = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(asset.id)
        .bind(&asset.user_id)
        .bind(&asset.name)
        .bind(&asset.category)
        .bind(&asset.description)
        .bind(asset.interval)
        .bind(asset.last_maintenance)
        .bind(asset.next_maintenance)
        .fetch_optional(&self.pool)
        .await?;

        stored.ok_or(StoreError::NotFound(asset.id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
