pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Asset, NewAsset};

pub use memory::MemoryAssetStore;
pub use postgres::PgAssetStore;

/// Errors from the asset store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("No asset with id {0}")]
    NotFound(i64),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Durable table of asset records, keyed by a store-assigned id and
/// queryable by owner.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Persist a new record, assigning its id. Returns the stored row.
    async fn insert(&self, asset: NewAsset) -> Result<Asset, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Asset>, StoreError>;

    /// All assets for one owner, in insertion (id) order.
    async fn find_by_owner(&self, user_id: &str) -> Result<Vec<Asset>, StoreError>;

    /// Overwrite every field of an existing record by id.
    async fn update(&self, asset: &Asset) -> Result<Asset, StoreError>;

    /// Liveness check for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
