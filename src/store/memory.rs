use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::models::{Asset, NewAsset};
use crate::store::{AssetStore, StoreError};

/// In-process asset store. Backs the test suite and `UPKEEP_STORE=memory`
/// development runs; a BTreeMap keyed by id gives insertion-order listings
/// for free.
#[derive(Default)]
pub struct MemoryAssetStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    rows: BTreeMap<i64, Asset>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn insert(&self, asset: NewAsset) -> Result<Asset, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.next_id += 1;
        let stored = Asset {
            id: inner.next_id,
            user_id: asset.user_id,
            name: asset.name,
            category: asset.category,
            description: asset.description,
            interval: asset.interval,
            last_maintenance: asset.last_maintenance,
            next_maintenance: asset.next_maintenance,
        };
        inner.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Asset>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn find_by_owner(&self, user_id: &str) -> Result<Vec<Asset>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .rows
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, asset: &Asset) -> Result<Asset, StoreError> {
        let mut inner = self.inner.lock().await;
        if !inner.rows.contains_key(&asset.id) {
            return Err(StoreError::NotFound(asset.id));
        }
        inner.rows.insert(asset.id, asset.clone());
        Ok(asset.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
