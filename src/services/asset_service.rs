use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::models::{add_months_clamped, Asset, AssetDraft, NewAsset};
use crate::store::{AssetStore, StoreError};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("invalid date for '{field}': {value}")]
    InvalidDate { field: String, value: String },

    #[error("asset not found with id: {0}")]
    NotFound(i64),

    #[error("caller does not own this asset")]
    PermissionDenied,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Business rules around the asset lifecycle. Handlers never talk to the
/// store directly.
#[derive(Clone)]
pub struct AssetService {
    store: Arc<dyn AssetStore>,
}

impl AssetService {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self { store }
    }

    /// Store liveness, surfaced by the health endpoint.
    pub async fn health_check(&self) -> Result<(), AssetError> {
        Ok(self.store.ping().await?)
    }

    /// All assets belonging to one owner.
    pub async fn list_for_owner(&self, user_id: &str) -> Result<Vec<Asset>, AssetError> {
        Ok(self.store.find_by_owner(user_id).await?)
    }

    /// Create an asset for the caller. `next_maintenance` is derived here,
    /// once, from the supplied last-maintenance date and interval.
    pub async fn create(&self, draft: AssetDraft, user_id: &str) -> Result<Asset, AssetError> {
        let last_maintenance = parse_date("lastMaintenance", &draft.last_maintenance)?;
        let next_maintenance =
            add_months_clamped(last_maintenance, draft.interval).ok_or_else(|| {
                AssetError::InvalidDate {
                    field: "lastMaintenance".to_string(),
                    value: format!("{} + {} months is out of range", last_maintenance, draft.interval),
                }
            })?;

        let stored = self
            .store
            .insert(NewAsset {
                user_id: user_id.to_string(),
                name: draft.name,
                category: draft.category,
                description: draft.description,
                interval: draft.interval,
                last_maintenance,
                next_maintenance,
            })
            .await?;

        debug!(id = stored.id, owner = %stored.user_id, "created asset");
        Ok(stored)
    }

    /// Apply a partial update to an asset the caller owns. Only the
    /// maintenance dates are mutable; updating `lastMaintenance` does NOT
    /// recompute `nextMaintenance` (the frontend derives any display status
    /// from the two dates itself).
    pub async fn update_partial(
        &self,
        id: i64,
        user_id: &str,
        updates: &Map<String, Value>,
    ) -> Result<Asset, AssetError> {
        let mut asset = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(AssetError::NotFound(id))?;

        if asset.user_id != user_id {
            return Err(AssetError::PermissionDenied);
        }

        // Explicit allow-list: the maintenance dates are the only mutable
        // fields. Anything else in the mapping (owner, name, a frontend
        // "status") is ignored without error.
        for (key, value) in updates {
            match key.as_str() {
                "lastMaintenance" => asset.last_maintenance = parse_date_value(key, value)?,
                "nextMaintenance" => asset.next_maintenance = parse_date_value(key, value)?,
                _ => {}
            }
        }

        Ok(self.store.update(&asset).await?)
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AssetError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| AssetError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn parse_date_value(field: &str, value: &Value) -> Result<NaiveDate, AssetError> {
    let s = value.as_str().ok_or_else(|| AssetError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })?;
    parse_date(field, s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryAssetStore;
    use serde_json::json;

    fn service() -> AssetService {
        AssetService::new(Arc::new(MemoryAssetStore::new()))
    }

    fn draft(name: &str, interval: i32, last: &str) -> AssetDraft {
        AssetDraft {
            name: name.to_string(),
            category: Some("general".to_string()),
            description: None,
            interval,
            last_maintenance: last.to_string(),
        }
    }

    fn updates(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn create_derives_next_maintenance() {
        let svc = service();
        let asset = svc.create(draft("Gutters", 6, "2024-03-10"), "user-a").await.unwrap();

        assert_eq!(asset.user_id, "user-a");
        assert_eq!(asset.last_maintenance.to_string(), "2024-03-10");
        assert_eq!(asset.next_maintenance.to_string(), "2024-09-10");
    }

    #[tokio::test]
    async fn create_clamps_month_end() {
        let svc = service();
        let leap = svc.create(draft("Boiler", 1, "2024-01-31"), "u").await.unwrap();
        assert_eq!(leap.next_maintenance.to_string(), "2024-02-29");

        let plain = svc.create(draft("Boiler", 1, "2023-01-31"), "u").await.unwrap();
        assert_eq!(plain.next_maintenance.to_string(), "2023-02-28");
    }

    #[tokio::test]
    async fn create_accepts_non_positive_interval() {
        let svc = service();
        let zero = svc.create(draft("Filter", 0, "2024-05-01"), "u").await.unwrap();
        assert_eq!(zero.next_maintenance, zero.last_maintenance);

        let negative = svc.create(draft("Filter", -2, "2024-05-01"), "u").await.unwrap();
        assert_eq!(negative.next_maintenance.to_string(), "2024-03-01");
    }

    #[tokio::test]
    async fn create_rejects_malformed_date_without_writing() {
        let svc = service();
        let err = svc.create(draft("Roof", 12, "not-a-date"), "user-a").await.unwrap_err();
        assert!(matches!(err, AssetError::InvalidDate { .. }));

        // nothing was persisted
        assert!(svc.list_for_owner("user-a").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_isolates_owners() {
        let svc = service();
        svc.create(draft("A1", 1, "2024-01-01"), "alice").await.unwrap();
        svc.create(draft("B1", 1, "2024-01-01"), "bob").await.unwrap();
        svc.create(draft("A2", 1, "2024-01-01"), "alice").await.unwrap();

        let alices = svc.list_for_owner("alice").await.unwrap();
        assert_eq!(alices.len(), 2);
        assert!(alices.iter().all(|a| a.user_id == "alice"));
        // insertion order
        assert_eq!(alices[0].name, "A1");
        assert_eq!(alices[1].name, "A2");
    }

    #[tokio::test]
    async fn create_then_list_round_trip() {
        let svc = service();
        let created = svc.create(draft("Deck", 12, "2024-04-01"), "carol").await.unwrap();

        let listed = svc.list_for_owner("carol").await.unwrap();
        assert_eq!(listed, vec![created.clone()]);
        assert!(created.id > 0);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let svc = service();
        let err = svc
            .update_partial(999, "u", &updates(json!({"lastMaintenance": "2024-05-01"})))
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::NotFound(999)));
    }

    #[tokio::test]
    async fn update_by_non_owner_is_denied_and_record_unchanged() {
        let svc = service();
        let created = svc.create(draft("Fence", 6, "2024-02-01"), "alice").await.unwrap();

        let err = svc
            .update_partial(created.id, "mallory", &updates(json!({"lastMaintenance": "2030-01-01"})))
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::PermissionDenied));

        let after = svc.list_for_owner("alice").await.unwrap();
        assert_eq!(after, vec![created]);
    }

    #[tokio::test]
    async fn update_last_maintenance_does_not_recompute_next() {
        let svc = service();
        let created = svc.create(draft("Chimney", 12, "2024-01-15"), "u").await.unwrap();
        assert_eq!(created.next_maintenance.to_string(), "2025-01-15");

        let updated = svc
            .update_partial(created.id, "u", &updates(json!({"lastMaintenance": "2024-05-01"})))
            .await
            .unwrap();

        assert_eq!(updated.last_maintenance.to_string(), "2024-05-01");
        // untouched fields, including the derived date, stay as they were
        assert_eq!(updated.next_maintenance, created.next_maintenance);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.category, created.category);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.interval, created.interval);
    }

    #[tokio::test]
    async fn update_both_dates() {
        let svc = service();
        let created = svc.create(draft("Sump pump", 3, "2024-01-01"), "u").await.unwrap();

        let updated = svc
            .update_partial(
                created.id,
                "u",
                &updates(json!({
                    "lastMaintenance": "2024-06-01",
                    "nextMaintenance": "2024-09-01"
                })),
            )
            .await
            .unwrap();

        assert_eq!(updated.last_maintenance.to_string(), "2024-06-01");
        assert_eq!(updated.next_maintenance.to_string(), "2024-09-01");
    }

    #[tokio::test]
    async fn update_ignores_unlisted_fields() {
        let svc = service();
        let created = svc.create(draft("Water heater", 6, "2024-01-01"), "u").await.unwrap();

        let updated = svc
            .update_partial(
                created.id,
                "u",
                &updates(json!({
                    "userId": "someone-else",
                    "name": "hijacked",
                    "status": "Overdue",
                    "nextMaintenance": "2024-12-01"
                })),
            )
            .await
            .unwrap();

        assert_eq!(updated.user_id, "u");
        assert_eq!(updated.name, "Water heater");
        assert_eq!(updated.next_maintenance.to_string(), "2024-12-01");
    }

    #[tokio::test]
    async fn update_rejects_malformed_date() {
        let svc = service();
        let created = svc.create(draft("Dryer vent", 6, "2024-01-01"), "u").await.unwrap();

        let err = svc
            .update_partial(created.id, "u", &updates(json!({"nextMaintenance": "05/01/2024"})))
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::InvalidDate { .. }));

        let err = svc
            .update_partial(created.id, "u", &updates(json!({"lastMaintenance": 20240501})))
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::InvalidDate { .. }));

        // record untouched either way
        let after = svc.list_for_owner("u").await.unwrap();
        assert_eq!(after, vec![created]);
    }
}
