use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A maintainable item owned by a single user. `next_maintenance` is derived
/// from `last_maintenance` + `interval` months at creation time only; after
/// that the two dates are independent write targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    // 'interval' is a reserved keyword in SQL, hence the column rename
    #[sqlx(rename = "maint_interval")]
    pub interval: i32,
    pub last_maintenance: NaiveDate,
    pub next_maintenance: NaiveDate,
}

/// A fully-populated asset that has not been persisted yet; the store
/// assigns the id on insert.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub user_id: String,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub interval: i32,
    pub last_maintenance: NaiveDate,
    pub next_maintenance: NaiveDate,
}

/// Client-supplied fields for creating an asset. The owner is never part of
/// the payload; it comes from the authenticated caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDraft {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub interval: i32,
    pub last_maintenance: String,
}

/// Add a signed number of months with standard calendar semantics: the
/// day-of-month is kept where valid and clamped to the end of the resulting
/// month otherwise (2023-01-31 + 1 month = 2023-02-28).
pub fn add_months_clamped(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn add_months_plain() {
        assert_eq!(add_months_clamped(date(2024, 3, 15), 6), Some(date(2024, 9, 15)));
    }

    #[test]
    fn add_months_clamps_to_month_end() {
        assert_eq!(add_months_clamped(date(2023, 1, 31), 1), Some(date(2023, 2, 28)));
        assert_eq!(add_months_clamped(date(2023, 3, 31), 1), Some(date(2023, 4, 30)));
    }

    #[test]
    fn add_months_leap_year() {
        assert_eq!(add_months_clamped(date(2024, 1, 31), 1), Some(date(2024, 2, 29)));
    }

    #[test]
    fn add_months_crosses_year() {
        assert_eq!(add_months_clamped(date(2023, 11, 30), 3), Some(date(2024, 2, 29)));
    }

    #[test]
    fn add_months_zero_and_negative() {
        assert_eq!(add_months_clamped(date(2024, 5, 1), 0), Some(date(2024, 5, 1)));
        assert_eq!(add_months_clamped(date(2024, 3, 31), -1), Some(date(2024, 2, 29)));
    }

    #[test]
    fn asset_json_shape() {
        let asset = Asset {
            id: 7,
            user_id: "auth0|abc123".to_string(),
            name: "Furnace filter".to_string(),
            category: Some("HVAC".to_string()),
            description: None,
            interval: 3,
            last_maintenance: date(2024, 1, 15),
            next_maintenance: date(2024, 4, 15),
        };

        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["userId"], "auth0|abc123");
        assert_eq!(json["interval"], 3);
        assert_eq!(json["lastMaintenance"], "2024-01-15");
        assert_eq!(json["nextMaintenance"], "2024-04-15");
    }
}
