use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    pub id: i32,
    pub name: String,
    pub schema_name: String,
    pub subscription_start: NaiveDate,
    pub subscription_end: NaiveDate,
    pub enabled: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TenantStatus {
    Active,
    Disabled,
    Expired,
    Deleted,
}

impl TenantStatus {
    pub fn label(self) -> &'static str {
        match self {
            TenantStatus::Active => "Active",
            TenantStatus::Disabled => "Disabled",
            TenantStatus::Expired => "Expired",
            TenantStatus::Deleted => "Deleted",
        }
    }
}

impl Tenant {
    /// Expiry takes precedence over the enabled flag, as the listing shows it
    pub fn status(&self, today: NaiveDate) -> TenantStatus {
        if self.deleted_at.is_some() {
            TenantStatus::Deleted
        } else if self.subscription_end < today {
            TenantStatus::Expired
        } else if !self.enabled {
            TenantStatus::Disabled
        } else {
            TenantStatus::Active
        }
    }
}

/// Optional branding captured at creation time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Branding {
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(end: NaiveDate, enabled: bool) -> Tenant {
        Tenant {
            id: 1,
            name: "Oak Ridge HOA".into(),
            schema_name: "hoa_oak_ridge_hoa".into(),
            subscription_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            subscription_end: end,
            enabled,
            deleted_at: None,
            created_at: Utc::now(),
            logo_url: None,
            primary_color: None,
        }
    }

    #[test]
    fn status_reflects_dates_and_flags() {
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let during = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let after = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        assert_eq!(tenant(end, true).status(during), TenantStatus::Active);
        assert_eq!(tenant(end, false).status(during), TenantStatus::Disabled);
        assert_eq!(tenant(end, true).status(after), TenantStatus::Expired);
        // the last day is still inside the window
        assert_eq!(tenant(end, true).status(end), TenantStatus::Active);

        let mut deleted = tenant(end, false);
        deleted.deleted_at = Some(Utc::now());
        assert_eq!(deleted.status(during), TenantStatus::Deleted);
    }
}
