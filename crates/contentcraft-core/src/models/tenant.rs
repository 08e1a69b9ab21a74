//! Tenant domain model.
//!
//! Tenants are the top-level isolation boundary. Brands, custom presets and
//! content all belong to exactly one tenant.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::ids::TenantId;

/// Suffix appended to the slugified tenant name when no domain is given.
pub const DEFAULT_DOMAIN_SUFFIX: &str = "contentcraft.com";

/// Primary color assigned to tenants created without one.
pub const DEFAULT_PRIMARY_COLOR: &str = "#3B82F6";

/// A customer organization.
///
/// At most one tenant in the system carries `is_default = true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    /// Host name the tenant is served under (e.g. `acme.contentcraft.com`).
    pub domain: String,
    pub logo: String,
    pub primary_color: String,
    pub is_default: bool,
    pub settings: TenantSettings,
    pub subscription: Subscription,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-tenant feature configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TenantSettings {
    pub allow_brand_creation: bool,
    pub max_brands: u32,
    pub max_users: u32,
    pub ai_providers: Vec<String>,
    pub features: Vec<String>,
}

impl Default for TenantSettings {
    fn default() -> Self {
        Self {
            allow_brand_creation: true,
            max_brands: 10,
            max_users: 5,
            ai_providers: vec!["openai".into(), "claude".into(), "gemini".into()],
            features: vec![
                "content-generation".into(),
                "analytics".into(),
                "collaboration".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub plan: String,
    pub status: String,
    pub expires_at: DateTime<Utc>,
}

impl Subscription {
    /// The starter plan handed to freshly created tenants: active for 30 days.
    pub fn starter(now: DateTime<Utc>) -> Self {
        Self {
            plan: "starter".into(),
            status: "active".into(),
            expires_at: now + Duration::days(30),
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status == "active" && self.expires_at > now
    }
}

/// Fields required to create a new tenant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreateTenant {
    pub name: String,
    /// Defaults to `<slugified name>.contentcraft.com`.
    pub domain: Option<String>,
    pub logo: Option<String>,
    pub primary_color: Option<String>,
    /// Ignored for the very first tenant, which is always the default.
    pub is_default: bool,
    pub settings: Option<TenantSettings>,
    pub subscription: Option<Subscription>,
}

/// Fields that can be updated on an existing tenant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTenant {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub logo: Option<String>,
    pub primary_color: Option<String>,
    pub is_default: Option<bool>,
    pub settings: Option<TenantSettings>,
    pub subscription: Option<Subscription>,
}

/// Lowercases `name` and joins its whitespace-separated words with `-`.
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

pub fn default_domain(name: &str) -> String {
    format!("{}.{DEFAULT_DOMAIN_SUFFIX}", slugify(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_domain_is_slugified_name() {
        assert_eq!(default_domain("Acme  Media Group"), "acme-media-group.contentcraft.com");
    }

    #[test]
    fn starter_subscription_expires_in_thirty_days() {
        let now = Utc::now();
        let sub = Subscription::starter(now);
        assert_eq!(sub.plan, "starter");
        assert!(sub.is_active(now));
        assert!(!sub.is_active(now + Duration::days(31)));
    }

    #[test]
    fn settings_fill_missing_fields_from_defaults() {
        let settings: TenantSettings = serde_json::from_str(r#"{"maxBrands": 3}"#).unwrap();
        assert_eq!(settings.max_brands, 3);
        assert_eq!(settings.max_users, 5);
        assert!(settings.allow_brand_creation);
    }
}
