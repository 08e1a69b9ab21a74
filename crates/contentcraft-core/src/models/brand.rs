//! Brand domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BrandId, TenantId};

pub const DEFAULT_BRAND_COLOR: &str = "#3B82F6";
pub const DEFAULT_BRAND_EMOJI: &str = "🚀";

/// A named identity within a tenant under which content is generated.
///
/// Names are unique within a tenant (case-insensitively). At most one brand
/// per tenant is the default, and the default brand cannot be deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    /// Owning tenant. `None` only for records that arrived without one;
    /// such brands never match an explicit tenant filter.
    pub tenant_id: Option<TenantId>,
    pub name: String,
    pub color: String,
    pub emoji: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBrand {
    pub tenant_id: TenantId,
    pub name: String,
    pub color: Option<String>,
    pub emoji: Option<String>,
    pub is_default: bool,
}

/// Fields that can be updated on an existing brand. The owning tenant is fixed.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateBrand {
    pub name: Option<String>,
    pub color: Option<String>,
    pub emoji: Option<String>,
    pub is_default: Option<bool>,
}

/// Trims a proposed brand name, rejecting blank ones.
pub fn normalize_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Case-insensitive name comparison used for the uniqueness rule.
pub fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
