//! Tenant scoping of entity collections.
//!
//! A collection is narrowed to one tenant by comparing each element's
//! owning tenant with the requested one. Presets without an owner are
//! system presets and belong to every tenant; brands and content without
//! an owner never match an explicit tenant filter.

use crate::models::brand::Brand;
use crate::models::content::Content;
use crate::models::preset::Preset;
use crate::models::TenantId;

/// An entity that may be owned by a tenant.
pub trait TenantScoped {
    /// Whether an element with no owning tenant is visible to all tenants.
    const UNOWNED_IS_GLOBAL: bool = false;

    fn owner(&self) -> Option<TenantId>;

    fn visible_to(&self, tenant: TenantId) -> bool {
        match self.owner() {
            Some(owner) => owner == tenant,
            None => Self::UNOWNED_IS_GLOBAL,
        }
    }
}

impl TenantScoped for Brand {
    fn owner(&self) -> Option<TenantId> {
        self.tenant_id
    }
}

impl TenantScoped for Content {
    fn owner(&self) -> Option<TenantId> {
        self.tenant_id
    }
}

impl TenantScoped for Preset {
    const UNOWNED_IS_GLOBAL: bool = true;

    fn owner(&self) -> Option<TenantId> {
        self.tenant_id
    }
}

/// Returns the elements of `items` visible to `tenant`, in their original
/// order. With no tenant the whole collection is returned.
pub fn scope<E: TenantScoped + Clone>(items: &[E], tenant: Option<TenantId>) -> Vec<E> {
    scope_iter(items, tenant).cloned().collect()
}

/// Borrowing form of [`scope`].
pub fn scope_iter<E: TenantScoped>(
    items: &[E],
    tenant: Option<TenantId>,
) -> impl Iterator<Item = &E> {
    items
        .iter()
        .filter(move |item| tenant.is_none_or(|t| item.visible_to(t)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::preset::PresetCategory;
    use crate::models::{BrandId, PresetId};
    use chrono::Utc;

    fn brand(id: i64, tenant: Option<i64>) -> Brand {
        Brand {
            id: BrandId(id),
            tenant_id: tenant.map(TenantId),
            name: format!("Brand {id}"),
            color: "#000000".into(),
            emoji: "🚀".into(),
            is_default: false,
            created_at: Utc::now(),
        }
    }

    fn preset(id: i64, tenant: Option<i64>) -> Preset {
        Preset {
            id: PresetId(id),
            name: format!("Preset {id}"),
            description: String::new(),
            prompt: String::new(),
            category: PresetCategory::Blog,
            tenant_id: tenant.map(TenantId),
            is_custom: tenant.is_some(),
            suggested: false,
        }
    }

    #[test]
    fn no_tenant_returns_collection_unchanged() {
        let brands = vec![brand(1, Some(1)), brand(2, None), brand(3, Some(2))];
        assert_eq!(scope(&brands, None), brands);
    }

    #[test]
    fn scoped_brands_all_belong_to_tenant_in_original_order() {
        let brands = vec![
            brand(5, Some(1)),
            brand(1, Some(2)),
            brand(3, Some(1)),
            brand(4, None),
            brand(2, Some(1)),
        ];
        for tenant in [1, 2, 3] {
            let scoped = scope(&brands, Some(TenantId(tenant)));
            assert!(scoped.iter().all(|b| b.tenant_id == Some(TenantId(tenant))));
        }
        let ids: Vec<i64> = scope(&brands, Some(TenantId(1)))
            .iter()
            .map(|b| b.id.get())
            .collect();
        assert_eq!(ids, vec![5, 3, 2]);
    }

    #[test]
    fn unowned_brand_never_matches_explicit_tenant() {
        let brands = vec![brand(1, None)];
        assert!(scope(&brands, Some(TenantId(1))).is_empty());
    }

    #[test]
    fn system_presets_are_visible_to_every_tenant() {
        let presets = vec![preset(1, None), preset(2, Some(1)), preset(3, Some(2))];
        let ids: Vec<i64> = scope(&presets, Some(TenantId(2)))
            .iter()
            .map(|p| p.id.get())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
