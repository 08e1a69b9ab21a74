//! Default selection and selection reconciliation.
//!
//! [`resolve_default`] picks the canonical entity of a collection: the first
//! one flagged as default, else the first one, else nothing.
//! [`reconcile`] keeps an existing selection alive across a collection
//! change when the selected id survives, and falls back to the default
//! otherwise, so a selection never points at a removed entity.

use crate::models::brand::Brand;
use crate::models::content::Content;
use crate::models::preset::Preset;
use crate::models::tenant::Tenant;
use crate::models::{BrandId, ContentId, PresetId, TenantId};

/// An entity that can be the current selection of its kind.
pub trait Selectable {
    type Id: Copy + Eq + std::fmt::Debug;

    fn id(&self) -> Self::Id;

    fn is_default(&self) -> bool;
}

impl Selectable for Tenant {
    type Id = TenantId;

    fn id(&self) -> TenantId {
        self.id
    }

    fn is_default(&self) -> bool {
        self.is_default
    }
}

impl Selectable for Brand {
    type Id = BrandId;

    fn id(&self) -> BrandId {
        self.id
    }

    fn is_default(&self) -> bool {
        self.is_default
    }
}

/// Suggested presets are preferred when nothing was chosen yet.
impl Selectable for Preset {
    type Id = PresetId;

    fn id(&self) -> PresetId {
        self.id
    }

    fn is_default(&self) -> bool {
        self.suggested
    }
}

impl Selectable for Content {
    type Id = ContentId;

    fn id(&self) -> ContentId {
        self.id
    }

    fn is_default(&self) -> bool {
        false
    }
}

pub fn resolve_default<E: Selectable>(items: &[E]) -> Option<&E> {
    items
        .iter()
        .find(|item| item.is_default())
        .or_else(|| items.first())
}

pub fn find_by_id<E: Selectable>(items: &[E], id: E::Id) -> Option<&E> {
    items.iter().find(|item| item.id() == id)
}

/// Re-derives a selection after `items` changed.
///
/// The previously selected entity stays selected (with its updated fields)
/// if it is still present; otherwise the default of `items` is returned.
pub fn reconcile<E: Selectable>(previous: Option<E::Id>, items: &[E]) -> Option<&E> {
    previous
        .and_then(|id| find_by_id(items, id))
        .or_else(|| resolve_default(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn brand(id: i64, is_default: bool) -> Brand {
        Brand {
            id: BrandId(id),
            tenant_id: Some(TenantId(1)),
            name: format!("Brand {id}"),
            color: "#3B82F6".into(),
            emoji: "🚀".into(),
            is_default,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_collection_has_no_default() {
        let brands: Vec<Brand> = Vec::new();
        assert!(resolve_default(&brands).is_none());
    }

    #[test]
    fn flagged_default_wins_over_collection_order() {
        // Every position of the flagged element, for a few sizes.
        for size in 1..6 {
            for flagged in 0..size {
                let brands: Vec<Brand> = (0..size)
                    .map(|i| brand(i as i64 + 10, i == flagged))
                    .collect();
                let picked = resolve_default(&brands).unwrap();
                assert_eq!(picked.id, BrandId(flagged as i64 + 10));
            }
        }
    }

    #[test]
    fn without_flag_first_element_is_default() {
        let brands = vec![brand(7, false), brand(3, false)];
        assert_eq!(resolve_default(&brands).unwrap().id, BrandId(7));
    }

    #[test]
    fn ties_resolve_to_first_flagged() {
        let brands = vec![brand(1, false), brand(2, true), brand(3, true)];
        assert_eq!(resolve_default(&brands).unwrap().id, BrandId(2));
    }

    #[test]
    fn reconcile_keeps_surviving_selection_with_new_fields() {
        let mut renamed = brand(2, false);
        renamed.name = "Renamed".into();
        let brands = vec![brand(1, true), renamed];
        let picked = reconcile(Some(BrandId(2)), &brands).unwrap();
        assert_eq!(picked.id, BrandId(2));
        assert_eq!(picked.name, "Renamed");
    }

    #[test]
    fn reconcile_falls_back_when_selection_removed() {
        // Selected default brand 1 is gone; no default remains.
        let remaining = vec![brand(2, false), brand(3, false)];
        let picked = reconcile(Some(BrandId(1)), &remaining).unwrap();
        assert_eq!(picked.id, BrandId(2));
        assert_ne!(picked.id, BrandId(1));
    }

    #[test]
    fn reconcile_without_previous_selection_resolves_default() {
        let brands = vec![brand(4, false), brand(5, true)];
        assert_eq!(reconcile(None, &brands).unwrap().id, BrandId(5));
    }
}
