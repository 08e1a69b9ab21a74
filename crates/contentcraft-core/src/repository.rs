//! Entity store trait definitions.
//!
//! All repository operations are async. Collection reads take an optional
//! `tenant_id`; `None` means "every record", `Some` narrows the result the
//! same way [`crate::scope::scope`] does. Collections come back in creation
//! order.

use crate::error::CraftResult;
use crate::models::brand::{Brand, CreateBrand, UpdateBrand};
use crate::models::content::{Content, CreateContent};
use crate::models::preset::{CreatePreset, Preset, PresetCategory, UpdatePreset};
use crate::models::tenant::{CreateTenant, Tenant, UpdateTenant};
use crate::models::{BrandId, ContentId, PresetId, TenantId};

// ---------------------------------------------------------------------------
// Tenants (global scope)
// ---------------------------------------------------------------------------

pub trait TenantRepository: Send + Sync {
    fn get_all(&self) -> impl Future<Output = CraftResult<Vec<Tenant>>> + Send;
    fn get_by_id(&self, id: TenantId) -> impl Future<Output = CraftResult<Tenant>> + Send;
    fn get_by_domain(
        &self,
        domain: &str,
    ) -> impl Future<Output = CraftResult<Option<Tenant>>> + Send;
    /// The first tenant ever created becomes the default regardless of input.
    fn create(&self, input: CreateTenant) -> impl Future<Output = CraftResult<Tenant>> + Send;
    fn update(
        &self,
        id: TenantId,
        input: UpdateTenant,
    ) -> impl Future<Output = CraftResult<Tenant>> + Send;
    /// Rejected with `PermissionDenied` for the default tenant while other
    /// tenants remain.
    fn delete(&self, id: TenantId) -> impl Future<Output = CraftResult<()>> + Send;
    fn get_default(&self) -> impl Future<Output = CraftResult<Option<Tenant>>> + Send;
}

// ---------------------------------------------------------------------------
// Tenant-scoped repositories
// ---------------------------------------------------------------------------

pub trait BrandRepository: Send + Sync {
    fn get_all(
        &self,
        tenant_id: Option<TenantId>,
    ) -> impl Future<Output = CraftResult<Vec<Brand>>> + Send;
    fn get_by_id(&self, id: BrandId) -> impl Future<Output = CraftResult<Brand>> + Send;
    fn create(&self, input: CreateBrand) -> impl Future<Output = CraftResult<Brand>> + Send;
    fn update(
        &self,
        id: BrandId,
        input: UpdateBrand,
    ) -> impl Future<Output = CraftResult<Brand>> + Send;
    /// Rejected with `PermissionDenied` for a default brand.
    fn delete(&self, id: BrandId) -> impl Future<Output = CraftResult<()>> + Send;
    fn get_default(
        &self,
        tenant_id: Option<TenantId>,
    ) -> impl Future<Output = CraftResult<Option<Brand>>> + Send;
}

pub trait PresetRepository: Send + Sync {
    /// With a tenant, returns the system presets plus that tenant's custom ones.
    fn get_all(
        &self,
        tenant_id: Option<TenantId>,
    ) -> impl Future<Output = CraftResult<Vec<Preset>>> + Send;
    fn get_by_id(&self, id: PresetId) -> impl Future<Output = CraftResult<Preset>> + Send;
    fn get_by_category(
        &self,
        category: PresetCategory,
        tenant_id: Option<TenantId>,
    ) -> impl Future<Output = CraftResult<Vec<Preset>>> + Send;
    fn create(&self, input: CreatePreset) -> impl Future<Output = CraftResult<Preset>> + Send;
    /// Rejected with `PermissionDenied` for system presets.
    fn update(
        &self,
        id: PresetId,
        input: UpdatePreset,
    ) -> impl Future<Output = CraftResult<Preset>> + Send;
    /// Rejected with `PermissionDenied` for system presets.
    fn delete(&self, id: PresetId) -> impl Future<Output = CraftResult<()>> + Send;
    fn get_default(
        &self,
        tenant_id: Option<TenantId>,
    ) -> impl Future<Output = CraftResult<Option<Preset>>> + Send;
}

/// Content is append-only apart from deletion; there is no update.
pub trait ContentRepository: Send + Sync {
    fn get_all(
        &self,
        tenant_id: Option<TenantId>,
    ) -> impl Future<Output = CraftResult<Vec<Content>>> + Send;
    fn get_by_id(&self, id: ContentId) -> impl Future<Output = CraftResult<Content>> + Send;
    fn create(&self, input: CreateContent) -> impl Future<Output = CraftResult<Content>> + Send;
    fn delete(&self, id: ContentId) -> impl Future<Output = CraftResult<()>> + Send;
    /// Content has no default flag, so this is the oldest record in scope.
    fn get_default(
        &self,
        tenant_id: Option<TenantId>,
    ) -> impl Future<Output = CraftResult<Option<Content>>> + Send;
}
