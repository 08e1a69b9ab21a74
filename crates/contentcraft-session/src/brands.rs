//! Brand management for the selected tenant.
//!
//! Every mutation returns the complete brand collection of the affected
//! tenant, which is what [`crate::SessionHandle::on_brands_save`] expects.

use contentcraft_core::error::{CraftError, CraftResult};
use contentcraft_core::models::brand::{Brand, CreateBrand, UpdateBrand};
use contentcraft_core::models::{BrandId, TenantId};
use contentcraft_core::repository::{BrandRepository, TenantRepository};
use tracing::info;

/// Brand manager.
///
/// Generic over repository implementations so that it has no dependency
/// on the database crate.
pub struct BrandManager<T: TenantRepository, B: BrandRepository> {
    tenants: T,
    brands: B,
}

impl<T: TenantRepository, B: BrandRepository> BrandManager<T, B> {
    pub fn new(tenants: T, brands: B) -> Self {
        Self { tenants, brands }
    }

    pub async fn list(&self, tenant_id: TenantId) -> CraftResult<Vec<Brand>> {
        self.brands.get_all(Some(tenant_id)).await
    }

    /// Creates a brand, honoring the tenant's brand settings.
    pub async fn create(&self, input: CreateBrand) -> CraftResult<Vec<Brand>> {
        let tenant = self.tenants.get_by_id(input.tenant_id).await?;
        if !tenant.settings.allow_brand_creation {
            return Err(CraftError::permission_denied(format!(
                "brand creation is disabled for tenant {}",
                tenant.name
            )));
        }
        let existing = self.brands.get_all(Some(tenant.id)).await?;
        if existing.len() >= tenant.settings.max_brands as usize {
            return Err(CraftError::validation(format!(
                "tenant {} has reached its limit of {} brands",
                tenant.name, tenant.settings.max_brands
            )));
        }

        let brand = self.brands.create(input).await?;
        info!(brand_id = %brand.id, tenant_id = %tenant.id, "Brand added");
        self.list(tenant.id).await
    }

    pub async fn update(&self, id: BrandId, input: UpdateBrand) -> CraftResult<Vec<Brand>> {
        let brand = self.brands.update(id, input).await?;
        self.brands.get_all(brand.tenant_id).await
    }

    /// Deletes a brand. The default brand is refused by the store.
    pub async fn delete(&self, id: BrandId) -> CraftResult<Vec<Brand>> {
        let brand = self.brands.get_by_id(id).await?;
        self.brands.delete(id).await?;
        self.brands.get_all(brand.tenant_id).await
    }
}
