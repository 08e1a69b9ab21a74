//! Tenant and brand selection state machine.
//!
//! [`SelectionState`] owns the tenant list, the brand collection of the
//! selected tenant and both selections. It changes only through
//! [`SelectionState::apply`], which takes an [`Action`] and returns the
//! [`Effect`]s (fetches) the caller must run. Fetch results come back as
//! actions tagged with the [`RequestId`] they were issued under; anything
//! that is not the currently awaited request is dropped.
//!
//! ```text
//!   Uninitialized ──Start──▶ Loading ──TenantsLoaded──▶ Loading ──BrandsLoaded──▶ Ready
//!                               │  (no tenants / failure)                          │
//!                               ▼                                      SwitchTenant │
//!                             Error ◀──────────── TenantDeleted (last one) ──────── ┘
//! ```
//!
//! The selected brand is re-derived in the same step that replaces the
//! brand collection, so no observable state has a selected brand that is
//! missing from `brands`.

use std::fmt;

use contentcraft_core::error::CraftError;
use contentcraft_core::models::brand::Brand;
use contentcraft_core::models::tenant::Tenant;
use contentcraft_core::models::{BrandId, TenantId};
use contentcraft_core::scope::scope;
use contentcraft_core::selection::{find_by_id, reconcile, resolve_default};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::SessionError;

/// Tag attached to every fetch issued by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why the whole session stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Fault {
    /// The tenant list is empty. Needs an administrator.
    NoTenant,
    /// The tenant list could not be loaded.
    Backend(String),
}

impl Fault {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Fault::Backend(_))
    }

    pub fn to_error(&self) -> CraftError {
        match self {
            Fault::NoTenant => CraftError::NoTenantAvailable,
            Fault::Backend(message) => CraftError::Backend(message.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Uninitialized,
    Loading,
    Ready,
    Error { fault: Fault },
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Loading => "loading",
            Phase::Ready => "ready",
            Phase::Error { .. } => "in error",
        }
    }
}

/// A brand load that failed while the rest of the session stayed usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewError {
    /// Tenant whose brands could not be loaded.
    pub tenant_id: TenantId,
    pub message: String,
    pub retryable: bool,
}

#[derive(Debug, Clone)]
pub enum Action {
    Start,
    TenantsLoaded {
        request: RequestId,
        result: Result<Vec<Tenant>, CraftError>,
    },
    SwitchTenant(TenantId),
    BrandsLoaded {
        request: RequestId,
        result: Result<Vec<Brand>, CraftError>,
    },
    /// The complete, updated brand collection after a brand create, edit
    /// or delete.
    BrandsSaved(Vec<Brand>),
    SelectBrand(BrandId),
    TenantCreated(Tenant),
    TenantUpdated(Tenant),
    TenantDeleted(TenantId),
    Retry,
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::TenantsLoaded { .. } => "tenants loaded",
            Action::SwitchTenant(_) => "switch tenant",
            Action::BrandsLoaded { .. } => "brands loaded",
            Action::BrandsSaved(_) => "brands saved",
            Action::SelectBrand(_) => "select brand",
            Action::TenantCreated(_) => "tenant created",
            Action::TenantUpdated(_) => "tenant updated",
            Action::TenantDeleted(_) => "tenant deleted",
            Action::Retry => "retry",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    FetchTenants {
        request: RequestId,
    },
    FetchBrands {
        request: RequestId,
        tenant_id: TenantId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Tenants(RequestId),
    Brands {
        request: RequestId,
        tenant_id: TenantId,
    },
}

/// The tenant, brands and brand selection of the last `Ready` state,
/// restored when a brand load after a switch fails.
#[derive(Debug, Clone, PartialEq)]
struct LastGood {
    tenant: TenantId,
    brands: Vec<Brand>,
    brand: Option<BrandId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    phase: Phase,
    tenants: Vec<Tenant>,
    brands: Vec<Brand>,
    selected_tenant: Option<TenantId>,
    selected_brand: Option<BrandId>,
    pending: Option<Pending>,
    next_request: u64,
    last_good: Option<LastGood>,
    view_error: Option<ViewError>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Uninitialized,
            tenants: Vec::new(),
            brands: Vec::new(),
            selected_tenant: None,
            selected_brand: None,
            pending: None,
            next_request: 1,
            last_good: None,
            view_error: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn tenants(&self) -> &[Tenant] {
        &self.tenants
    }

    /// Brands of the selected tenant.
    pub fn brands(&self) -> &[Brand] {
        &self.brands
    }

    pub fn current_tenant(&self) -> Option<&Tenant> {
        self.selected_tenant
            .and_then(|id| find_by_id(&self.tenants, id))
    }

    pub fn current_brand(&self) -> Option<&Brand> {
        self.selected_brand
            .and_then(|id| find_by_id(&self.brands, id))
    }

    pub fn view_error(&self) -> Option<&ViewError> {
        self.view_error.as_ref()
    }

    /// True once no fetch is outstanding and the phase is `Ready` or `Error`.
    pub fn is_settled(&self) -> bool {
        self.pending.is_none() && matches!(self.phase, Phase::Ready | Phase::Error { .. })
    }

    /// Applies `action`. On `Err` the state is unchanged.
    pub fn apply(&mut self, action: Action) -> Result<Vec<Effect>, SessionError> {
        let name = action.name();
        match action {
            Action::Start => match self.phase {
                Phase::Uninitialized => Ok(vec![self.begin_tenant_fetch()]),
                _ => Err(self.invalid(name)),
            },
            Action::TenantsLoaded { request, result } => {
                if self.pending != Some(Pending::Tenants(request)) {
                    debug!(%request, "Discarding stale tenant list");
                    return Ok(Vec::new());
                }
                self.pending = None;
                Ok(self.on_tenants_loaded(result))
            }
            Action::SwitchTenant(tenant_id) => self.switch_tenant(tenant_id, name),
            Action::BrandsLoaded { request, result } => {
                let tenant_id = match self.pending {
                    Some(Pending::Brands {
                        request: awaited,
                        tenant_id,
                    }) if awaited == request => tenant_id,
                    _ => {
                        debug!(%request, "Discarding stale brand list");
                        return Ok(Vec::new());
                    }
                };
                self.pending = None;
                self.on_brands_loaded(tenant_id, result);
                Ok(Vec::new())
            }
            Action::BrandsSaved(all) => {
                if self.phase != Phase::Ready {
                    return Err(self.invalid(name));
                }
                let scoped = scope(&all, self.selected_tenant);
                self.selected_brand = reconcile(self.selected_brand, &scoped).map(|b| b.id);
                self.brands = scoped;
                Ok(Vec::new())
            }
            Action::SelectBrand(brand_id) => {
                if self.phase != Phase::Ready {
                    return Err(self.invalid(name));
                }
                if find_by_id(&self.brands, brand_id).is_none() {
                    return Err(SessionError::UnknownBrand(brand_id));
                }
                self.selected_brand = Some(brand_id);
                Ok(Vec::new())
            }
            Action::TenantCreated(tenant) => {
                self.require_tenants(name)?;
                if tenant.is_default {
                    self.clear_tenant_defaults();
                }
                self.tenants.push(tenant);
                Ok(Vec::new())
            }
            Action::TenantUpdated(tenant) => {
                self.require_tenants(name)?;
                let Some(index) = self.tenants.iter().position(|t| t.id == tenant.id) else {
                    return Err(SessionError::UnknownTenant(tenant.id));
                };
                if tenant.is_default {
                    self.clear_tenant_defaults();
                }
                self.tenants[index] = tenant;
                Ok(Vec::new())
            }
            Action::TenantDeleted(tenant_id) => {
                self.require_tenants(name)?;
                self.tenants.retain(|t| t.id != tenant_id);
                if self
                    .last_good
                    .as_ref()
                    .is_some_and(|good| good.tenant == tenant_id)
                {
                    self.last_good = None;
                }
                if self
                    .view_error
                    .as_ref()
                    .is_some_and(|error| error.tenant_id == tenant_id)
                {
                    self.view_error = None;
                }
                if self.selected_tenant != Some(tenant_id) {
                    return Ok(Vec::new());
                }
                match resolve_default(&self.tenants).map(|t| t.id) {
                    Some(next) => Ok(vec![self.begin_brand_fetch(next)]),
                    None => {
                        self.enter_error(Fault::NoTenant);
                        Ok(Vec::new())
                    }
                }
            }
            Action::Retry => self.retry(),
        }
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            phase: self.phase.name(),
        }
    }

    /// Tenant list mutations need a loaded tenant list.
    fn require_tenants(&self, action: &'static str) -> Result<(), SessionError> {
        let loaded = match self.phase {
            Phase::Ready => true,
            Phase::Loading => matches!(self.pending, Some(Pending::Brands { .. })),
            _ => false,
        };
        if loaded { Ok(()) } else { Err(self.invalid(action)) }
    }

    fn clear_tenant_defaults(&mut self) {
        for tenant in &mut self.tenants {
            tenant.is_default = false;
        }
    }

    fn issue(&mut self) -> RequestId {
        let request = RequestId(self.next_request);
        self.next_request += 1;
        request
    }

    fn begin_tenant_fetch(&mut self) -> Effect {
        let request = self.issue();
        self.phase = Phase::Loading;
        self.pending = Some(Pending::Tenants(request));
        Effect::FetchTenants { request }
    }

    /// Selects `tenant_id`, clears the brand collection and selection, and
    /// issues the brand fetch for it.
    fn begin_brand_fetch(&mut self, tenant_id: TenantId) -> Effect {
        let request = self.issue();
        self.selected_tenant = Some(tenant_id);
        self.brands.clear();
        self.selected_brand = None;
        self.view_error = None;
        self.phase = Phase::Loading;
        self.pending = Some(Pending::Brands { request, tenant_id });
        Effect::FetchBrands { request, tenant_id }
    }

    fn enter_error(&mut self, fault: Fault) {
        warn!(?fault, "Session entered error state");
        self.phase = Phase::Error { fault };
        self.pending = None;
        self.tenants.clear();
        self.brands.clear();
        self.selected_tenant = None;
        self.selected_brand = None;
        self.last_good = None;
        self.view_error = None;
    }

    fn on_tenants_loaded(&mut self, result: Result<Vec<Tenant>, CraftError>) -> Vec<Effect> {
        match result {
            Err(err) => {
                self.enter_error(Fault::Backend(err.to_string()));
                Vec::new()
            }
            Ok(tenants) => {
                let Some(default) = resolve_default(&tenants).map(|t| t.id) else {
                    self.enter_error(Fault::NoTenant);
                    return Vec::new();
                };
                self.tenants = tenants;
                vec![self.begin_brand_fetch(default)]
            }
        }
    }

    fn on_brands_loaded(&mut self, tenant_id: TenantId, result: Result<Vec<Brand>, CraftError>) {
        match result {
            Ok(brands) => {
                self.brands = scope(&brands, Some(tenant_id));
                self.selected_brand = resolve_default(&self.brands).map(|b| b.id);
                self.last_good = None;
            }
            Err(err) => {
                warn!(tenant_id = %tenant_id, error = %err, "Brand load failed");
                // Back to what was on screen before the switch, if anything.
                if let Some(good) = self.last_good.take()
                    && find_by_id(&self.tenants, good.tenant).is_some()
                {
                    self.selected_tenant = Some(good.tenant);
                    self.brands = good.brands;
                    self.selected_brand = good.brand;
                }
                self.view_error = Some(ViewError {
                    tenant_id,
                    message: err.to_string(),
                    retryable: err.is_retryable(),
                });
            }
        }
        self.phase = Phase::Ready;
    }

    fn switch_tenant(
        &mut self,
        tenant_id: TenantId,
        name: &'static str,
    ) -> Result<Vec<Effect>, SessionError> {
        self.require_tenants(name)?;
        if find_by_id(&self.tenants, tenant_id).is_none() {
            return Err(SessionError::UnknownTenant(tenant_id));
        }
        if self.phase == Phase::Ready && self.selected_tenant == Some(tenant_id) {
            return Ok(Vec::new());
        }

        // A switch during a pending brand load keeps the older snapshot.
        if self.phase == Phase::Ready
            && let Some(tenant) = self.selected_tenant
        {
            self.last_good = Some(LastGood {
                tenant,
                brands: self.brands.clone(),
                brand: self.selected_brand,
            });
        }
        Ok(vec![self.begin_brand_fetch(tenant_id)])
    }

    fn retry(&mut self) -> Result<Vec<Effect>, SessionError> {
        match self.phase.clone() {
            Phase::Error { fault } if fault.is_retryable() => Ok(vec![self.begin_tenant_fetch()]),
            Phase::Error { .. } => Err(SessionError::NoTenant),
            Phase::Ready => match self.view_error.clone() {
                // The failed load was the initial one; nothing to fall back to.
                Some(error)
                    if error.retryable && self.selected_tenant == Some(error.tenant_id) =>
                {
                    Ok(vec![self.begin_brand_fetch(error.tenant_id)])
                }
                Some(error) if error.retryable => self.switch_tenant(error.tenant_id, "retry"),
                _ => Err(SessionError::NothingToRetry),
            },
            _ => Err(SessionError::NothingToRetry),
        }
    }
}
