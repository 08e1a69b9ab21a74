//! SurrealDB implementation of [`TenantRepository`].

use chrono::{DateTime, Utc};
use contentcraft_core::error::{CraftError, CraftResult};
use contentcraft_core::models::TenantId;
use contentcraft_core::models::tenant::{
    CreateTenant, DEFAULT_PRIMARY_COLOR, Subscription, Tenant, UpdateTenant, default_domain,
};
use contentcraft_core::repository::TenantRepository;
use contentcraft_core::selection::resolve_default;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use super::sequence;
use crate::error::DbError;

const SELECT_TENANT: &str = "SELECT meta::id(id) AS record_id, * FROM tenant";

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TenantRow {
    record_id: i64,
    name: String,
    domain: String,
    logo: String,
    primary_color: String,
    is_default: bool,
    settings: serde_json::Value,
    subscription: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRow {
    fn try_into_tenant(self) -> Result<Tenant, DbError> {
        let decode = |e: serde_json::Error| DbError::Decode {
            entity: "tenant",
            message: format!("tenant {}: {e}", self.record_id),
        };
        Ok(Tenant {
            id: TenantId(self.record_id),
            settings: serde_json::from_value(self.settings).map_err(decode)?,
            subscription: serde_json::from_value(self.subscription).map_err(decode)?,
            name: self.name,
            domain: self.domain,
            logo: self.logo,
            primary_color: self.primary_color,
            is_default: self.is_default,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Tenant repository.
#[derive(Clone)]
pub struct SurrealTenantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn select(
        &self,
        query: &str,
        bind: Option<(&'static str, String)>,
    ) -> CraftResult<Vec<Tenant>> {
        let mut builder = self.db.query(query);
        if let Some(pair) = bind {
            builder = builder.bind(pair);
        }
        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .map(|row| row.try_into_tenant().map_err(CraftError::from))
            .collect()
    }

    /// Writes every field of `tenant` under its id. `statement` is `CREATE`
    /// for new records and `UPDATE` for existing ones.
    async fn write(&self, statement: &str, tenant: &Tenant) -> Result<(), DbError> {
        let query = format!(
            "{statement} type::record('tenant', $id) SET \
             name = $name, domain = $domain, logo = $logo, \
             primary_color = $primary_color, is_default = $is_default, \
             settings = $settings, subscription = $subscription, \
             created_at = $created_at, updated_at = $updated_at"
        );

        self.db
            .query(query)
            .bind(("id", tenant.id.get()))
            .bind(("name", tenant.name.clone()))
            .bind(("domain", tenant.domain.clone()))
            .bind(("logo", tenant.logo.clone()))
            .bind(("primary_color", tenant.primary_color.clone()))
            .bind(("is_default", tenant.is_default))
            .bind(("settings", serde_json::to_value(&tenant.settings)?))
            .bind(("subscription", serde_json::to_value(&tenant.subscription)?))
            .bind(("created_at", tenant.created_at))
            .bind(("updated_at", tenant.updated_at))
            .await?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;
        Ok(())
    }

    /// Inserts a fully formed tenant, keeping its id.
    pub(crate) async fn insert(&self, tenant: &Tenant) -> Result<(), DbError> {
        self.write("CREATE", tenant).await?;
        sequence::advance_to(&self.db, "tenant", tenant.id.get()).await
    }

    async fn clear_defaults(&self) -> Result<(), DbError> {
        self.db
            .query("UPDATE tenant SET is_default = false WHERE is_default = true")
            .await?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;
        Ok(())
    }

    fn ensure_unique_domain(
        existing: &[Tenant],
        domain: &str,
        own: Option<TenantId>,
    ) -> CraftResult<()> {
        let taken = existing
            .iter()
            .any(|t| Some(t.id) != own && t.domain.eq_ignore_ascii_case(domain));
        if taken {
            return Err(CraftError::validation(format!(
                "domain {domain} is already in use"
            )));
        }
        Ok(())
    }
}

impl<C: Connection> TenantRepository for SurrealTenantRepository<C> {
    async fn get_all(&self) -> CraftResult<Vec<Tenant>> {
        self.select(&format!("{SELECT_TENANT} ORDER BY id ASC"), None)
            .await
    }

    async fn get_by_id(&self, id: TenantId) -> CraftResult<Tenant> {
        let mut result = self
            .db
            .query(format!("{SELECT_TENANT} WHERE id = type::record('tenant', $id)"))
            .bind(("id", id.get()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id.to_string(),
        })?;

        Ok(row.try_into_tenant()?)
    }

    async fn get_by_domain(&self, domain: &str) -> CraftResult<Option<Tenant>> {
        let found = self
            .select(
                &format!("{SELECT_TENANT} WHERE domain = $domain"),
                Some(("domain", domain.to_string())),
            )
            .await?;
        Ok(found.into_iter().next())
    }

    async fn create(&self, input: CreateTenant) -> CraftResult<Tenant> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(CraftError::validation("tenant name is required"));
        }

        let existing = self.get_all().await?;
        let domain = input
            .domain
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| default_domain(&name));
        Self::ensure_unique_domain(&existing, &domain, None)?;

        // The first tenant is always the default one.
        let is_default = existing.is_empty() || input.is_default;
        if is_default && !existing.is_empty() {
            self.clear_defaults().await?;
        }

        let now = Utc::now();
        let tenant = Tenant {
            id: TenantId(sequence::next_id(&self.db, "tenant").await?),
            name,
            domain,
            logo: input.logo.unwrap_or_default(),
            primary_color: input
                .primary_color
                .unwrap_or_else(|| DEFAULT_PRIMARY_COLOR.to_string()),
            is_default,
            settings: input.settings.unwrap_or_default(),
            subscription: input
                .subscription
                .unwrap_or_else(|| Subscription::starter(now)),
            created_at: now,
            updated_at: now,
        };
        self.write("CREATE", &tenant).await?;

        info!(tenant_id = %tenant.id, is_default, "Tenant created");
        Ok(tenant)
    }

    async fn update(&self, id: TenantId, input: UpdateTenant) -> CraftResult<Tenant> {
        let mut tenant = self.get_by_id(id).await?;

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(CraftError::validation("tenant name is required"));
            }
            tenant.name = name;
        }
        if let Some(domain) = input.domain {
            let existing = self.get_all().await?;
            Self::ensure_unique_domain(&existing, domain.trim(), Some(id))?;
            tenant.domain = domain.trim().to_string();
        }
        if let Some(logo) = input.logo {
            tenant.logo = logo;
        }
        if let Some(color) = input.primary_color {
            tenant.primary_color = color;
        }
        if let Some(settings) = input.settings {
            tenant.settings = settings;
        }
        if let Some(subscription) = input.subscription {
            tenant.subscription = subscription;
        }
        if let Some(is_default) = input.is_default {
            if is_default && !tenant.is_default {
                self.clear_defaults().await?;
            }
            tenant.is_default = is_default;
        }
        tenant.updated_at = Utc::now();

        self.write("UPDATE", &tenant).await?;
        Ok(tenant)
    }

    async fn delete(&self, id: TenantId) -> CraftResult<()> {
        let tenant = self.get_by_id(id).await?;

        if tenant.is_default && self.get_all().await?.len() > 1 {
            return Err(CraftError::permission_denied(
                "the default tenant cannot be deleted while other tenants exist",
            ));
        }

        self.db
            .query("DELETE type::record('tenant', $id)")
            .bind(("id", id.get()))
            .await
            .map_err(DbError::from)?;

        info!(tenant_id = %id, "Tenant deleted");
        Ok(())
    }

    async fn get_default(&self) -> CraftResult<Option<Tenant>> {
        let tenants = self.get_all().await?;
        Ok(resolve_default(&tenants).cloned())
    }
}
