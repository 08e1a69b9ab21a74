//! Actor that runs the selection state machine.
//!
//! ```text
//!   SessionHandle (Clone)     mpsc       SessionActor (tokio task)
//!   ┌──────────────────┐  ─────────▶  ┌────────────────────────────┐
//!   │ .switch_tenant() │              │ SelectionState::apply      │
//!   │ .on_brands_save()│  ◀─────────  │ spawns repository fetches  │
//!   └──────────────────┘   oneshot    └────────────────────────────┘
//!            ▲                                    │
//!            └────────── watch (SelectionState) ◀─┘
//! ```
//!
//! The actor is the only writer of the selection state. Fetches run in
//! their own tasks and report back through the same command channel, so
//! their results are applied in arrival order like any other action.

use std::sync::Arc;

use contentcraft_core::models::brand::Brand;
use contentcraft_core::models::tenant::Tenant;
use contentcraft_core::models::{BrandId, TenantId};
use contentcraft_core::repository::{BrandRepository, TenantRepository};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};

use crate::error::SessionError;
use crate::state::{Action, Effect, SelectionState};

enum Command {
    Dispatch {
        action: Action,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    /// A fetch finished.
    Completed(Action),
}

/// Clonable handle to a running session.
///
/// Each mutating method sends one action and waits until the actor has
/// applied it and published the resulting state.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<SelectionState>,
}

impl SessionHandle {
    /// Spawns the session actor on the current tokio runtime. The session
    /// stays `Uninitialized` until [`SessionHandle::start`] is called.
    pub fn spawn<T, B>(tenants: T, brands: B) -> Self
    where
        T: TenantRepository + 'static,
        B: BrandRepository + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let (publisher, state) = watch::channel(SelectionState::new());
        let actor = SessionActor {
            state: SelectionState::new(),
            publisher,
            commands: tx.downgrade(),
            tenants: Arc::new(tenants),
            brands: Arc::new(brands),
        };
        tokio::spawn(actor.run(rx));
        Self { tx, state }
    }

    async fn dispatch(&self, action: Action) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Dispatch { action, reply })
            .map_err(|_| SessionError::Shutdown)?;
        rx.await.map_err(|_| SessionError::Shutdown)?
    }

    /// Begins loading the tenant list.
    pub async fn start(&self) -> Result<(), SessionError> {
        self.dispatch(Action::Start).await
    }

    pub async fn switch_tenant(&self, tenant_id: TenantId) -> Result<(), SessionError> {
        self.dispatch(Action::SwitchTenant(tenant_id)).await
    }

    /// Hands over the complete brand collection after a brand mutation.
    pub async fn on_brands_save(&self, brands: Vec<Brand>) -> Result<(), SessionError> {
        self.dispatch(Action::BrandsSaved(brands)).await
    }

    pub async fn select_brand(&self, brand_id: BrandId) -> Result<(), SessionError> {
        self.dispatch(Action::SelectBrand(brand_id)).await
    }

    pub async fn tenant_created(&self, tenant: Tenant) -> Result<(), SessionError> {
        self.dispatch(Action::TenantCreated(tenant)).await
    }

    pub async fn tenant_updated(&self, tenant: Tenant) -> Result<(), SessionError> {
        self.dispatch(Action::TenantUpdated(tenant)).await
    }

    pub async fn tenant_deleted(&self, tenant_id: TenantId) -> Result<(), SessionError> {
        self.dispatch(Action::TenantDeleted(tenant_id)).await
    }

    pub async fn retry(&self) -> Result<(), SessionError> {
        self.dispatch(Action::Retry).await
    }

    pub fn current_tenant(&self) -> Option<Tenant> {
        self.state.borrow().current_tenant().cloned()
    }

    pub fn current_brand(&self) -> Option<Brand> {
        self.state.borrow().current_brand().cloned()
    }

    /// The most recently published state.
    pub fn snapshot(&self) -> SelectionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SelectionState> {
        self.state.clone()
    }

    /// Waits until no fetch is outstanding and the session is `Ready` or
    /// `Error`, then returns that state.
    pub async fn wait_until_settled(&self) -> Result<SelectionState, SessionError> {
        let mut rx = self.state.clone();
        let settled = rx
            .wait_for(SelectionState::is_settled)
            .await
            .map_err(|_| SessionError::Shutdown)?;
        Ok(settled.clone())
    }
}

struct SessionActor<T, B> {
    state: SelectionState,
    publisher: watch::Sender<SelectionState>,
    /// Weak so that dropping every handle shuts the actor down.
    commands: mpsc::WeakUnboundedSender<Command>,
    tenants: Arc<T>,
    brands: Arc<B>,
}

impl<T, B> SessionActor<T, B>
where
    T: TenantRepository + 'static,
    B: BrandRepository + 'static,
{
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>) {
        while let Some(cmd) = rx.recv().await {
            match cmd {
                Command::Dispatch { action, reply } => {
                    let result = self.apply(action);
                    let _ = reply.send(result);
                }
                Command::Completed(action) => {
                    if let Err(err) = self.apply(action) {
                        warn!(error = %err, "Fetch result rejected");
                    }
                }
            }
        }
        debug!("Session actor shutting down: channel closed");
    }

    fn apply(&mut self, action: Action) -> Result<(), SessionError> {
        let effects = self.state.apply(action)?;
        self.publisher.send_replace(self.state.clone());
        for effect in effects {
            self.execute(effect);
        }
        Ok(())
    }

    fn execute(&self, effect: Effect) {
        let Some(tx) = self.commands.upgrade() else {
            return;
        };
        match effect {
            Effect::FetchTenants { request } => {
                let repo = Arc::clone(&self.tenants);
                tokio::spawn(async move {
                    let result = repo.get_all().await;
                    let _ = tx.send(Command::Completed(Action::TenantsLoaded { request, result }));
                });
            }
            Effect::FetchBrands { request, tenant_id } => {
                let repo = Arc::clone(&self.brands);
                tokio::spawn(async move {
                    let result = repo.get_all(Some(tenant_id)).await;
                    let _ = tx.send(Command::Completed(Action::BrandsLoaded { request, result }));
                });
            }
        }
    }
}
