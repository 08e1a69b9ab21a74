//! ContentCraft Session — tenant/brand selection consistency, brand
//! management and the content studio.
//!
//! The selection rules live in the pure [`SelectionState`] machine;
//! [`SessionHandle`] runs it as an actor and executes its fetches against
//! the repositories.

pub mod actor;
pub mod brands;
pub mod config;
pub mod content;
pub mod error;
pub mod state;

pub use actor::SessionHandle;
pub use brands::BrandManager;
pub use config::SessionConfig;
pub use content::{
    AssemblyInput, ContentAssembler, ContentStudio, GenerateRequest, LibraryOverview,
    PlaceholderAssembler,
};
pub use error::SessionError;
pub use state::{Action, Effect, Fault, Phase, RequestId, SelectionState, ViewError};
