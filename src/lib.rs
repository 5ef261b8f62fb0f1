//! Land registry client library.
//!
//! Typed access to the registry backend (auth, estates, plots, transactions,
//! documents, admin), a persistent session store, and the plot checkout flow.

pub mod api;
pub mod checkout;
pub mod config;
pub mod lifecycle;
pub mod models;
pub mod observability;
pub mod resilience;
pub mod session;

pub use api::{ApiError, ApiResult, LenientClient, RegistryClient};
pub use config::ClientConfig;
pub use lifecycle::Shutdown;
pub use session::SessionStore;
