//! Business services for the Juridix case-management backend.
//!
//! Each service owns one slice of the domain and is constructed with
//! explicit dependencies (database pool, configuration, optional mailer)
//! so callers and tests wire them the same way.

pub mod auth;
pub mod clients;
pub mod config;
pub mod dossiers;
pub mod error;
pub mod pagination;
pub mod users;

pub use auth::service::AuthService;
pub use clients::ClientService;
pub use config::ServiceConfig;
pub use dossiers::service::DossierService;
pub use error::{ServiceError, ServiceResult};
pub use users::UserService;
