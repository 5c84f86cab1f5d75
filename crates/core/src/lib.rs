//! Domain logic shared across the lexcase workspace.
//!
//! This crate has no database or network dependencies so it can be used by
//! the persistence layer, the services, and any future CLI tooling alike.

pub mod audit;
pub mod error;
pub mod numbering;
pub mod roles;
pub mod status;
pub mod types;
