//! SIMS registry service library crate.
//!
//! # Purpose
//! Stores accounts, supervisor assignments, and owned training records, and
//! answers access questions about them through [`sims_authz`].
//!
//! # Notes
//! [`app::Registry`] is the only entry point that wires the pieces together;
//! the binary and the integration tests both start from it.
pub mod access;
pub mod activity;
pub mod app;
pub mod assignment;
pub mod audit;
pub mod config;
pub mod directory;
pub mod error;
pub mod observability;
pub mod seed;
pub mod store;
pub mod workflow;

pub use error::{RegistryError, RegistryResult};
