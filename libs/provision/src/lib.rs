//! # cke-provision
//!
//! Thin typed client for the Containership provisioning API.
//!
//! Only the calls the lifecycle suite needs are modelled:
//!
//! - templates: create
//! - CKE clusters: create, get
//! - node pools: list, get, scale
//!
//! Request bodies are read from JSON files that carry many more fields than
//! the suite cares about. Request types therefore keep every unknown field and
//! send it back upstream untouched.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::{CkeClusters, NodePools, ProvisionClient, Templates};
pub use config::Endpoints;
pub use error::ProvisionError;
pub use types::*;
