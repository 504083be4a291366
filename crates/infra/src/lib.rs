//! # Chica Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest-backed HTTP transport
//! - Configuration loading (environment and TOML/JSON files)
//! - Tracing subscriber setup
//! - `ClientContext`, which wires everything together
//!
//! ## Architecture
//! - Implements traits defined in `chica-core`
//! - Depends on `chica-common`, `chica-domain` and `chica-core`
//! - Contains all "impure" code (network, keychain, environment)

pub mod config;
pub mod context;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use context::ClientContext;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::{init_tracing, LogConfig};
