//! # Chica Domain
//!
//! Data types shared by every Chica crate.
//!
//! This crate contains:
//! - Credential keys and the credential record
//! - Session states, authorization events and session error reasons
//! - Mastodon wire models (applications, tokens, accounts, error bodies)
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other Chica crates
//! - No I/O of any kind

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
