//! Request dispatching
//!
//! - [`ports`]: the `Transport` seam the network adapter implements
//! - [`service`]: the `Dispatcher` that builds, authenticates and decodes
//! - [`endpoints`]: typed Mastodon endpoints
//! - [`errors`]: `FetchError`

pub mod endpoints;
pub mod errors;
pub mod ports;
pub mod service;

pub use endpoints::{
    Endpoint, GetAccount, ObtainToken, RegisterApplication, RevokeToken, VerifyCredentials,
};
pub use errors::{FetchError, Response};
pub use ports::{HttpRequest, HttpResponse, Transport, TransportError};
pub use service::{Dispatcher, DispatcherConfig};
