//! Test doubles for the core ports
//!
//! Available to this crate's tests and, behind the `test-utils` feature, to
//! downstream crates.

pub mod mock_transport;

pub use mock_transport::{
    Fixture, MockTransport, MOCK_ACCESS_TOKEN, MOCK_CLIENT_ID, MOCK_CLIENT_SECRET,
};
