//! Observability infrastructure
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! embedding application's call, done once at startup through
//! [`logging::init_tracing`].

pub mod logging;

pub use logging::{init_tracing, LogConfig};
