//! Network layer subsystem.
//!
//! TLS for the relay listener: server certificate plus optional client
//! certificate verification.

pub mod tls;

pub use tls::{load_tls_config, TlsError};
