//! Resilience patterns.
//!
//! Listener restarts wait a fixed delay between attempts and retry forever;
//! gateway failover lives in `blockchain::client`.

pub mod backoff;

pub use backoff::FixedBackoff;
