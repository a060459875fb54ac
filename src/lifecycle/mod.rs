//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load wallet → Build sender (fetch network config) → Load TLS → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Cancel in-flight batches → Stop accepting → Drain → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::spawn_signal_handler;
pub use startup::{build_relay, Relay, StartupError};
