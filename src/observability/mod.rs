//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields, component spans)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → logging.rs (stdout, rotated file)
//!     → log_stream.rs (websocket subscribers on /log)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod log_stream;
pub mod logging;
pub mod metrics;

pub use log_stream::LogBroadcaster;
pub use logging::{init_logging, LoggingOptions};
