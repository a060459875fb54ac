//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware, serve loop)
//!     → handlers.rs (decode batch, spawn relay, health, log stream)
//!     → relay::RelayEndpoint
//!     → response.rs (error → status mapping)
//!     → Send to client
//! ```

pub mod handlers;
pub mod response;
pub mod server;

pub use handlers::HealthStatus;
pub use response::ErrorBody;
pub use server::{AppState, RelayInfo, RelayServer};
