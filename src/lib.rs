//! Bridge transaction relay library.

pub mod blockchain;
pub mod bridge;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod relay;
pub mod resilience;

pub use config::schema::RelayConfig;
pub use http::RelayServer;
pub use lifecycle::Shutdown;
pub use relay::{RelayEndpoint, TxSender};
