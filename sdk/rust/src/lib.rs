//! Client for the bridge relay.
//!
//! ```no_run
//! use bridge_relay_client::{create_client, BridgeOperationBatch, ClientConfig, ClientHandler};
//!
//! # async fn run() -> Result<(), bridge_relay_client::ClientError> {
//! let client = create_client(&ClientConfig::default()).await?;
//! let response = client.send(&BridgeOperationBatch::default()).await?;
//! println!("{:?}", response.tx_hashes);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod types;

pub use client::{create_client, ClientHandler, DisabledClient, HealthProbe, HttpClient};
pub use config::{ClientConfig, ClientTlsConfig};
pub use connection::{Connection, ConnectionState, Probe};
pub use error::{ClientError, ClientResult};
pub use types::{
    BridgeOperationBatch, BridgeOperationBatchResponse, BridgeOperationGroup, ErrorBody,
    HealthStatus, OutgoingOperation,
};
