//! Wiring of the production sender from configuration.

use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::{AccountNonceHandler, ChainProxy, GatewayClient, TxSigner};
use crate::bridge::hasher_from_name;
use crate::config::schema::SenderConfig;
use crate::relay::error::{ConstructionError, RelayResult};
use crate::relay::formatter::BridgeDataFormatter;
use crate::relay::sender::TxSender;

/// Build a [`TxSender`] that talks to the configured gateway.
///
/// Fetches the network configuration once; fails if the gateway is unreachable.
pub async fn create_tx_sender(
    signer: Arc<dyn TxSigner>,
    config: &SenderConfig,
) -> RelayResult<TxSender> {
    let hasher = hasher_from_name(&config.hasher)
        .map_err(|e| ConstructionError::UnknownHasher(e.0))?;
    let proxy: Arc<dyn ChainProxy> = Arc::new(GatewayClient::new(config)?);
    let network = proxy.network_config().await?;

    let nonce_handler = AccountNonceHandler::new(
        proxy.clone(),
        &network,
        Duration::from_millis(config.interval_to_send_ms),
    );

    TxSender::builder()
        .signer(signer)
        .proxy(proxy)
        .nonce_sender(Arc::new(nonce_handler))
        .formatter(Arc::new(BridgeDataFormatter::new(hasher)))
        .network(network)
        .header_verifier_address(config.header_verifier_address.clone())
        .safe_address(config.safe_address.clone())
        .gas_limit(config.gas_limit)
        .build()
        .await
}
