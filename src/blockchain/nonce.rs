//! Nonce assignment and transaction broadcast.
//!
//! # Responsibilities
//! - Sync the account nonce from the gateway on first use
//! - Hand out sequential nonces locally afterwards
//! - Resync after a failed broadcast so a lost nonce is reused
//! - Keep a minimum spacing between consecutive broadcasts

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

use crate::blockchain::client::ChainProxy;
use crate::blockchain::transaction::{Built, Nonced, Signed, Transaction};
use crate::blockchain::types::{BlockchainResult, NetworkConfig};

/// Assigns nonce/gas to one transaction at a time and broadcasts it.
#[async_trait]
pub trait NonceSender: Send + Sync {
    async fn apply_nonce_and_gas_price(
        &self,
        tx: Transaction<Built>,
    ) -> BlockchainResult<Transaction<Nonced>>;

    /// Broadcast exactly one signed transaction, returning its hash.
    async fn send_transaction(&self, tx: &Transaction<Signed>) -> BlockchainResult<String>;

    /// Drop any locally assigned nonce state for `address`; called when an
    /// assigned nonce was never broadcast.
    async fn resync(&self, _address: &str) {}
}

/// Nonce handler backed by the chain gateway.
pub struct AccountNonceHandler {
    proxy: Arc<dyn ChainProxy>,
    min_gas_price: u64,
    interval_to_send: Duration,
    /// Next nonce to hand out, per sender address.
    nonces: Mutex<HashMap<String, u64>>,
    /// Earliest instant the next broadcast may go out.
    next_send_at: Mutex<Option<Instant>>,
}

impl AccountNonceHandler {
    pub fn new(
        proxy: Arc<dyn ChainProxy>,
        network: &NetworkConfig,
        interval_to_send: Duration,
    ) -> Self {
        Self {
            proxy,
            min_gas_price: network.min_gas_price,
            interval_to_send,
            nonces: Mutex::new(HashMap::new()),
            next_send_at: Mutex::new(None),
        }
    }

    /// Next nonce that would be assigned for `address`, if already synced.
    pub async fn current_nonce(&self, address: &str) -> Option<u64> {
        self.nonces.lock().await.get(address).copied()
    }

    /// Forget the cached nonce so the next assignment reads it from chain.
    pub async fn reset(&self, address: &str) {
        self.nonces.lock().await.remove(address);
    }
}

#[async_trait]
impl NonceSender for AccountNonceHandler {
    async fn apply_nonce_and_gas_price(
        &self,
        tx: Transaction<Built>,
    ) -> BlockchainResult<Transaction<Nonced>> {
        let mut nonces = self.nonces.lock().await;

        let cached = nonces.get(tx.sender()).copied();
        let nonce = match cached {
            Some(nonce) => nonce,
            None => {
                let account = self.proxy.account(tx.sender()).await?;
                tracing::debug!(
                    address = %tx.sender(),
                    nonce = account.nonce,
                    "Synced account nonce from chain"
                );
                account.nonce
            }
        };
        nonces.insert(tx.sender().to_string(), nonce + 1);

        let gas_price = tx.gas_price().max(self.min_gas_price);
        Ok(tx.assign_nonce(nonce, gas_price))
    }

    async fn send_transaction(&self, tx: &Transaction<Signed>) -> BlockchainResult<String> {
        let mut next_send_at = self.next_send_at.lock().await;
        if let Some(at) = *next_send_at {
            sleep_until(at).await;
        }

        let result = self.proxy.send_transaction(&tx.to_wire()).await;
        *next_send_at = Some(Instant::now() + self.interval_to_send);

        match result {
            Ok(hash) => {
                tracing::debug!(nonce = tx.nonce(), hash = %hash, "Transaction broadcast");
                Ok(hash)
            }
            Err(e) => {
                tracing::warn!(
                    nonce = tx.nonce(),
                    error = %e,
                    "Broadcast failed, nonce will be resynced"
                );
                self.reset(tx.sender()).await;
                Err(e)
            }
        }
    }

    async fn resync(&self, address: &str) {
        self.reset(address).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::transaction::{TransactionWire, TxBuilder};
    use crate::blockchain::types::{AccountInfo, BlockchainError};
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    struct FakeProxy {
        chain_nonce: AtomicU64,
        account_queries: AtomicU64,
        fail_next_send: AtomicBool,
        sent: std::sync::Mutex<Vec<TransactionWire>>,
    }

    impl FakeProxy {
        fn new(chain_nonce: u64) -> Self {
            Self {
                chain_nonce: AtomicU64::new(chain_nonce),
                account_queries: AtomicU64::new(0),
                fail_next_send: AtomicBool::new(false),
                sent: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChainProxy for FakeProxy {
        async fn network_config(&self) -> BlockchainResult<NetworkConfig> {
            Ok(network())
        }

        async fn account(&self, address: &str) -> BlockchainResult<AccountInfo> {
            self.account_queries.fetch_add(1, Ordering::SeqCst);
            Ok(AccountInfo {
                address: address.to_string(),
                nonce: self.chain_nonce.load(Ordering::SeqCst),
                balance: String::new(),
            })
        }

        async fn send_transaction(&self, tx: &TransactionWire) -> BlockchainResult<String> {
            if self.fail_next_send.swap(false, Ordering::SeqCst) {
                return Err(BlockchainError::Rpc("connection reset".to_string()));
            }
            self.sent.lock().unwrap().push(tx.clone());
            self.chain_nonce.store(tx.nonce + 1, Ordering::SeqCst);
            Ok(format!("hash-{}", tx.nonce))
        }
    }

    fn network() -> NetworkConfig {
        NetworkConfig {
            chain_id: "T".to_string(),
            min_gas_price: 1_000,
            min_transaction_version: 2,
        }
    }

    fn builder() -> TxBuilder {
        TxBuilder::new("drt1sender".to_string(), network(), 50_000_000)
    }

    async fn send_one(handler: &AccountNonceHandler) -> BlockchainResult<String> {
        let tx = handler
            .apply_nonce_and_gas_price(builder().build("drt1receiver", b"data".to_vec()))
            .await?;
        handler.send_transaction(&tx.into_signed(&[1])).await
    }

    #[tokio::test]
    async fn test_nonce_synced_once_then_incremented() {
        let proxy = Arc::new(FakeProxy::new(5));
        let handler = AccountNonceHandler::new(proxy.clone(), &network(), Duration::ZERO);

        assert_eq!(handler.current_nonce("drt1sender").await, None);
        assert_eq!(send_one(&handler).await.unwrap(), "hash-5");
        assert_eq!(send_one(&handler).await.unwrap(), "hash-6");
        assert_eq!(handler.current_nonce("drt1sender").await, Some(7));
        assert_eq!(proxy.account_queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gas_price_floor() {
        let proxy = Arc::new(FakeProxy::new(0));
        let mut network = network();
        network.min_gas_price = 5_000;
        let handler = AccountNonceHandler::new(proxy, &network, Duration::ZERO);

        let tx = handler
            .apply_nonce_and_gas_price(builder().build("drt1receiver", Vec::new()))
            .await
            .unwrap();
        assert_eq!(tx.gas_price(), 5_000);
    }

    #[tokio::test]
    async fn test_failed_send_resyncs_nonce() {
        let proxy = Arc::new(FakeProxy::new(3));
        let handler = AccountNonceHandler::new(proxy.clone(), &network(), Duration::ZERO);

        proxy.fail_next_send.store(true, Ordering::SeqCst);
        assert!(send_one(&handler).await.is_err());
        assert_eq!(handler.current_nonce("drt1sender").await, None);

        // Nonce 3 was never accepted, so it is reused.
        assert_eq!(send_one(&handler).await.unwrap(), "hash-3");
        assert_eq!(proxy.account_queries.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_between_sends() {
        let proxy = Arc::new(FakeProxy::new(0));
        let handler =
            AccountNonceHandler::new(proxy.clone(), &network(), Duration::from_millis(500));

        let start = Instant::now();
        send_one(&handler).await.unwrap();
        send_one(&handler).await.unwrap();
        send_one(&handler).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert_eq!(proxy.sent.lock().unwrap().len(), 3);
    }
}
