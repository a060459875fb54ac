//! Sequential transaction assembly, signing and submission.
//!
//! # Responsibilities
//! - Check every collaborator once, when the sender is built
//! - Capture the network configuration snapshot used for every transaction
//! - Relay one batch payload by payload, aborting on the first failure
//! - Serialize nonce assignment, signing and broadcast per sender account
//!
//! # Design Decisions
//! - Payload formatting and transaction skeletons are built outside the
//!   account lock; only nonce → sign → submit runs inside it
//! - Cancellation is observed at every I/O suspension point
//! - A failed or cancelled batch never reports the hashes it already sent

use async_trait::async_trait;
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span};

use crate::blockchain::{
    BlockchainResult, ChainProxy, NetworkConfig, NonceSender, Transaction, TxBuilder, TxSigner,
};
use crate::blockchain::transaction::{Built, Nonced, Submitted};
use crate::bridge::BridgeOperationBatch;
use crate::config::schema::SenderConfig;
use crate::observability::metrics;
use crate::relay::endpoint::BatchSender;
use crate::relay::error::{ConstructionError, RelayError, RelayResult};
use crate::relay::formatter::DataFormatter;
use crate::relay::payload::PayloadKind;

/// One exclusive section per sender account.
///
/// The lock is a plain `tokio::sync::Mutex`, so a task that already holds it
/// and asks again waits forever; callers take it once per transaction.
#[derive(Debug, Default)]
pub struct AccountLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl AccountLocks {
    fn get(&self, address: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(address.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Wait for exclusive access to `address`.
    pub async fn acquire(&self, address: &str) -> OwnedMutexGuard<()> {
        self.get(address).lock_owned().await
    }
}

/// Run `fut` unless `cancel` fires first.
async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> RelayResult<T>
where
    F: Future<Output = BlockchainResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(RelayError::Cancelled),
        result = fut => result.map_err(RelayError::from),
    }
}

/// Turns batches into signed, broadcast transactions.
pub struct TxSender {
    signer: Arc<dyn TxSigner>,
    nonce_sender: Arc<dyn NonceSender>,
    formatter: Arc<dyn DataFormatter>,
    tx_builder: TxBuilder,
    header_verifier_address: String,
    safe_address: String,
    locks: Arc<AccountLocks>,
    span: Span,
}

impl TxSender {
    pub fn builder() -> TxSenderBuilder {
        TxSenderBuilder::default()
    }

    /// Address every transaction is sent from.
    pub fn address(&self) -> &str {
        self.signer.address()
    }

    /// Network snapshot captured at construction.
    pub fn network(&self) -> &NetworkConfig {
        self.tx_builder.network()
    }

    fn receiver(&self, kind: PayloadKind) -> &str {
        match kind {
            PayloadKind::Register => &self.header_verifier_address,
            PayloadKind::Execute => &self.safe_address,
        }
    }

    /// Relay every payload derived from `batch`, returning the transaction
    /// hashes in submission order.
    ///
    /// An empty batch returns an empty list. Any nonce, signing or broadcast
    /// failure aborts the batch; malformed payloads are skipped.
    pub async fn send_batch(
        &self,
        batch: &BridgeOperationBatch,
        cancel: &CancellationToken,
    ) -> RelayResult<Vec<String>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let result = self
            .relay_payloads(batch, cancel)
            .instrument(self.span.clone())
            .await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(RelayError::Cancelled) => "cancelled",
            Err(_) => "error",
        };
        metrics::record_batch(outcome, started);

        result
    }

    async fn relay_payloads(
        &self,
        batch: &BridgeOperationBatch,
        cancel: &CancellationToken,
    ) -> RelayResult<Vec<String>> {
        let payloads = self.formatter.create_txs_data(batch);
        let mut hashes = Vec::with_capacity(payloads.len());

        for (index, payload) in payloads.into_iter().enumerate() {
            let Some(kind) = payload.kind() else {
                tracing::error!(
                    index,
                    payload = ?payload,
                    "Invalid tx data, unknown function prefix, skipping"
                );
                metrics::record_payload_skipped();
                continue;
            };

            let tx = self
                .tx_builder
                .build(self.receiver(kind), payload.into_bytes());

            match self.send_one(tx, cancel).await {
                Ok(submitted) => {
                    metrics::record_transaction_sent(kind.as_str());
                    hashes.push(submitted.into_hash());
                }
                Err(e) => {
                    tracing::error!(
                        index,
                        kind = %kind,
                        sent = hashes.len(),
                        error = %e,
                        "Batch relay aborted"
                    );
                    return Err(e);
                }
            }
        }

        Ok(hashes)
    }

    /// Nonce, sign and broadcast one transaction inside the account lock.
    async fn send_one(
        &self,
        tx: Transaction<Built>,
        cancel: &CancellationToken,
    ) -> RelayResult<Transaction<Submitted>> {
        let _guard = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RelayError::Cancelled),
            guard = self.locks.acquire(self.signer.address()) => guard,
        };

        let tx = cancellable(cancel, self.nonce_sender.apply_nonce_and_gas_price(tx)).await?;
        let nonce = tx.nonce();

        match self.sign_and_submit(tx, cancel).await {
            Ok(submitted) => {
                tracing::debug!(nonce, hash = %submitted.hash(), "Transaction sent");
                Ok(submitted)
            }
            Err(e) => {
                tracing::error!(nonce, error = %e, "Failed to send transaction");
                // The assigned nonce may never reach the chain.
                self.nonce_sender.resync(self.signer.address()).await;
                Err(e)
            }
        }
    }

    async fn sign_and_submit(
        &self,
        tx: Transaction<Nonced>,
        cancel: &CancellationToken,
    ) -> RelayResult<Transaction<Submitted>> {
        let signing_bytes = tx.signing_bytes()?;
        let signature = cancellable(cancel, self.signer.sign(&signing_bytes)).await?;
        let signed = tx.into_signed(&signature);

        let hash = cancellable(cancel, self.nonce_sender.send_transaction(&signed)).await?;
        Ok(signed.into_submitted(hash))
    }
}

#[async_trait]
impl BatchSender for TxSender {
    async fn send_batch(
        &self,
        batch: &BridgeOperationBatch,
        cancel: &CancellationToken,
    ) -> RelayResult<Vec<String>> {
        TxSender::send_batch(self, batch, cancel).await
    }
}

impl std::fmt::Debug for TxSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxSender")
            .field("address", &self.signer.address())
            .field("network", self.tx_builder.network())
            .field("header_verifier_address", &self.header_verifier_address)
            .field("safe_address", &self.safe_address)
            .finish()
    }
}

/// Collects the sender's collaborators; [`TxSenderBuilder::build`] checks them.
#[derive(Default)]
pub struct TxSenderBuilder {
    signer: Option<Arc<dyn TxSigner>>,
    proxy: Option<Arc<dyn ChainProxy>>,
    nonce_sender: Option<Arc<dyn NonceSender>>,
    formatter: Option<Arc<dyn DataFormatter>>,
    network: Option<NetworkConfig>,
    header_verifier_address: String,
    safe_address: String,
    gas_limit: Option<u64>,
}

impl TxSenderBuilder {
    pub fn signer(mut self, signer: Arc<dyn TxSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn proxy(mut self, proxy: Arc<dyn ChainProxy>) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn nonce_sender(mut self, nonce_sender: Arc<dyn NonceSender>) -> Self {
        self.nonce_sender = Some(nonce_sender);
        self
    }

    pub fn formatter(mut self, formatter: Arc<dyn DataFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Use an already fetched network snapshot instead of querying the proxy.
    pub fn network(mut self, network: NetworkConfig) -> Self {
        self.network = Some(network);
        self
    }

    pub fn header_verifier_address(mut self, address: impl Into<String>) -> Self {
        self.header_verifier_address = address.into();
        self
    }

    pub fn safe_address(mut self, address: impl Into<String>) -> Self {
        self.safe_address = address.into();
        self
    }

    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// Validate the collaborators and capture the network configuration.
    pub async fn build(self) -> RelayResult<TxSender> {
        let signer = self.signer.ok_or(ConstructionError::MissingSigner)?;
        let proxy = self.proxy.ok_or(ConstructionError::MissingProxy)?;
        let nonce_sender = self
            .nonce_sender
            .ok_or(ConstructionError::MissingNonceSender)?;
        let formatter = self.formatter.ok_or(ConstructionError::MissingFormatter)?;
        if self.header_verifier_address.is_empty() {
            return Err(ConstructionError::EmptyHeaderVerifierAddress.into());
        }
        if self.safe_address.is_empty() {
            return Err(ConstructionError::EmptySafeAddress.into());
        }

        let network = match self.network {
            Some(network) => network,
            None => proxy.network_config().await?,
        };
        let gas_limit = self
            .gas_limit
            .unwrap_or_else(|| SenderConfig::default().gas_limit);

        tracing::info!(
            address = %signer.address(),
            chain_id = %network.chain_id,
            min_gas_price = network.min_gas_price,
            version = network.min_transaction_version,
            "Transaction sender ready"
        );

        let span = tracing::info_span!("tx_sender", address = %signer.address());
        let tx_builder = TxBuilder::new(signer.address().to_string(), network, gas_limit);

        Ok(TxSender {
            signer,
            nonce_sender,
            formatter,
            tx_builder,
            header_verifier_address: self.header_verifier_address,
            safe_address: self.safe_address,
            locks: Arc::default(),
            span,
        })
    }
}
