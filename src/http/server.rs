//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, timeout)
//! - Serve plain HTTP on a bound listener, or HTTPS with restart on failure
//! - Stop accepting and drain when the shutdown token fires

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ListenerConfig;
use crate::http::handlers;
use crate::observability::LogBroadcaster;
use crate::relay::RelayEndpoint;
use crate::resilience::FixedBackoff;

/// Time in-flight requests get to finish after shutdown.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Identity reported on `/health`.
#[derive(Debug, Clone, Default)]
pub struct RelayInfo {
    pub address: String,
    pub chain_id: String,
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub endpoint: RelayEndpoint,
    pub info: Arc<RelayInfo>,
    pub log_stream: Option<LogBroadcaster>,
    pub shutdown: CancellationToken,
}

/// HTTP(S) server exposing the relay endpoint.
pub struct RelayServer {
    router: Router,
    shutdown: CancellationToken,
}

impl RelayServer {
    pub fn new(config: &ListenerConfig, state: AppState) -> Self {
        let shutdown = state.shutdown.clone();
        let router = Self::build_router(config, state);
        Self { router, shutdown }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ListenerConfig, state: AppState) -> Router {
        Router::new()
            .route("/bridge/send", post(handlers::send_batch))
            .route("/health", get(handlers::health))
            .route("/log", get(handlers::log_stream))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.request_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve plain HTTP on `listener` until shutdown.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let shutdown = self.shutdown.clone();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS on `addr` until shutdown.
    ///
    /// A listener that fails or stops on its own is restarted after the
    /// backoff delay, without limit.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut backoff: FixedBackoff,
    ) -> Result<(), std::io::Error> {
        loop {
            tracing::info!(address = %addr, "HTTPS server starting");

            let handle = axum_server::Handle::new();
            let watcher = {
                let handle = handle.clone();
                let shutdown = self.shutdown.clone();
                tokio::spawn(async move {
                    shutdown.cancelled().await;
                    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
                })
            };

            let result = axum_server::bind_rustls(addr, tls.clone())
                .handle(handle)
                .serve(self.router.clone().into_make_service())
                .await;
            watcher.abort();

            if self.shutdown.is_cancelled() {
                tracing::info!("HTTPS server stopped");
                return result;
            }

            match result {
                Ok(()) => tracing::warn!("HTTPS server exited unexpectedly"),
                Err(e) => tracing::error!(error = %e, "HTTPS server failed"),
            }

            let delay = backoff.next_delay();
            tracing::info!(
                attempt = backoff.attempts(),
                delay_ms = delay.as_millis() as u64,
                "Restarting HTTPS server"
            );
            tokio::select! {
                _ = self.shutdown.cancelled() => return Ok(()),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::BridgeOperationBatch;
    use crate::relay::{BatchSender, RelayResult};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    struct EchoSender;

    #[async_trait]
    impl BatchSender for EchoSender {
        async fn send_batch(
            &self,
            batch: &BridgeOperationBatch,
            _cancel: &CancellationToken,
        ) -> RelayResult<Vec<String>> {
            Ok((0..batch.operation_count()).map(|i| format!("h{}", i)).collect())
        }
    }

    fn test_router(max_body_bytes: usize) -> Router {
        let config = ListenerConfig {
            max_body_bytes,
            ..Default::default()
        };
        let state = AppState {
            endpoint: RelayEndpoint::new(Arc::new(EchoSender)),
            info: Arc::new(RelayInfo {
                address: "drt1relayer".to_string(),
                chain_id: "T".to_string(),
            }),
            log_stream: None,
            shutdown: CancellationToken::new(),
        };
        RelayServer::new(&config, state).router()
    }

    fn post_batch(body: &str) -> Request<Body> {
        Request::post("/bridge/send")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let body = format!(r#"{{"groups":[],"padding":"{}"}}"#, "a".repeat(2048));
        let response = test_router(1024).oneshot(post_batch(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_malformed_json_rejected() {
        let response = test_router(1024)
            .oneshot(post_batch(r#"{"groups": ["#))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_missing_byte_fields_accepted() {
        let body = r#"{"groups":[{"outgoing_operations":[{"data":"0x01"}]}]}"#;
        let response = test_router(1024).oneshot(post_batch(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed["tx_hashes"], serde_json::json!(["h0"]));
    }

    #[tokio::test]
    async fn test_request_id_generated() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let response = test_router(1024).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }
}
