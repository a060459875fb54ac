//! Request handlers for the relay endpoint.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;

use crate::bridge::BridgeOperationBatch;
use crate::http::response::error_response;
use crate::http::server::AppState;
use crate::observability::LogBroadcaster;

/// `POST /bridge/send`.
///
/// A `null` body is an empty batch. The relay runs on its own task so that a
/// dropped request cancels it through the token instead of aborting it midway.
pub async fn send_batch(
    State(state): State<AppState>,
    Json(batch): Json<Option<BridgeOperationBatch>>,
) -> Response {
    let batch = batch.unwrap_or_default();
    let cancel = state.shutdown.child_token();
    let _cancel_on_drop = cancel.clone().drop_guard();

    tracing::debug!(
        groups = batch.groups.len(),
        operations = batch.operation_count(),
        "Received bridge operation batch"
    );

    let endpoint = state.endpoint.clone();
    let task = tokio::spawn(async move { endpoint.send(&batch, &cancel).await });

    match task.await {
        Ok(Ok(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Batch relay failed");
            e.into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Batch relay task failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "batch relay task failed")
        }
    }
}

/// Health payload, also used by clients as a connectivity probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub address: String,
    pub chain_id: String,
}

/// `GET /health`.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        address: state.info.address.clone(),
        chain_id: state.info.chain_id.clone(),
    })
}

/// `GET /log`: upgrade to a websocket streaming log lines.
pub async fn log_stream(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let Some(broadcaster) = state.log_stream.clone() else {
        return error_response(StatusCode::NOT_FOUND, "log stream disabled");
    };

    let shutdown = state.shutdown.clone();
    ws.on_upgrade(move |socket| async move {
        tokio::select! {
            _ = stream_logs(socket, broadcaster) => {}
            _ = shutdown.cancelled() => {}
        }
    })
}

async fn stream_logs(mut socket: WebSocket, broadcaster: LogBroadcaster) {
    let mut lines = broadcaster.subscribe();
    tracing::debug!("Log stream subscriber connected");

    loop {
        tokio::select! {
            line = lines.recv() => match line {
                Ok(line) => {
                    if socket.send(Message::Text(line.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    let notice = format!("... {} log lines dropped", missed);
                    if socket.send(Message::Text(notice.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => {}
            },
        }
    }
}
