use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use lighting_worker::{ErrorCode, Reply, WorkerError};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub request_id: Uuid,
    pub replies: Vec<Reply>,
}

type ApiResult = Result<(StatusCode, Json<MessageResponse>), (StatusCode, String)>;

/// Bodies are taken as raw JSON so that payload errors come back as an
/// `invalid_message` reply from the worker, not as an extractor rejection
type MessageBody = Result<Json<Value>, JsonRejection>;

/// Raw `{type, data}` message, exactly as a worker would receive it
pub async fn post_message(State(state): State<AppState>, body: MessageBody) -> ApiResult {
    match body {
        Ok(Json(message)) => run(&state, message).await,
        Err(rejection) => Ok(rejected(rejection)),
    }
}

/// `calculate` data: `{ fixtures, room, options? }`
pub async fn calculate(State(state): State<AppState>, body: MessageBody) -> ApiResult {
    post_typed(&state, "calculate", body).await
}

/// `optimize` data: `{ room, targetPPFD, fixtureModel, ceilingOffset? }`
pub async fn optimize(State(state): State<AppState>, body: MessageBody) -> ApiResult {
    post_typed(&state, "optimize", body).await
}

async fn post_typed(state: &AppState, kind: &str, body: MessageBody) -> ApiResult {
    match body {
        Ok(Json(data)) => run(state, json!({ "type": kind, "data": data })).await,
        Err(rejection) => Ok(rejected(rejection)),
    }
}

/// Body the JSON extractor refused; answered without touching the worker
fn rejected(rejection: JsonRejection) -> (StatusCode, Json<MessageResponse>) {
    let request_id = Uuid::new_v4();
    tracing::warn!("Request {} rejected: {}", request_id, rejection.body_text());
    let reply = Reply::Error {
        error: format!("Invalid message: {}", rejection.body_text()),
        code: ErrorCode::InvalidMessage,
    };
    (
        rejection.status(),
        Json(MessageResponse {
            request_id,
            replies: vec![reply],
        }),
    )
}

async fn run(state: &AppState, message: Value) -> ApiResult {
    let request_id = Uuid::new_v4();
    let stream = state.worker.post(message).map_err(|e| match e {
        WorkerError::WorkerClosed => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    })?;
    let replies = stream.collect().await;

    // Error replies stay in the body; the status only flags them
    let status = if replies.iter().any(Reply::is_error) {
        tracing::warn!("Request {} finished with an error reply", request_id);
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        tracing::debug!("Request {} finished with {} replies", request_id, replies.len());
        StatusCode::OK
    };

    Ok((status, Json(MessageResponse { request_id, replies })))
}
