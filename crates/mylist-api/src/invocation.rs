//! Action dispatch for one invocation.

use mylist_core::{ChainError, ChainStepReport};
use mylist_protocols::{
    ChunkMarker, ContinuationRequest, Credentials, DecryptionError, CHAIN_ACTION,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::response::ApiResponse;
use crate::state::AppState;

pub const MISSING_FIELDS: &str = "Missing 'email', 'password', or 'id_list' in request body";
pub const DECRYPT_FAILED: &str = "Failed to decrypt password";
const STARTED_USER_MESSAGE: &str = "登録処理を開始しました。完了時に通知をお送りします。";

/// Fields of a `register` / `delete_and_create` request.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DirectRequest {
    email: Option<String>,
    password: Option<String>,
    id_list: Option<Vec<String>>,
    subscription: Option<String>,
    title: Option<String>,
    action: Option<String>,
    uuid: Option<String>,
    chunk_index: Option<String>,
}

/// Handle one invocation event.
///
/// The event is the request body itself or an envelope carrying it as a
/// JSON string under `body`. Never panics on malformed input.
pub async fn handle_event(state: &AppState, event: Option<Value>) -> ApiResponse {
    state.increment_requests();

    let body = match unwrap_envelope(event) {
        Ok(Some(body)) if body.is_object() => body,
        Ok(_) => return ApiResponse::bad_request(MISSING_FIELDS),
        Err(resp) => return resp,
    };

    if is_truthy(body.get("health_check")) {
        return health_check(state);
    }

    let body = normalize(body);
    if body.get("action").and_then(Value::as_str) == Some(CHAIN_ACTION) {
        chain_register(state, body).await
    } else {
        direct(state, body).await
    }
}

fn health_check(state: &AppState) -> ApiResponse {
    ApiResponse::success(
        "Lambda is ready",
        json!({
            "timestamp": chrono::Utc::now().timestamp_millis(),
            "uptime_seconds": state.uptime().as_secs(),
        }),
    )
}

async fn chain_register(state: &AppState, body: Value) -> ApiResponse {
    let request: ContinuationRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => {
            return ApiResponse::error(400, "Invalid chain request", Some(e.to_string()));
        }
    };

    match state.chain.step(request).await {
        Ok(ChainStepReport::Started { total_videos }) => ApiResponse::success(
            "Registration process started",
            json!({
                "user_message": STARTED_USER_MESSAGE,
                "total_videos": total_videos,
            }),
        ),
        Ok(ChainStepReport::Progress(progress)) => ApiResponse::success(
            "Chain registration step completed",
            serde_json::to_value(&progress).unwrap_or(Value::Null),
        ),
        Err(e) => chain_error(e),
    }
}

async fn direct(state: &AppState, body: Value) -> ApiResponse {
    let request: DirectRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => return ApiResponse::error(400, MISSING_FIELDS, Some(e.to_string())),
    };

    let (Some(email), Some(encrypted), Some(id_list)) = (
        request.email.filter(|s| !s.is_empty()),
        request.password.filter(|s| !s.is_empty()),
        request.id_list.filter(|l| !l.is_empty()),
    ) else {
        return ApiResponse::bad_request(MISSING_FIELDS);
    };

    let password = match state.codec.decrypt(&encrypted) {
        Ok(password) => password,
        Err(e) => return decrypt_failed(&e),
    };
    let credentials = Credentials::new(email, password);

    match request.action.as_deref() {
        Some("delete_and_create") => {
            match state
                .registrar
                .prepare_playlist(&credentials, request.title.as_deref())
                .await
            {
                Ok(title) => ApiResponse::success(
                    "Mylist deleted and created successfully",
                    json!({ "title": title }),
                ),
                Err(e) => {
                    error!("Playlist setup failed: {}", e);
                    ApiResponse::server_error(e.to_string())
                }
            }
        }
        Some("register") => {
            let job_id = request
                .uuid
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            let chunk_index = request
                .chunk_index
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "0".to_string());
            let marker = ChunkMarker::new(job_id, chunk_index);

            match state
                .tracked
                .run(
                    &credentials,
                    &id_list,
                    &marker,
                    request.subscription.as_deref(),
                )
                .await
            {
                Ok(report) => {
                    info!(
                        "Chunk {} of job {} done: {} failed",
                        marker.chunk_index,
                        marker.job_id,
                        report.failed_id_list.len()
                    );
                    ApiResponse::success(
                        "Registration completed",
                        json!({ "failed_id_list": report.failed_id_list }),
                    )
                }
                Err(e) => chain_error(e),
            }
        }
        other => ApiResponse::bad_request(format!(
            "Unknown action: {}",
            other.unwrap_or("null")
        )),
    }
}

fn decrypt_failed(e: &DecryptionError) -> ApiResponse {
    warn!("Rejected request: {}", e);
    ApiResponse::error(400, DECRYPT_FAILED, Some(e.to_string()))
}

fn chain_error(e: ChainError) -> ApiResponse {
    match e {
        ChainError::Decryption(e) => decrypt_failed(&e),
        other => {
            error!("Invocation failed: {}", other);
            ApiResponse::server_error(other.to_string())
        }
    }
}

/// Accept both a bare body and an envelope with the body as a JSON string.
fn unwrap_envelope(event: Option<Value>) -> Result<Option<Value>, ApiResponse> {
    let Some(event) = event else {
        return Ok(None);
    };
    let inner = match event.get("body") {
        Some(Value::String(raw)) => raw.clone(),
        Some(Value::Null) => return Ok(None),
        _ => return Ok(Some(event)),
    };
    if inner.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&inner)
        .map(Some)
        .map_err(|e| ApiResponse::error(400, "Invalid JSON body", Some(e.to_string())))
}

/// Keys where an explicit `null` means "use the default".
const DEFAULTED_KEYS: [&str; 6] = [
    "title",
    "id_list",
    "remaining_ids",
    "failed_ids",
    "is_first_request",
    "is_delete_and_create_request",
];

/// Subscriptions are forwarded as opaque strings; `uuid` and `chunk_index`
/// may arrive as numbers.
fn normalize(mut body: Value) -> Value {
    if let Value::Object(map) = &mut body {
        for key in DEFAULTED_KEYS {
            if map.get(key).is_some_and(Value::is_null) {
                map.remove(key);
            }
        }
        for key in ["subscription", "uuid", "chunk_index"] {
            match map.get(key) {
                Some(Value::Null) => {
                    map.remove(key);
                }
                Some(Value::String(_)) | None => {}
                Some(other) => {
                    let text = other.to_string();
                    map.insert(key.to_string(), Value::String(text));
                }
            }
        }
    }
    body
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

#[cfg(test)]
#[path = "invocation_tests.rs"]
mod tests;
