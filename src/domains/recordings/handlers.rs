//! HTTP handlers for the recordings routes.
//!
//! - `GET /device/recordings/{agentId}/{deviceId}` lists recordings as JSON
//! - `GET /device/recordings/{agentId}/{deviceId}/file/{fileName}` streams one
//!
//! Both check device ownership first. Directory walks run on the blocking
//! pool.

use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;
use tracing::{debug, error, instrument, warn};

use super::range::{RangeRequest, parse_range};
use crate::core::RecordingServer;
use crate::domains::devices::DeviceError;

/// Failures answered to HTTP clients.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    NotFound,
    RangeNotSatisfiable { total_len: u64 },
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "error": "not authorized for this device" })),
            )
                .into_response(),
            Self::NotFound => StatusCode::NOT_FOUND.into_response(),
            Self::RangeNotSatisfiable { total_len } => (
                StatusCode::RANGE_NOT_SATISFIABLE,
                [(header::CONTENT_RANGE, format!("bytes */{total_len}"))],
            )
                .into_response(),
            Self::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::json!({ "error": msg })))
                    .into_response()
            }
        }
    }
}

impl From<DeviceError> for ApiError {
    fn from(e: DeviceError) -> Self {
        if e.is_unauthorized() {
            Self::Unauthorized
        } else {
            Self::Internal(e.to_string())
        }
    }
}

/// Extract the token of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// List the recordings of a device.
#[instrument(skip(server, headers))]
pub async fn list_recordings(
    State(server): State<RecordingServer>,
    Path((agent_id, device_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    server
        .authorize(bearer_token(&headers), &agent_id, &device_id)
        .await?;

    let repository = server.repository().clone();
    let files = tokio::task::spawn_blocking(move || repository.list_recordings(&device_id))
        .await
        .map_err(|e| {
            error!("listing task failed: {}", e);
            ApiError::Internal("listing failed".to_string())
        })?;

    debug!(count = files.len(), "returning recordings");
    Ok(Json(files).into_response())
}

/// Stream one recording, honoring a single byte range.
#[instrument(skip(server, headers))]
pub async fn stream_recording(
    State(server): State<RecordingServer>,
    Path((agent_id, device_id, file_name)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    server
        .authorize(bearer_token(&headers), &agent_id, &device_id)
        .await?;

    let repository = server.repository().clone();
    let handle =
        tokio::task::spawn_blocking(move || repository.resolve_recording(&device_id, &file_name))
            .await
            .map_err(|e| {
                error!("lookup task failed: {}", e);
                ApiError::Internal("lookup failed".to_string())
            })?
            .ok_or(ApiError::NotFound)?;

    let stream = handle.open().await.map_err(|e| {
        warn!("resolved recording could not be opened: {}", e);
        ApiError::NotFound
    })?;
    let total_len = stream.len();

    let range_header = headers.get(header::RANGE).and_then(|v| v.to_str().ok());
    let (status, body_len, content_range, reader) = match parse_range(range_header, total_len) {
        RangeRequest::Full => (StatusCode::OK, total_len, None, stream.into_reader()),
        RangeRequest::Partial(range) => {
            let reader = stream.into_range_reader(range).await.map_err(|e| {
                error!("seek failed: {}", e);
                ApiError::Internal("seek failed".to_string())
            })?;
            (
                StatusCode::PARTIAL_CONTENT,
                range.len(),
                Some(range.content_range(total_len)),
                reader,
            )
        }
        RangeRequest::Unsatisfiable => {
            return Err(ApiError::RangeNotSatisfiable { total_len });
        }
    };

    let content_type = HeaderValue::from_str(&server.config().recordings.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    let mut response = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "no-store")
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CONTENT_LENGTH, body_len);
    if let Some(content_range) = content_range {
        response = response.header(header::CONTENT_RANGE, content_range);
    }

    // The body owns the file; dropping it on completion or disconnect closes it.
    response
        .body(Body::from_stream(ReaderStream::new(reader)))
        .map_err(|e| ApiError::Internal(e.to_string()))
}
