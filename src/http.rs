use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::error::ServiceError;
use crate::service::{FaceService, ImageSource};

pub fn router(service: Arc<FaceService>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/recognize", post(recognize))
        .route("/enroll", post(enroll))
        .with_state(service)
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({ "message": "face recognition service running" }))
}

#[derive(Deserialize, Default)]
struct BlobRef {
    #[serde(rename = "fileId")]
    file_id: Option<String>,
}

#[derive(Deserialize)]
struct EnrollBody {
    #[serde(rename = "userId")]
    user_id: Option<String>,
    #[serde(rename = "fileId")]
    file_id: Option<String>,
}

#[derive(Deserialize, Default)]
struct EnrollQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false)
}

/// JSON bodies carry a blob reference; anything else is the image itself.
fn image_source(headers: &HeaderMap, body: &Bytes) -> Result<ImageSource, ServiceError> {
    if is_json(headers) {
        let payload: BlobRef = serde_json::from_slice(body).unwrap_or_default();
        let file_id = payload
            .file_id
            .ok_or_else(|| ServiceError::Validation("fileId or image required".into()))?;
        Ok(ImageSource::Blob(file_id))
    } else if body.is_empty() {
        Err(ServiceError::Validation("fileId or image required".into()))
    } else {
        Ok(ImageSource::Bytes(body.to_vec()))
    }
}

async fn recognize(
    State(service): State<Arc<FaceService>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let source = image_source(&headers, &body)?;
    let outcome = service.recognize(source).await?;
    Ok(Json(outcome).into_response())
}

async fn enroll(
    State(service): State<Arc<FaceService>>,
    Query(query): Query<EnrollQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let (user_id, source) = if is_json(&headers) {
        let payload: EnrollBody = serde_json::from_slice(&body)
            .map_err(|_| ServiceError::Validation("userId and fileId required".into()))?;
        match (payload.user_id, payload.file_id) {
            (Some(user), Some(file)) => (user, ImageSource::Blob(file)),
            _ => {
                return Err(ServiceError::Validation("userId and fileId required".into()).into());
            }
        }
    } else {
        let Some(user) = query.user_id else {
            return Err(ServiceError::Validation("userId required".into()).into());
        };
        if body.is_empty() {
            return Err(ServiceError::Validation("image required".into()).into());
        }
        (user, ImageSource::Bytes(body.to_vec()))
    };

    let id = service.enroll(&user_id, source).await?;
    Ok(Json(json!({ "enrollmentId": id })).into_response())
}

pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ServiceError::Validation(_) | ServiceError::NoFaceDetected => StatusCode::BAD_REQUEST,
            ServiceError::BlobNotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ServiceError::Extractor(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Dimension(_) | ServiceError::Storage(_) | ServiceError::Blob(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            log::error!("request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
