use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    models::{PresignedUrlRequest, PresignedUrlResponse, StoredObject},
};

#[derive(Deserialize, utoipa::IntoParams)]
pub struct PrefixFilter {
    /// Key prefix to list below (folder-style browsing).
    pub prefix: Option<String>,
}

/// Builds a unique object key under the given namespace, keeping only the
/// original file extension.
fn object_key(namespace: &str, filename: &str) -> String {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("bin");
    format!("{}/{}.{}", namespace, Uuid::new_v4(), extension)
}

/// list_cloud_objects
///
/// GET /cloud. Browses the bucket contents shown on the cloud screen.
#[utoipa::path(
    get,
    path = "/cloud",
    params(PrefixFilter),
    responses(
        (status = 200, description = "Objects", body = [StoredObject]),
        (status = 500, description = "Storage unavailable")
    )
)]
pub async fn list_cloud_objects(
    State(state): State<AppState>,
    Query(filter): Query<PrefixFilter>,
) -> Result<Json<Vec<StoredObject>>, StatusCode> {
    match state.storage.list_objects(filter.prefix).await {
        Ok(objects) => Ok(Json(objects)),
        Err(e) => {
            tracing::error!("list_cloud_objects error: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// cloud_presigned_url
///
/// POST /cloud/presigned. Short-lived URL for uploading a file directly into
/// the cloud namespace, bypassing the application server.
#[utoipa::path(
    post,
    path = "/cloud/presigned",
    request_body = PresignedUrlRequest,
    responses((status = 200, description = "URL", body = PresignedUrlResponse))
)]
pub async fn cloud_presigned_url(
    State(state): State<AppState>,
    Json(payload): Json<PresignedUrlRequest>,
) -> impl IntoResponse {
    presign(&state, "cloud", &payload).await
}

/// delete_cloud_object
///
/// DELETE /cloud/{key}. Wildcard path parameter: object keys contain slashes.
#[utoipa::path(
    delete,
    path = "/cloud/{key}",
    params(("key" = String, Path, description = "Object key")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 500, description = "Storage unavailable")
    )
)]
pub async fn delete_cloud_object(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> StatusCode {
    match state.storage.delete_object(&key).await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(e) => {
            tracing::error!("delete_cloud_object error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// upload_presigned_url
///
/// POST /upload/presigned. Media pipeline for form uploads (post covers, user
/// avatars): the client receives a short-lived URL constrained to the
/// declared content type and PUTs the file directly to storage.
#[utoipa::path(
    post,
    path = "/upload/presigned",
    request_body = PresignedUrlRequest,
    responses((status = 200, description = "URL", body = PresignedUrlResponse))
)]
pub async fn upload_presigned_url(
    State(state): State<AppState>,
    Json(payload): Json<PresignedUrlRequest>,
) -> impl IntoResponse {
    presign(&state, "uploads", &payload).await
}

async fn presign(
    state: &AppState,
    namespace: &str,
    payload: &PresignedUrlRequest,
) -> axum::response::Response {
    let key = object_key(namespace, &payload.filename);

    match state
        .storage
        .get_presigned_upload_url(&key, &payload.file_type)
        .await
    {
        Ok(url) => {
            let response = PresignedUrlResponse {
                upload_url: url,
                resource_key: key,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!("presign error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
