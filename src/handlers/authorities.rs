use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    models::{Authority, CreateAuthorityRequest, UpdateAuthorityRequest},
};

/// GET /autoridades. Display order, as shown on the public site.
#[utoipa::path(
    get,
    path = "/autoridades",
    responses((status = 200, description = "Authorities", body = [Authority]))
)]
pub async fn list_authorities(State(state): State<AppState>) -> Json<Vec<Authority>> {
    Json(state.repo.get_authorities().await)
}

/// POST /autoridades.
#[utoipa::path(
    post,
    path = "/autoridades",
    request_body = CreateAuthorityRequest,
    responses((status = 200, description = "Created", body = Authority))
)]
pub async fn create_authority(
    State(state): State<AppState>,
    Json(payload): Json<CreateAuthorityRequest>,
) -> Result<Json<Authority>, StatusCode> {
    match state.repo.create_authority(payload).await {
        Some(authority) => Ok(Json(authority)),
        None => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// PUT /autoridades/{id}.
#[utoipa::path(
    put,
    path = "/autoridades/{id}",
    params(("id" = Uuid, Path, description = "Authority ID")),
    request_body = UpdateAuthorityRequest,
    responses(
        (status = 200, description = "Updated", body = Authority),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_authority(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAuthorityRequest>,
) -> Result<Json<Authority>, StatusCode> {
    match state.repo.update_authority(id, payload).await {
        Some(authority) => Ok(Json(authority)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// DELETE /autoridades/{id}.
#[utoipa::path(
    delete,
    path = "/autoridades/{id}",
    params(("id" = Uuid, Path, description = "Authority ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_authority(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    if state.repo.delete_authority(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
