use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    models::{CreateSchoolRequest, School, UpdateSchoolRequest},
};

/// GET /escuelas.
#[utoipa::path(
    get,
    path = "/escuelas",
    responses((status = 200, description = "Schools", body = [School]))
)]
pub async fn list_schools(State(state): State<AppState>) -> Json<Vec<School>> {
    Json(state.repo.get_schools().await)
}

/// POST /escuelas.
#[utoipa::path(
    post,
    path = "/escuelas",
    request_body = CreateSchoolRequest,
    responses((status = 200, description = "Created", body = School))
)]
pub async fn create_school(
    State(state): State<AppState>,
    Json(payload): Json<CreateSchoolRequest>,
) -> Result<Json<School>, StatusCode> {
    match state.repo.create_school(payload).await {
        Some(school) => Ok(Json(school)),
        None => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// PUT /escuelas/{id}.
#[utoipa::path(
    put,
    path = "/escuelas/{id}",
    params(("id" = Uuid, Path, description = "School ID")),
    request_body = UpdateSchoolRequest,
    responses(
        (status = 200, description = "Updated", body = School),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_school(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSchoolRequest>,
) -> Result<Json<School>, StatusCode> {
    match state.repo.update_school(id, payload).await {
        Some(school) => Ok(Json(school)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// DELETE /escuelas/{id}.
#[utoipa::path(
    delete,
    path = "/escuelas/{id}",
    params(("id" = Uuid, Path, description = "School ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_school(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    if state.repo.delete_school(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
