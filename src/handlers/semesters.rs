use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    models::{CreateSemesterRequest, Semester, UpdateSemesterRequest},
};

/// GET /semestres. Most recent period first.
#[utoipa::path(
    get,
    path = "/semestres",
    responses((status = 200, description = "Semesters", body = [Semester]))
)]
pub async fn list_semesters(State(state): State<AppState>) -> Json<Vec<Semester>> {
    Json(state.repo.get_semesters().await)
}

/// POST /semestres.
#[utoipa::path(
    post,
    path = "/semestres",
    request_body = CreateSemesterRequest,
    responses((status = 200, description = "Created", body = Semester))
)]
pub async fn create_semester(
    State(state): State<AppState>,
    Json(payload): Json<CreateSemesterRequest>,
) -> Result<Json<Semester>, StatusCode> {
    match state.repo.create_semester(payload).await {
        Some(semester) => Ok(Json(semester)),
        None => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// PUT /semestres/{id}.
#[utoipa::path(
    put,
    path = "/semestres/{id}",
    params(("id" = Uuid, Path, description = "Semester ID")),
    request_body = UpdateSemesterRequest,
    responses(
        (status = 200, description = "Updated", body = Semester),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_semester(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSemesterRequest>,
) -> Result<Json<Semester>, StatusCode> {
    match state.repo.update_semester(id, payload).await {
        Some(semester) => Ok(Json(semester)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// DELETE /semestres/{id}.
#[utoipa::path(
    delete,
    path = "/semestres/{id}",
    params(("id" = Uuid, Path, description = "Semester ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_semester(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    if state.repo.delete_semester(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
