use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    models::{Competency, CreateCompetencyRequest, UpdateCompetencyRequest},
};

/// GET /competencias.
#[utoipa::path(
    get,
    path = "/competencias",
    responses((status = 200, description = "Competencies", body = [Competency]))
)]
pub async fn list_competencies(State(state): State<AppState>) -> Json<Vec<Competency>> {
    Json(state.repo.get_competencies().await)
}

/// POST /competencias.
#[utoipa::path(
    post,
    path = "/competencias",
    request_body = CreateCompetencyRequest,
    responses((status = 200, description = "Created", body = Competency))
)]
pub async fn create_competency(
    State(state): State<AppState>,
    Json(payload): Json<CreateCompetencyRequest>,
) -> Result<Json<Competency>, StatusCode> {
    match state.repo.create_competency(payload).await {
        Some(competency) => Ok(Json(competency)),
        None => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// PUT /competencias/{id}.
#[utoipa::path(
    put,
    path = "/competencias/{id}",
    params(("id" = Uuid, Path, description = "Competency ID")),
    request_body = UpdateCompetencyRequest,
    responses(
        (status = 200, description = "Updated", body = Competency),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_competency(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCompetencyRequest>,
) -> Result<Json<Competency>, StatusCode> {
    match state.repo.update_competency(id, payload).await {
        Some(competency) => Ok(Json(competency)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// DELETE /competencias/{id}.
#[utoipa::path(
    delete,
    path = "/competencias/{id}",
    params(("id" = Uuid, Path, description = "Competency ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_competency(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    if state.repo.delete_competency(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
