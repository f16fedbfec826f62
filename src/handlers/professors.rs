use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    models::{
        CreateProfessorRequest, Professor, ProfessorRequest, ResolveRequest,
        UpdateProfessorRequest,
    },
};

/// Accepted query parameters for the professor listing.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct ProfessorFilter {
    /// Substring match over name, email and document.
    pub search: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct StatusFilter {
    /// One of `pending`, `approved`, `rejected`.
    pub status: Option<String>,
}

/// GET /profesores.
#[utoipa::path(
    get,
    path = "/profesores",
    params(ProfessorFilter),
    responses((status = 200, description = "Professors", body = [Professor]))
)]
pub async fn list_professors(
    State(state): State<AppState>,
    Query(filter): Query<ProfessorFilter>,
) -> Json<Vec<Professor>> {
    Json(state.repo.get_professors(filter.search).await)
}

/// POST /profesores. The document number is unique; a duplicate is rejected.
#[utoipa::path(
    post,
    path = "/profesores",
    request_body = CreateProfessorRequest,
    responses(
        (status = 200, description = "Created", body = Professor),
        (status = 409, description = "Document already registered")
    )
)]
pub async fn create_professor(
    State(state): State<AppState>,
    Json(payload): Json<CreateProfessorRequest>,
) -> Result<Json<Professor>, StatusCode> {
    if state
        .repo
        .get_professor_by_document(&payload.document)
        .await
        .is_some()
    {
        return Err(StatusCode::CONFLICT);
    }
    match state.repo.create_professor(payload).await {
        Some(professor) => Ok(Json(professor)),
        None => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// PUT /profesores/{id}. The document number is immutable.
#[utoipa::path(
    put,
    path = "/profesores/{id}",
    params(("id" = Uuid, Path, description = "Professor ID")),
    request_body = UpdateProfessorRequest,
    responses(
        (status = 200, description = "Updated", body = Professor),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_professor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProfessorRequest>,
) -> Result<Json<Professor>, StatusCode> {
    match state.repo.update_professor(id, payload).await {
        Some(professor) => Ok(Json(professor)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// DELETE /profesores/{id}.
#[utoipa::path(
    delete,
    path = "/profesores/{id}",
    params(("id" = Uuid, Path, description = "Professor ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_professor(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    if state.repo.delete_professor(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// GET /solicitudes-profesores. Applications from professors, newest first.
#[utoipa::path(
    get,
    path = "/solicitudes-profesores",
    params(StatusFilter),
    responses((status = 200, description = "Professor requests", body = [ProfessorRequest]))
)]
pub async fn list_professor_requests(
    State(state): State<AppState>,
    Query(filter): Query<StatusFilter>,
) -> Json<Vec<ProfessorRequest>> {
    Json(state.repo.get_professor_requests(filter.status).await)
}

/// PUT /solicitudes-profesores/{id}. Resolves a pending application; approval
/// creates the professor record. A request already resolved returns 404, same
/// as a missing one.
#[utoipa::path(
    put,
    path = "/solicitudes-profesores/{id}",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = ResolveRequest,
    responses(
        (status = 200, description = "Resolved", body = ProfessorRequest),
        (status = 404, description = "Not Found or already resolved")
    )
)]
pub async fn resolve_professor_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResolveRequest>,
) -> Result<Json<ProfessorRequest>, StatusCode> {
    match state
        .repo
        .resolve_professor_request(id, payload.approve)
        .await
    {
        Some(request) => Ok(Json(request)),
        None => Err(StatusCode::NOT_FOUND),
    }
}
