use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    models::{Request, ResolveRequest},
};

#[derive(Deserialize, utoipa::IntoParams)]
pub struct StatusFilter {
    /// One of `pending`, `approved`, `rejected`.
    pub status: Option<String>,
}

/// GET /solicitudes. General inquiries from the public site, newest first.
#[utoipa::path(
    get,
    path = "/solicitudes",
    params(StatusFilter),
    responses((status = 200, description = "Requests", body = [Request]))
)]
pub async fn list_requests(
    State(state): State<AppState>,
    Query(filter): Query<StatusFilter>,
) -> Json<Vec<Request>> {
    Json(state.repo.get_requests(filter.status).await)
}

/// PUT /solicitudes/{id}. Resolves a pending request. Requests already
/// resolved return 404, same as missing ones.
#[utoipa::path(
    put,
    path = "/solicitudes/{id}",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = ResolveRequest,
    responses(
        (status = 200, description = "Resolved", body = Request),
        (status = 404, description = "Not Found or already resolved")
    )
)]
pub async fn resolve_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResolveRequest>,
) -> Result<Json<Request>, StatusCode> {
    match state.repo.resolve_request(id, payload.approve).await {
        Some(request) => Ok(Json(request)),
        None => Err(StatusCode::NOT_FOUND),
    }
}
