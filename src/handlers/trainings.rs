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
        Attendance, CreateTrainingRequest, RegisterAttendanceRequest, SchoolAttendance, Training,
        UpdateTrainingRequest,
    },
};

/// Accepted query parameters for the training listing.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct TrainingFilter {
    pub semester_id: Option<Uuid>,
}

/// Query parameters for the search-by-document screen.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct DocumentQuery {
    /// Professor identity-document number.
    pub document: String,
}

/// Query parameters for the statistics feed.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct StatsFilter {
    pub semester_id: Option<Uuid>,
}

/// GET /capacitaciones.
#[utoipa::path(
    get,
    path = "/capacitaciones",
    params(TrainingFilter),
    responses((status = 200, description = "Trainings", body = [Training]))
)]
pub async fn list_trainings(
    State(state): State<AppState>,
    Query(filter): Query<TrainingFilter>,
) -> Json<Vec<Training>> {
    Json(state.repo.get_trainings(filter.semester_id).await)
}

/// POST /capacitaciones.
#[utoipa::path(
    post,
    path = "/capacitaciones",
    request_body = CreateTrainingRequest,
    responses((status = 200, description = "Created", body = Training))
)]
pub async fn create_training(
    State(state): State<AppState>,
    Json(payload): Json<CreateTrainingRequest>,
) -> Result<Json<Training>, StatusCode> {
    match state.repo.create_training(payload).await {
        Some(training) => Ok(Json(training)),
        None => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// PUT /capacitaciones/{id}.
#[utoipa::path(
    put,
    path = "/capacitaciones/{id}",
    params(("id" = Uuid, Path, description = "Training ID")),
    request_body = UpdateTrainingRequest,
    responses(
        (status = 200, description = "Updated", body = Training),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_training(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTrainingRequest>,
) -> Result<Json<Training>, StatusCode> {
    match state.repo.update_training(id, payload).await {
        Some(training) => Ok(Json(training)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// DELETE /capacitaciones/{id}.
#[utoipa::path(
    delete,
    path = "/capacitaciones/{id}",
    params(("id" = Uuid, Path, description = "Training ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_training(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    if state.repo.delete_training(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// register_attendance
///
/// POST /capacitaciones/{id}/asistencia. One row per professor per training,
/// enforced by the composite key; re-registering the same professor yields
/// 409 without an error path.
#[utoipa::path(
    post,
    path = "/capacitaciones/{id}/asistencia",
    params(("id" = Uuid, Path, description = "Training ID")),
    request_body = RegisterAttendanceRequest,
    responses(
        (status = 200, description = "Registered"),
        (status = 409, description = "Already registered")
    )
)]
pub async fn register_attendance(
    State(state): State<AppState>,
    Path(training_id): Path<Uuid>,
    Json(payload): Json<RegisterAttendanceRequest>,
) -> Result<StatusCode, StatusCode> {
    let attendance = Attendance {
        training_id,
        professor_id: payload.professor_id,
    };

    match state.repo.register_attendance(attendance).await {
        true => Ok(StatusCode::OK),
        false => Err(StatusCode::CONFLICT),
    }
}

/// trainings_by_document
///
/// GET /capacitaciones-documento?document=... — every training the professor
/// with that document attended. An unknown document yields an empty list, not
/// an error.
#[utoipa::path(
    get,
    path = "/capacitaciones-documento",
    params(DocumentQuery),
    responses((status = 200, description = "Attended trainings", body = [Training]))
)]
pub async fn trainings_by_document(
    State(state): State<AppState>,
    Query(query): Query<DocumentQuery>,
) -> Json<Vec<Training>> {
    Json(state.repo.get_trainings_by_document(&query.document).await)
}

/// attendance_stats
///
/// GET /capacitaciones-reportes — attendance counts grouped by school, the
/// feed behind the statistics chart.
#[utoipa::path(
    get,
    path = "/capacitaciones-reportes",
    params(StatsFilter),
    responses((status = 200, description = "Attendance by school", body = [SchoolAttendance]))
)]
pub async fn attendance_stats(
    State(state): State<AppState>,
    Query(filter): Query<StatsFilter>,
) -> Json<Vec<SchoolAttendance>> {
    Json(state.repo.attendance_by_school(filter.semester_id).await)
}
