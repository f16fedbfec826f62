use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    auth::Principal,
    models::{CreateUserRequest, UpdateUserRequest, User},
};

/// Accepted query parameters for the user listing.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct UserFilter {
    /// Substring match over email and name.
    pub search: Option<String>,
}

/// Minimal view of the external auth provider's signup response.
#[derive(Deserialize)]
struct SignupResponse {
    id: Uuid,
}

/// list_users
///
/// GET /usuarios.
#[utoipa::path(
    get,
    path = "/usuarios",
    params(UserFilter),
    responses((status = 200, description = "Users", body = [User]))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
) -> Json<Vec<User>> {
    Json(state.repo.get_users(filter.search).await)
}

/// create_user
///
/// POST /usuarios. Credentials live in the external auth provider: the
/// account is created there first, then the profile is mirrored locally under
/// the provider's canonical id, keeping the two stores key-synchronized. The
/// password never touches the local database.
#[utoipa::path(
    post,
    path = "/usuarios",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Created", body = User),
        (status = 400, description = "Provider rejected the account")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<User>, StatusCode> {
    let client = reqwest::Client::new();
    let signup_url = format!("{}/auth/v1/signup", state.config.auth_url);

    let response = client
        .post(signup_url)
        .header("apikey", &state.config.auth_key)
        .header("Content-Type", "application/json")
        .json(&serde_json::json!({ "email": payload.email, "password": payload.password }))
        .send()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !response.status().is_success() {
        // Duplicate email, weak password, etc.
        return Err(StatusCode::BAD_REQUEST);
    }

    let account = response
        .json::<SignupResponse>()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let mirrored = User {
        id: account.id,
        email: payload.email,
        name: payload.name,
        image: payload.image,
        role: payload.role.as_str().to_string(),
        ..User::default()
    };

    match state.repo.create_user(mirrored).await {
        Some(user) => Ok(Json(user)),
        None => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// update_user
///
/// PUT /usuarios/{id}. Partial update; only provided fields are written.
#[utoipa::path(
    put,
    path = "/usuarios/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = User),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<User>, StatusCode> {
    match state.repo.update_user(id, payload).await {
        Some(user) => Ok(Json(user)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// delete_user
///
/// DELETE /usuarios/{id}. A principal cannot delete itself; everything else
/// is a plain row removal (the provider account is deactivated out of band).
#[utoipa::path(
    delete,
    path = "/usuarios/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Cannot delete own account")
    )
)]
pub async fn delete_user(
    principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if principal.id == id {
        return StatusCode::CONFLICT;
    }
    if state.repo.delete_user(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
