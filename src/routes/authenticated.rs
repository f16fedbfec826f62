use crate::{
    AppState,
    handlers::{cloud, session},
};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Service endpoints available to every signed-in principal regardless of
/// role. These are not screens — they sit outside the route-authorization
/// table — so they answer 401 to anonymous API access instead of redirecting.
/// The authentication middleware is layered over this router in `create_router`.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /me
        // The authenticated principal's profile and parsed role.
        .route("/me", get(session::me))
        // POST /upload/presigned
        // Media pipeline for form uploads: a short-lived presigned URL lets
        // the client push files straight to object storage.
        .route("/upload/presigned", post(cloud::upload_presigned_url))
}
