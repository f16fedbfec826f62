use crate::{AppState, handlers::session};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// The only paths reachable without a session: the health probe and the login
/// surface. `GET /login` itself consults the navigation rule so an already
/// authenticated principal is bounced back to the dashboard root.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated endpoint for monitors and load balancer checks.
        .route("/health", get(session::health))
        // GET /login — the login screen; POST /login — credential grant relay
        // to the external auth provider.
        .route("/login", get(session::login_screen).post(session::login))
}
