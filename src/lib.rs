use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod handlers;
pub mod models;
pub mod navigation;
pub mod repository;
pub mod storage;
pub mod testing;

// Routing segregation: public surface, session services, gated screens.
pub mod routes;
use auth::{MaybePrincipal, Principal};
use navigation::NavDecision;
use routes::{authenticated, dashboard, public};

// --- Public Re-exports ---

// Core state types for the application entry point (main.rs) and tests.
pub use config::AppConfig;
pub use repository::{PostgresRepository, RepositoryState};
pub use storage::{MockStorageService, S3StorageClient, StorageState};
pub use testing::MemoryRepository;

/// ApiDoc
///
/// Auto-generated OpenAPI documentation, aggregating every handler decorated
/// with `#[utoipa::path]` and the schemas used in request/response bodies.
/// Served as JSON at `/api-docs/openapi.json` behind the Swagger UI.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::session::login_screen, handlers::session::login,
        handlers::session::dashboard, handlers::session::me,
        handlers::users::list_users, handlers::users::create_user,
        handlers::users::update_user, handlers::users::delete_user,
        handlers::posts::list_posts, handlers::posts::get_post, handlers::posts::create_post,
        handlers::posts::update_post, handlers::posts::delete_post, handlers::posts::list_tags,
        handlers::posts::create_tag, handlers::posts::list_home_posts,
        handlers::posts::reorder_home_posts,
        handlers::authorities::list_authorities, handlers::authorities::create_authority,
        handlers::authorities::update_authority, handlers::authorities::delete_authority,
        handlers::schools::list_schools, handlers::schools::create_school,
        handlers::schools::update_school, handlers::schools::delete_school,
        handlers::semesters::list_semesters, handlers::semesters::create_semester,
        handlers::semesters::update_semester, handlers::semesters::delete_semester,
        handlers::competencies::list_competencies, handlers::competencies::create_competency,
        handlers::competencies::update_competency, handlers::competencies::delete_competency,
        handlers::professors::list_professors, handlers::professors::create_professor,
        handlers::professors::update_professor, handlers::professors::delete_professor,
        handlers::professors::list_professor_requests,
        handlers::professors::resolve_professor_request,
        handlers::trainings::list_trainings, handlers::trainings::create_training,
        handlers::trainings::update_training, handlers::trainings::delete_training,
        handlers::trainings::register_attendance, handlers::trainings::trainings_by_document,
        handlers::trainings::attendance_stats,
        handlers::requests::list_requests, handlers::requests::resolve_request,
        handlers::cloud::list_cloud_objects, handlers::cloud::cloud_presigned_url,
        handlers::cloud::delete_cloud_object, handlers::cloud::upload_presigned_url,
    ),
    components(
        schemas(
            auth::Role, navigation::MenuEntry,
            models::User, models::CreateUserRequest, models::UpdateUserRequest,
            models::Post, models::CreatePostRequest, models::UpdatePostRequest,
            models::Tag, models::CreateTagRequest, models::HomeOrderRequest,
            models::School, models::CreateSchoolRequest, models::UpdateSchoolRequest,
            models::Professor, models::CreateProfessorRequest, models::UpdateProfessorRequest,
            models::ProfessorRequest, models::ResolveRequest,
            models::Competency, models::CreateCompetencyRequest, models::UpdateCompetencyRequest,
            models::Semester, models::CreateSemesterRequest, models::UpdateSemesterRequest,
            models::Training, models::CreateTrainingRequest, models::UpdateTrainingRequest,
            models::Attendance, models::RegisterAttendanceRequest, models::SchoolAttendance,
            models::Request,
            models::Authority, models::CreateAuthorityRequest, models::UpdateAuthorityRequest,
            models::PresignedUrlRequest, models::PresignedUrlResponse, models::StoredObject,
            models::LoginRequest, models::LoginResponse, models::UserProfile,
            models::DashboardResponse,
        )
    ),
    tags(
        (name = "cms-portal", description = "University CMS administration API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Single, thread-safe, immutable container for all application services and
/// configuration, shared across every request.
#[derive(Clone)]
pub struct AppState {
    /// Repository layer: database access behind the trait object.
    pub repo: RepositoryState,
    /// Storage layer: object storage and presigned URL generation.
    pub storage: StorageState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// Let extractors pull individual components out of the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Enforces authentication for the session-service routes. The `Principal`
/// extractor rejects with 401 before the handler runs when no valid session
/// is presented; these endpoints are API surface, not screens, so they do not
/// redirect.
async fn auth_middleware(_principal: Principal, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// route_gate
///
/// The navigation composer applied per request: resolves the requested path
/// against the session state and the route-authorization table, then mounts
/// or redirects. An unauthorized-but-existing screen and a nonexistent one
/// produce the same redirect, so probing the table from outside a role is
/// uninformative.
async fn route_gate(principal: MaybePrincipal, request: Request, next: Next) -> Response {
    match navigation::resolve_path(&principal.session_state(), request.uri().path()) {
        NavDecision::Mount(_) | NavDecision::Dashboard | NavDecision::Login => {
            next.run(request).await
        }
        NavDecision::RedirectToLogin => Redirect::to("/login").into_response(),
        NavDecision::RedirectToRoot => Redirect::to("/").into_response(),
        // Per-request resolution is awaited inside the extractor, so a request
        // never observes the in-flight state; kept for match totality.
        NavDecision::Splash => Redirect::to("/").into_response(),
    }
}

/// create_router
///
/// Assembles the routing structure, applies global and scoped middleware, and
/// registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS configuration.
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base router assembly.
    let base_router = Router::new()
        // Documentation: auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public surface: no middleware applied.
        .merge(public::public_routes())
        // Session services: authentication required, role irrelevant.
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        // Screens: every request resolved through the authorization table.
        .merge(
            dashboard::dashboard_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), route_gate)),
        )
        // Unknown paths redirect by session state, same as forbidden ones.
        .fallback(handlers::session::fallback)
        .with_state(state);

    // 3. Observability and correlation layers (outermost).
    base_router
        .layer(
            ServiceBuilder::new()
                // Unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // Request tracing spans carrying the request id.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // Return the generated x-request-id header to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS layer.
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes `TraceLayer` span creation: every log line of a request carries
/// the correlation id alongside method and URI.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
