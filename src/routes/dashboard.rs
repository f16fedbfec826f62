use crate::{
    AppState,
    handlers::{
        authorities, cloud, competencies, posts, professors, requests, schools, semesters,
        session, trainings, users,
    },
};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Dashboard Router Module
///
/// Mounts every screen of the route-authorization table at its table path,
/// plus the shell itself (`/` and `/dashboard`). Access control is not
/// handled here: the route gate layered over this router in `create_router`
/// resolves each request against the table and redirects anything the
/// session may not reach. Keeping the mounting and the gating separate means
/// a screen added here without a table entry is unreachable by construction.
pub fn dashboard_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // The shell. Both spellings serve the greeting plus the filtered menu.
        .route("/", get(session::dashboard))
        .route("/dashboard", get(session::dashboard))
        // --- posts (admin) ---
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        // Tag picker feed; static segment declared before the id capture.
        .route("/posts/tags", get(posts::list_tags).post(posts::create_tag))
        .route(
            "/posts/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        // --- usuarios (admin) ---
        .route(
            "/usuarios",
            get(users::list_users).post(users::create_user),
        )
        .route(
            "/usuarios/{id}",
            put(users::update_user).delete(users::delete_user),
        )
        // --- home (admin) ---
        .route(
            "/home",
            get(posts::list_home_posts).put(posts::reorder_home_posts),
        )
        // --- autoridades (admin) ---
        .route(
            "/autoridades",
            get(authorities::list_authorities).post(authorities::create_authority),
        )
        .route(
            "/autoridades/{id}",
            put(authorities::update_authority).delete(authorities::delete_authority),
        )
        // --- semestres (admin, event_manager) ---
        .route(
            "/semestres",
            get(semesters::list_semesters).post(semesters::create_semester),
        )
        .route(
            "/semestres/{id}",
            put(semesters::update_semester).delete(semesters::delete_semester),
        )
        // --- escuelas (admin, event_manager) ---
        .route(
            "/escuelas",
            get(schools::list_schools).post(schools::create_school),
        )
        .route(
            "/escuelas/{id}",
            put(schools::update_school).delete(schools::delete_school),
        )
        // --- solicitudes-profesores (admin, event_manager) ---
        .route(
            "/solicitudes-profesores",
            get(professors::list_professor_requests),
        )
        .route(
            "/solicitudes-profesores/{id}",
            put(professors::resolve_professor_request),
        )
        // --- profesores (admin, event_manager) ---
        .route(
            "/profesores",
            get(professors::list_professors).post(professors::create_professor),
        )
        .route(
            "/profesores/{id}",
            put(professors::update_professor).delete(professors::delete_professor),
        )
        // --- competencias (admin, event_manager) ---
        .route(
            "/competencias",
            get(competencies::list_competencies).post(competencies::create_competency),
        )
        .route(
            "/competencias/{id}",
            put(competencies::update_competency).delete(competencies::delete_competency),
        )
        // --- capacitaciones (admin, event_manager) ---
        .route(
            "/capacitaciones",
            get(trainings::list_trainings).post(trainings::create_training),
        )
        .route(
            "/capacitaciones/{id}",
            put(trainings::update_training).delete(trainings::delete_training),
        )
        .route(
            "/capacitaciones/{id}/asistencia",
            post(trainings::register_attendance),
        )
        // --- solicitudes (admin) ---
        .route("/solicitudes", get(requests::list_requests))
        .route("/solicitudes/{id}", put(requests::resolve_request))
        // --- capacitaciones-documento / -reportes (admin, event_manager) ---
        .route(
            "/capacitaciones-documento",
            get(trainings::trainings_by_document),
        )
        .route(
            "/capacitaciones-reportes",
            get(trainings::attendance_stats),
        )
        // --- cloud (admin, event_manager) ---
        .route("/cloud", get(cloud::list_cloud_objects))
        .route("/cloud/presigned", post(cloud::cloud_presigned_url))
        .route("/cloud/{*key}", delete(cloud::delete_cloud_object))
}
