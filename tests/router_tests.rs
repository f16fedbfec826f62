use cms_portal::{
    AppConfig, AppState, MemoryRepository, MockStorageService, create_router,
    models::{DashboardResponse, Post, School, Semester},
    repository::RepositoryState,
    storage::StorageState,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    address: String,
    repo: Arc<MemoryRepository>,
}

/// Spins up the full router over the in-memory repository and the mock
/// storage. `AppConfig::default()` runs in `Env::Local`, so the `x-user-id`
/// header authenticates seeded users exactly as in local development.
async fn spawn_app() -> TestApp {
    let repo = Arc::new(MemoryRepository::new());
    let storage = Arc::new(MockStorageService::new().with_object("cloud/informe.pdf", 2048))
        as StorageState;

    let state = AppState {
        repo: repo.clone() as RepositoryState,
        storage,
        config: AppConfig::default(),
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address, repo }
}

/// Client that reports redirects instead of following them.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

// --- Navigation behavior over the wire ---

#[tokio::test]
async fn health_is_open() {
    let app = spawn_app().await;
    let response = client()
        .get(format!("{}/health", app.address))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn anonymous_screen_access_redirects_to_login() {
    let app = spawn_app().await;

    for path in ["/profesores", "/", "/posts", "/semestres"] {
        let response = client()
            .get(format!("{}{}", app.address, path))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 303, "path {}", path);
        assert_eq!(location(&response), "/login", "path {}", path);
    }
}

#[tokio::test]
async fn anonymous_unknown_path_redirects_to_login() {
    let app = spawn_app().await;
    let response = client()
        .get(format!("{}/no-such-path", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn anonymous_login_screen_is_reachable() {
    let app = spawn_app().await;
    let response = client()
        .get(format!("{}/login", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn authenticated_login_screen_redirects_to_root() {
    let app = spawn_app().await;
    let admin = app.repo.seed_user(Uuid::new_v4(), "a@u.edu", "Admin", "admin");

    let response = client()
        .get(format!("{}/login", app.address))
        .header("x-user-id", admin.id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn admin_unknown_path_redirects_to_root() {
    let app = spawn_app().await;
    let admin = app.repo.seed_user(Uuid::new_v4(), "a@u.edu", "Admin", "admin");

    let response = client()
        .get(format!("{}/no-such-path", app.address))
        .header("x-user-id", admin.id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn forbidden_screen_redirects_like_unknown_path() {
    let app = spawn_app().await;
    let manager = app
        .repo
        .seed_user(Uuid::new_v4(), "m@u.edu", "Manager", "event_manager");

    // An existing-but-unauthorized screen and a nonexistent path are
    // indistinguishable: both 303 to the dashboard root, never 403.
    for path in ["/usuarios", "/posts", "/no-such-path"] {
        let response = client()
            .get(format!("{}{}", app.address, path))
            .header("x-user-id", manager.id.to_string())
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 303, "path {}", path);
        assert_eq!(location(&response), "/", "path {}", path);
    }
}

#[tokio::test]
async fn dashboard_menu_is_filtered_by_role() {
    let app = spawn_app().await;
    let admin = app.repo.seed_user(Uuid::new_v4(), "a@u.edu", "Admin", "admin");
    let manager = app
        .repo
        .seed_user(Uuid::new_v4(), "m@u.edu", "Manager", "event_manager");
    let author = app
        .repo
        .seed_user(Uuid::new_v4(), "w@u.edu", "Author", "author");

    let admin_shell: DashboardResponse = client()
        .get(format!("{}/", app.address))
        .header("x-user-id", admin.id.to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(admin_shell.menu.len(), 14);
    assert_eq!(admin_shell.menu[0].path, "/posts");

    let manager_shell: DashboardResponse = client()
        .get(format!("{}/", app.address))
        .header("x-user-id", manager.id.to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let manager_paths: Vec<&str> = manager_shell.menu.iter().map(|m| m.path.as_str()).collect();
    assert!(!manager_paths.contains(&"/posts"));
    assert!(!manager_paths.contains(&"/usuarios"));
    assert!(manager_paths.contains(&"/semestres"));
    assert!(manager_paths.contains(&"/escuelas"));

    let author_shell: DashboardResponse = client()
        .get(format!("{}/", app.address))
        .header("x-user-id", author.id.to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(author_shell.menu.is_empty());
}

#[tokio::test]
async fn unrecognized_stored_role_reaches_the_shell_with_no_screens() {
    let app = spawn_app().await;
    let ghost = app.repo.seed_user(Uuid::new_v4(), "g@u.edu", "Ghost", "ghost");

    // The shell still answers (authenticated), with an empty menu.
    let shell: DashboardResponse = client()
        .get(format!("{}/", app.address))
        .header("x-user-id", ghost.id.to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(shell.menu.is_empty());

    // Every gated screen redirects, same as an unknown path.
    let response = client()
        .get(format!("{}/semestres", app.address))
        .header("x-user-id", ghost.id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn session_services_answer_401_to_anonymous_api_access() {
    let app = spawn_app().await;
    let response = client()
        .get(format!("{}/me", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

// --- Screen round trips ---

#[tokio::test]
async fn school_lifecycle_as_event_manager() {
    let app = spawn_app().await;
    let manager = app
        .repo
        .seed_user(Uuid::new_v4(), "m@u.edu", "Manager", "event_manager");
    let http = client();

    // Create
    let created: School = http
        .post(format!("{}/escuelas", app.address))
        .header("x-user-id", manager.id.to_string())
        .json(&serde_json::json!({ "name": "Ingeniería de Sistemas" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created.name, "Ingeniería de Sistemas");

    // Update
    let updated: School = http
        .put(format!("{}/escuelas/{}", app.address, created.id))
        .header("x-user-id", manager.id.to_string())
        .json(&serde_json::json!({ "name": "Ingeniería Industrial" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated.name, "Ingeniería Industrial");

    // List
    let listed: Vec<School> = http
        .get(format!("{}/escuelas", app.address))
        .header("x-user-id", manager.id.to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    // Delete
    let deleted = http
        .delete(format!("{}/escuelas/{}", app.address, created.id))
        .header("x-user-id", manager.id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), 204);
}

#[tokio::test]
async fn post_creation_records_the_session_author() {
    let app = spawn_app().await;
    let admin = app.repo.seed_user(Uuid::new_v4(), "a@u.edu", "Admin", "admin");

    let post: Post = client()
        .post(format!("{}/posts", app.address))
        .header("x-user-id", admin.id.to_string())
        .json(&serde_json::json!({
            "title": "Convocatoria",
            "content": "Inscripciones abiertas",
            "tags": ["convocatoria"],
            "published": true
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(post.author_id, admin.id);
    assert_eq!(post.tags, vec!["convocatoria"]);
}

#[tokio::test]
async fn semester_listing_is_visible_to_event_manager_but_not_author() {
    let app = spawn_app().await;
    let manager = app
        .repo
        .seed_user(Uuid::new_v4(), "m@u.edu", "Manager", "event_manager");
    let author = app
        .repo
        .seed_user(Uuid::new_v4(), "w@u.edu", "Author", "author");
    let http = client();

    let created: Semester = http
        .post(format!("{}/semestres", app.address))
        .header("x-user-id", manager.id.to_string())
        .json(&serde_json::json!({
            "name": "2026-I",
            "start_date": "2026-03-01",
            "end_date": "2026-07-15",
            "active": true
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created.name, "2026-I");

    let denied = http
        .get(format!("{}/semestres", app.address))
        .header("x-user-id", author.id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(denied.status(), 303);
    assert_eq!(location(&denied), "/");
}

#[tokio::test]
async fn cloud_screen_lists_and_deletes_objects() {
    let app = spawn_app().await;
    let admin = app.repo.seed_user(Uuid::new_v4(), "a@u.edu", "Admin", "admin");
    let http = client();

    let objects: Vec<serde_json::Value> = http
        .get(format!("{}/cloud", app.address))
        .header("x-user-id", admin.id.to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0]["key"], "cloud/informe.pdf");

    let deleted = http
        .delete(format!("{}/cloud/cloud/informe.pdf", app.address))
        .header("x-user-id", admin.id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), 204);

    let objects: Vec<serde_json::Value> = http
        .get(format!("{}/cloud", app.address))
        .header("x-user-id", admin.id.to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(objects.is_empty());
}

#[tokio::test]
async fn presigned_upload_is_available_to_any_authenticated_role() {
    let app = spawn_app().await;
    let author = app
        .repo
        .seed_user(Uuid::new_v4(), "w@u.edu", "Author", "author");

    let response = client()
        .post(format!("{}/upload/presigned", app.address))
        .header("x-user-id", author.id.to_string())
        .json(&serde_json::json!({ "filename": "foto.png", "file_type": "image/png" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    let key = body["resource_key"].as_str().unwrap();
    assert!(key.starts_with("uploads/"));
    assert!(key.ends_with(".png"));
    assert!(body["upload_url"].as_str().unwrap().contains("signature=fake"));
}

#[tokio::test]
async fn pending_request_resolution_is_single_shot() {
    let app = spawn_app().await;
    let admin = app.repo.seed_user(Uuid::new_v4(), "a@u.edu", "Admin", "admin");
    let request = app.repo.seed_request("informacion", "pending");
    let http = client();

    let first = http
        .put(format!("{}/solicitudes/{}", app.address, request.id))
        .header("x-user-id", admin.id.to_string())
        .json(&serde_json::json!({ "approve": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 200);

    // Already resolved: indistinguishable from a missing request.
    let second = http
        .put(format!("{}/solicitudes/{}", app.address, request.id))
        .header("x-user-id", admin.id.to_string())
        .json(&serde_json::json!({ "approve": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 404);
}

#[tokio::test]
async fn approving_a_professor_request_creates_the_professor() {
    let app = spawn_app().await;
    let manager = app
        .repo
        .seed_user(Uuid::new_v4(), "m@u.edu", "Manager", "event_manager");
    let request = app.repo.seed_professor_request("70112233", "pending");
    let http = client();

    let resolved = http
        .put(format!(
            "{}/solicitudes-profesores/{}",
            app.address, request.id
        ))
        .header("x-user-id", manager.id.to_string())
        .json(&serde_json::json!({ "approve": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resolved.status(), 200);

    let professors: Vec<serde_json::Value> = http
        .get(format!("{}/profesores", app.address))
        .header("x-user-id", manager.id.to_string())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(professors.len(), 1);
    assert_eq!(professors[0]["document"], "70112233");
}

#[tokio::test]
async fn deleting_own_account_is_rejected() {
    let app = spawn_app().await;
    let admin = app.repo.seed_user(Uuid::new_v4(), "a@u.edu", "Admin", "admin");

    let response = client()
        .delete(format!("{}/usuarios/{}", app.address, admin.id))
        .header("x-user-id", admin.id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
}
