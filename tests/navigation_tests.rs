use cms_portal::auth::{Principal, Role};
use cms_portal::navigation::{
    self, NavDecision, ROUTES, SessionState, authorized_routes, menu_for, resolve_path,
};
use std::collections::HashSet;
use uuid::Uuid;

fn principal(role: Option<Role>) -> Principal {
    Principal::new(Uuid::new_v4(), role)
}

fn paths(routes: &[&'static navigation::RouteDescriptor]) -> Vec<&'static str> {
    routes.iter().map(|descriptor| descriptor.path).collect()
}

// --- Table invariants ---

#[test]
fn table_paths_are_unique() {
    let mut seen = HashSet::new();
    for descriptor in ROUTES {
        assert!(
            seen.insert(descriptor.path),
            "duplicate table path: {}",
            descriptor.path
        );
    }
}

#[test]
fn authorized_routes_is_an_order_preserving_subsequence() {
    for role in [Some(Role::Admin), Some(Role::EventManager), Some(Role::Author), None] {
        let routes = authorized_routes(&principal(role));
        // Every returned descriptor appears in the table, and their table
        // positions are strictly increasing.
        let mut last_index = None;
        for descriptor in routes {
            let index = ROUTES
                .iter()
                .position(|entry| entry.path == descriptor.path)
                .expect("descriptor not in table");
            if let Some(last) = last_index {
                assert!(index > last, "table order not preserved");
            }
            last_index = Some(index);
        }
    }
}

#[test]
fn authorized_routes_matches_descriptor_permits_exactly() {
    // No false positives, no false negatives.
    for role in [Some(Role::Admin), Some(Role::EventManager), Some(Role::Author), None] {
        let p = principal(role);
        let authorized: HashSet<&str> = paths(&authorized_routes(&p)).into_iter().collect();
        for descriptor in ROUTES {
            assert_eq!(
                authorized.contains(descriptor.path),
                descriptor.permits(&p),
                "mismatch for {} with role {:?}",
                descriptor.path,
                role
            );
        }
    }
}

#[test]
fn authorized_routes_is_idempotent() {
    let p = principal(Some(Role::EventManager));
    assert_eq!(
        paths(&authorized_routes(&p)),
        paths(&authorized_routes(&p))
    );
}

// --- Role scenarios ---

#[test]
fn admin_reaches_every_screen() {
    let routes = authorized_routes(&principal(Some(Role::Admin)));
    assert_eq!(routes.len(), ROUTES.len());
    let admin_paths = paths(&routes);
    assert!(admin_paths.contains(&"posts"));
    assert!(admin_paths.contains(&"usuarios"));
}

#[test]
fn event_manager_is_scoped_to_academic_screens() {
    let routes = paths(&authorized_routes(&principal(Some(Role::EventManager))));
    assert!(!routes.contains(&"posts"));
    assert!(!routes.contains(&"usuarios"));
    assert!(!routes.contains(&"home"));
    assert!(!routes.contains(&"autoridades"));
    assert!(!routes.contains(&"solicitudes"));
    assert!(routes.contains(&"semestres"));
    assert!(routes.contains(&"escuelas"));
    assert!(routes.contains(&"profesores"));
    assert!(routes.contains(&"cloud"));
}

#[test]
fn author_gets_no_gated_screens() {
    assert!(authorized_routes(&principal(Some(Role::Author))).is_empty());
}

#[test]
fn unrecognized_role_gets_no_access_without_error() {
    // A stored role outside the closed set parses to None and is simply
    // denied everywhere.
    assert_eq!(Role::parse("super_admin"), None);
    assert!(authorized_routes(&principal(None)).is_empty());
}

#[test]
fn menu_preserves_table_order_and_labels() {
    let menu = menu_for(&principal(Some(Role::Admin)));
    assert_eq!(menu.len(), ROUTES.len());
    assert_eq!(menu[0].path, "/posts");
    assert_eq!(menu[0].label, "Posts");
    let last = menu.last().unwrap();
    assert_eq!(last.path, "/cloud");
    assert_eq!(last.label, "Cloud");
}

// --- Path resolution ---

#[test]
fn unauthenticated_paths_redirect_to_login() {
    let state = SessionState::Unauthenticated;
    assert_eq!(
        resolve_path(&state, "/profesores"),
        NavDecision::RedirectToLogin
    );
    assert_eq!(resolve_path(&state, "/"), NavDecision::RedirectToLogin);
    assert_eq!(
        resolve_path(&state, "/no-such-path"),
        NavDecision::RedirectToLogin
    );
    assert_eq!(resolve_path(&state, "/login"), NavDecision::Login);
}

#[test]
fn authenticated_login_redirects_to_root() {
    let state = SessionState::Authenticated(principal(Some(Role::Admin)));
    assert_eq!(resolve_path(&state, "/login"), NavDecision::RedirectToRoot);
}

#[test]
fn unknown_path_redirects_to_root_for_authenticated() {
    let state = SessionState::Authenticated(principal(Some(Role::Admin)));
    assert_eq!(
        resolve_path(&state, "/no-such-path"),
        NavDecision::RedirectToRoot
    );
}

#[test]
fn forbidden_path_is_indistinguishable_from_unknown() {
    // An event manager asking for the user screen gets exactly the decision a
    // nonexistent path gets: a redirect to the root, never a 403.
    let state = SessionState::Authenticated(principal(Some(Role::EventManager)));
    assert_eq!(
        resolve_path(&state, "/usuarios"),
        resolve_path(&state, "/no-such-path")
    );
    assert_eq!(
        resolve_path(&state, "/usuarios"),
        NavDecision::RedirectToRoot
    );
}

#[test]
fn authorized_paths_mount_their_descriptor() {
    let state = SessionState::Authenticated(principal(Some(Role::EventManager)));
    match resolve_path(&state, "/semestres") {
        NavDecision::Mount(descriptor) => assert_eq!(descriptor.path, "semestres"),
        other => panic!("expected mount, got {:?}", other),
    }
    // Sub-paths resolve through their screen's first segment.
    match resolve_path(&state, "/escuelas/3f0c") {
        NavDecision::Mount(descriptor) => assert_eq!(descriptor.path, "escuelas"),
        other => panic!("expected mount, got {:?}", other),
    }
}

#[test]
fn root_and_dashboard_serve_the_shell() {
    let state = SessionState::Authenticated(principal(Some(Role::Author)));
    assert_eq!(resolve_path(&state, "/"), NavDecision::Dashboard);
    assert_eq!(resolve_path(&state, "/dashboard"), NavDecision::Dashboard);
}

#[test]
fn resolving_state_renders_the_placeholder_everywhere() {
    let state = SessionState::Resolving;
    for path in ["/", "/login", "/posts", "/no-such-path"] {
        assert_eq!(resolve_path(&state, path), NavDecision::Splash);
    }
}
