use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::auth::{Principal, Role};

/// RouteDescriptor
///
/// One entry of the static route-authorization table: a dashboard screen path,
/// its menu label, and the closed set of roles allowed to reach it. Role sets
/// are plain data rather than predicates so the whole authorization surface is
/// auditable in one place.
#[derive(Debug, PartialEq)]
pub struct RouteDescriptor {
    /// Path segment the screen is mounted at (no leading slash).
    pub path: &'static str,
    /// Menu label shown to authorized principals.
    pub label: &'static str,
    allowed: &'static [Role],
}

impl RouteDescriptor {
    /// Whether the principal may reach this screen. Total: a principal whose
    /// stored role was not a member of the closed role set (`role == None`)
    /// is denied every gated route, never an error.
    pub fn permits(&self, principal: &Principal) -> bool {
        principal
            .role
            .is_some_and(|role| self.allowed.contains(&role))
    }

    /// Absolute href for menu rendering.
    pub fn href(&self) -> String {
        format!("/{}", self.path)
    }
}

/// The route-authorization table. Ordered: menu rendering preserves this
/// order. Paths are unique. Built once at compile time, never mutated.
pub const ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor {
        path: "posts",
        label: "Posts",
        allowed: &[Role::Admin],
    },
    RouteDescriptor {
        path: "usuarios",
        label: "Usuarios",
        allowed: &[Role::Admin],
    },
    RouteDescriptor {
        path: "home",
        label: "Home Posts",
        allowed: &[Role::Admin],
    },
    RouteDescriptor {
        path: "autoridades",
        label: "Autoridades",
        allowed: &[Role::Admin],
    },
    RouteDescriptor {
        path: "semestres",
        label: "Semestres",
        allowed: &[Role::Admin, Role::EventManager],
    },
    RouteDescriptor {
        path: "escuelas",
        label: "Escuelas",
        allowed: &[Role::Admin, Role::EventManager],
    },
    RouteDescriptor {
        path: "solicitudes-profesores",
        label: "Solicitudes Profesores",
        allowed: &[Role::Admin, Role::EventManager],
    },
    RouteDescriptor {
        path: "profesores",
        label: "Profesores",
        allowed: &[Role::Admin, Role::EventManager],
    },
    RouteDescriptor {
        path: "competencias",
        label: "Competencias",
        allowed: &[Role::Admin, Role::EventManager],
    },
    RouteDescriptor {
        path: "capacitaciones",
        label: "Capacitaciones",
        allowed: &[Role::Admin, Role::EventManager],
    },
    RouteDescriptor {
        path: "solicitudes",
        label: "Solicitudes",
        allowed: &[Role::Admin],
    },
    RouteDescriptor {
        path: "capacitaciones-documento",
        label: "Capacitaciones por Documento",
        allowed: &[Role::Admin, Role::EventManager],
    },
    RouteDescriptor {
        path: "capacitaciones-reportes",
        label: "Estadísticas de Capacitaciones",
        allowed: &[Role::Admin, Role::EventManager],
    },
    RouteDescriptor {
        path: "cloud",
        label: "Cloud",
        allowed: &[Role::Admin, Role::EventManager],
    },
];

pub const LOGIN_PATH: &str = "login";
pub const DASHBOARD_PATH: &str = "dashboard";

/// authorized_routes
///
/// Filters the table by the principal's role, preserving table order. Pure and
/// idempotent: same principal, same result.
pub fn authorized_routes(principal: &Principal) -> Vec<&'static RouteDescriptor> {
    ROUTES
        .iter()
        .filter(|descriptor| descriptor.permits(principal))
        .collect()
}

/// Looks up a descriptor by its path segment.
pub fn find_route(segment: &str) -> Option<&'static RouteDescriptor> {
    ROUTES.iter().find(|descriptor| descriptor.path == segment)
}

/// MenuEntry
///
/// One materialized navigation item for the dashboard shell.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MenuEntry {
    pub path: String,
    pub label: String,
}

/// Materializes the reachable screens for a principal, in table order.
pub fn menu_for(principal: &Principal) -> Vec<MenuEntry> {
    authorized_routes(principal)
        .into_iter()
        .map(|descriptor| MenuEntry {
            path: descriptor.href(),
            label: descriptor.label.to_string(),
        })
        .collect()
}

/// SessionState
///
/// Lifecycle of a session: `Resolving` while the authentication check is in
/// flight, then exactly one of `Unauthenticated` or `Authenticated`. A session
/// never re-enters `Resolving`; role changes require a fresh resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Resolving,
    Unauthenticated,
    Authenticated(Principal),
}

impl SessionState {
    pub fn is_resolving(&self) -> bool {
        matches!(self, SessionState::Resolving)
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            SessionState::Authenticated(principal) => Some(principal),
            _ => None,
        }
    }
}

impl From<Option<Principal>> for SessionState {
    fn from(principal: Option<Principal>) -> Self {
        match principal {
            Some(principal) => SessionState::Authenticated(principal),
            None => SessionState::Unauthenticated,
        }
    }
}

/// NavDecision
///
/// Outcome of routing one requested path against the session state and the
/// authorization table.
#[derive(Debug, Clone, PartialEq)]
pub enum NavDecision {
    /// Authentication still in flight: render the placeholder, mount nothing.
    Splash,
    /// Serve the login screen.
    Login,
    /// Serve the dashboard shell.
    Dashboard,
    /// Serve the authorized screen behind this descriptor.
    Mount(&'static RouteDescriptor),
    /// Path requires a session: send to the login screen.
    RedirectToLogin,
    /// Unknown path, or a path this principal may not reach. The two cases are
    /// indistinguishable on purpose: no 403 surface exists.
    RedirectToRoot,
}

/// resolve_path
///
/// The navigation composition rule. Pure lookup over the table; the first path
/// segment identifies the screen.
pub fn resolve_path(session: &SessionState, path: &str) -> NavDecision {
    let segment = path.trim_start_matches('/').split('/').next().unwrap_or("");

    match session {
        SessionState::Resolving => NavDecision::Splash,
        SessionState::Unauthenticated => {
            if segment == LOGIN_PATH {
                NavDecision::Login
            } else {
                NavDecision::RedirectToLogin
            }
        }
        SessionState::Authenticated(principal) => {
            if segment == LOGIN_PATH {
                return NavDecision::RedirectToRoot;
            }
            if segment.is_empty() || segment == DASHBOARD_PATH {
                return NavDecision::Dashboard;
            }
            match find_route(segment) {
                Some(descriptor) if descriptor.permits(principal) => {
                    NavDecision::Mount(descriptor)
                }
                _ => NavDecision::RedirectToRoot,
            }
        }
    }
}

/// AuthResolutionFailure taxonomy. Both variants degrade to an unauthenticated
/// session after the bounded retry; neither is surfaced as a blocking error.
#[derive(Debug, Error)]
pub enum AuthResolutionError {
    #[error("authentication check timed out after {0:?}")]
    Timeout(Duration),
    #[error("authentication backend unavailable: {0}")]
    Unavailable(String),
}

/// SessionProvider
///
/// The authentication capability the resolver consumes. `Ok(None)` means the
/// check completed and found no valid session; `Err` means the check itself
/// could not complete.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn authenticate(&self) -> Result<Option<Principal>, AuthResolutionError>;
}

#[async_trait]
impl<P: SessionProvider + ?Sized> SessionProvider for std::sync::Arc<P> {
    async fn authenticate(&self) -> Result<Option<Principal>, AuthResolutionError> {
        (**self).authenticate().await
    }
}

/// SessionResolver
///
/// Drives the session state machine out of `Resolving`. Each attempt is
/// bounded by the configured timeout; one retry is made on timeout or backend
/// failure, after which the session degrades to `Unauthenticated`. A completed
/// check with no principal is terminal immediately (no retry). Dropping the
/// returned future abandons the in-flight check without global side effects.
pub struct SessionResolver<P> {
    provider: P,
    timeout: Duration,
}

const RESOLUTION_ATTEMPTS: u32 = 2;

impl<P: SessionProvider> SessionResolver<P> {
    pub fn new(provider: P, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Resolves the session. Always returns a terminal state.
    pub async fn resolve(&self) -> SessionState {
        for attempt in 1..=RESOLUTION_ATTEMPTS {
            match tokio::time::timeout(self.timeout, self.provider.authenticate()).await {
                Ok(Ok(principal)) => return SessionState::from(principal),
                Ok(Err(err)) => {
                    tracing::warn!(attempt, error = %err, "session resolution failed");
                }
                Err(_) => {
                    let err = AuthResolutionError::Timeout(self.timeout);
                    tracing::warn!(attempt, error = %err, "session resolution timed out");
                }
            }
        }
        SessionState::Unauthenticated
    }
}
