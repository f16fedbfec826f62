/// Router Module Index
///
/// Organizes the application's routing into security-segregated modules. The
/// split mirrors the three reachability tiers of the navigation rules: open
/// paths, session-scoped service endpoints, and table-gated screens.

/// Routes accessible without a session: liveness and the login surface.
pub mod public;

/// Session-scoped service endpoints (profile, media uploads). Guarded by the
/// authentication middleware; not part of the screen table.
pub mod authenticated;

/// The dashboard screens from the route-authorization table. Every request
/// passes the route gate, which mounts, or redirects, per session state and
/// role.
pub mod dashboard;
