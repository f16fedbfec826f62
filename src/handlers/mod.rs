// Handler modules, one per dashboard screen plus the session/shell surface.
// Reached only through the routers in `routes`; role gating happens in the
// navigation layer before any handler runs.

pub mod authorities;
pub mod cloud;
pub mod competencies;
pub mod posts;
pub mod professors;
pub mod requests;
pub mod schools;
pub mod semesters;
pub mod session;
pub mod trainings;
pub mod users;
