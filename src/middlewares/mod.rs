pub mod auth;
pub mod cors;

pub use auth::{Admission, DASHBOARD_ROLES, MaybeSession, admit, require_dashboard_access, session_token};
pub use cors::create_cors;
