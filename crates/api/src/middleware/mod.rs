pub mod auth;
pub mod logging;

pub use auth::{require_admin_auth, require_organizer_auth, AdminAuth, OrganizerAuth};
