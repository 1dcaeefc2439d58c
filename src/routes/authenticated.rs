use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Pages that need a logged-in `user` or `admin`. Handlers take the session
/// through `RequireSession`, so they answer 401 on their own if the policy
/// table is reconfigured to leave them uncovered.
pub fn authenticated_routes() -> Router<AppState> {
    Router::new()
        // GET /dashboard
        // Greeting plus the admin stats card for admins.
        .route("/dashboard", get(handlers::dashboard))
}
