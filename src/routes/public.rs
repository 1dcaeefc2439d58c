use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints the default policy table leaves unprotected. The guard still runs
/// in front of them; the only redirect it can produce here is sending an
/// already logged-in principal from `/login` to the landing page.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // GET /login?callbackUrl=...
        // Role picker descriptor; POST issues the session cookie.
        .route("/login", get(handlers::login_page).post(handlers::login))
        // POST /logout
        // Expires the session cookie.
        .route("/logout", post(handlers::logout))
        // GET /access-denied
        // Target of the guard's role-mismatch redirect.
        .route("/access-denied", get(handlers::access_denied))
        // GET /api/user-dashboard
        // Canned profile + stats behind an artificial delay.
        .route("/api/user-dashboard", get(handlers::user_dashboard))
        .route("/about", get(handlers::about))
}
