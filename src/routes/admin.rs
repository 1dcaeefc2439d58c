use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Pages the default policy table restricts to the `admin` role. Users with
/// any other role are redirected to `/access-denied` by the guard before the
/// handler runs.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /private
        .route("/private", get(handlers::private_page))
}
