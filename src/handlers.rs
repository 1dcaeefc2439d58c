use crate::{
    AppState,
    auth::{self, RequireSession},
    models::{
        DashboardResponse, LoginPageResponse, LoginQuery, LoginRequest, PrivateResponse, Role,
        UserDashboardResponse,
    },
};
use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};

/// local_callback
///
/// Keeps a post-login redirect on this site: only absolute local paths are
/// accepted (`/x`, not `//host` or `/\host`), anything else becomes `fallback`.
/// Control characters are refused since the result ends up in a `Location` header.
pub fn local_callback(candidate: Option<&str>, fallback: &str) -> String {
    match candidate {
        Some(url)
            if url.starts_with('/')
                && !url.starts_with("//")
                && !url.starts_with("/\\")
                && !url.chars().any(char::is_control) =>
        {
            url.to_string()
        }
        _ => fallback.to_string(),
    }
}

// --- Session Issuer ---

/// login_page
///
/// [Public Route] What the login form needs: the sanitized callback and the
/// roles it offers.
#[utoipa::path(
    get,
    path = "/login",
    params(LoginQuery),
    responses((status = 200, description = "Login page descriptor", body = LoginPageResponse))
)]
pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Json<LoginPageResponse> {
    Json(LoginPageResponse {
        callback_url: local_callback(query.callback_url.as_deref(), &state.config.paths.landing),
        roles: vec![Role::User, Role::Admin],
    })
}

/// login
///
/// [Public Route] Issues a session cookie for the requested role and sends
/// the browser on to the callback URL (or the landing page).
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 303, description = "Session cookie set, redirecting to callback"),
        (status = 500, description = "Session could not be serialized")
    )
)]
pub async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> Response {
    let config = &state.config;
    let target = local_callback(payload.callback_url.as_deref(), &config.paths.landing);

    let (session, cookie) = match auth::login(payload.role, config) {
        Ok(issued) => issued,
        Err(e) => {
            tracing::error!("Failed to serialize session: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    tracing::info!(role = %session.role, session_id = %session.id, "logging in");

    (
        [(header::SET_COOKIE, cookie.encoded().to_string())],
        Redirect::to(&target),
    )
        .into_response()
}

/// logout
///
/// [Public Route] Expires the session cookie and returns to the login page.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 303, description = "Session cookie removed"))
)]
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = auth::logout(&state.config);

    tracing::info!("logging out");

    (
        [(header::SET_COOKIE, cookie.encoded().to_string())],
        Redirect::to(&state.config.paths.login),
    )
        .into_response()
}

// --- Pages ---

/// dashboard
///
/// [Protected Route] Greets the principal; admins also get the admin stats card.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = DashboardResponse),
        (status = 401, description = "No session")
    )
)]
pub async fn dashboard(RequireSession(session): RequireSession) -> Json<DashboardResponse> {
    Json(DashboardResponse::from(&session))
}

/// private_page
///
/// [Protected Route] Admin-only area.
#[utoipa::path(
    get,
    path = "/private",
    responses(
        (status = 200, description = "Private area", body = PrivateResponse),
        (status = 401, description = "No session")
    )
)]
pub async fn private_page(RequireSession(session): RequireSession) -> Json<PrivateResponse> {
    Json(PrivateResponse {
        message: "This area is restricted to administrators.".to_string(),
        name: session.name,
    })
}

#[utoipa::path(
    get,
    path = "/access-denied",
    responses((status = 403, description = "Role not permitted for the requested route"))
)]
pub async fn access_denied() -> impl IntoResponse {
    (
        StatusCode::FORBIDDEN,
        "Access denied: your role does not permit access to this page.",
    )
}

/// user_dashboard
///
/// [Public Route] Canned profile and stats, served after the configured delay
/// so that client loading states are observable.
#[utoipa::path(
    get,
    path = "/api/user-dashboard",
    responses((status = 200, description = "User dashboard data", body = UserDashboardResponse))
)]
pub async fn user_dashboard(State(state): State<AppState>) -> Json<UserDashboardResponse> {
    if !state.config.user_dashboard_delay.is_zero() {
        tokio::time::sleep(state.config.user_dashboard_delay).await;
    }
    Json(UserDashboardResponse::default())
}

pub async fn about() -> &'static str {
    "Role-based route guard demo. /dashboard needs a user or admin session, /private needs admin."
}
