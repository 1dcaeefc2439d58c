use axum::{Router, extract::FromRef, http::HeaderName, middleware};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod policy;

pub mod routes;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use guard::{Decision, GuardPaths, GuardRequest, evaluate};
pub use policy::{RoutePolicy, RoutePolicyTable};

/// ApiDoc
///
/// OpenAPI document for every handler, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::login_page, handlers::login, handlers::logout, handlers::dashboard,
        handlers::private_page, handlers::access_denied, handlers::user_dashboard
    ),
    components(
        schemas(
            models::Role, models::Session, models::LoginRequest, models::LoginPageResponse,
            models::DashboardResponse, models::AdminStats, models::PrivateResponse,
            models::UserDashboardResponse, models::DashboardUser, models::UserStats,
        )
    ),
    tags(
        (name = "role-gate", description = "Cookie session mock auth with role-based route guard")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared, read-only application state. The policy table is behind an `Arc`
/// so every request and every clone of the state sees the same immutable table.
#[derive(Clone)]
pub struct AppState {
    /// Configuration: cookie name, TTL, guard paths, loaded once at startup.
    pub config: AppConfig,
    /// Route Policy Table: protected prefixes and their allowed roles.
    pub policies: Arc<RoutePolicyTable>,
}

impl AppState {
    pub fn new(config: AppConfig, policies: RoutePolicyTable) -> Self {
        Self {
            config,
            policies: Arc::new(policies),
        }
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for Arc<RoutePolicyTable> {
    fn from_ref(app_state: &AppState) -> Arc<RoutePolicyTable> {
        app_state.policies.clone()
    }
}

/// create_router
///
/// Assembles every route group, wraps the result in the route guard, then adds
/// request ids, tracing and CORS around everything.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // The guard is a plain `layer` rather than a `route_layer` so that it also
    // sees paths with no matching route.
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(authenticated::authenticated_routes())
        .merge(admin::admin_routes())
        .layer(middleware::from_fn_with_state(state.clone(), guard::route_guard))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for `TraceLayer` carrying method, uri and the `x-request-id` header.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
