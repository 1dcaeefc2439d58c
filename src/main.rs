use role_gate::{
    AppState,
    config::{AppConfig, Env, load_route_policies},
    create_router,
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, sets up logging, builds the router and serves it.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load().expect("FATAL: invalid configuration");
    let policies = load_route_policies().expect("FATAL: invalid ROUTE_POLICIES");

    // 2. Logging: RUST_LOG wins, otherwise verbose defaults for local work.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "role_gate=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // JSON lines for log aggregation.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);
    for policy in policies.entries() {
        tracing::info!(prefix = %policy.prefix, roles = ?policy.allowed_roles, "route policy");
    }

    // 3. Router and server
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState::new(config, policies));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: failed to bind listener. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("FATAL: server terminated unexpectedly");
}
