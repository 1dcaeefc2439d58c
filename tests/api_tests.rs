use reqwest::{StatusCode, header, redirect::Policy};
use role_gate::{AppConfig, AppState, RoutePolicyTable, create_router, models::DashboardResponse};
use tokio::net::TcpListener;

#[derive(Debug)]
pub struct TestApp {
    pub address: String,
}

async fn spawn_app() -> TestApp {
    let state = AppState::new(AppConfig::default(), RoutePolicyTable::default());
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address }
}

// Redirects are asserted on, never followed.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let response = client()
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("req fail");

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_login_dashboard_logout_cycle() {
    let app = spawn_app().await;
    let client = client();

    // Anonymous visit is bounced to the login page.
    let response = client
        .get(format!("{}/dashboard", app.address))
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/login?callbackUrl=%2Fdashboard"
    );

    // Log in as admin and carry the cookie by hand.
    let response = client
        .post(format!("{}/login", app.address))
        .json(&serde_json::json!({ "role": "admin", "callbackUrl": "/private" }))
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/private");

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    let cookie_pair = set_cookie.split(';').next().unwrap().to_string();

    let response = client
        .get(format!("{}/private", app.address))
        .header(header::COOKIE, &cookie_pair)
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), StatusCode::OK);

    let dashboard: DashboardResponse = client
        .get(format!("{}/dashboard", app.address))
        .header(header::COOKIE, &cookie_pair)
        .send()
        .await
        .expect("req fail")
        .json()
        .await
        .expect("invalid json");
    assert!(dashboard.is_admin);
    assert_eq!(dashboard.name, "admin user");

    // Logged in, so the login page sends us to the dashboard.
    let response = client
        .get(format!("{}/login", app.address))
        .header(header::COOKIE, &cookie_pair)
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/dashboard");

    let response = client
        .post(format!("{}/logout", app.address))
        .header(header::COOKIE, &cookie_pair)
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(
        response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .starts_with("auth_token=;")
    );
}
