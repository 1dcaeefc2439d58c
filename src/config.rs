use std::{env, time::Duration};

use crate::{
    guard::GuardPaths,
    policy::{PolicyError, RoutePolicyTable},
};

/// Default name of the session cookie.
pub const SESSION_COOKIE: &str = "auth_token";

/// ConfigError
///
/// Everything that can go wrong while reading the environment at startup.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got `{value}`")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{var} must be an absolute path starting with `/`, got `{value}`")]
    InvalidPath { var: &'static str, value: String },
    #[error("LANDING_PATH and LOGIN_PATH are both `{0}`; logged-in visitors would loop")]
    LandingIsLogin(String),
    #[error("ROUTE_POLICIES is invalid: {0}")]
    Policy(#[from] PolicyError),
}

/// AppConfig
///
/// Immutable configuration loaded once at startup and cloned into handlers
/// through `FromRef`. The route policy table is loaded alongside it but lives
/// in `AppState` on its own.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and the `Secure` cookie attribute.
    pub env: Env,
    // Socket address the HTTP listener binds to.
    pub bind_addr: String,
    // Name of the cookie carrying the serialized session.
    pub session_cookie_name: String,
    // Lifetime of an issued session cookie.
    pub session_ttl: Duration,
    // Login, access-denied and landing paths used by the guard.
    pub paths: GuardPaths,
    // Artificial latency of the user dashboard API, so loading states are visible.
    pub user_dashboard_delay: Duration,
}

/// Env
///
/// Local development versus production deployment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Test-friendly values: local mode, no dashboard delay.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: "127.0.0.1:3000".to_string(),
            session_cookie_name: SESSION_COOKIE.to_string(),
            session_ttl: Duration::from_secs(60 * 60),
            paths: GuardPaths::default(),
            user_dashboard_delay: Duration::ZERO,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads every setting from the environment, falling back to defaults for
    /// anything unset. Call `dotenv` first if a `.env` file should apply.
    pub fn load() -> Result<Self, ConfigError> {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let defaults = GuardPaths::default();
        let paths = GuardPaths {
            login: path("LOGIN_PATH", &defaults.login)?,
            access_denied: path("ACCESS_DENIED_PATH", &defaults.access_denied)?,
            landing: path("LANDING_PATH", &defaults.landing)?,
        };

        if paths.landing == paths.login {
            return Err(ConfigError::LandingIsLogin(paths.login));
        }

        Ok(Self {
            env,
            bind_addr: non_empty("BIND_ADDR", "0.0.0.0:3000")?,
            session_cookie_name: non_empty("SESSION_COOKIE_NAME", SESSION_COOKIE)?,
            session_ttl: Duration::from_secs(number("SESSION_TTL_SECS", 60 * 60)?),
            paths,
            user_dashboard_delay: Duration::from_millis(number("USER_DASHBOARD_DELAY_MS", 800)?),
        })
    }
}

/// load_route_policies
///
/// `ROUTE_POLICIES` replaces the built-in table when set; otherwise the
/// default `/dashboard` + `/private` table applies.
pub fn load_route_policies() -> Result<RoutePolicyTable, ConfigError> {
    match env::var("ROUTE_POLICIES") {
        Ok(raw) => Ok(RoutePolicyTable::parse(&raw)?),
        Err(_) => Ok(RoutePolicyTable::default()),
    }
}

fn non_empty(var: &'static str, default: &str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::Empty(var)),
        Ok(value) => Ok(value.trim().to_string()),
        Err(_) => Ok(default.to_string()),
    }
}

fn number(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        Err(_) => Ok(default),
    }
}

fn path(var: &'static str, default: &str) -> Result<String, ConfigError> {
    let value = non_empty(var, default)?;
    if !value.starts_with('/') {
        return Err(ConfigError::InvalidPath { var, value });
    }
    Ok(value)
}
