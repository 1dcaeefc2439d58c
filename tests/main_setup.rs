use role_gate::{
    AppConfig, RoutePolicy, RoutePolicyTable,
    config::{ConfigError, Env, load_route_policies},
    models::Role,
    policy::PolicyError,
};
use serial_test::serial;
use std::{env, panic, time::Duration};

const CONFIG_VARS: [&str; 9] = [
    "APP_ENV",
    "BIND_ADDR",
    "SESSION_COOKIE_NAME",
    "SESSION_TTL_SECS",
    "LOGIN_PATH",
    "ACCESS_DENIED_PATH",
    "LANDING_PATH",
    "USER_DASHBOARD_DELAY_MS",
    "ROUTE_POLICIES",
];

// --- Setup/Teardown Utilities ---

/// Runs `test` with only `vars` set among the config variables, then restores
/// whatever was there before.
fn run_with_env<T, R>(vars: &[(&str, &str)], test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|&var| (var, env::var(var).ok()))
        .collect();

    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals {
        unsafe {
            match original_value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_local_defaults() {
    let config = run_with_env(&[], AppConfig::load).unwrap();

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
    assert_eq!(config.session_cookie_name, "auth_token");
    assert_eq!(config.session_ttl, Duration::from_secs(3600));
    assert_eq!(config.paths.login, "/login");
    assert_eq!(config.paths.access_denied, "/access-denied");
    assert_eq!(config.paths.landing, "/dashboard");
    assert_eq!(config.user_dashboard_delay, Duration::from_millis(800));
}

#[test]
#[serial]
fn test_app_config_reads_overrides() {
    let config = run_with_env(
        &[
            ("APP_ENV", "production"),
            ("SESSION_COOKIE_NAME", "sid"),
            ("SESSION_TTL_SECS", "86400"),
            ("LANDING_PATH", "/home"),
            ("USER_DASHBOARD_DELAY_MS", "0"),
        ],
        AppConfig::load,
    )
    .unwrap();

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.session_cookie_name, "sid");
    assert_eq!(config.session_ttl, Duration::from_secs(86400));
    assert_eq!(config.paths.landing, "/home");
    assert!(config.user_dashboard_delay.is_zero());
}

#[test]
#[serial]
fn test_app_config_rejects_bad_values() {
    let result = run_with_env(&[("SESSION_TTL_SECS", "an hour")], AppConfig::load);
    assert!(matches!(
        result,
        Err(ConfigError::InvalidNumber { var: "SESSION_TTL_SECS", .. })
    ));

    let result = run_with_env(&[("LOGIN_PATH", "login")], AppConfig::load);
    assert!(matches!(
        result,
        Err(ConfigError::InvalidPath { var: "LOGIN_PATH", .. })
    ));

    let result = run_with_env(&[("SESSION_COOKIE_NAME", "  ")], AppConfig::load);
    assert!(matches!(result, Err(ConfigError::Empty("SESSION_COOKIE_NAME"))));
}

#[test]
#[serial]
fn test_app_config_rejects_landing_equal_to_login() {
    let result = run_with_env(&[("LANDING_PATH", "/login")], AppConfig::load);
    assert!(matches!(result, Err(ConfigError::LandingIsLogin(path)) if path == "/login"));

    let result = run_with_env(
        &[("LOGIN_PATH", "/signin"), ("LANDING_PATH", "/signin")],
        AppConfig::load,
    );
    assert!(matches!(result, Err(ConfigError::LandingIsLogin(_))));
}

#[test]
#[serial]
fn test_route_policies_default_and_override() {
    let table = run_with_env(&[], load_route_policies).unwrap();
    assert_eq!(table, RoutePolicyTable::default());

    let table = run_with_env(&[("ROUTE_POLICIES", "/reports=admin")], load_route_policies).unwrap();
    assert_eq!(
        table.entries(),
        &[RoutePolicy::new("/reports", [Role::Admin])]
    );

    let result = run_with_env(&[("ROUTE_POLICIES", "/reports=owner")], load_route_policies);
    assert!(matches!(result, Err(ConfigError::Policy(_))));
}

#[test]
#[serial]
fn test_blank_route_policies_fail_startup() {
    for raw in ["", "  ", ";"] {
        let result = run_with_env(&[("ROUTE_POLICIES", raw)], load_route_policies);
        assert!(
            matches!(result, Err(ConfigError::Policy(PolicyError::Empty))),
            "blank ROUTE_POLICIES {raw:?} was accepted"
        );
    }
}
