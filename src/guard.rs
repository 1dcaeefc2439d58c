//! Route guard.
//!
//! Every request passes through [`route_guard`] before it reaches a handler.
//! The decision itself ([`evaluate`]) is a pure function of the request path,
//! the raw session cookie and the immutable policy table, so it can be tested
//! without a router and gives the same answer however often it runs.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    auth::{session_cookie_value, try_parse_session},
    policy::RoutePolicyTable,
};

/// The three fixed redirect targets the guard knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPaths {
    /// Where anonymous visitors of protected routes are sent.
    pub login: String,
    /// Where principals lacking the required role are sent.
    pub access_denied: String,
    /// Where logged-in principals visiting the login page are sent.
    pub landing: String,
}

impl Default for GuardPaths {
    fn default() -> Self {
        Self {
            login: "/login".to_string(),
            access_denied: "/access-denied".to_string(),
            landing: "/dashboard".to_string(),
        }
    }
}

/// GuardRequest
///
/// The slice of an inbound request the guard looks at.
#[derive(Debug, Clone, Copy)]
pub struct GuardRequest<'a> {
    pub path: &'a str,
    /// Raw (already percent-decoded) value of the session cookie, if sent.
    pub session_cookie: Option<&'a str>,
}

/// Decision
///
/// Outcome of [`evaluate`]: pass the request on, or redirect it somewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Anonymous visitor on a protected route; `callback_url` is the original path.
    RedirectToLogin { callback_url: String },
    RedirectToAccessDenied,
    /// Logged-in principal visiting the login page.
    RedirectToLanding,
}

impl Decision {
    /// Redirect target, or `None` for `Allow`.
    pub fn location(&self, paths: &GuardPaths) -> Option<String> {
        match self {
            Decision::Allow => None,
            Decision::RedirectToLogin { callback_url } => Some(format!(
                "{}?callbackUrl={}",
                paths.login,
                urlencoding::encode(callback_url)
            )),
            Decision::RedirectToAccessDenied => Some(paths.access_denied.clone()),
            Decision::RedirectToLanding => Some(paths.landing.clone()),
        }
    }
}

/// evaluate
///
/// Decides what happens to a request. A cookie that does not decode into a
/// session counts as no cookie at all: bad session data can only ever make
/// the requester anonymous.
pub fn evaluate(request: GuardRequest<'_>, policies: &RoutePolicyTable, paths: &GuardPaths) -> Decision {
    let session = request.session_cookie.and_then(try_parse_session);

    if session.is_some() && request.path == paths.login {
        return Decision::RedirectToLanding;
    }

    let Some(policy) = policies.find(request.path) else {
        return Decision::Allow;
    };

    match session {
        None => Decision::RedirectToLogin {
            callback_url: request.path.to_string(),
        },
        Some(session) if !policy.allows(session.role) => Decision::RedirectToAccessDenied,
        Some(_) => Decision::Allow,
    }
}

/// route_guard
///
/// Middleware form of [`evaluate`], layered around the whole router.
/// Redirects use 307 so the original method survives the round trip.
pub async fn route_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let cookie = session_cookie_value(request.headers(), &state.config.session_cookie_name);

    let decision = evaluate(
        GuardRequest {
            path,
            session_cookie: cookie.as_deref(),
        },
        &state.policies,
        &state.config.paths,
    );

    match decision.location(&state.config.paths) {
        None => next.run(request).await,
        Some(location) => {
            tracing::debug!(path = %request.uri().path(), ?decision, %location, "route guard redirect");
            Redirect::temporary(&location).into_response()
        }
    }
}
