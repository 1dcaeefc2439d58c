use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, StatusCode, header, request::Parts},
};
use cookie::{
    Cookie, SameSite,
    time::{Duration, OffsetDateTime},
};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    models::{Role, Session},
};

// Browsers cap cookie lifetimes at 400 days; anything longer is clamped.
const MAX_COOKIE_TTL_SECS: u64 = 400 * 24 * 60 * 60;

/// try_parse_session
///
/// Decodes a raw session cookie value. Anything that is not a JSON object of
/// the `Session` shape with a known role gives `None`; this function never fails.
pub fn try_parse_session(raw: &str) -> Option<Session> {
    serde_json::from_str(raw).ok()
}

/// session_cookie_value
///
/// Looks up the named cookie across every `Cookie` header, percent-decoding
/// its value. Unparseable cookie pairs are skipped.
pub fn session_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse_encoded(value))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

/// Reads and decodes the session straight from request headers.
pub fn session_from_headers(headers: &HeaderMap, name: &str) -> Option<Session> {
    session_cookie_value(headers, name).and_then(|raw| try_parse_session(&raw))
}

/// login
///
/// Issues a fresh session for `role` and the cookie that carries it:
/// http-only, `SameSite=Lax`, path `/`, expiring `session_ttl` from now.
/// The `Secure` attribute is only set in production.
pub fn login(role: Role, config: &AppConfig) -> Result<(Session, Cookie<'static>), serde_json::Error> {
    let session = Session {
        id: Uuid::new_v4().to_string(),
        name: role.display_name().to_string(),
        role,
    };

    let ttl_secs = config.session_ttl.as_secs().min(MAX_COOKIE_TTL_SECS);
    // Clamped above, so the cast cannot wrap.
    let ttl = Duration::seconds(ttl_secs as i64);

    let cookie = Cookie::build((
        config.session_cookie_name.clone(),
        serde_json::to_string(&session)?,
    ))
    .http_only(true)
    .same_site(SameSite::Lax)
    .path("/")
    .secure(config.env == Env::Production)
    .max_age(ttl)
    .expires(OffsetDateTime::now_utc() + ttl)
    .build();

    Ok((session, cookie))
}

/// logout
///
/// A removal cookie for the session: empty value, expired, same path as issued.
pub fn logout(config: &AppConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build((config.session_cookie_name.clone(), ""))
        .path("/")
        .build();
    cookie.make_removal();
    cookie
}

/// CurrentSession Extractor
///
/// The session attached to the request, if any. Never rejects: a missing or
/// malformed cookie is simply `None`.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<Session>);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);
        Ok(CurrentSession(session_from_headers(
            &parts.headers,
            &config.session_cookie_name,
        )))
    }
}

/// RequireSession Extractor
///
/// For handlers that cannot do anything useful without a principal. The guard
/// normally redirects before this runs; if the policy table does not cover the
/// route, the handler still answers 401 instead of serving anonymous data.
#[derive(Debug, Clone)]
pub struct RequireSession(pub Session);

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(CurrentSession(session)) = CurrentSession::from_request_parts(parts, state).await;
        session.map(RequireSession).ok_or(StatusCode::UNAUTHORIZED)
    }
}
