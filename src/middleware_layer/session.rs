use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::{error::AppError, models::session::Session, state::AppState};

/// A middleware that loads the session cookie into the request extensions.
///
/// Always succeeds. Handlers find either the decoded session or a fresh
/// anonymous one under `Extension<Session>`.
pub async fn load_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let session = state.store.get(&cookies);
    tracing::debug!("🔑 Session loaded: sid={} valid={}", session.sid, session.valid);

    request.extensions_mut().insert(session);
    next.run(request).await
}

/// A middleware that requires an authenticated session.
///
/// Must run after [`load_session`].
///
/// # Returns
///
/// A `Response`, or `AppError::Unauthorized` for anonymous sessions.
pub async fn require_auth(request: Request<Body>, next: Next) -> Result<Response, AppError> {
    let authenticated = request
        .extensions()
        .get::<Session>()
        .is_some_and(Session::is_authenticated);

    if !authenticated {
        tracing::warn!("❌ Request without an authenticated session");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
