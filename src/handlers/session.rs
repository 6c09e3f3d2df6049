use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::session::Session,
    state::AppState,
};

/// The request payload for logging in.
#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub state: Option<String>,
}

/// The request payload for impersonating another user.
#[derive(Deserialize, Debug)]
pub struct ImpersonateRequest {
    pub user_id: Uuid,
}

/// The JSON view of a session.
#[derive(Serialize, Debug)]
pub struct SessionResponse {
    /// Whether the request arrived with a trusted cookie. Saving does not
    /// change it, so a login response reports `false` and the next request
    /// `true`.
    pub valid: bool,
    pub authenticated: bool,
    pub impersonating: bool,
    pub sid: Uuid,
    pub uid: Uuid,
    pub real_uid: Uuid,
    pub state: String,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            valid: session.valid,
            authenticated: session.is_authenticated(),
            impersonating: session.is_impersonating(),
            sid: session.sid,
            uid: session.uid,
            real_uid: session.real_uid,
            state: String::from_utf8_lossy(&session.state).into_owned(),
        }
    }
}

/// Returns the current session.
pub async fn show(Extension(session): Extension<Session>) -> Json<SessionResponse> {
    Json(SessionResponse::from(&session))
}

/// Binds the session to a user and saves it.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Extension(mut session): Extension<Session>,
    mut cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    if payload.user_id.is_nil() {
        return Err(AppError::Validation("user_id must not be nil".to_string()));
    }

    session.uid = payload.user_id;
    session.real_uid = Uuid::nil();
    if let Some(app_state) = payload.state {
        session.state = app_state.into_bytes();
    }

    state.store.save(&mut cookies, &mut session)?;
    tracing::info!("✅ User logged in: {} (sid={})", session.uid, session.sid);

    Ok((StatusCode::OK, Json(SessionResponse::from(&session))).into_response())
}

/// Makes the session act as another user, remembering who is behind it.
#[axum::debug_handler]
pub async fn impersonate(
    State(state): State<AppState>,
    Extension(mut session): Extension<Session>,
    mut cookies: Cookies,
    Json(payload): Json<ImpersonateRequest>,
) -> Result<Response> {
    if payload.user_id.is_nil() {
        return Err(AppError::Validation("user_id must not be nil".to_string()));
    }
    if session.is_impersonating() {
        return Err(AppError::Conflict(
            "Already impersonating another user".to_string(),
        ));
    }

    session.real_uid = session.uid;
    session.uid = payload.user_id;

    state.store.save(&mut cookies, &mut session)?;
    tracing::info!("🎭 User {} acting as {}", session.real_uid, session.uid);

    Ok((StatusCode::OK, Json(SessionResponse::from(&session))).into_response())
}

/// Deletes the session cookie.
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    mut cookies: Cookies,
) -> StatusCode {
    state.store.clear(&mut cookies);
    tracing::info!("✅ User logged out: {}", session.uid);

    StatusCode::NO_CONTENT
}
