use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_cookies::CookieManagerLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

use crate::{handlers, middleware_layer, state::AppState};

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/session", get(handlers::session::show))
        .route("/api/session/login", post(handlers::session::login));

    let protected_routes = Router::new()
        .route(
            "/api/session/impersonate",
            post(handlers::session::impersonate),
        )
        .route("/api/session/logout", post(handlers::session::logout))
        .route_layer(from_fn(middleware_layer::session::require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(from_fn_with_state(
            state.clone(),
            middleware_layer::session::load_session,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
