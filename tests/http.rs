use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_cookies::cookie::Cookie;
use tower_cookies::cookie::time::OffsetDateTime;
use uuid::Uuid;

use cookiesession::{config::Config, routes, state::AppState};

fn app() -> Router {
    let config = Config::from_lookup(|key| match key {
        "SESSION_SECRET" => Some("s3cr3t".to_string()),
        "SESSION_TTL_SECONDS" => Some("3600".to_string()),
        _ => None,
    })
    .unwrap();

    routes::router(AppState::new(config.store()))
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post(uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn set_cookie(res: &Response<Body>) -> Option<String> {
    res.headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string())
}

/// The `name=value` pair a browser would send back.
fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().trim().to_string()
}

async fn json_body(res: Response<Body>) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login(app: &Router, user_id: Uuid) -> String {
    let res = app
        .clone()
        .oneshot(post(
            "/api/session/login",
            None,
            json!({ "user_id": user_id, "state": "role=admin" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    cookie_pair(&set_cookie(&res).expect("login sets session cookie"))
}

#[tokio::test]
async fn anonymous_request_gets_fresh_session() {
    let app = app();

    let res = app.oneshot(get("/api/session", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(set_cookie(&res).is_none());

    let body = json_body(res).await;
    assert_eq!(body["valid"], false);
    assert_eq!(body["authenticated"], false);
    assert_ne!(body["sid"], Value::String(Uuid::nil().to_string()));
}

#[tokio::test]
async fn login_cookie_authenticates_next_request() {
    let app = app();
    let user_id = Uuid::new_v4();

    let res = app
        .clone()
        .oneshot(post("/api/session/login", None, json!({ "user_id": user_id })))
        .await
        .unwrap();
    let raw = set_cookie(&res).unwrap();
    let cookie = Cookie::parse(raw.clone()).unwrap();
    assert_eq!(cookie.name(), "session");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.max_age().unwrap().whole_seconds(), 3600);
    let issued = json_body(res).await;
    assert_eq!(issued["valid"], false);
    assert_eq!(issued["authenticated"], true);

    let res = app
        .oneshot(get("/api/session", Some(&cookie_pair(&raw))))
        .await
        .unwrap();
    let body = json_body(res).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["uid"], Value::String(user_id.to_string()));
    assert_eq!(body["sid"], issued["sid"]);
}

#[tokio::test]
async fn state_survives_round_trip() {
    let app = app();
    let cookie = login(&app, Uuid::new_v4()).await;

    let res = app.oneshot(get("/api/session", Some(&cookie))).await.unwrap();
    let body = json_body(res).await;
    assert_eq!(body["state"], "role=admin");
}

#[tokio::test]
async fn tampered_cookie_is_anonymous() {
    let app = app();
    let cookie = login(&app, Uuid::new_v4()).await;

    let (name, value) = cookie.split_once('=').unwrap();
    let mut chars: Vec<char> = value.chars().collect();
    chars[30] = if chars[30] == 'A' { 'B' } else { 'A' };
    let tampered = format!("{}={}", name, chars.into_iter().collect::<String>());

    let res = app
        .oneshot(get("/api/session", Some(&tampered)))
        .await
        .unwrap();
    let body = json_body(res).await;
    assert_eq!(body["valid"], false);
    assert_eq!(body["uid"], Value::String(Uuid::nil().to_string()));
}

#[tokio::test]
async fn cookie_from_other_secret_is_anonymous() {
    let app = app();
    let other = routes::router(AppState::new(
        Config::from_lookup(|key| match key {
            "SESSION_SECRET" => Some("another".to_string()),
            _ => None,
        })
        .unwrap()
        .store(),
    ));
    let cookie = login(&other, Uuid::new_v4()).await;

    let res = app.oneshot(get("/api/session", Some(&cookie))).await.unwrap();
    assert_eq!(json_body(res).await["valid"], false);
}

#[tokio::test]
async fn nil_user_is_rejected() {
    let app = app();

    let res = app
        .oneshot(post(
            "/api/session/login",
            None,
            json!({ "user_id": Uuid::nil() }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(set_cookie(&res).is_none());
    assert_eq!(json_body(res).await["error"], "user_id must not be nil");
}

#[tokio::test]
async fn impersonation_requires_session() {
    let app = app();

    let res = app
        .oneshot(post(
            "/api/session/impersonate",
            None,
            json!({ "user_id": Uuid::new_v4() }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(res).await["error"], "Forbidden");
}

#[tokio::test]
async fn impersonation_keeps_real_identity() {
    let app = app();
    let admin = Uuid::new_v4();
    let target = Uuid::new_v4();
    let cookie = login(&app, admin).await;

    let res = app
        .clone()
        .oneshot(post(
            "/api/session/impersonate",
            Some(&cookie),
            json!({ "user_id": target }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = cookie_pair(&set_cookie(&res).unwrap());

    let res = app
        .clone()
        .oneshot(get("/api/session", Some(&cookie)))
        .await
        .unwrap();
    let body = json_body(res).await;
    assert_eq!(body["uid"], Value::String(target.to_string()));
    assert_eq!(body["real_uid"], Value::String(admin.to_string()));
    assert_eq!(body["impersonating"], true);

    let res = app
        .oneshot(post(
            "/api/session/impersonate",
            Some(&cookie),
            json!({ "user_id": Uuid::new_v4() }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert!(set_cookie(&res).is_none());
    assert_eq!(
        json_body(res).await["error"],
        "Already impersonating another user"
    );
}

#[tokio::test]
async fn logout_clears_cookie() {
    let app = app();
    let cookie = login(&app, Uuid::new_v4()).await;

    let res = app
        .oneshot(post("/api/session/logout", Some(&cookie), json!({})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let cleared = Cookie::parse(set_cookie(&res).unwrap()).unwrap();
    assert_eq!(cleared.name(), "session");
    assert_eq!(cleared.value(), "");
    assert_eq!(cleared.path(), Some("/"));
    assert!(cleared.max_age().unwrap().whole_seconds() <= 0);
    assert!(cleared.expires_datetime().unwrap() < OffsetDateTime::now_utc());
}
