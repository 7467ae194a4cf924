//! Helpers for driving the full router in tests.

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use crate::{
    app::build_app,
    auth::{
        jwt::JwtKeys,
        repo_types::{NewUser, User},
    },
    catalog::repo_types::{Category, CategoryDraft, Product, ProductDraft},
    state::AppState,
};

pub fn test_app() -> (AppState, Router) {
    let state = AppState::fake();
    let app = build_app(state.clone());
    (state, app)
}

pub async fn create_user(state: &AppState, email: &str, is_superuser: bool) -> User {
    state
        .store
        .create_user(NewUser {
            email: email.into(),
            password_hash: None,
            is_superuser,
        })
        .await
        .expect("create user")
}

pub async fn create_category(state: &AppState, title: &str, slug: &str) -> Category {
    state
        .store
        .create_category(CategoryDraft {
            title: title.into(),
            slug: slug.into(),
        })
        .await
        .expect("create category")
}

pub async fn create_product(
    state: &AppState,
    title: &str,
    price: i64,
    category: &Category,
    author: &User,
) -> Product {
    state
        .store
        .create_product(
            ProductDraft {
                title: title.into(),
                price: Decimal::new(price * 100, 2),
                category_id: category.id,
            },
            author.id,
        )
        .await
        .expect("create product")
}

/// Access token for `user`.
pub fn bearer(state: &AppState, user: &User) -> String {
    JwtKeys::from_config(&state.config.jwt)
        .sign_access(user.id)
        .expect("sign access token")
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    }
}

/// Send `req` through `app`; an empty body comes back as `Value::Null`.
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, _, body) = send_with_headers(app, req).await;
    (status, body)
}

pub async fn send_with_headers(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let res = app.clone().oneshot(req).await.expect("infallible router");
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("read body");
    if bytes.is_empty() {
        return (status, headers, Value::Null);
    }
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, headers, body)
}
