#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, Statement};
use serde_json::Value;
use tower::ServiceExt;

use axum_orders_api::{
    db::{create_orm_conn, run_migrations},
    routes::app_router,
    state::AppState,
};

/// Database URL from the environment, or `None` to skip DB-backed tests.
pub fn test_database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
}

/// Connects, migrates and wipes the tables so every run starts clean.
pub async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE items, orders RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState { orm })
}

pub async fn setup_app(database_url: &str) -> anyhow::Result<Router> {
    let state = setup_state(database_url).await?;
    Ok(app_router().with_state(state))
}

/// Drives one request through the router and buffers the response.
pub async fn send(
    app: &Router,
    request: Request<Body>,
) -> anyhow::Result<(StatusCode, HeaderMap, Vec<u8>)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await?.to_bytes().to_vec();
    Ok((status, headers, body))
}

pub fn get(uri: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder().uri(uri).body(Body::empty())?)
}

pub fn delete(uri: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())?)
}

pub fn put_empty(uri: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method("PUT")
        .uri(uri)
        .body(Body::empty())?)
}

pub fn post_json(uri: &str, body: &Value) -> anyhow::Result<Request<Body>> {
    json_request("POST", uri, body)
}

pub fn put_json(uri: &str, body: &Value) -> anyhow::Result<Request<Body>> {
    json_request("PUT", uri, body)
}

fn json_request(method: &str, uri: &str, body: &Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?)
}
