//! Shared fixtures for database-backed tests.
//!
//! These tests need a Postgres database in `TEST_DATABASE_URL`. Without it
//! every test logs a skip message and passes.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use diesel::prelude::*;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tastecheck_core::{
    Actor, IngredientLine, MediaItem, MediaType, QuantityInput, RecipeContent, Role,
};
use tastecheck_server::auth::create_session;
use tastecheck_server::db::{create_pool, DbPool};
use tastecheck_server::media_store::MediaStore;
use tastecheck_server::models::NewUser;
use tastecheck_server::schema::users;
use tastecheck_server::{build_router, AppState};
use tower::ServiceExt;

pub const WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// One pool per test binary so migrations run once.
pub fn test_pool() -> Option<Arc<DbPool>> {
    static POOL: OnceLock<Option<Arc<DbPool>>> = OnceLock::new();
    POOL.get_or_init(|| {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = create_pool(&url, 4).expect("failed to set up test database");
        Some(Arc::new(pool))
    })
    .clone()
}

/// Evaluates to the pool, or returns from the test when no database is set.
#[macro_export]
macro_rules! require_db {
    () => {
        match common::test_pool() {
            Some(pool) => pool,
            None => {
                eprintln!("TEST_DATABASE_URL not set, skipping");
                return;
            }
        }
    };
}

pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

pub fn create_user(conn: &mut PgConnection, role: Role) -> Actor {
    let username = unique(role.as_str());
    let email = format!("{username}@example.test");
    let id: i32 = diesel::insert_into(users::table)
        .values(&NewUser {
            username: &username,
            email: &email,
            password_hash: "not-a-real-hash",
            full_name: "Test User",
            role: role.as_str(),
        })
        .returning(users::id)
        .get_result(conn)
        .expect("failed to create user");
    Actor::new(id, role)
}

/// A user plus a bearer token for HTTP tests.
pub fn create_user_with_token(conn: &mut PgConnection, role: Role) -> (Actor, String) {
    let actor = create_user(conn, role);
    let token = create_session(conn, actor.user_id).expect("failed to create session");
    (actor, token)
}

pub fn line(name: &str, quantity: &str, unit: Option<&str>) -> IngredientLine {
    IngredientLine {
        name: name.to_string(),
        quantity: Some(QuantityInput::from(quantity)),
        unit: unit.map(str::to_string),
        notes: None,
    }
}

pub fn content(title: &str, ingredients: Vec<IngredientLine>, steps: &[&str]) -> RecipeContent {
    RecipeContent {
        title: title.to_string(),
        ingredients,
        steps: steps.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

pub fn image(url: &str) -> MediaItem {
    MediaItem {
        media_type: MediaType::Image,
        url: url.to_string(),
        caption: None,
    }
}

pub fn app(pool: Arc<DbPool>, media: Arc<dyn MediaStore>) -> Router {
    build_router(AppState {
        pool,
        media,
        write_timeout: WRITE_TIMEOUT,
    })
}

/// Send one request and decode the JSON body (`Value::Null` when empty).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).expect("Failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
