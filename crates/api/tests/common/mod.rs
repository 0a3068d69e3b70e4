//! Shared test harness: router construction, token minting, request
//! helpers, and database seed helpers.
//!
//! Uses Axum's `tower::ServiceExt` to send requests directly to the router,
//! exercising the same middleware stack production uses.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceExt;

use thesisflow_api::auth::jwt::{generate_access_token, JwtConfig};
use thesisflow_api::config::ServerConfig;
use thesisflow_api::router::build_app_router;
use thesisflow_api::state::AppState;
use thesisflow_core::actor::Actor;
use thesisflow_core::roles::{
    ROLE_DEAN, ROLE_DEPARTMENT_HEAD, ROLE_FACULTY_HEAD, USER_TYPE_FACULTY, USER_TYPE_STUDENT,
};
use thesisflow_core::types::DbId;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        graduation_year: Some(2026),
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Actors and tokens
// ---------------------------------------------------------------------------

pub fn student_actor(id: DbId) -> Actor {
    Actor {
        id,
        user_type: USER_TYPE_STUDENT.to_string(),
        roles: vec![],
        department_id: None,
    }
}

pub fn faculty_actor(id: DbId, department_id: DbId) -> Actor {
    Actor {
        id,
        user_type: USER_TYPE_FACULTY.to_string(),
        roles: vec![],
        department_id: Some(department_id),
    }
}

pub fn department_head_actor(id: DbId, department_id: DbId) -> Actor {
    Actor {
        id,
        user_type: USER_TYPE_FACULTY.to_string(),
        roles: vec![ROLE_DEPARTMENT_HEAD.to_string()],
        department_id: Some(department_id),
    }
}

pub fn faculty_head_actor(id: DbId, department_id: DbId) -> Actor {
    Actor {
        id,
        user_type: USER_TYPE_FACULTY.to_string(),
        roles: vec![ROLE_FACULTY_HEAD.to_string()],
        department_id: Some(department_id),
    }
}

pub fn dean_actor(id: DbId) -> Actor {
    Actor {
        id,
        user_type: USER_TYPE_FACULTY.to_string(),
        roles: vec![ROLE_DEAN.to_string()],
        department_id: None,
    }
}

/// Mint a Bearer token for an actor with the test JWT secret.
pub fn token_for(actor: &Actor) -> String {
    generate_access_token(actor, &test_config().jwt).expect("mint test token")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, path: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, path, Some(token), None).await
}

pub async fn post_json(app: Router, path: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, path, Some(token), Some(body)).await
}

pub async fn put_json(app: Router, path: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, path, Some(token), Some(body)).await
}

pub async fn put_empty(app: Router, path: &str, token: &str) -> Response<Body> {
    send(app, Method::PUT, path, Some(token), None).await
}

/// Parse a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// Assert a status code and return the parsed body.
pub async fn expect_status(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

pub async fn seed_department(pool: &PgPool, name: &str) -> DbId {
    sqlx::query_scalar("INSERT INTO departments (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("insert department")
}

pub async fn seed_faculty(pool: &PgPool, department_id: DbId, name: &str) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO faculty_members (department_id, full_name) VALUES ($1, $2) RETURNING id",
    )
    .bind(department_id)
    .bind(name)
    .fetch_one(pool)
    .await
    .expect("insert faculty member")
}

pub async fn seed_student(
    pool: &PgPool,
    department_id: DbId,
    name: &str,
    graduation_year: i32,
) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO students (department_id, full_name, graduation_year)
         VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(department_id)
    .bind(name)
    .bind(graduation_year)
    .fetch_one(pool)
    .await
    .expect("insert student")
}

pub async fn seed_approved_student_selection(
    pool: &PgPool,
    student_id: DbId,
    preferred_lecturer_id: Option<DbId>,
    topic_title: Option<&str>,
    priority: i32,
) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO student_selections
            (student_id, preferred_lecturer_id, topic_title, priority, status)
         VALUES ($1, $2, $3, $4, 'APPROVED') RETURNING id",
    )
    .bind(student_id)
    .bind(preferred_lecturer_id)
    .bind(topic_title)
    .bind(priority)
    .fetch_one(pool)
    .await
    .expect("insert student selection")
}

pub async fn seed_approved_lecturer_selection(
    pool: &PgPool,
    lecturer_id: DbId,
    topic_title: Option<&str>,
    priority: i32,
    capacity: i32,
) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO lecturer_selections
            (lecturer_id, topic_title, priority, capacity, status)
         VALUES ($1, $2, $3, $4, 'APPROVED') RETURNING id",
    )
    .bind(lecturer_id)
    .bind(topic_title)
    .bind(priority)
    .bind(capacity)
    .fetch_one(pool)
    .await
    .expect("insert lecturer selection")
}

pub async fn seed_allocation(
    pool: &PgPool,
    student_id: DbId,
    lecturer_id: Option<DbId>,
    topic_title: &str,
) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO project_allocations (student_id, lecturer_id, topic_title)
         VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(student_id)
    .bind(lecturer_id)
    .bind(topic_title)
    .fetch_one(pool)
    .await
    .expect("insert allocation")
}

/// Force a proposed project into a given status, bypassing the workflow.
pub async fn force_status(pool: &PgPool, proposed_project_id: DbId, status: &str) {
    sqlx::query("UPDATE proposed_projects SET status = $2 WHERE id = $1")
        .bind(proposed_project_id)
        .bind(status)
        .execute(pool)
        .await
        .expect("force status");
}

/// A fully seeded department with one advisor, one student, and a confirmed
/// allocation between them.
pub struct Campus {
    pub department_id: DbId,
    pub advisor_id: DbId,
    pub student_id: DbId,
    pub allocation_id: DbId,
}

pub async fn seed_campus(pool: &PgPool) -> Campus {
    let department_id = seed_department(pool, "Computer Science").await;
    let advisor_id = seed_faculty(pool, department_id, "Dr. Khanh").await;
    let student_id = seed_student(pool, department_id, "Mai Anh", 2026).await;
    let allocation_id =
        seed_allocation(pool, student_id, Some(advisor_id), "Initial topic").await;
    Campus {
        department_id,
        advisor_id,
        student_id,
        allocation_id,
    }
}
