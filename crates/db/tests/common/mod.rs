//! Shared seed helpers for repository integration tests.
//!
//! Each helper inserts one row and returns its id. Tests compose these to
//! build the department / faculty / student graph the workflow expects.

#![allow(dead_code)]

use sqlx::PgPool;
use thesisflow_core::types::DbId;

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
