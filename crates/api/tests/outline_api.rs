//! HTTP-level integration tests for the proposal outline lifecycle:
//! upsert semantics, review verdicts with parent side effects, locking,
//! and terminal-state enforcement.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::*;

/// Trigger a project and walk it to TOPIC_APPROVED so the outline phase is
/// open.
async fn topic_approved_project(pool: &PgPool, campus: &Campus) -> i64 {
    let advisor = token_for(&faculty_actor(campus.advisor_id, campus.department_id));
    let student = token_for(&student_actor(campus.student_id));

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/proposed-projects/trigger",
        &advisor,
        json!({"allocation_id": campus.allocation_id}),
    )
    .await;
    let project_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/proposed-projects/{project_id}"),
        &student,
        json!({"title": "Adaptive query planning", "submit_to_advisor": true}),
    )
    .await;
    put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/proposed-projects/{project_id}/advisor-review"),
        &advisor,
        json!({"status": "TOPIC_APPROVED"}),
    )
    .await;
    project_id
}

async fn submit_outline(
    pool: &PgPool,
    campus: &Campus,
    project_id: i64,
    submit_for_review: bool,
) -> serde_json::Value {
    let student = token_for(&student_actor(campus.student_id));
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/proposed-projects/outline",
        &student,
        json!({
            "proposed_project_id": project_id,
            "introduction": "Intro",
            "objectives": "Goals",
            "method": "Method",
            "expected_results": "Results",
            "submit_for_review": submit_for_review
        }),
    )
    .await;
    expect_status(response, StatusCode::CREATED).await
}

// ---------------------------------------------------------------------------
// Submit / upsert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn draft_submission_does_not_move_parent(pool: PgPool) {
    let campus = seed_campus(&pool).await;
    let project_id = topic_approved_project(&pool, &campus).await;

    let body = submit_outline(&pool, &campus, project_id, false).await;
    assert_eq!(body["data"]["status"], "DRAFT");

    let status: String = sqlx::query_scalar("SELECT status FROM proposed_projects WHERE id = $1")
        .bind(project_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "TOPIC_APPROVED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn review_submission_advances_parent_from_topic_approved(pool: PgPool) {
    let campus = seed_campus(&pool).await;
    let project_id = topic_approved_project(&pool, &campus).await;

    let body = submit_outline(&pool, &campus, project_id, true).await;
    assert_eq!(body["data"]["status"], "PENDING_REVIEW");

    let status: String = sqlx::query_scalar("SELECT status FROM proposed_projects WHERE id = $1")
        .bind(project_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "OUTLINE_PENDING_ADVISOR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn submitting_twice_keeps_exactly_one_outline_with_latest_values(pool: PgPool) {
    let campus = seed_campus(&pool).await;
    let project_id = topic_approved_project(&pool, &campus).await;
    let student = token_for(&student_actor(campus.student_id));

    submit_outline(&pool, &campus, project_id, false).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/proposed-projects/outline",
        &student,
        json!({
            "proposed_project_id": project_id,
            "introduction": "Rewritten intro",
            "objectives": "New goals",
            "submit_for_review": false
        }),
    )
    .await;
    let body = expect_status(response, StatusCode::CREATED).await;
    assert_eq!(body["data"]["introduction"], "Rewritten intro");
    // Fields omitted on resubmit are overwritten, not merged.
    assert!(body["data"]["method"].is_null());

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM proposal_outlines WHERE proposed_project_id = $1")
            .bind(project_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn outline_submit_before_topic_approval_is_conflict(pool: PgPool) {
    let campus = seed_campus(&pool).await;
    let advisor = token_for(&faculty_actor(campus.advisor_id, campus.department_id));
    let student = token_for(&student_actor(campus.student_id));

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/proposed-projects/trigger",
        &advisor,
        json!({"allocation_id": campus.allocation_id}),
    )
    .await;
    let project_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/proposed-projects/outline",
        &student,
        json!({"proposed_project_id": project_id, "introduction": "Too early"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn only_the_student_member_submits_the_outline(pool: PgPool) {
    let campus = seed_campus(&pool).await;
    let project_id = topic_approved_project(&pool, &campus).await;
    let advisor = token_for(&faculty_actor(campus.advisor_id, campus.department_id));

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/proposed-projects/outline",
        &advisor,
        json!({"proposed_project_id": project_id, "introduction": "Advisor-written"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn advisor_approval_moves_parent_to_advisor_approved(pool: PgPool) {
    let campus = seed_campus(&pool).await;
    let project_id = topic_approved_project(&pool, &campus).await;
    let advisor = token_for(&faculty_actor(campus.advisor_id, campus.department_id));

    let body = submit_outline(&pool, &campus, project_id, true).await;
    let outline_id = body["data"]["id"].as_i64().unwrap();

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/proposed-projects/outline/{outline_id}/review"),
        &advisor,
        json!({"status": "APPROVED", "comment": "Solid plan"}),
    )
    .await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["status"], "APPROVED");

    let status: String = sqlx::query_scalar("SELECT status FROM proposed_projects WHERE id = $1")
        .bind(project_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "ADVISOR_APPROVED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn requested_changes_sends_parent_back(pool: PgPool) {
    let campus = seed_campus(&pool).await;
    let project_id = topic_approved_project(&pool, &campus).await;
    let advisor = token_for(&faculty_actor(campus.advisor_id, campus.department_id));

    let body = submit_outline(&pool, &campus, project_id, true).await;
    let outline_id = body["data"]["id"].as_i64().unwrap();

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/proposed-projects/outline/{outline_id}/review"),
        &advisor,
        json!({"status": "REQUESTED_CHANGES"}),
    )
    .await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["status"], "REQUESTED_CHANGES");

    let status: String = sqlx::query_scalar("SELECT status FROM proposed_projects WHERE id = $1")
        .bind(project_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "OUTLINE_REQUESTED_CHANGES");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_advisor_review_leaves_parent_untouched(pool: PgPool) {
    let campus = seed_campus(&pool).await;
    let project_id = topic_approved_project(&pool, &campus).await;
    let other = seed_faculty(&pool, campus.department_id, "Dr. Second Reader").await;
    let token = token_for(&faculty_actor(other, campus.department_id));

    let body = submit_outline(&pool, &campus, project_id, true).await;
    let outline_id = body["data"]["id"].as_i64().unwrap();

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/proposed-projects/outline/{outline_id}/review"),
        &token,
        json!({"status": "APPROVED"}),
    )
    .await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["status"], "APPROVED");

    let status: String = sqlx::query_scalar("SELECT status FROM proposed_projects WHERE id = $1")
        .bind(project_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "OUTLINE_PENDING_ADVISOR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn students_cannot_review_outlines(pool: PgPool) {
    let campus = seed_campus(&pool).await;
    let project_id = topic_approved_project(&pool, &campus).await;
    let student = token_for(&student_actor(campus.student_id));

    let body = submit_outline(&pool, &campus, project_id, true).await;
    let outline_id = body["data"]["id"].as_i64().unwrap();

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/proposed-projects/outline/{outline_id}/review"),
        &student,
        json!({"status": "APPROVED"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Lock
// ---------------------------------------------------------------------------

/// Drive an outline to APPROVED and return its id.
async fn approved_outline(pool: &PgPool, campus: &Campus) -> i64 {
    let project_id = topic_approved_project(pool, campus).await;
    let advisor = token_for(&faculty_actor(campus.advisor_id, campus.department_id));
    let body = submit_outline(pool, campus, project_id, true).await;
    let outline_id = body["data"]["id"].as_i64().unwrap();
    put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/proposed-projects/outline/{outline_id}/review"),
        &advisor,
        json!({"status": "APPROVED"}),
    )
    .await;
    outline_id
}

#[sqlx::test(migrations = "../db/migrations")]
async fn department_head_locks_approved_outline(pool: PgPool) {
    let campus = seed_campus(&pool).await;
    let outline_id = approved_outline(&pool, &campus).await;
    let head = seed_faculty(&pool, campus.department_id, "Dr. Head").await;
    let token = token_for(&department_head_actor(head, campus.department_id));

    let response = put_empty(
        build_test_app(pool.clone()),
        &format!("/api/v1/proposed-projects/outline/{outline_id}/lock"),
        &token,
    )
    .await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["status"], "LOCKED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cross_department_lock_is_forbidden(pool: PgPool) {
    let campus = seed_campus(&pool).await;
    let outline_id = approved_outline(&pool, &campus).await;
    let other_dept = seed_department(&pool, "Economics").await;
    let other_head = seed_faculty(&pool, other_dept, "Dr. Elsewhere").await;
    let token = token_for(&department_head_actor(other_head, other_dept));

    let response = put_empty(
        build_test_app(pool.clone()),
        &format!("/api/v1/proposed-projects/outline/{outline_id}/lock"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn locking_an_unapproved_outline_is_conflict(pool: PgPool) {
    let campus = seed_campus(&pool).await;
    let project_id = topic_approved_project(&pool, &campus).await;
    let body = submit_outline(&pool, &campus, project_id, true).await;
    let outline_id = body["data"]["id"].as_i64().unwrap();

    let head = seed_faculty(&pool, campus.department_id, "Dr. Head").await;
    let token = token_for(&department_head_actor(head, campus.department_id));

    let response = put_empty(
        build_test_app(pool.clone()),
        &format!("/api/v1/proposed-projects/outline/{outline_id}/lock"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn locked_outline_rejects_further_submit_and_review(pool: PgPool) {
    let campus = seed_campus(&pool).await;
    let outline_id = approved_outline(&pool, &campus).await;
    let head = seed_faculty(&pool, campus.department_id, "Dr. Head").await;
    let head_token = token_for(&department_head_actor(head, campus.department_id));
    let student = token_for(&student_actor(campus.student_id));
    let advisor = token_for(&faculty_actor(campus.advisor_id, campus.department_id));

    put_empty(
        build_test_app(pool.clone()),
        &format!("/api/v1/proposed-projects/outline/{outline_id}/lock"),
        &head_token,
    )
    .await;

    let project_id: i64 =
        sqlx::query_scalar("SELECT proposed_project_id FROM proposal_outlines WHERE id = $1")
            .bind(outline_id)
            .fetch_one(&pool)
            .await
            .unwrap();

    // Submit against a locked outline: 409.
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/proposed-projects/outline",
        &student,
        json!({"proposed_project_id": project_id, "introduction": "Late edit"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Review against a locked outline: 409.
    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/proposed-projects/outline/{outline_id}/review"),
        &advisor,
        json!({"status": "REQUESTED_CHANGES"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
