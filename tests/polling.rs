//! End-to-end polling: a `ReviewSession` driving the real HTTP client
//! against an in-process mock that walks through review states.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tempfile::TempDir;

use revq::api::ApiClient;
use revq::api::models::ReviewStatus;
use revq::auth::CredentialStore;
use revq::errors::PollError;
use revq::session::{PollConfig, ReviewSession};

use common::{failed_review_body, review_body, spawn};

fn fast_config(max_attempts: u32) -> PollConfig {
    PollConfig {
        max_attempts,
        interval: Duration::from_millis(10),
        budget: Duration::from_secs(5),
    }
}

async fn make_session(base_url: &str, dir: &TempDir, config: PollConfig) -> ReviewSession<ApiClient> {
    let store = Arc::new(CredentialStore::open(dir.path()).unwrap());
    let client = Arc::new(ApiClient::new(base_url, store, Duration::from_secs(5)).unwrap());
    ReviewSession::new(client, config)
}

/// Serve a scripted sequence of review snapshots, repeating the last one.
fn scripted_routes(script: Vec<serde_json::Value>) -> (Router, Arc<AtomicU32>) {
    let hits = Arc::new(AtomicU32::new(0));
    let handler_hits = hits.clone();
    let app = Router::new().route(
        "/reviews/{id}",
        get(move || {
            let n = handler_hits.fetch_add(1, Ordering::SeqCst) as usize;
            let body = script[n.min(script.len() - 1)].clone();
            async move { axum::Json(body) }
        }),
    );
    (app, hits)
}

#[tokio::test]
async fn polls_through_the_lifecycle_and_reports_every_state() {
    let (app, hits) = scripted_routes(vec![
        review_body("r-1", "pending"),
        review_body("r-1", "in_progress"),
        review_body("r-1", "completed"),
    ]);
    let base = spawn(app).await;
    let dir = TempDir::new().unwrap();
    let session = make_session(&base, &dir, fast_config(30)).await;

    let mut seen = Vec::new();
    let review = session
        .run("r-1", |r| seen.push(r.status))
        .await
        .unwrap();

    assert_eq!(review.status, ReviewStatus::Completed);
    assert_eq!(
        seen,
        vec![
            ReviewStatus::Pending,
            ReviewStatus::InProgress,
            ReviewStatus::Completed
        ]
    );
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn an_already_finished_review_needs_a_single_fetch() {
    let (app, hits) = scripted_routes(vec![review_body("r-2", "completed")]);
    let base = spawn(app).await;
    let dir = TempDir::new().unwrap();
    let session = make_session(&base, &dir, fast_config(30)).await;

    let review = session.run("r-2", |_| {}).await.unwrap();
    assert_eq!(review.status, ReviewStatus::Completed);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn attempt_limit_stops_a_stuck_review() {
    let (app, hits) = scripted_routes(vec![review_body("r-3", "pending")]);
    let base = spawn(app).await;
    let dir = TempDir::new().unwrap();
    let session = make_session(&base, &dir, fast_config(3)).await;

    let err = session.run("r-3", |_| {}).await.unwrap_err();
    assert!(matches!(err, PollError::AttemptsExhausted { attempts: 3 }));
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn an_error_message_ends_polling_even_while_status_says_running() {
    let (app, hits) = scripted_routes(vec![failed_review_body(
        "r-4",
        "in_progress",
        "model backend crashed",
    )]);
    let base = spawn(app).await;
    let dir = TempDir::new().unwrap();
    let session = make_session(&base, &dir, fast_config(30)).await;

    let review = session.run("r-4", |_| {}).await.unwrap();
    assert_eq!(review.status, ReviewStatus::InProgress);
    assert!(review.has_error());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
