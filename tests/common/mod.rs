//! Shared helpers for integration tests: an in-process mock of the review
//! service built with axum, plus JSON body builders.

#![allow(dead_code)]

use axum::Router;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral port and return the base URL.
pub async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn review_body(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "code": "print('hi')",
        "language": "python",
        "status": status,
        "created_at": "2025-03-01T10:00:00",
    })
}

pub fn failed_review_body(id: &str, status: &str, error: &str) -> Value {
    let mut body = review_body(id, status);
    body["error_message"] = json!(error);
    body
}

pub fn auth_token_body(name: &str) -> Value {
    json!({
        "access_token": "jwt-token-1",
        "token_type": "bearer",
        "expires_in": 3600,
        "user": {
            "id": "u1",
            "email": "dev@example.com",
            "name": name,
            "created_at": "2025-01-01T00:00:00",
        }
    })
}
