//! revq: client library for an AI code-review service.
//!
//! The crate is split into a transport-agnostic core (`session` drives the
//! polling state machine over the [`session::ReviewFetcher`] trait) and the
//! concrete HTTP client in [`api`]. The binary in `main.rs` is a thin CLI
//! over these pieces.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod session;
pub mod ui;
