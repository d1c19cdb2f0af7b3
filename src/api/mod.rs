//! HTTP client for the review service's REST/JSON contract.

pub mod client;
pub mod models;

pub use client::{ApiClient, LogoutReason};
