//! HTTP client utilities

mod client;
pub mod retry;

pub use client::{HttpClient, HttpClientBuilder};
