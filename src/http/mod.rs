//! HTTP client layer: `ExchangeHttp` with a configurable retry policy.

pub mod client;
pub mod retry;

pub use client::ExchangeHttp;
pub use retry::{RetryConfig, RetryPolicy};
