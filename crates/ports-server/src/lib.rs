//! Ports Server Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! HTTP wrapper around the ports ingestion pipeline.
//!
//! - `ANY /` runs one ingestion of the configured ports file into the shared store
//! - `GET /health` reports liveness and how many ports are loaded
//!
//! # Example
//!
//! ```no_run
//! use ports_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config, std::future::pending()).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;

pub use error::AppError;
