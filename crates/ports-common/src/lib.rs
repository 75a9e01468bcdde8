//! Ports Common Library
//!
//! Shared types, logging, and error handling for the ports workspace.
//!
//! # Overview
//!
//! - **Types**: the [`Port`] record and its [`Coordinates`]
//! - **Error Handling**: [`PortsError`] and the crate [`Result`] alias
//! - **Logging**: tracing subscriber setup shared by every binary
//!
//! # Example
//!
//! ```
//! use ports_common::Port;
//!
//! let port: Port = serde_json::from_str(r#"{"name":"Ajman","code":"52000"}"#).unwrap();
//! assert_eq!(port.name, "Ajman");
//! assert_eq!(port.code, "52000");
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{PortsError, Result};
pub use types::{Coordinates, Port};
