//! Ports Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Streams a ports document into an in-memory store.
//!
//! # Architecture
//!
//! - **reader**: [`FileReader`] decodes the `{ "<id>": { ...port... } }` document one
//!   entry at a time and sends each [`Port`] down a bounded channel
//! - **store**: [`PortStore`], a map of ports behind a single read/write lock
//! - **orchestrator**: [`IngestOrchestrator`] runs the reader as producer and a
//!   consumer task that upserts into the store, and joins both
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ports_ingest::{FileReader, IngestOrchestrator, PortRepository, PortStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(PortStore::new());
//!     let orchestrator = IngestOrchestrator::builder()
//!         .source(Arc::new(FileReader::new("ports.json")?))
//!         .repository(store.clone())
//!         .build()?;
//!
//!     let stats = orchestrator.run().await?;
//!     println!("{} ports ingested", stats.ports_upserted);
//!     println!("Ajman: {:?}", store.get_by_id("AEAJM")?);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod orchestrator;
pub mod reader;
pub mod store;

pub use error::{ConfigError, IngestError, IngestResult, StoreError, StoreResult};
pub use orchestrator::{IngestOrchestrator, IngestOrchestratorBuilder, IngestStats};
pub use ports_common::Port;
pub use reader::{stream_ports, FileReader, PortSource};
pub use store::{PortRepository, PortStore};
