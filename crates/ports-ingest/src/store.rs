//! In-memory port store
//!
//! One read/write lock covers the whole map: lookups share it, upserts and resets
//! take it exclusively. Entries are stored and returned by value, so a caller can
//! hold a [`Port`] without keeping the lock.

use parking_lot::RwLock;
use ports_common::Port;
use std::collections::HashMap;
use tracing::trace;

use crate::error::{StoreError, StoreResult};

/// Storage the ingestion consumer writes into
pub trait PortRepository: Send + Sync {
    /// Look up a port by identifier
    fn get_by_id(&self, id: &str) -> StoreResult<Port>;

    /// Insert the port, replacing any entry with the same identifier
    fn upsert(&self, port: Port);
}

/// Concurrent map from port identifier to [`Port`]
#[derive(Debug, Default)]
pub struct PortStore {
    ports: RwLock<HashMap<String, Port>>,
}

impl PortStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry
    pub fn reset(&self) {
        *self.ports.write() = HashMap::new();
    }

    pub fn len(&self) -> usize {
        self.ports.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.read().is_empty()
    }
}

impl PortRepository for PortStore {
    fn get_by_id(&self, id: &str) -> StoreResult<Port> {
        self.ports
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn upsert(&self, port: Port) {
        trace!(port_id = %port.id, name = %port.name, "Saved port");
        self.ports.write().insert(port.id.clone(), port);
    }
}
