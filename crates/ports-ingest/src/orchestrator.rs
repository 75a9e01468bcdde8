//! Ingestion orchestrator
//!
//! One run wires a [`PortSource`] to a [`PortRepository`] through a bounded
//! channel: the source produces on the caller's task while a spawned consumer
//! upserts every port it receives. The run returns only after the consumer has
//! drained the channel, so no upsert is still in flight when `run` resolves.

use ports_common::Port;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::error::{ConfigError, IngestError, IngestResult};
use crate::reader::PortSource;
use crate::store::PortRepository;

/// Ports buffered between reader and consumer. One slot keeps the reader at most
/// a single record ahead of the store.
pub const HANDOFF_CAPACITY: usize = 1;

/// Summary of a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    pub ports_upserted: usize,
    pub elapsed: Duration,
}

/// Streams ports from a source into a repository
pub struct IngestOrchestrator {
    source: Arc<dyn PortSource>,
    repository: Arc<dyn PortRepository>,
}

impl IngestOrchestrator {
    pub fn new(source: Arc<dyn PortSource>, repository: Arc<dyn PortRepository>) -> Self {
        Self { source, repository }
    }

    pub fn builder() -> IngestOrchestratorBuilder {
        IngestOrchestratorBuilder::default()
    }

    /// Run one ingestion from start to finish
    ///
    /// Ports already upserted when the source fails are kept; there is no rollback.
    #[instrument(skip(self), fields(run_id = %Uuid::new_v4()))]
    pub async fn run(&self) -> IngestResult<IngestStats> {
        let started = Instant::now();
        info!("Starting port ingestion");

        let (tx, rx) = mpsc::channel::<Port>(HANDOFF_CAPACITY);
        let consumer = tokio::spawn(consume(rx, Arc::clone(&self.repository)));

        let read_result = self.source.read_into(tx).await;

        // The sender went away with read_into, so the consumer is finishing.
        let ports_upserted = match (consumer.await, read_result) {
            (Ok(upserted), Ok(())) => upserted,
            (Err(join_err), Ok(())) => {
                error!(error = %join_err, "Port consumer task failed");
                return Err(IngestError::Task(join_err.to_string()));
            },
            // A reader failure is reported even when the consumer also failed.
            (joined, Err(e)) => {
                match joined {
                    Ok(upserted) => {
                        error!(error = %e, ports_upserted = upserted, "Port ingestion failed")
                    },
                    Err(join_err) => {
                        error!(error = %e, consumer_error = %join_err, "Port ingestion failed")
                    },
                }
                return Err(IngestError::Read {
                    source: Box::new(e),
                });
            },
        };

        let stats = IngestStats {
            ports_upserted,
            elapsed: started.elapsed(),
        };
        info!(
            ports_upserted,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "Port ingestion completed"
        );

        Ok(stats)
    }
}

async fn consume(mut rx: mpsc::Receiver<Port>, repository: Arc<dyn PortRepository>) -> usize {
    let mut upserted = 0;
    while let Some(port) = rx.recv().await {
        repository.upsert(port);
        upserted += 1;
    }
    upserted
}

/// Builder for [`IngestOrchestrator`] that fails fast on missing collaborators
#[derive(Default)]
pub struct IngestOrchestratorBuilder {
    source: Option<Arc<dyn PortSource>>,
    repository: Option<Arc<dyn PortRepository>>,
}

impl IngestOrchestratorBuilder {
    pub fn source(mut self, source: Arc<dyn PortSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn repository(mut self, repository: Arc<dyn PortRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn build(self) -> Result<IngestOrchestrator, ConfigError> {
        let source = self.source.ok_or(ConfigError::NoSource)?;
        let repository = self.repository.ok_or(ConfigError::NoRepository)?;
        Ok(IngestOrchestrator::new(source, repository))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::StoreResult;
    use crate::store::PortStore;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::path::PathBuf;

    /// Sends a fixed list of ports, then optionally fails
    struct MockSource {
        ports: Vec<Port>,
        fail_with: fn() -> Option<IngestError>,
    }

    #[async_trait]
    impl PortSource for MockSource {
        async fn read_into(&self, tx: mpsc::Sender<Port>) -> IngestResult<()> {
            for port in &self.ports {
                tx.send(port.clone()).await.map_err(|_| IngestError::ConsumerClosed)?;
            }
            match (self.fail_with)() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
    }

    /// Records every upsert in arrival order
    #[derive(Default)]
    struct RecordingRepository {
        upserts: Mutex<Vec<Port>>,
    }

    impl PortRepository for RecordingRepository {
        fn get_by_id(&self, id: &str) -> StoreResult<Port> {
            self.upserts
                .lock()
                .iter()
                .rev()
                .find(|p| p.id == id)
                .cloned()
                .ok_or_else(|| crate::StoreError::NotFound(id.to_string()))
        }

        fn upsert(&self, port: Port) {
            self.upserts.lock().push(port);
        }
    }

    fn sample_ports() -> Vec<Port> {
        ["AEAJM", "AEAUH", "AEDXB"]
            .into_iter()
            .map(|id| Port::new(id, format!("Port {id}")))
            .collect()
    }

    #[test]
    fn test_builder_requires_collaborators() {
        let source: Arc<dyn PortSource> = Arc::new(MockSource {
            ports: vec![],
            fail_with: || None,
        });
        let repository: Arc<dyn PortRepository> = Arc::new(PortStore::new());

        assert!(IngestOrchestrator::builder()
            .source(source.clone())
            .repository(repository.clone())
            .build()
            .is_ok());
        assert_eq!(
            IngestOrchestrator::builder()
                .repository(repository)
                .build()
                .err(),
            Some(ConfigError::NoSource)
        );
        assert_eq!(
            IngestOrchestrator::builder().source(source).build().err(),
            Some(ConfigError::NoRepository)
        );
    }

    #[tokio::test]
    async fn test_run_upserts_in_order() {
        let repository = Arc::new(RecordingRepository::default());
        let orchestrator = IngestOrchestrator::new(
            Arc::new(MockSource {
                ports: sample_ports(),
                fail_with: || None,
            }),
            repository.clone(),
        );

        let stats = orchestrator.run().await.unwrap();

        assert_eq!(stats.ports_upserted, 3);
        assert_eq!(*repository.upserts.lock(), sample_ports());
    }

    #[tokio::test]
    async fn test_run_wraps_reader_error_and_keeps_prior_upserts() {
        let repository = Arc::new(RecordingRepository::default());
        let orchestrator = IngestOrchestrator::new(
            Arc::new(MockSource {
                ports: sample_ports()[..2].to_vec(),
                fail_with: || {
                    Some(IngestError::SourceNotFound {
                        path: PathBuf::from("ports.json"),
                    })
                },
            }),
            repository.clone(),
        );

        let err = orchestrator.run().await.unwrap_err();

        assert!(matches!(err, IngestError::Read { .. }));
        assert!(matches!(err.root(), IngestError::SourceNotFound { .. }));
        assert_eq!(repository.upserts.lock().len(), 2);
        assert!(repository.get_by_id("AEAUH").is_ok());
    }

    /// Panics on the first upsert, taking the consumer task down
    struct PanickingRepository;

    impl PortRepository for PanickingRepository {
        fn get_by_id(&self, id: &str) -> StoreResult<Port> {
            Err(crate::StoreError::NotFound(id.to_string()))
        }

        fn upsert(&self, _port: Port) {
            panic!("storage unavailable");
        }
    }

    #[tokio::test]
    async fn test_consumer_failure_is_a_task_error() {
        let orchestrator = IngestOrchestrator::new(
            Arc::new(MockSource {
                ports: sample_ports()[..1].to_vec(),
                fail_with: || None,
            }),
            Arc::new(PanickingRepository),
        );

        let err = orchestrator.run().await.unwrap_err();
        assert!(matches!(err, IngestError::Task(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_reader_error_wins_over_consumer_failure() {
        let orchestrator = IngestOrchestrator::new(
            Arc::new(MockSource {
                ports: sample_ports()[..1].to_vec(),
                fail_with: || {
                    Some(IngestError::SourceNotFound {
                        path: PathBuf::from("ports.json"),
                    })
                },
            }),
            Arc::new(PanickingRepository),
        );

        let err = orchestrator.run().await.unwrap_err();
        assert!(matches!(err, IngestError::Read { .. }), "got {err:?}");
        assert!(matches!(err.root(), IngestError::SourceNotFound { .. }));
    }

    #[tokio::test]
    async fn test_runs_are_independent() {
        let store = Arc::new(PortStore::new());
        let orchestrator = IngestOrchestrator::new(
            Arc::new(MockSource {
                ports: sample_ports(),
                fail_with: || None,
            }),
            store.clone(),
        );

        orchestrator.run().await.unwrap();
        let second = orchestrator.run().await.unwrap();

        assert_eq!(second.ports_upserted, 3);
        assert_eq!(store.len(), 3);
    }
}
