//! Streaming ports document reader
//!
//! The document is one JSON object keyed by port identifier:
//!
//! ```json
//! {
//!   "AEAJM": { "name": "Ajman", "city": "Ajman", "coordinates": [55.51, 25.40] },
//!   "AEAUH": { "name": "Abu Dhabi", "city": "Abu Dhabi" }
//! }
//! ```
//!
//! Entries are decoded one at a time and handed to the channel as soon as each is
//! complete, so only a single port body is in memory at once. The key always wins
//! over any `id` inside the body.

use async_trait::async_trait;
use ports_common::Port;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, trace};

use crate::error::{ConfigError, IngestError, IngestResult};

/// Producer side of an ingestion run
///
/// Implementations send every decoded port on `tx` and return when the document is
/// exhausted or broken. The sender is owned, so the channel closes as soon as
/// `read_into` returns, whatever the outcome.
#[async_trait]
pub trait PortSource: Send + Sync {
    async fn read_into(&self, tx: mpsc::Sender<Port>) -> IngestResult<()>;
}

/// Reads a ports document from the local filesystem
#[derive(Debug, Clone)]
pub struct FileReader {
    path: PathBuf,
}

impl FileReader {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(ConfigError::NoFilePath);
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PortSource for FileReader {
    #[instrument(skip(self, tx), fields(path = %self.path.display()))]
    async fn read_into(&self, tx: mpsc::Sender<Port>) -> IngestResult<()> {
        let path = self.path.clone();

        // serde_json pulls from a blocking reader, and blocking_send needs a thread
        // outside the async scheduler.
        let sent = tokio::task::spawn_blocking(move || -> IngestResult<usize> {
            let file = open_source(&path)?;
            stream_ports(BufReader::new(file), &tx)
        })
        .await
        .map_err(|e| IngestError::Task(e.to_string()))??;

        info!(ports = sent, "Finished reading ports file");
        Ok(())
    }
}

fn open_source(path: &Path) -> IngestResult<File> {
    debug!(path = %path.display(), "Opening ports file");
    File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => IngestError::SourceNotFound {
            path: path.to_path_buf(),
        },
        _ => IngestError::SourceOpen {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Decode a ports document from `reader`, sending each port on `tx`
///
/// Blocks on every send until the consumer has room, so this must run on a
/// blocking thread. Returns the number of ports sent. Stops at the first malformed
/// entry or failed read; ports sent before that point stay sent.
pub fn stream_ports<R: Read>(reader: R, tx: &mpsc::Sender<Port>) -> IngestResult<usize> {
    let mut deserializer = serde_json::Deserializer::from_reader(reader);
    let mut emitter = PortEmitter {
        tx,
        sent: 0,
        consumer_closed: false,
    };

    let outcome = (&mut deserializer)
        .deserialize_map(&mut emitter)
        .and_then(|()| deserializer.end());

    match outcome {
        Ok(()) => Ok(emitter.sent),
        Err(_) if emitter.consumer_closed => Err(IngestError::ConsumerClosed),
        Err(e) if e.is_io() => Err(IngestError::SourceRead { source: e.into() }),
        Err(e) => Err(IngestError::Decode(e)),
    }
}

struct PortEmitter<'a> {
    tx: &'a mpsc::Sender<Port>,
    sent: usize,
    consumer_closed: bool,
}

impl<'de> Visitor<'de> for &mut PortEmitter<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object mapping port identifiers to ports")
    }

    fn visit_map<A>(self, mut entries: A) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        while let Some(id) = entries.next_key::<String>()? {
            let mut port: Port = entries.next_value()?;
            port.id = id;
            port.validate().map_err(de::Error::custom)?;

            trace!(port_id = %port.id, "Decoded port");
            if self.tx.blocking_send(port).is_err() {
                self.consumer_closed = true;
                return Err(de::Error::custom("port consumer closed"));
            }
            self.sent += 1;
        }
        Ok(())
    }
}
