//! Shared fixtures for ingestion tests
#![allow(dead_code)]

use ports_common::{Coordinates, Port};
use ports_ingest::{FileReader, IngestOrchestrator, PortStore};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;

pub fn ajman() -> Port {
    Port {
        id: "AEAJM".to_string(),
        name: "Ajman".to_string(),
        city: "Ajman".to_string(),
        country: "United Arab Emirates".to_string(),
        alias: vec![],
        regions: vec![],
        coordinates: Some(Coordinates::new(55.5136433, 25.4052165)),
        province: "Ajman".to_string(),
        timezone: "Asia/Dubai".to_string(),
        unlocs: vec!["AEAJM".to_string()],
        code: "52000".to_string(),
    }
}

pub fn abu_dhabi() -> Port {
    Port {
        id: "AEAUH".to_string(),
        name: "Abu Dhabi".to_string(),
        city: "Abu Dhabi".to_string(),
        country: "United Arab Emirates".to_string(),
        alias: vec![],
        regions: vec![],
        coordinates: Some(Coordinates::new(54.37, 24.47)),
        province: "Abu Z¸aby [Abu Dhabi]".to_string(),
        timezone: "Asia/Dubai".to_string(),
        unlocs: vec!["AEAUH".to_string()],
        code: "52001".to_string(),
    }
}

pub fn dubai() -> Port {
    Port {
        id: "AEDXB".to_string(),
        name: "Dubai".to_string(),
        city: "Dubai".to_string(),
        country: "United Arab Emirates".to_string(),
        alias: vec!["Dubayy".to_string()],
        regions: vec!["Persian Gulf".to_string()],
        coordinates: Some(Coordinates::new(55.27, 25.25)),
        province: "Dubayy [Dubai]".to_string(),
        timezone: "Asia/Dubai".to_string(),
        unlocs: vec!["AEDXB".to_string()],
        code: "52005".to_string(),
    }
}

pub fn sample_ports() -> Vec<Port> {
    vec![ajman(), abu_dhabi(), dubai()]
}

/// Encode ports as a keyed document, keeping the given order and any duplicate ids
pub fn encode_document(ports: &[Port]) -> String {
    let entries: Vec<String> = ports
        .iter()
        .map(|port| {
            format!(
                "{}: {}",
                serde_json::to_string(&port.id).unwrap(),
                serde_json::to_string_pretty(port).unwrap()
            )
        })
        .collect();
    format!("{{\n{}\n}}\n", entries.join(",\n"))
}

pub fn write_source(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn orchestrator_for(path: &Path, store: &Arc<PortStore>) -> IngestOrchestrator {
    IngestOrchestrator::builder()
        .source(Arc::new(FileReader::new(path).unwrap()))
        .repository(store.clone())
        .build()
        .unwrap()
}
