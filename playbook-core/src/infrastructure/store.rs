// playbook-core/src/infrastructure/store.rs

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::error::PlaybookError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::state_store::StateStore;

/// Snapshot document kept in a single JSON file, indented by four spaces.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Four-space indented rendering of `document`, newline terminated.
pub fn to_pretty_json(document: &Value) -> Result<Vec<u8>, InfrastructureError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    document.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

impl StateStore for JsonFileStore {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn write(&self, document: &Value) -> Result<(), PlaybookError> {
        let bytes = to_pretty_json(document)?;
        atomic_write(&self.path, &bytes)?;
        debug!(bytes = bytes.len(), "Snapshot written");
        Ok(())
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn read(&self) -> Result<Option<Value>, PlaybookError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let document = serde_json::from_str(&content).map_err(InfrastructureError::from)?;
        Ok(Some(document))
    }
}
