// playbook-core/src/ports/state_store.rs

use serde_json::Value;

use crate::error::PlaybookError;

/// Durable home of the session snapshot document.
pub trait StateStore {
    /// Replaces the stored document.
    fn write(&self, document: &Value) -> Result<(), PlaybookError>;

    /// `Ok(None)` when nothing has been stored yet.
    fn read(&self) -> Result<Option<Value>, PlaybookError>;
}
