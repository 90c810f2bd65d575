// playbook-core/src/ports/dataset_source.rs

// Defines how a dataset reaches the engine, without knowing where it comes from.

use crate::domain::dataset::Table;
use crate::error::PlaybookError;

pub trait DatasetSource {
    fn load(&self) -> Result<Table, PlaybookError>;

    /// Name recorded alongside the loaded dataset.
    fn label(&self) -> String;
}
