// playbook-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Schema Error: {0}")]
    #[diagnostic(
        code(playbook::domain::schema),
        help("Every column of a table must have the same number of cells and a unique name.")
    )]
    SchemaError(String),

    #[error("Column '{0}' not found")]
    #[diagnostic(code(playbook::domain::column_not_found))]
    ColumnNotFound(String),

    #[error("Column '{column}' cannot identify rows: {reason}")]
    #[diagnostic(
        code(playbook::domain::index),
        help("An identifier column must be present, non-missing and unique.")
    )]
    InvalidIndex { column: String, reason: String },

    #[error("No dataset loaded")]
    #[diagnostic(
        code(playbook::domain::no_data),
        help("Load a file with --data or use the built-in --sample dataset.")
    )]
    NoDataset,

    #[error("No quality analysis has been run on the current dataset")]
    #[diagnostic(
        code(playbook::domain::no_analysis),
        help("Run `playbook analyze` first, or pass --data/--sample to the export.")
    )]
    NoAnalysis,

    #[error("Snapshot Error: {0}")]
    #[diagnostic(code(playbook::domain::snapshot))]
    SnapshotError(String),
}
