// playbook-core/src/domain/session/mod.rs

pub mod defaults;
pub mod state;

pub use state::{ExportOptions, MaturityAssessment, SessionState, UploadedFile};
