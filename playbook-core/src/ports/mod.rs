// playbook-core/src/ports/mod.rs

pub mod dataset_source;
pub mod state_store;

pub use dataset_source::DatasetSource;
pub use state_store::StateStore;
