pub mod duckdb;
pub mod sample;

pub use duckdb::DuckDbDatasetSource;
pub use sample::SampleDatasetSource;
