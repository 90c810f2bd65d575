// playbook-core/src/domain/dataset/mod.rs

pub mod cell;
pub mod profile;
pub mod table;

pub use cell::{Cell, CellKey};
pub use profile::{DatasetProfile, NumericSummary};
pub use table::{Column, Table};
