// playbook-core/src/domain/snapshot/mod.rs
//
// Lossless JSON persistence of a named state snapshot.

pub mod codec;
pub mod layout;
pub mod value;

pub use codec::{Decoded, decode, encode, timestamp_key};
pub use layout::{GroupedTableKey, IndexedTableKey, KeyLayout};
pub use value::{Number, Snapshot, SnapshotWarning, StateValue};
