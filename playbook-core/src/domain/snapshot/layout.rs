// playbook-core/src/domain/snapshot/layout.rs
//
// The snapshot document carries no schema. Which keys hold tables, grouped
// tables or histories is decided by key name alone.

use indexmap::IndexMap;

use crate::domain::dataset::Table;

/// A table key whose rows are identified by one of its columns.
#[derive(Debug, Clone)]
pub struct IndexedTableKey {
    pub key: &'static str,
    pub index_column: &'static str,
    /// Substituted when the stored table is malformed.
    pub fallback: fn() -> Table,
}

/// A key holding one list of row records per category.
#[derive(Debug, Clone)]
pub struct GroupedTableKey {
    pub key: &'static str,
    pub fallback: fn() -> IndexMap<String, Table>,
}

#[derive(Debug, Clone)]
pub struct KeyLayout {
    /// Keys ending with this suffix hold split-oriented table text.
    pub table_suffix: &'static str,
    pub indexed: Vec<IndexedTableKey>,
    pub grouped: Vec<GroupedTableKey>,
    pub history: Vec<&'static str>,
}

impl KeyLayout {
    pub fn indexed(&self, key: &str) -> Option<&IndexedTableKey> {
        self.indexed.iter().find(|k| k.key == key)
    }

    pub fn grouped(&self, key: &str) -> Option<&GroupedTableKey> {
        self.grouped.iter().find(|k| k.key == key)
    }

    pub fn is_history(&self, key: &str) -> bool {
        self.history.contains(&key)
    }

    pub fn is_table(&self, key: &str) -> bool {
        key.ends_with(self.table_suffix)
    }
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self {
            table_suffix: "_df_json",
            indexed: Vec::new(),
            grouped: Vec::new(),
            history: Vec::new(),
        }
    }
}
