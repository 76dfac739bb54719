use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use serde_json::Value;

use crate::kernel::error::Result;

/// Table-oriented storage of JSON rows keyed by a generated id.
///
/// Ids start at 1 and are never reused within a table.
pub trait Database: Send + Sync {
    fn driver(&self) -> &str;

    /// Store `row` and return its new id.
    fn insert(&self, table: &str, row: Value) -> Result<u64>;

    fn get(&self, table: &str, id: u64) -> Result<Option<Value>>;

    /// Replace an existing row. Returns `false` if there was none.
    fn update(&self, table: &str, id: u64, row: Value) -> Result<bool>;

    /// Returns `false` if there was no such row.
    fn delete(&self, table: &str, id: u64) -> Result<bool>;

    /// Rows ordered by id.
    fn list(&self, table: &str, offset: usize, limit: usize) -> Result<Vec<(u64, Value)>>;

    fn count(&self, table: &str) -> Result<usize>;
}

#[derive(Default)]
struct Table {
    last_id: u64,
    rows: BTreeMap<u64, Value>,
}

/// Process-local database. Tables are created on first insert.
#[derive(Default)]
pub struct MemoryDatabase {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Database for MemoryDatabase {
    fn driver(&self) -> &str {
        "memory"
    }

    fn insert(&self, table: &str, row: Value) -> Result<u64> {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let table = tables.entry(table.to_string()).or_default();
        table.last_id += 1;
        table.rows.insert(table.last_id, row);
        Ok(table.last_id)
    }

    fn get(&self, table: &str, id: u64) -> Result<Option<Value>> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tables.get(table).and_then(|t| t.rows.get(&id)).cloned())
    }

    fn update(&self, table: &str, id: u64, row: Value) -> Result<bool> {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        match tables.get_mut(table).and_then(|t| t.rows.get_mut(&id)) {
            Some(existing) => {
                *existing = row;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, table: &str, id: u64) -> Result<bool> {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        Ok(tables
            .get_mut(table)
            .is_some_and(|t| t.rows.remove(&id).is_some()))
    }

    fn list(&self, table: &str, offset: usize, limit: usize) -> Result<Vec<(u64, Value)>> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tables
            .get(table)
            .map(|t| {
                t.rows
                    .iter()
                    .skip(offset)
                    .take(limit)
                    .map(|(id, row)| (*id, row.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn count(&self, table: &str) -> Result<usize> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tables.get(table).map_or(0, |t| t.rows.len()))
    }
}
