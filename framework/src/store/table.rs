use super::{record_id, Container, Record};
use crate::error::FrameworkError;
use serde::{Deserialize, Serialize};

/// An ordered sequence of records, persisted as a JSON array
///
/// Ids are only unique by construction: [`Table::next_id`] hands out
/// `max(id) + 1` and the store serializes every write, so nothing else
/// has to check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a record by its id
    pub fn find(&self, id: i64) -> Option<&Record> {
        self.records.iter().find(|r| record_id(r) == Some(id))
    }

    /// Index of the record with this id, for in-place mutation
    pub fn position(&self, id: i64) -> Option<usize> {
        self.records.iter().position(|r| record_id(r) == Some(id))
    }

    pub fn append(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Overwrite the record at `index`, returning the previous one
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn replace_at(&mut self, index: usize, record: Record) -> Record {
        std::mem::replace(&mut self.records[index], record)
    }

    /// Mutable access to the record at `index`
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Record> {
        self.records.get_mut(index)
    }

    /// Remove and return the record at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> Record {
        self.records.remove(index)
    }

    /// The id the next appended record gets: one past the largest id, or 1
    ///
    /// Fails once the largest id is `i64::MAX`.
    pub fn next_id(&self) -> Result<i64, FrameworkError> {
        match self.records.iter().filter_map(record_id).max() {
            None => Ok(1),
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| FrameworkError::internal(format!("no id left after {}", max))),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }
}

impl From<Vec<Record>> for Table {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl Container for Table {
    type Scope = ();

    fn table(&self, _scope: &()) -> Result<&Table, FrameworkError> {
        Ok(self)
    }

    fn table_mut(&mut self, _scope: &()) -> Result<&mut Table, FrameworkError> {
        Ok(self)
    }
}
