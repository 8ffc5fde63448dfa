//! In-memory record store for tests and dry runs.

use std::cell::RefCell;
use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::RecordStore;
use crate::error::Result;
use crate::record::DayAstroRecord;

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<BTreeMap<NaiveDate, DayAstroRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, date: NaiveDate) -> Result<Option<DayAstroRecord>> {
        Ok(self.records.borrow().get(&date).cloned())
    }

    fn insert(&self, record: &DayAstroRecord) -> Result<bool> {
        let mut records = self.records.borrow_mut();
        if records.contains_key(&record.date()) {
            return Ok(false);
        }
        records.insert(record.date(), record.clone());
        Ok(true)
    }

    fn get_by_month_prefix(&self, prefix: &str) -> Result<Vec<DayAstroRecord>> {
        Ok(self
            .records
            .borrow()
            .values()
            .filter(|r| r.date_key().starts_with(prefix))
            .cloned()
            .collect())
    }
}
