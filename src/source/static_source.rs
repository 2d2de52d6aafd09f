use super::ProcessSource;
use crate::prelude::*;
use crate::process::ProcessRecord;
use crate::repository::ProcessRepository;

/// A fixed set of records, for tests and for callers that gather processes themselves.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<ProcessRecord>,
    unreadable: usize,
}

impl StaticSource {
    pub fn new(records: Vec<ProcessRecord>) -> Self {
        Self {
            records,
            unreadable: 0,
        }
    }

    /// Simulate processes that vanished or could not be read.
    pub fn with_unreadable(mut self, unreadable: usize) -> Self {
        self.unreadable = unreadable;
        self
    }
}

impl ProcessSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    fn collect_into(&self, repository: &mut ProcessRepository) -> Result<()> {
        for record in &self.records {
            repository.insert(record.clone());
            repository.record_collected();
        }
        for _ in 0..self.unreadable {
            repository.record_error();
        }
        Ok(())
    }
}
