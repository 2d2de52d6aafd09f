use std::collections::HashMap;

use crate::process::{Pid, ProcessRecord};

/// In-memory store of the records gathered during one collection pass.
///
/// Records live in an arena and are addressed either by pid or by their arena slot.
/// The repository is the only owner of the records: the tree and the renderer work on slots.
#[derive(Debug, Default)]
pub struct ProcessRepository {
    records: Vec<ProcessRecord>,
    slots: HashMap<Pid, usize>,
    collected: usize,
    errors: usize,
}

impl ProcessRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, replacing any record previously stored under the same pid.
    pub fn insert(&mut self, record: ProcessRecord) {
        match self.slots.get(&record.pid) {
            Some(&slot) => self.records[slot] = record,
            None => {
                self.slots.insert(record.pid, self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, pid: Pid) -> Option<&ProcessRecord> {
        self.slot(pid).map(|slot| &self.records[slot])
    }

    pub fn slot(&self, pid: Pid) -> Option<usize> {
        self.slots.get(&pid).copied()
    }

    /// # Panics
    /// If `slot` was not handed out by this repository.
    pub fn record(&self, slot: usize) -> &ProcessRecord {
        &self.records[slot]
    }

    pub fn all(&self) -> impl Iterator<Item = &ProcessRecord> {
        self.records.iter()
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record_collected(&mut self) {
        self.collected += 1;
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    /// Number of records successfully read by the source.
    pub fn collected(&self) -> usize {
        self.collected
    }

    /// Number of processes the source failed to read.
    pub fn errors(&self) -> usize {
        self.errors
    }
}

impl FromIterator<ProcessRecord> for ProcessRepository {
    fn from_iter<T: IntoIterator<Item = ProcessRecord>>(iter: T) -> Self {
        let mut repository = ProcessRepository::new();
        for record in iter {
            repository.insert(record);
        }
        repository
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut repository = ProcessRepository::new();
        repository.insert(ProcessRecord::new(42, Some(1), "worker"));

        assert_eq!(repository.count(), 1);
        assert_eq!(repository.get(42).unwrap().name, "worker");
        assert!(repository.get(43).is_none());
    }

    #[test]
    fn test_insert_overwrites_same_pid() {
        let mut repository = ProcessRepository::new();
        repository.insert(ProcessRecord::new(7, Some(1), "before"));
        let slot = repository.slot(7).unwrap();
        repository.insert(ProcessRecord::new(7, Some(2), "after"));

        assert_eq!(repository.count(), 1);
        assert_eq!(repository.slot(7), Some(slot));
        let record = repository.get(7).unwrap();
        assert_eq!(record.name, "after");
        assert_eq!(record.parent_pid, Some(2));
    }

    #[test]
    fn test_all_yields_every_record() {
        let repository: ProcessRepository = (1..=5)
            .map(|pid| ProcessRecord::new(pid, None, format!("p{pid}")))
            .collect();

        let mut pids: Vec<Pid> = repository.all().map(|record| record.pid).collect();
        pids.sort_unstable();
        assert_eq!(pids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_counters_are_independent_from_storage() {
        let mut repository = ProcessRepository::new();
        repository.record_collected();
        repository.record_collected();
        repository.record_error();

        assert_eq!(repository.collected(), 2);
        assert_eq!(repository.errors(), 1);
        assert!(repository.is_empty());
    }
}
