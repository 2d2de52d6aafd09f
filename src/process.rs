use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Process identifier as reported by the host.
pub type Pid = u32;

/// CPU usage above this percentage is highlighted.
pub const CPU_WARNING_PERCENT: f64 = 50.0;
/// Resident memory above this amount (500 MB) is highlighted.
pub const MEMORY_WARNING_KB: u64 = 500 * 1024;

/// One process, as captured during a single collection pass.
///
/// Records are immutable once stored in the [`ProcessRepository`](crate::repository::ProcessRepository):
/// parent/child links live in the [`ProcessForest`](crate::tree::ProcessForest), never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: Pid,
    /// May point to a pid that was not collected, to the process itself, or be absent
    pub parent_pid: Option<Pid>,
    pub name: String,
    pub status: String,
    /// Never sampled, kept at `0.0` by every source
    pub cpu_percent: f64,
    pub memory_kb: u64,
    pub thread_count: u64,
    pub owner: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    /// Full command line, arguments joined with spaces
    pub cmdline: Option<String>,
}

impl ProcessRecord {
    pub fn new(pid: Pid, parent_pid: Option<Pid>, name: impl Into<String>) -> Self {
        Self {
            pid,
            parent_pid,
            name: name.into(),
            status: String::new(),
            cpu_percent: 0.0,
            memory_kb: 0,
            thread_count: 0,
            owner: None,
            start_time: None,
            cmdline: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_memory_kb(mut self, memory_kb: u64) -> Self {
        self.memory_kb = memory_kb;
        self
    }

    pub fn with_threads(mut self, thread_count: u64) -> Self {
        self.thread_count = thread_count;
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn with_cmdline(mut self, cmdline: impl Into<String>) -> Self {
        self.cmdline = Some(cmdline.into());
        self
    }

    /// The command line, when it says more than the process name.
    pub fn distinct_cmdline(&self) -> Option<&str> {
        self.cmdline
            .as_deref()
            .filter(|cmdline| !cmdline.is_empty() && *cmdline != self.name)
    }

    pub fn status_category(&self) -> StatusCategory {
        StatusCategory::from_status(&self.status)
    }

    pub fn is_cpu_hot(&self) -> bool {
        self.cpu_percent > CPU_WARNING_PERCENT
    }

    pub fn is_memory_hot(&self) -> bool {
        self.memory_kb > MEMORY_WARNING_KB
    }
}

/// Coarse classification of the platform-specific status vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    Running,
    Sleeping,
    Zombie,
    Other,
}

impl StatusCategory {
    pub fn from_status(status: &str) -> Self {
        match status {
            "R" | "running" => StatusCategory::Running,
            "S" | "sleeping" => StatusCategory::Sleeping,
            "Z" | "zombie" => StatusCategory::Zombie,
            _ => StatusCategory::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case("R", StatusCategory::Running)]
    #[case("running", StatusCategory::Running)]
    #[case("S", StatusCategory::Sleeping)]
    #[case("sleeping", StatusCategory::Sleeping)]
    #[case("Z", StatusCategory::Zombie)]
    #[case("zombie", StatusCategory::Zombie)]
    #[case("D", StatusCategory::Other)]
    #[case("Running", StatusCategory::Other)]
    #[case("", StatusCategory::Other)]
    fn test_status_category(#[case] status: &str, #[case] expected: StatusCategory) {
        assert_eq!(StatusCategory::from_status(status), expected);
    }

    #[test]
    fn test_memory_threshold_is_exclusive() {
        let at_limit = ProcessRecord::new(1, None, "a").with_memory_kb(512_000);
        let above_limit = ProcessRecord::new(2, None, "b").with_memory_kb(512_001);

        assert!(!at_limit.is_memory_hot());
        assert!(above_limit.is_memory_hot());
    }

    #[test]
    fn test_distinct_cmdline() {
        let bare = ProcessRecord::new(1, None, "bash");
        let same = ProcessRecord::new(2, None, "bash").with_cmdline("bash");
        let empty = ProcessRecord::new(3, None, "kworker/0:1").with_cmdline("");
        let full = ProcessRecord::new(4, None, "bash").with_cmdline("/bin/bash --login");

        assert_eq!(bare.distinct_cmdline(), None);
        assert_eq!(same.distinct_cmdline(), None);
        assert_eq!(empty.distinct_cmdline(), None);
        assert_eq!(full.distinct_cmdline(), Some("/bin/bash --login"));
    }

    #[test]
    fn test_cpu_threshold_is_exclusive() {
        let mut record = ProcessRecord::new(1, None, "a");
        record.cpu_percent = 50.0;
        assert!(!record.is_cpu_hot());

        record.cpu_percent = 50.1;
        assert!(record.is_cpu_hot());
    }
}
