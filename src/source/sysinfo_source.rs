use chrono::DateTime;
use itertools::Itertools;
use sysinfo::{ProcessRefreshKind, ProcessStatus, RefreshKind, System, Users};

use super::ProcessSource;
use crate::prelude::*;
use crate::process::ProcessRecord;
use crate::repository::ProcessRepository;

/// Portable source backed by `sysinfo`, used where `/proc` is not available.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoSource;

fn status_word(status: ProcessStatus) -> String {
    match status {
        ProcessStatus::Run => "running".to_owned(),
        ProcessStatus::Sleep => "sleeping".to_owned(),
        ProcessStatus::Idle => "idle".to_owned(),
        ProcessStatus::Stop => "stopped".to_owned(),
        ProcessStatus::Zombie => "zombie".to_owned(),
        ProcessStatus::Dead => "dead".to_owned(),
        other => other.to_string().to_lowercase(),
    }
}

impl ProcessSource for SysinfoSource {
    fn name(&self) -> &'static str {
        "sysinfo"
    }

    fn collect_into(&self, repository: &mut ProcessRepository) -> Result<()> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            bail!("Process enumeration is not supported on this platform");
        }

        let system = System::new_with_specifics(
            RefreshKind::nothing().with_processes(ProcessRefreshKind::everything()),
        );
        let users = Users::new_with_refreshed_list();

        for (pid, process) in system.processes() {
            // Threads show up as processes on Linux
            if process.thread_kind().is_some() {
                continue;
            }

            let parent_pid = process.parent().map(|parent| parent.as_u32());
            let mut record = ProcessRecord::new(
                pid.as_u32(),
                parent_pid,
                process.name().to_string_lossy().into_owned(),
            )
            .with_status(status_word(process.status()))
            .with_memory_kb(process.memory() / 1024);

            // Task lists are only exposed on some platforms
            if let Some(tasks) = process.tasks() {
                record.thread_count = tasks.len() as u64;
            }
            // Zero means the start time is unknown
            record.start_time = Some(process.start_time())
                .filter(|&seconds| seconds > 0)
                .and_then(|seconds| i64::try_from(seconds).ok())
                .and_then(|seconds| DateTime::from_timestamp(seconds, 0));
            record.cmdline = Some(
                process
                    .cmd()
                    .iter()
                    .map(|arg| arg.to_string_lossy())
                    .join(" "),
            )
            .filter(|cmdline| !cmdline.is_empty());
            record.owner = process
                .user_id()
                .and_then(|uid| users.get_user_by_id(uid))
                .map(|user| user.name().to_owned());

            repository.insert(record);
            repository.record_collected();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_word() {
        assert_eq!(status_word(ProcessStatus::Run), "running");
        assert_eq!(status_word(ProcessStatus::Zombie), "zombie");
        assert_eq!(status_word(ProcessStatus::Sleep), "sleeping");
    }

    #[test_log::test]
    fn test_collects_current_process() {
        let mut repository = ProcessRepository::new();
        SysinfoSource.collect_into(&mut repository).unwrap();

        let current = repository
            .get(std::process::id())
            .expect("current process should be listed");
        assert!(!current.name.is_empty());
        assert!(current.start_time.is_some());
        assert_eq!(repository.errors(), 0);
    }
}
