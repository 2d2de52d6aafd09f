use std::collections::HashMap;

use chrono::Utc;
use nix::unistd::{Uid, User};
use procfs::WithCurrentSystemInfo;
use procfs::process::{Process, all_processes};

use super::ProcessSource;
use crate::prelude::*;
use crate::process::{Pid, ProcessRecord};
use crate::repository::ProcessRepository;

/// Reads `/proc/[pid]/stat` and `/proc/[pid]/status` for every pid listed in `/proc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcfsSource;

/// Caches uid to user name lookups for the duration of one pass
#[derive(Default)]
struct OwnerCache(HashMap<u32, Option<String>>);

impl OwnerCache {
    fn resolve(&mut self, uid: u32) -> Option<String> {
        self.0
            .entry(uid)
            .or_insert_with(|| match User::from_uid(Uid::from_raw(uid)) {
                Ok(user) => user.map(|user| user.name),
                Err(err) => {
                    trace!("Failed to resolve uid {uid}: {err}");
                    None
                }
            })
            .clone()
    }
}

fn read_process(process: &Process, owners: &mut OwnerCache) -> procfs::ProcResult<ProcessRecord> {
    let stat = process.stat()?;
    let parent_pid = Pid::try_from(stat.ppid).ok().filter(|&ppid| ppid != 0);
    let mut record = ProcessRecord::new(process.pid() as Pid, parent_pid, stat.comm.clone())
        .with_status(stat.state.to_string());

    match stat.starttime().get() {
        Ok(start_time) => record.start_time = Some(start_time.with_timezone(&Utc)),
        Err(err) => trace!("Failed to compute start time of process {}: {err}", process.pid()),
    }
    // Kernel threads have an empty command line
    record.cmdline = process
        .cmdline()
        .ok()
        .map(|args| args.join(" "))
        .filter(|cmdline| !cmdline.is_empty());

    // The status file can be unreadable while stat is not, keep what we have
    match process.status() {
        Ok(status) => {
            record.memory_kb = status.vmrss.unwrap_or(0);
            record.thread_count = status.threads;
            record.owner = owners.resolve(status.ruid);
        }
        Err(err) => {
            trace!("Failed to read status of process {}: {err}", process.pid());
            record.thread_count = u64::try_from(stat.num_threads).unwrap_or(0);
        }
    }

    Ok(record)
}

impl ProcessSource for ProcfsSource {
    fn name(&self) -> &'static str {
        "procfs"
    }

    fn collect_into(&self, repository: &mut ProcessRepository) -> Result<()> {
        let processes = all_processes().context("Cannot open /proc directory")?;
        let mut owners = OwnerCache::default();

        for process in processes {
            let record = process.and_then(|process| read_process(&process, &mut owners));
            match record {
                Ok(record) => {
                    repository.insert(record);
                    repository.record_collected();
                }
                Err(err) => {
                    debug!("Skipping unreadable process: {err}");
                    repository.record_error();
                }
            }
        }

        Ok(())
    }
}
