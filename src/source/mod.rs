//! Process record sources.
//!
//! A source enumerates the processes visible right now and stores them in a [`ProcessRepository`].
//! Failing to read one process is never fatal: it is counted and skipped. Failing to enumerate at
//! all is reported to the caller, which keeps whatever was collected.

#[cfg(target_os = "linux")]
mod procfs_source;
mod static_source;
mod sysinfo_source;

#[cfg(target_os = "linux")]
pub use self::procfs_source::ProcfsSource;
pub use self::static_source::StaticSource;
pub use self::sysinfo_source::SysinfoSource;

use crate::prelude::*;
use crate::repository::ProcessRepository;

pub trait ProcessSource {
    fn name(&self) -> &'static str;

    /// Insert one record per readable process, counting successes and failures.
    fn collect_into(&self, repository: &mut ProcessRepository) -> Result<()>;
}

/// Source used by the binary on this platform.
#[cfg(target_os = "linux")]
pub type PlatformSource = ProcfsSource;
#[cfg(not(target_os = "linux"))]
pub type PlatformSource = SysinfoSource;

pub fn platform_source() -> PlatformSource {
    PlatformSource::default()
}
