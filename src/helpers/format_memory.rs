const KB_PER_MB: u64 = 1024;
const KB_PER_GB: u64 = 1024 * 1024;

/// Format a resident memory amount given in kilobytes.
///
/// The unit switches exactly at 1024 KB and 1024 MB, and the value is truncated, never rounded.
pub fn format_memory(kb: u64) -> String {
    if kb >= KB_PER_GB {
        format!("{}GB", kb / KB_PER_GB)
    } else if kb >= KB_PER_MB {
        format!("{}MB", kb / KB_PER_MB)
    } else {
        format!("{kb}KB")
    }
}
