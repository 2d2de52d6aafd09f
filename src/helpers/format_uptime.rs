use chrono::TimeDelta;

/// Format how long a process has been running as `{h}h{m}m`, or `{m}m` under an hour.
///
/// A negative duration (clock skew between the host and the sample) counts as zero.
pub fn format_uptime(uptime: TimeDelta) -> String {
    let minutes = uptime.num_minutes().max(0);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{hours}h{minutes}m")
    } else {
        format!("{minutes}m")
    }
}
