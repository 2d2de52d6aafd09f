mod format_memory;
mod format_uptime;

pub use format_memory::format_memory;
pub use format_uptime::format_uptime;
