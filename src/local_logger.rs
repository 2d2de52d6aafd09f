use std::{
    env,
    io::Write,
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::prelude::*;
use console::{Style, style};
use indicatif::{ProgressBar, ProgressStyle};
use lazy_static::lazy_static;
use log::Log;
use simplelog::{CombinedLogger, SharedLogger};

use crate::logger::{GroupEvent, get_group_event};

/// Environment variable holding the log level filter
pub const LOG_ENV: &str = "PROCTREE_LOG";

lazy_static! {
    pub static ref SPINNER: Arc<Mutex<Option<ProgressBar>>> = Arc::new(Mutex::new(None));
    pub static ref IS_TTY: bool = std::io::IsTerminal::is_terminal(&std::io::stdout());
}

/// Hide the progress bar temporarily, execute `f`, then redraw the progress bar.
///
/// If the output is not a TTY, `f` will be executed without hiding the progress bar.
pub fn suspend_progress_bar<F: FnOnce() -> R, R>(f: F) -> R {
    if *IS_TTY {
        if let Ok(mut spinner) = SPINNER.lock() {
            if let Some(spinner) = spinner.as_mut() {
                return spinner.suspend(f);
            }
        }
    }

    f()
}

fn log_level_from_env() -> log::LevelFilter {
    env::var(LOG_ENV)
        .ok()
        .and_then(|log_level| log_level.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info)
}

pub struct LocalLogger {
    log_level: log::LevelFilter,
}

impl LocalLogger {
    pub fn new() -> Self {
        LocalLogger {
            log_level: log_level_from_env(),
        }
    }
}

impl Default for LocalLogger {
    fn default() -> Self {
        Self::new()
    }
}

fn start_spinner(name: &str) {
    let spinner = ProgressBar::new_spinner();
    match ProgressStyle::with_template("  {spinner:.cyan} {wide_msg:.cyan.bold}") {
        Ok(template) => spinner.set_style(template),
        Err(err) => debug!("Invalid spinner template: {err}"),
    }
    spinner.set_message(format!("{name}..."));
    spinner.enable_steady_tick(Duration::from_millis(100));
    if let Ok(mut current) = SPINNER.lock() {
        current.replace(spinner);
    }
}

fn finish_spinner() {
    if let Ok(mut spinner) = SPINNER.lock() {
        if let Some(spinner) = spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Log for LocalLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.log_level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        if let Some(group_event) = get_group_event(record) {
            match group_event {
                GroupEvent::Start(name) => {
                    if *IS_TTY {
                        start_spinner(&name);
                    } else {
                        write_line(false, style(format!("{name}...")).cyan());
                    }
                }
                GroupEvent::End => {
                    if *IS_TTY {
                        finish_spinner();
                    }
                }
            }

            return;
        }

        suspend_progress_bar(|| print_record(record));
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

/// Write one line to stdout or stderr. A closed stream (e.g. output piped into `head`) drops the
/// line instead of panicking like `println!` would.
fn write_line(to_stderr: bool, line: impl std::fmt::Display) {
    let _ = if to_stderr {
        writeln!(std::io::stderr(), "{line}")
    } else {
        writeln!(std::io::stdout(), "{line}")
    };
}

/// Print a log record to the console with the appropriate style
fn print_record(record: &log::Record) {
    let error_style = Style::new().red();
    let info_style = Style::new().green();
    let warn_style = Style::new().yellow();
    let debug_style = Style::new().blue().dim();
    let trace_style = Style::new().black().dim();

    match record.level() {
        log::Level::Error => write_line(true, error_style.apply_to(record.args())),
        log::Level::Warn => write_line(true, warn_style.apply_to(record.args())),
        log::Level::Info => write_line(false, info_style.apply_to(record.args())),
        log::Level::Debug => write_line(
            false,
            debug_style.apply_to(format!("[DEBUG::{}] {}", record.target(), record.args())),
        ),
        log::Level::Trace => write_line(
            false,
            trace_style.apply_to(format!("[TRACE::{}] {}", record.target(), record.args())),
        ),
    }
}

impl SharedLogger for LocalLogger {
    fn level(&self) -> log::LevelFilter {
        self.log_level
    }

    fn config(&self) -> Option<&simplelog::Config> {
        None
    }

    fn as_log(self: Box<Self>) -> Box<dyn Log> {
        Box::new(*self)
    }
}

pub fn init_local_logger() -> Result<()> {
    let logger: Box<dyn SharedLogger> = Box::new(LocalLogger::new());
    CombinedLogger::init(vec![logger])?;
    Ok(())
}

/// Clear any spinner left on screen, e.g. when the run aborts inside a group.
pub fn clean_logger() {
    finish_spinner();
}
