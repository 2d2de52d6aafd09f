//! Text rendering of a [`ProcessForest`].
//!
//! The renderer is pure: given the same forest, options and theme it always writes the same bytes.

mod header;
mod theme;

pub use header::{RULE_WIDTH, render_banner, render_rule};
pub use theme::{ColorChoice, Theme};

use std::collections::HashSet;
use std::io::{self, Write};

use chrono::{DateTime, Utc};

use crate::helpers::{format_memory, format_uptime};
use crate::process::{Pid, ProcessRecord};
use crate::tree::ProcessForest;

const BRANCH: &str = "├── ";
const CORNER: &str = "└── ";
const CONTINUATION: &str = "│   ";
const BLANK: &str = "    ";
const COMMAND_MARKER: &str = "└─ ";
const MAX_COMMAND_CHARS: usize = 80;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Append CPU and memory usage
    pub show_resources: bool,
    /// Append thread count, owner and uptime, and show the command line under each node
    pub verbose: bool,
}

pub struct TreeRenderer<'r, 'a> {
    forest: &'r ProcessForest<'a>,
    options: RenderOptions,
    theme: &'r Theme,
    now: DateTime<Utc>,
}

impl<'r, 'a> TreeRenderer<'r, 'a> {
    pub fn new(forest: &'r ProcessForest<'a>, options: RenderOptions, theme: &'r Theme) -> Self {
        Self {
            forest,
            options,
            theme,
            now: Utc::now(),
        }
    }

    /// Measure uptimes against `now` instead of the moment the renderer was created.
    pub fn with_reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn forest(&self) -> &'r ProcessForest<'a> {
        self.forest
    }

    pub fn theme(&self) -> &'r Theme {
        self.theme
    }

    /// Render every root of the forest, in pid order, each followed by its whole subtree.
    pub fn render_forest<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        let mut visited = HashSet::new();
        for &root in self.forest.roots() {
            self.render_node(root, "", true, &mut visited, sink)?;
        }
        Ok(())
    }

    /// Render a single node and its descendants, ignoring the rest of the forest.
    pub fn render_subtree<W: Write>(&self, slot: usize, sink: &mut W) -> io::Result<()> {
        let mut visited = HashSet::new();
        self.render_node(slot, "", true, &mut visited, sink)
    }

    fn render_node<W: Write>(
        &self,
        slot: usize,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<Pid>,
        sink: &mut W,
    ) -> io::Result<()> {
        let record = self.forest.record(slot);
        // A node reachable twice is drawn only the first time
        if !visited.insert(record.pid) {
            return Ok(());
        }

        writeln!(sink, "{}", self.format_line(record, prefix, is_last))?;

        let child_prefix = format!("{prefix}{}", if is_last { BLANK } else { CONTINUATION });
        if self.options.verbose {
            if let Some(cmdline) = record.distinct_cmdline() {
                writeln!(
                    sink,
                    "{child_prefix}{}",
                    self.theme
                        .command
                        .apply_to(format!("{COMMAND_MARKER}{}", truncate_command(cmdline)))
                )?;
            }
        }
        let children = self.forest.children(slot);
        for (index, &child) in children.iter().enumerate() {
            let is_last_child = index == children.len() - 1;
            self.render_node(child, &child_prefix, is_last_child, visited, sink)?;
        }

        Ok(())
    }

    pub fn format_line(&self, record: &ProcessRecord, prefix: &str, is_last: bool) -> String {
        let theme = self.theme;
        let connector = if is_last { CORNER } else { BRANCH };

        let mut line = format!(
            "{prefix}{connector}{}{}",
            theme.status(record.status_category()).apply_to(&record.name),
            theme.pid.apply_to(format!(" [PID: {}]", record.pid)),
        );

        if self.options.show_resources {
            let cpu_style = if record.is_cpu_hot() {
                &theme.cpu_hot
            } else {
                &theme.cpu
            };
            let memory_style = if record.is_memory_hot() {
                &theme.memory_hot
            } else {
                &theme.memory
            };
            line.push_str(&format!(
                " {} {}",
                cpu_style.apply_to(format!("CPU: {:.1}%", record.cpu_percent)),
                memory_style.apply_to(format!("MEM: {}", format_memory(record.memory_kb))),
            ));
        }

        if self.options.verbose {
            line.push_str(&format!(
                " {}",
                theme
                    .threads
                    .apply_to(format!("Threads: {}", record.thread_count))
            ));
            if let Some(owner) = &record.owner {
                line.push_str(&format!(" {}", theme.owner.apply_to(format!("User: {owner}"))));
            }
            if let Some(start_time) = record.start_time {
                let uptime = format_uptime(self.now - start_time);
                line.push_str(&format!(" {}", theme.uptime.apply_to(format!("Uptime: {uptime}"))));
            }
        }

        line
    }
}

fn truncate_command(cmdline: &str) -> String {
    match cmdline.char_indices().nth(MAX_COMMAND_CHARS) {
        Some((end, _)) => format!("{}...", &cmdline[..end]),
        None => cmdline.to_owned(),
    }
}
