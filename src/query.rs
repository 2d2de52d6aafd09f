use std::io::{self, Write};

use itertools::Itertools;

use crate::process::{Pid, ProcessRecord};
use crate::render::{TreeRenderer, render_rule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    Rendered,
    NotFound,
}

/// Lookups that render a single process and its descendants.
pub struct SubtreeQuery<'q, 'r, 'a> {
    renderer: &'q TreeRenderer<'r, 'a>,
}

impl<'q, 'r, 'a> SubtreeQuery<'q, 'r, 'a> {
    pub fn new(renderer: &'q TreeRenderer<'r, 'a>) -> Self {
        Self { renderer }
    }

    pub fn find(&self, pid: Pid) -> Option<&'a ProcessRecord> {
        self.renderer.forest().repository().get(pid)
    }

    /// Render the subtree rooted at `pid`, or a not-found message when no such process was
    /// collected. Unrelated roots are never rendered.
    pub fn render_pid<W: Write>(&self, pid: Pid, sink: &mut W) -> io::Result<QueryOutcome> {
        let theme = self.renderer.theme();
        let Some(slot) = self.renderer.forest().slot_of(pid) else {
            writeln!(
                sink,
                "{}",
                theme
                    .error
                    .apply_to(format!("Process with PID {pid} not found"))
            )?;
            return Ok(QueryOutcome::NotFound);
        };

        let record = self.renderer.forest().record(slot);
        writeln!(sink)?;
        writeln!(
            sink,
            "{}{}",
            theme.header.apply_to("Process Subtree for: "),
            theme.banner.apply_to(&record.name)
        )?;
        render_rule(sink, theme)?;
        writeln!(sink)?;

        self.renderer.render_subtree(slot, sink)?;
        Ok(QueryOutcome::Rendered)
    }

    /// Pids matching `query`, sorted.
    ///
    /// Any integer query is an exact pid lookup, so negative or out of range numbers match
    /// nothing. Anything else is a case-insensitive substring match on the process name.
    pub fn search(&self, query: &str) -> Vec<Pid> {
        let trimmed = query.trim();
        let digits = trimmed.strip_prefix(['-', '+']).unwrap_or(trimmed);
        if !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return trimmed
                .parse::<Pid>()
                .ok()
                .and_then(|pid| self.find(pid))
                .map(|record| record.pid)
                .into_iter()
                .collect();
        }

        let needle = query.to_lowercase();
        self.renderer
            .forest()
            .repository()
            .all()
            .filter(|record| record.name.to_lowercase().contains(&needle))
            .map(|record| record.pid)
            .sorted()
            .collect()
    }

    /// Render the subtree of every process matching `query`, returning the number of matches.
    pub fn render_search<W: Write>(&self, query: &str, sink: &mut W) -> io::Result<usize> {
        let theme = self.renderer.theme();
        let matches = self.search(query);

        if matches.is_empty() {
            writeln!(
                sink,
                "{}",
                theme
                    .error
                    .apply_to(format!("No processes found matching '{query}'"))
            )?;
            return Ok(0);
        }

        writeln!(
            sink,
            "{}",
            theme
                .cpu
                .apply_to(format!("Found {} matching process(es):", matches.len()))
        )?;
        for pid in &matches {
            self.render_pid(*pid, sink)?;
        }

        Ok(matches.len())
    }
}
