use std::io::{self, Write};

use crate::helpers::format_memory;
use crate::process::StatusCategory;
use crate::render::Theme;
use crate::tree::ProcessForest;

/// Aggregate figures over a whole collection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessStatistics {
    pub total_processes: usize,
    pub root_processes: usize,
    pub total_memory_kb: u64,
    pub total_threads: u64,
    pub running: usize,
    pub sleeping: usize,
    pub zombie: usize,
}

impl ProcessStatistics {
    pub fn from_forest(forest: &ProcessForest) -> Self {
        let mut stats = ProcessStatistics {
            total_processes: forest.repository().count(),
            root_processes: forest.roots().len(),
            ..Default::default()
        };

        for record in forest.repository().all() {
            stats.total_memory_kb += record.memory_kb;
            stats.total_threads += record.thread_count;
            match record.status_category() {
                StatusCategory::Running => stats.running += 1,
                StatusCategory::Sleeping => stats.sleeping += 1,
                StatusCategory::Zombie => stats.zombie += 1,
                StatusCategory::Other => {}
            }
        }

        stats
    }

    pub fn render<W: Write>(&self, sink: &mut W, theme: &Theme) -> io::Result<()> {
        writeln!(sink)?;
        writeln!(sink, "{}", theme.banner.apply_to("Process Statistics:"))?;
        writeln!(sink, "Total Processes: {}", self.total_processes)?;
        writeln!(sink, "Root Processes: {}", self.root_processes)?;
        writeln!(
            sink,
            "Total Memory: {}",
            theme.memory.apply_to(format_memory(self.total_memory_kb))
        )?;
        writeln!(
            sink,
            "Total Threads: {}",
            theme.threads.apply_to(self.total_threads)
        )?;
        writeln!(
            sink,
            "Running: {} | Sleeping: {} | Zombie: {}",
            theme.running.apply_to(self.running),
            theme.name.apply_to(self.sleeping),
            theme.zombie.apply_to(self.zombie),
        )
    }
}
