use console::Style;
use serde::{Deserialize, Serialize};

use crate::process::StatusCategory;

/// When to emit ANSI styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ColorChoice {
    /// Style only when the terminal supports it
    #[default]
    Auto,
    Always,
    Never,
}

/// Named style tokens used by the renderer.
#[derive(Debug, Clone)]
pub struct Theme {
    pub running: Style,
    pub zombie: Style,
    pub name: Style,
    pub pid: Style,
    pub cpu: Style,
    pub cpu_hot: Style,
    pub memory: Style,
    pub memory_hot: Style,
    pub threads: Style,
    pub owner: Style,
    pub uptime: Style,
    pub command: Style,
    pub banner: Style,
    pub header: Style,
    pub error: Style,
}

impl Theme {
    pub fn new(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => Self::styled(None),
            ColorChoice::Always => Self::colored(),
            ColorChoice::Never => Self::plain(),
        }
    }

    /// Always emit ANSI escapes, whatever the sink.
    pub fn colored() -> Self {
        Self::styled(Some(true))
    }

    /// Never emit ANSI escapes.
    pub fn plain() -> Self {
        Self::styled(Some(false))
    }

    fn styled(force: Option<bool>) -> Self {
        let base = || match force {
            Some(force) => Style::new().force_styling(force),
            None => Style::new(),
        };

        Self {
            running: base().green().bold(),
            zombie: base().red().bold(),
            name: base().cyan().bold(),
            pid: base().yellow(),
            cpu: base().green(),
            cpu_hot: base().red(),
            memory: base().yellow(),
            memory_hot: base().red(),
            threads: base().blue(),
            owner: base().magenta(),
            uptime: base().cyan(),
            command: base().white().dim(),
            banner: base().cyan().bold(),
            header: base().cyan(),
            error: base().red(),
        }
    }

    pub fn status(&self, category: StatusCategory) -> &Style {
        match category {
            StatusCategory::Running => &self.running,
            StatusCategory::Zombie => &self.zombie,
            StatusCategory::Sleeping | StatusCategory::Other => &self.name,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ColorChoice::default())
    }
}
