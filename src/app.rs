use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use clap::{
    Parser,
    builder::{Styles, styling},
};

use crate::{
    config::ProctreeConfig,
    local_logger::init_local_logger,
    prelude::*,
    process::Pid,
    query::SubtreeQuery,
    render::{ColorChoice, RenderOptions, Theme, TreeRenderer, render_banner},
    repository::ProcessRepository,
    source::{ProcessSource, platform_source},
    stats::ProcessStatistics,
    tree::ProcessForest,
};

fn create_styles() -> Styles {
    styling::Styles::styled()
        .header(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .usage(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .literal(styling::AnsiColor::Cyan.on_default() | styling::Effects::BOLD)
        .placeholder(styling::AnsiColor::Cyan.on_default())
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Display running processes as a tree",
    after_help = "Examples:\n  proctree                 Display the full process tree\n  proctree -r              Show CPU and memory usage\n  proctree -p 1234         Show a specific process and its children\n  proctree -o tree.txt     Export the tree to a file",
    styles = create_styles()
)]
pub struct Cli {
    /// Show CPU and memory usage
    #[arg(short, long)]
    pub resources: bool,

    /// Show thread count and owner of each process
    #[arg(short, long)]
    pub verbose: bool,

    /// Show only the specified process and its children
    #[arg(short, long, value_name = "PID", conflicts_with = "search")]
    pub pid: Option<Pid>,

    /// Show the subtree of every process whose name contains QUERY
    #[arg(short, long, value_name = "QUERY", allow_hyphen_values = true)]
    pub search: Option<String>,

    /// Export the full process tree to FILE
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Display process statistics after the tree
    #[arg(long)]
    pub stats: bool,

    /// When to use colors on the terminal
    #[arg(long, value_enum)]
    pub color: Option<ColorChoice>,

    /// The configuration name to use
    /// If provided, the configuration will be loaded from ~/.config/proctree/{config-name}.yaml
    /// Otherwise, loads from ~/.config/proctree/config.yaml
    #[arg(long, env = "PROCTREE_CONFIG_NAME")]
    pub config_name: Option<String>,
}

/// Effective display settings once the configuration file and the flags are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub render_options: RenderOptions,
    pub stats: bool,
    pub color: ColorChoice,
}

impl Settings {
    pub fn new(cli: &Cli, config: &ProctreeConfig) -> Self {
        Self {
            render_options: RenderOptions {
                show_resources: cli.resources || config.display.resources,
                verbose: cli.verbose || config.display.verbose,
            },
            stats: cli.stats || config.display.stats,
            color: cli.color.unwrap_or(config.color),
        }
    }
}

/// Run one collection pass. Enumeration failures are reported and whatever was gathered is kept.
pub fn collect(source: &impl ProcessSource) -> ProcessRepository {
    let mut repository = ProcessRepository::new();

    start_group!("Collecting process information");
    let result = source.collect_into(&mut repository);
    end_group!();

    if let Err(err) = result {
        error!("Error: {err:#}");
    }
    debug!("Collected with the {} source", source.name());
    info!("Collected {} processes", repository.count());
    if repository.errors() > 0 {
        warn!("({} processes inaccessible)", repository.errors());
    }

    repository
}

/// Write the banner and the full tree to `path`, without colors.
pub fn export_tree(
    path: &Path,
    forest: &ProcessForest,
    options: RenderOptions,
    timestamp: DateTime<Local>,
) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Cannot open file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let theme = Theme::plain();

    render_banner(
        &mut writer,
        &theme,
        forest.repository().count(),
        timestamp.naive_local(),
    )?;
    TreeRenderer::new(forest, options, &theme)
        .with_reference_time(timestamp.with_timezone(&Utc))
        .render_forest(&mut writer)?;
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

/// Render the view selected by the flags: a pid subtree, search results or the whole forest.
pub fn render_view<W: Write>(cli: &Cli, renderer: &TreeRenderer, sink: &mut W) -> io::Result<()> {
    let query = SubtreeQuery::new(renderer);

    if let Some(pid) = cli.pid {
        query.render_pid(pid, sink)?;
    } else if let Some(search) = &cli.search {
        query.render_search(search, sink)?;
    } else {
        renderer.render_forest(sink)?;
    }

    Ok(())
}

fn render_report<W: Write>(
    sink: &mut W,
    cli: &Cli,
    settings: &Settings,
    renderer: &TreeRenderer,
    timestamp: NaiveDateTime,
) -> io::Result<()> {
    let forest = renderer.forest();
    let theme = renderer.theme();

    writeln!(sink)?;
    render_banner(sink, theme, forest.repository().count(), timestamp)?;
    render_view(cli, renderer, sink)?;
    if settings.stats {
        ProcessStatistics::from_forest(forest).render(sink, theme)?;
    }
    sink.flush()
}

/// Write the banner, the selected view and, when enabled, the statistics.
///
/// A reader that goes away early (e.g. output piped into `head`) ends the report without an error.
pub fn write_report<W: Write>(
    sink: &mut W,
    cli: &Cli,
    settings: &Settings,
    renderer: &TreeRenderer,
    timestamp: NaiveDateTime,
) -> io::Result<()> {
    match render_report(sink, cli, settings, renderer, timestamp) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
            debug!("Output closed before the report was complete");
            Ok(())
        }
        other => other,
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_local_logger()?;

    let config = ProctreeConfig::load(cli.config_name.as_deref())?;
    let settings = Settings::new(&cli, &config);
    debug!("Using settings {settings:?}");

    let repository = collect(&platform_source());
    let forest = ProcessForest::build(&repository);
    let now = Local::now();

    let theme = Theme::new(settings.color);
    let renderer = TreeRenderer::new(&forest, settings.render_options, &theme)
        .with_reference_time(now.with_timezone(&Utc));
    write_report(
        &mut io::stdout().lock(),
        &cli,
        &settings,
        &renderer,
        now.naive_local(),
    )?;

    if let Some(output) = &cli.output {
        match export_tree(output, &forest, settings.render_options, now) {
            Ok(()) => info!("Process tree exported to {}", output.display()),
            Err(err) => error!("Error: {err:#}"),
        }
    }

    Ok(())
}
