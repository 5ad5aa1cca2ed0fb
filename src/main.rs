//! Quoteline - a search box that highlights quoted phrases as you type.
//!
//! # Usage
//!
//! ```bash
//! quoteline --command ./rank.sh
//! quoteline --command ./rank.sh '"exact phrase" loose words'
//! quoteline --strict-quotes --theme light
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quoteline::app::App;
use quoteline::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use quoteline::highlight::QuoteMatching;
use quoteline::rerender::HighlightContext;
use quoteline::search::{CommandSource, DEFAULT_MAX_RESULTS, ResultSource, Unconfigured};
use quoteline::ui::style::is_light_background;

/// A search box that highlights quoted phrases as you type
#[derive(Parser, Debug)]
#[command(name = "quoteline", version, about, long_about = None)]
struct Cli {
    /// Initial query
    #[arg(value_name = "QUERY")]
    query: Option<String>,

    /// Ranking program; receives the query as its only argument and prints
    /// a JSON array of {"filepath", "score"} objects
    #[arg(long, value_name = "PROGRAM")]
    command: Option<PathBuf>,

    /// Maximum number of result rows to show
    #[arg(long, value_name = "N")]
    max_results: Option<usize>,

    /// Only close a quote with the same character that opened it
    #[arg(long)]
    strict_quotes: bool,

    /// Color scheme for the query line and results
    #[arg(long, value_enum, default_value = "auto")]
    theme: ThemeMode,

    /// Write logs to a file (filtered by RUST_LOG, default warn)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// The terminal is in raw mode while the app runs, so logs only go to
/// stderr when explicitly asked for through `RUST_LOG`.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref())?;

    let source: Arc<dyn ResultSource> = match effective.command.clone() {
        Some(program) => {
            info!(program = %program.display(), "using ranking command");
            Arc::new(CommandSource::new(program))
        }
        None => Arc::new(Unconfigured),
    };

    let highlight = HighlightContext {
        quote_matching: if effective.strict_quotes {
            QuoteMatching::SameChar
        } else {
            QuoteMatching::AnyQuote
        },
        ..HighlightContext::default()
    };

    let mut app = App::new(source)
        .with_highlight(highlight)
        .with_max_results(effective.max_results.unwrap_or(DEFAULT_MAX_RESULTS).max(1))
        .with_initial_query(cli.query)
        .with_light_background(is_light_background(
            effective.theme.unwrap_or(ThemeMode::Auto),
        ));

    app.run().context("Application error")
}
