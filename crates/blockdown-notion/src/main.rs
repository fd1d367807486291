//! blockdown - Export a Notion page tree to linked Markdown files

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use blockdown::Exporter;
use blockdown_notion::{Config, HttpMaterializer, NotionClient, Overrides};

#[derive(Parser)]
#[command(name = "blockdown")]
#[command(version, about = "Export a Notion page tree to linked Markdown files", long_about = None)]
#[command(after_help = "EXAMPLES:
    blockdown --root <PAGE_ID>              Export into ./docs
    blockdown --root <PAGE_ID> -o wiki      Export into ./wiki
    blockdown -c blockdown.toml -v          Use a config file, log HTTP calls")]
struct Cli {
    /// Identifier of the page exported as index.md
    #[arg(long, env = "NOTION_ROOT_PAGE_ID", value_name = "PAGE_ID")]
    root: Option<String>,

    /// Notion integration token
    #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Output directory (default: docs)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// String repeated once per nesting level (default: four spaces)
    #[arg(long, value_name = "STRING")]
    indent: Option<String>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log pagination and HTTP requests
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns whether every page was exported
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::default(),
    };

    let settings = config.resolve(Overrides {
        root_page_id: cli.root,
        token: cli.token,
        output_dir: cli.output,
        indent_unit: cli.indent,
    })?;

    let client = NotionClient::new(&settings.token, &settings.api);
    let materializer = HttpMaterializer::new(&settings.api);
    let output_dir = settings.options.output_dir.clone();
    let exporter = Exporter::with_options(client, materializer, settings.options);

    let report = exporter
        .run(&settings.root_page_id)
        .with_context(|| format!("exporting into {}", output_dir.display()))?;

    for failed in &report.failed {
        warn!(page = %failed.page.id, title = %failed.page.title, error = %failed.error, "page not exported");
    }
    info!(
        exported = report.exported.len(),
        failed = report.failed.len(),
        output = %output_dir.display(),
        "export finished"
    );

    Ok(report.is_success())
}
