use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use harvest_ingest::{IngestOptions, Source};
use harvest_reporting::ExportFormat;
use tracing_subscriber::EnvFilter;

mod output;
mod settings;

use output::ColorMode;
use settings::{EnvOverrides, Settings, WindowFlags};

const DEFAULT_HERITAGE_OUTPUT: &str = "unesco_world_heritage_clean.csv";

/// Harvest - small data-collection tools sharing one data directory
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the heritage list from a two-column PDF (path or URL)
    Heritage {
        /// Local path or http(s) URL of the PDF
        source: String,

        /// CSV output path
        #[arg(short, long, default_value = DEFAULT_HERITAGE_OUTPUT)]
        output: PathBuf,

        /// Also write the records as a JSON array
        #[arg(long)]
        json: Option<PathBuf>,

        /// Lines after a candidate searched for the ID/year
        #[arg(long)]
        id_window: Option<usize>,

        /// Lines after a candidate searched for criteria blocks
        #[arg(long)]
        type_window: Option<usize>,

        /// Lines the cursor skips after a record is emitted
        #[arg(long)]
        accept_advance: Option<usize>,
    },

    /// Save the markets banner and latest news sections of a homepage
    Snapshot {
        /// Page to fetch
        #[arg(default_value = harvest_scrape::snapshot::DEFAULT_SNAPSHOT_URL)]
        url: String,

        /// Data directory (raw_data/ and processed_data/ live here)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Turn the saved snapshot into market and news CSVs
    Filter {
        /// Data directory (raw_data/ and processed_data/ live here)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Fetch a forum post and its full comment tree
    Thread {
        /// URL of the post page
        post_url: String,

        /// Output directory (defaults to the data directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Print schema, first rows and row count of a hub dataset
    Inspect {
        /// Dataset name, e.g. `stanfordnlp/imdb`
        dataset: String,

        /// Number of rows to show
        #[arg(long, default_value_t = harvest_scrape::dataset::DEFAULT_HEAD_ROWS)]
        rows: usize,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file_config = harvest_core::config_file::load_config();
    let env = EnvOverrides::from_env();
    let color = ColorMode(!cli.no_color);

    match cli.command {
        Command::Heritage {
            source,
            output,
            json,
            id_window,
            type_window,
            accept_advance,
        } => {
            let flags = WindowFlags {
                id_window,
                type_window,
                accept_advance,
            };
            let settings = Settings::resolve(&file_config, &env, None);
            let parsing = settings::parsing_config(&file_config, flags)?;
            let options = IngestOptions {
                parsing,
                y_tolerance: settings.y_tolerance,
                user_agent: settings.user_agent,
                timeout: settings.timeout,
            };
            heritage(&source, &output, json.as_deref(), &options, cli.verbose, color).await
        }
        Command::Snapshot { url, data_dir } => {
            let settings = Settings::resolve(&file_config, &env, data_dir);
            snapshot(&url, &settings, color).await
        }
        Command::Filter { data_dir } => {
            let settings = Settings::resolve(&file_config, &env, data_dir);
            filter(&settings.data_dir, color)
        }
        Command::Thread { post_url, out_dir } => {
            let settings = Settings::resolve(&file_config, &env, None);
            let out_dir = out_dir.unwrap_or_else(|| settings.data_dir.clone());
            thread(&post_url, &out_dir, &settings, color).await
        }
        Command::Inspect { dataset, rows } => {
            let settings = Settings::resolve(&file_config, &env, None);
            inspect(&dataset, rows, &settings, color).await
        }
    }
}

async fn heritage(
    source: &str,
    output: &Path,
    json: Option<&Path>,
    options: &IngestOptions,
    verbose: u8,
    color: ColorMode,
) -> anyhow::Result<()> {
    let mut out = std::io::stdout();
    let parsed = Source::parse(source);
    let source_name = match &parsed {
        Source::Path(path) => path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string()),
        Source::Url(url) => url.clone(),
    };

    let result = harvest_ingest::extract_heritage(&parsed, options).await?;
    output::print_extraction_summary(&mut out, &source_name, &result, color)?;
    if verbose > 0 {
        output::print_reject_breakdown(&mut out, &result.skip_stats)?;
    }

    harvest_reporting::export_heritage(&result.records, ExportFormat::Csv, output)?;
    if let Some(json_path) = json {
        harvest_reporting::export_heritage(&result.records, ExportFormat::Json, json_path)?;
        output::print_created(&mut out, "JSON created", &absolute(json_path), color)?;
    }

    output::print_saved(&mut out, result.records.len(), &absolute(output), color)?;
    out.flush()?;
    Ok(())
}

async fn snapshot(url: &str, settings: &Settings, color: ColorMode) -> anyhow::Result<()> {
    let client = harvest_scrape::build_client(&settings.user_agent, settings.timeout)?;
    let snap = harvest_scrape::fetch_snapshot(&client, url).await?;
    if snap.markets_banner.is_none() && snap.latest_news.is_none() {
        tracing::warn!(url, "neither section found; the page may need client-side rendering");
    }
    let path = harvest_scrape::snapshot::write_snapshot(&snap, &settings.data_dir)?;
    output::print_created(&mut std::io::stdout(), "Snapshot saved", &absolute(&path), color)?;
    Ok(())
}

fn filter(data_dir: &Path, color: ColorMode) -> anyhow::Result<()> {
    let raw = harvest_scrape::snapshot::snapshot_path(data_dir);
    if !raw.exists() {
        anyhow::bail!(
            "Snapshot not found at {}. Create it with: harvest snapshot --data-dir {}",
            raw.display(),
            data_dir.display()
        );
    }

    let mut out = std::io::stdout();
    let html = std::fs::read_to_string(&raw)?;
    let fields = harvest_scrape::extract_fields(&html);
    output::print_fields_summary(&mut out, &fields)?;

    let processed = harvest_scrape::snapshot::processed_dir(data_dir);
    let (market, news) = harvest_scrape::write_fields(&fields, &processed)?;
    output::print_created(&mut out, "CSV created", &absolute(&market), color)?;
    output::print_created(&mut out, "CSV created", &absolute(&news), color)?;
    Ok(())
}

async fn thread(
    post_url: &str,
    out_dir: &Path,
    settings: &Settings,
    color: ColorMode,
) -> anyhow::Result<()> {
    let client = harvest_scrape::build_client(&settings.user_agent, settings.timeout)?;
    let thread = harvest_scrape::fetch_thread(&client, post_url).await?;

    let mut out = std::io::stdout();
    output::print_thread_summary(&mut out, &thread, color)?;
    let files = harvest_scrape::write_thread(&thread, out_dir)?;
    for path in [
        &files.post_csv,
        &files.post_json,
        &files.comments_csv,
        &files.comments_json,
    ] {
        output::print_created(&mut out, "Saved", &absolute(path), color)?;
    }
    Ok(())
}

async fn inspect(
    dataset: &str,
    rows: usize,
    settings: &Settings,
    color: ColorMode,
) -> anyhow::Result<()> {
    let client = harvest_scrape::build_client(&settings.user_agent, settings.timeout)?;
    let summary = harvest_scrape::inspect_dataset(&client, dataset, rows).await?;
    output::print_dataset_summary(&mut std::io::stdout(), &summary, color)?;
    Ok(())
}

/// Absolute form of `path` for display; falls back to the path as given.
fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
