//! Adminsift - dashboard dataset filter and exporter
//!
//! A CLI tool that loads a dashboard page's records, applies search,
//! filters and risk bucketing, and prints summary cards and rows or
//! writes the page's CSV export.
//!
//! Exit codes:
//!   0 - Success (no visible record at or above --fail-on, or no --fail-on set)
//!   1 - Runtime error (bad arguments, config, dataset or export failure)
//!   2 - Visible records at or above the --fail-on risk level

use adminsift::actions::{self, AdminAction};
use adminsift::cli::{Args, OutputFormat};
use adminsift::config::{Config, CONFIG_FILE};
use adminsift::dataset::DatasetLoader;
use adminsift::detail::DetailView;
use adminsift::export;
use adminsift::report::{self, ViewReport};
use adminsift::view::PageView;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so `[general] verbose` applies
    let data = args.data.clone().unwrap_or_else(|| PathBuf::from("."));
    let (mut config, config_source) = match Config::resolve(args.config.as_deref(), &data) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(config.log_level(&args));

    info!("Adminsift v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    match config_source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }

    match run(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .adminsift.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize thresholds, currency and export settings.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the pipeline for one page. Returns exit code (0 or 2).
async fn run(args: Args, config: Config) -> Result<i32> {
    let (Some(data), Some(page)) = (args.data.clone(), args.page) else {
        anyhow::bail!("--data and --page are required");
    };

    let tables = config.risk.tables()?;
    let export_options = config.export.options()?;
    let symbol = export_options.currency_symbol.clone();

    // Step 1: Load the page's records
    let records = DatasetLoader::new(data.clone())
        .load_page(page)
        .with_context(|| format!("Failed to load {} data", page.slug()))?;
    info!("Loaded {} {} records", records.len(), page.slug());

    let mut view = PageView::new(page, records, &tables);

    // Step 2: Apply admin actions optimistically
    for raw in &args.action {
        let action = AdminAction::parse(raw)?;
        actions::apply(page, view.records_mut(), &action)
            .with_context(|| format!("Failed to apply action '{}'", raw))?;
    }

    // Step 3: Filters, card clicks, sorting
    view.set_criteria(args.criteria()?);
    for label in &args.card {
        if !view.toggle_card(label) {
            warn!("Card '{}' does not filter; ignoring click", label);
        }
    }
    view.set_sort(args.sort_spec());

    // Detail view short-circuits the table
    if let Some(ref id) = args.show {
        let record = view
            .find(id)
            .with_context(|| format!("No {} record with id {}", page.slug(), id))?;
        let detail = DetailView::build(page, record, &symbol);
        let output = match args.format {
            OutputFormat::Json => report::generate_json(&detail)?,
            OutputFormat::Markdown => report::generate_markdown_detail(&detail),
        };
        emit(&output, args.output.as_deref())?;
        return Ok(0);
    }

    // Step 4: Compute visible rows
    let rows = if args.refresh {
        let delay = Duration::from_millis(config.view.refresh_delay_ms);
        let spinner = (!args.quiet).then(|| refresh_spinner(page.slug()));
        let rows = view.refresh(delay).await;
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        rows
    } else {
        view.visible()
    };

    // Step 5: Export
    if args.export {
        let dir = PathBuf::from(&config.general.output_dir);
        let path = export::write_export(page, &rows, &dir, &export_options)?;
        if !args.quiet {
            eprintln!("📁 Exported {} rows to {}", rows.len(), path.display());
        }
    }

    // Step 6: Render the view
    let max_risk = view.max_visible_risk();
    let view_report = ViewReport::build(&view, rows, &symbol);
    let output = match args.format {
        OutputFormat::Json => report::generate_json(&view_report)?,
        OutputFormat::Markdown => {
            report::generate_markdown_view(&view_report, &symbol, config.view.page_size)
        }
    };
    emit(&output, args.output.as_deref())?;

    // Check --fail-on threshold
    if let Some(threshold) = args.breached_fail_level(max_risk) {
        eprintln!(
            "\n⛔ Records found at or above {} risk. Failing (exit code 2).",
            threshold
        );
        return Ok(2);
    }

    Ok(0)
}

/// Print to stdout or write to a file.
fn emit(output: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, output)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", output),
    }
    Ok(())
}

fn refresh_spinner(slug: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Refreshing {}...", slug));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
