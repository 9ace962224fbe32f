//! booksmith - typeset JSON content into paginated HTML

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use booksmith::wasm::ContentInput;
use booksmith::{PageSizeClass, PaginationMode, Result, Theme, TypesetConfig, Typesetter};

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Complete HTML document
    Html,
    /// JSON pagination report
    Summary,
}

#[derive(Parser)]
#[command(name = "booksmith")]
#[command(version, about = "Paginated typesetting for book previews", long_about = None)]
#[command(after_help = "EXAMPLES:
    booksmith book.json -o book.html              Typeset with default settings
    booksmith book.json --page-size A5 --theme classic
    booksmith chapters.json --format summary      Print the pagination report

Set RUST_LOG=debug to trace page decisions.")]
struct Cli {
    /// Content JSON: an element tree or {\"chapters\": [...]}
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Page size class (A4, A5, B5, 16K, custom)
    #[arg(long, value_name = "SIZE")]
    page_size: Option<PageSizeClass>,

    /// Maximum content height in pixels, overriding the page size
    #[arg(long, value_name = "PX")]
    page_height: Option<f32>,

    /// Typography theme (default, classic, modern, compact)
    #[arg(long)]
    theme: Option<Theme>,

    /// Keep partial output instead of failing when the iteration cap is hit
    #[arg(long)]
    best_effort: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "html")]
    format: OutputFormat,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<TypesetConfig> {
    let mut config = match &cli.config {
        Some(path) => TypesetConfig::from_path(path)?,
        None => TypesetConfig::default(),
    };
    if let Some(size) = cli.page_size {
        config.page_size = size;
    }
    if let Some(height) = cli.page_height {
        config.page_height = Some(height);
    }
    if let Some(theme) = cli.theme {
        config.typography.theme = theme;
    }
    if cli.best_effort {
        config.mode = PaginationMode::BestEffort;
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let typesetter = Typesetter::new(config)?;

    let json = fs::read_to_string(&cli.input)?;
    let preview = ContentInput::from_json_str(&json)?.typeset(&typesetter)?;
    log::info!(
        "{}: {} page(s), {} TOC page(s)",
        cli.input.display(),
        preview.page_count(),
        preview.toc_page_count()
    );

    let rendered = match cli.format {
        OutputFormat::Html => preview.to_html(),
        OutputFormat::Summary => serde_json::to_string_pretty(&preview.report())?,
    };
    match &cli.output {
        Some(path) => fs::write(path, rendered)?,
        None => print!("{rendered}"),
    }
    Ok(())
}
