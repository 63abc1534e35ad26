use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use labelcraft_core::{CodeMode, JsonExporter, LabelConfig, LabelPdfWriter, Labeler, RecordWriter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod formatter;

#[derive(Parser)]
#[command(name = "sheetlabel")]
#[command(about = "Turn inventory workbooks into printable QR asset labels", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the Excel/ODS inventory workbook
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Label PDF to write
    #[arg(short, long, value_name = "PDF", default_value = "labels.pdf")]
    output: PathBuf,

    /// Also write the records as a JSON array
    #[arg(short, long, value_name = "JSON")]
    export: Option<PathBuf>,

    /// Skip the PDF (useful together with --export)
    #[arg(long)]
    no_labels: bool,

    /// What the QR code encodes
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Base URL for --mode url
    #[arg(long, value_name = "URL")]
    url_base: Option<String>,

    /// Label size in millimetres, e.g. 57x32
    #[arg(long, value_name = "WxH", value_parser = parse_size)]
    size: Option<(f32, f32)>,

    /// Logo image drawn in the header band
    #[arg(long, value_name = "PATH")]
    logo: Option<PathBuf>,

    /// Accept sheets without a description column
    #[arg(long)]
    allow_missing_description: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Log inference decisions
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON report for scripting
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Multi-line text card
    Card,
    /// Lookup URL with the asset identifier
    Url,
}

impl From<Mode> for CodeMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Card => CodeMode::Card,
            Mode::Url => CodeMode::Url,
        }
    }
}

fn parse_size(value: &str) -> Result<(f32, f32), String> {
    let (w, h) = value
        .to_lowercase()
        .split_once('x')
        .map(|(w, h)| (w.trim().to_string(), h.trim().to_string()))
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let w: f32 = w.parse().map_err(|_| format!("invalid width '{w}'"))?;
    let h: f32 = h.parse().map_err(|_| format!("invalid height '{h}'"))?;
    if w <= 0.0 || h <= 0.0 {
        return Err(format!("label size must be positive, got '{value}'"));
    }
    Ok((w, h))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<LabelConfig> {
    let mut config = if let Some(config_path) = &cli.config {
        LabelConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        // Try to load default config from current directory if it exists
        let default_config_path = PathBuf::from("sheetlabel.toml");
        if default_config_path.exists() {
            LabelConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            LabelConfig::default()
        }
    };

    // Command line overrides
    if let Some(mode) = cli.mode {
        config.label.code_mode = mode.into();
    }
    if let Some(url_base) = &cli.url_base {
        config.label.url_base = Some(url_base.clone());
    }
    if let Some((width, height)) = cli.size {
        config.label.width_mm = width;
        config.label.height_mm = height;
    }
    if let Some(logo) = &cli.logo {
        config.label.logo = Some(logo.clone());
    }
    if cli.allow_missing_description {
        config.inference.require_description = false;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.no_labels && cli.export.is_none() {
        bail!("--no-labels without --export would produce no output");
    }

    let config = load_config(&cli)?;
    let labeler = Labeler::with_config(config);

    let extraction = labeler
        .extract_file(&cli.file)
        .with_context(|| format!("Failed to read workbook: {}", cli.file.display()))?;

    let mut outputs = Vec::new();

    if !cli.no_labels {
        if extraction.records.is_empty() {
            tracing::warn!("no records extracted, {} not written", cli.output.display());
        } else {
            let writer = LabelPdfWriter::new(&labeler.config().label)?;
            let pages = writer
                .write(&extraction.records, &cli.output)
                .with_context(|| format!("Failed to write labels: {}", cli.output.display()))?;
            outputs.push(formatter::Output::new(writer.kind(), &cli.output, pages));
        }
    }

    if let Some(export_path) = &cli.export {
        let exporter = JsonExporter::new(&labeler.config().export);
        let written = exporter
            .write(&extraction.records, export_path)
            .with_context(|| format!("Failed to write export: {}", export_path.display()))?;
        outputs.push(formatter::Output::new(exporter.kind(), export_path, written));
    }

    match cli.format {
        OutputFormat::Human => formatter::print_human(&cli.file, &extraction, &outputs),
        OutputFormat::Json => formatter::print_json(&cli.file, &extraction, &outputs)?,
    }

    Ok(())
}
