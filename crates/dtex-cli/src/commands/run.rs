//! Folder and archive commands: consolidate a batch into one export file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use dtex_core::models::config::DtexConfig;
use dtex_core::{
    process_source, write_dataset, ArchiveSource, BatchEvent, BatchSource, DirectorySource,
    ExportFormat, ProcessingReport,
};

use super::config::load_config;

/// Arguments for the folder command.
#[derive(Args)]
pub struct FolderArgs {
    /// Directory containing the PDF invoices
    input: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

/// Arguments for the archive command.
#[derive(Args)]
pub struct ArchiveArgs {
    /// ZIP archive containing the PDF invoices
    input: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct OutputArgs {
    /// Output file (default: facturas_consolidadas.<format>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Also write the processing report as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

/// Output format.
#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Xlsx,
    Csv,
    Json,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Xlsx => ExportFormat::Xlsx,
            OutputFormat::Csv => ExportFormat::Csv,
            OutputFormat::Json => ExportFormat::Json,
        }
    }
}

pub async fn folder(args: FolderArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let source = DirectorySource::open(&args.input, &config.source)
        .map_err(|e| anyhow::anyhow!("Invalid folder {}: {}", args.input.display(), e))?;

    execute(Box::new(source), config, args.output).await
}

pub async fn archive(args: ArchiveArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let source = ArchiveSource::open(&args.input, &config.source)
        .map_err(|e| anyhow::anyhow!("Invalid archive {}: {}", args.input.display(), e))?;

    execute(Box::new(source), config, args.output).await
}

async fn execute(
    mut source: Box<dyn BatchSource + Send>,
    config: DtexConfig,
    args: OutputArgs,
) -> anyhow::Result<()> {
    let format = resolve_format(&args, &config);

    println!(
        "{} Found {} documents in {}",
        style("ℹ").blue(),
        source.len(),
        source.location()
    );

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(source.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let bar = pb.clone();
    let pipeline_config = config.clone();
    let report = tokio::task::spawn_blocking(move || {
        process_source(source.as_mut(), &pipeline_config, |event| match event {
            BatchEvent::Started { .. } => {}
            BatchEvent::Processed { document, .. } | BatchEvent::Skipped { document, .. } => {
                bar.set_message(document.to_string());
                bar.inc(1);
            }
        })
    })
    .await?;

    pb.finish_and_clear();

    if let Some(path) = &args.report {
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        debug!("Wrote report to {}", path.display());
    }

    print_summary(&report);

    let Some(dataset) = &report.dataset else {
        println!(
            "{} No line items found in {} documents.",
            style("⚠").yellow(),
            report.documents_seen
        );
        return Ok(());
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format.default_file_name(&config.export)));

    write_dataset(dataset, format, &config.export, &output)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", output.display(), e))?;

    println!(
        "{} Wrote {} line items to {}",
        style("✓").green(),
        dataset.len(),
        output.display()
    );

    Ok(())
}

/// Explicit format, then the output file extension, then the configured default.
fn resolve_format(args: &OutputArgs, config: &DtexConfig) -> ExportFormat {
    if let Some(format) = args.format {
        return format.into();
    }

    args.output
        .as_ref()
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .and_then(|e| e.parse().ok())
        .unwrap_or(config.export.format)
}

fn print_summary(report: &ProcessingReport) {
    println!();
    println!(
        "{} Processed {} documents in {:.2}s",
        style("✓").green(),
        report.documents_seen,
        report.elapsed_seconds()
    );

    if !report.warnings.is_empty() {
        println!(
            "{} Skipped {} documents:",
            style("⚠").yellow(),
            report.warnings.len()
        );
        for warning in &report.warnings {
            println!("  - {}: {}", warning.document, warning.reason);
        }
    }

    if let Some((first, last)) = report.emission_range() {
        println!(
            "{} Emission dates from {} to {}",
            style("ℹ").blue(),
            first.format("%Y-%m-%d %H:%M"),
            last.format("%Y-%m-%d %H:%M")
        );
    }
}
