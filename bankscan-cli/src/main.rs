use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use bankscan_core::{AnalyzeConfig, ProfileRegistry, Progress, Summary, analyze_with_progress};
use bankscan_extract::OcrMode;
use clap::{Parser, Subcommand};
use tokio::task::JoinSet;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "bankscan", version, about = "Bank statement analysis CLI")]
struct Cli {
    /// Verbose logging (per-page progress, profile decisions)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze statement PDFs and print per-document summaries
    Analyze {
        /// PDF files or directories containing them
        paths: Vec<PathBuf>,

        /// Descend into subdirectories when a directory is given
        #[arg(long)]
        recursive: bool,

        /// Force OCR before the embedded text layer
        #[arg(long, conflicts_with = "no_ocr")]
        ocr_first: bool,

        /// Never invoke OCR, even for pages with a thin text layer
        #[arg(long)]
        no_ocr: bool,

        /// Tesseract page-segmentation mode, passed through unchanged
        #[arg(long, default_value = "6")]
        psm: String,

        /// Text-layer character count below which OCR fallback triggers
        #[arg(long, default_value_t = 64)]
        min_chars: usize,

        /// Rasterization DPI for the OCR path
        #[arg(long, default_value_t = 300)]
        dpi: u32,

        /// Skip the headers/deposit-lines debug files
        #[arg(long)]
        no_diagnostics: bool,

        /// Entities whose deposit lines must not be counted (repeatable)
        #[arg(long = "exclude")]
        exclusions: Vec<String>,

        /// Write one CSV row per analyzed document
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print each summary as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Documents analyzed in parallel
        #[arg(long, default_value_t = 4)]
        jobs: usize,
    },

    /// List the registered processor profiles in priority order
    Profiles,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Analyze {
            paths,
            recursive,
            ocr_first,
            no_ocr,
            psm,
            min_chars,
            dpi,
            no_diagnostics,
            exclusions,
            csv,
            json,
            jobs,
        } => {
            if paths.is_empty() {
                bail!("no input paths given (pass one or more PDFs or directories)");
            }
            let files = discover_pdfs(&paths, recursive)?;
            if files.is_empty() {
                bail!("no PDF files found under the given paths");
            }

            let config = AnalyzeConfig {
                ocr: if ocr_first {
                    OcrMode::Forced
                } else if no_ocr {
                    OcrMode::Disabled
                } else {
                    OcrMode::Fallback
                },
                ocr_psm: psm,
                min_native_chars: min_chars,
                dpi,
                write_diagnostics: !no_diagnostics,
                exclusions,
                ..AnalyzeConfig::default()
            };

            let results = run_batch(files, config, jobs.max(1)).await;
            report(&results, csv.as_deref(), json)?;

            let failed = results.iter().filter(|(_, r)| r.is_err()).count();
            if failed == results.len() {
                bail!("all {} document(s) failed", failed);
            }
            if failed > 0 {
                warn!("{failed} of {} document(s) failed", results.len());
            }
        }

        Command::Profiles => {
            for name in ProfileRegistry::builtin().names() {
                println!("{name}");
            }
            println!("(fallback: generic summarizer, processor \"Unknown\")");
        }
    }

    Ok(())
}

/// Expand files and directories into a sorted list of PDFs.
fn discover_pdfs(paths: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            collect_dir(path, recursive, &mut files)
                .with_context(|| format!("reading directory {}", path.display()))?;
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            bail!("no such file or directory: {}", path.display());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn collect_dir(dir: &Path, recursive: bool, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if recursive {
                collect_dir(&path, recursive, out)?;
            }
        } else if path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        {
            out.push(path);
        }
    }
    Ok(())
}

type BatchResult = Vec<(PathBuf, Result<Summary, bankscan_core::AnalyzeError>)>;

/// Analyze documents on blocking workers, at most `jobs` at a time. One
/// failing document never aborts the batch.
async fn run_batch(files: Vec<PathBuf>, config: AnalyzeConfig, jobs: usize) -> BatchResult {
    let config = Arc::new(config);
    let semaphore = Arc::new(tokio::sync::Semaphore::new(jobs));
    let mut set = JoinSet::new();

    for (order, path) in files.into_iter().enumerate() {
        let config = Arc::clone(&config);
        let semaphore = Arc::clone(&semaphore);
        set.spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore open");
            let result = tokio::task::spawn_blocking(move || {
                let progress = |p: &Progress| {
                    if let Progress::PageExtracted { index, pages, ocr, empty } = p {
                        info!(
                            "page {}/{} extracted (ocr={ocr}, empty={empty})",
                            index + 1,
                            pages
                        );
                    }
                };
                let summary = analyze_with_progress(&path, &config, &progress);
                (path, summary)
            })
            .await
            .expect("analysis task panicked");
            (order, result)
        });
    }

    let mut results: Vec<(usize, _)> = Vec::new();
    while let Some(joined) = set.join_next().await {
        results.push(joined.expect("join failed"));
    }
    // Stable output order regardless of completion order.
    results.sort_by_key(|(order, _)| *order);
    results.into_iter().map(|(_, r)| r).collect()
}

fn report(results: &BatchResult, csv_path: Option<&Path>, json: bool) -> Result<()> {
    for (path, result) in results {
        match result {
            Ok(summary) if json => println!("{}", serde_json::to_string_pretty(summary)?),
            Ok(summary) => print_summary(summary),
            Err(e) => eprintln!("FAILED {}: {e}", path.display()),
        }
    }

    if let Some(csv_path) = csv_path {
        write_csv(results, csv_path)
            .with_context(|| format!("writing {}", csv_path.display()))?;
        info!("summary CSV written to {}", csv_path.display());
    }
    Ok(())
}

fn print_summary(summary: &Summary) {
    println!("{}", summary.source.display());
    println!(
        "  processor: {}{}",
        summary.processor,
        if summary.profile_matched { "" } else { " (no profile matched)" }
    );
    println!(
        "  deposits:  {} totaling {}",
        summary.deposit_count, summary.deposit_total
    );
    if let Some(total) = summary.withdrawal_total {
        println!("  withdrawals: {total}");
    }
    if let Some(account) = &summary.linked_account {
        println!("  linked account: ...{account}");
    }
    for (merchant, total) in &summary.processor_totals {
        println!("  {merchant}: {total}");
    }
    for note in &summary.notes {
        println!("  note: {note}");
    }
}

fn write_csv(results: &BatchResult, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "file",
        "processor",
        "deposit_count",
        "deposit_total",
        "withdrawal_total",
        "linked_account",
        "empty_pages",
        "error",
    ])?;
    for (file, result) in results {
        match result {
            Ok(s) => writer.write_record([
                file.display().to_string(),
                s.processor.clone(),
                s.deposit_count.to_string(),
                s.deposit_total.to_string(),
                s.withdrawal_total.map(|t| t.to_string()).unwrap_or_default(),
                s.linked_account.clone().unwrap_or_default(),
                s.empty_pages.len().to_string(),
                String::new(),
            ])?,
            Err(e) => writer.write_record([
                file.display().to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                e.to_string(),
            ])?,
        }
    }
    writer.flush()?;
    Ok(())
}
