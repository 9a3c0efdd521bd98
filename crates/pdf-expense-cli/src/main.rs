mod logger;
mod manifest;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use manifest::Manifest;
use pdf_expense::{ReportMetadata, ReportOptions, ReportSession};
use pdf_expense::format::{format_bytes, format_eur};
use pdf_expense_runtime::{ReportCommand, ReportUpdate, spawn_worker};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ndf", about = "Expense report PDF builder", version)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the recap and merge every attachment into one PDF
    Generate {
        /// Report manifest (JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Report options (JSON); defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory receiving the PDF under its derived name
        #[arg(long, conflicts_with = "output")]
        output_dir: Option<PathBuf>,

        /// Exact output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the expense lines, total and attachment order
    Summary {
        /// Report manifest (JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Report options (JSON); defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::StderrLogger::from_verbosity(cli.verbose)
        .init()
        .context("Failed to install logger")?;

    match cli.command {
        Commands::Generate {
            manifest,
            config,
            output_dir,
            output,
        } => {
            let options = load_options(config.as_deref()).await?;
            let (metadata, session) = load_report(&manifest, &options).await?;
            let snapshot = session.snapshot(&metadata);
            let target = output
                .or(output_dir)
                .unwrap_or_else(|| PathBuf::from("."));

            let (command_tx, mut update_rx, _worker) = spawn_worker();
            command_tx.send(ReportCommand::Generate {
                snapshot: Box::new(snapshot),
                options,
            })?;

            while let Some(update) = update_rx.recv().await {
                match update {
                    ReportUpdate::Progress {
                        operation,
                        current,
                        total,
                    } => {
                        if total > 0 {
                            log::info!("[{}/{}] {}", current, total, operation);
                        } else {
                            log::info!("{}", operation);
                        }
                    }
                    ReportUpdate::Generated { output } => {
                        println!(
                            "Generated {} ({} pages, {} recap, {})",
                            output.filename,
                            output.page_count,
                            output.recap_page_count,
                            format_bytes(output.bytes.len() as u64)
                        );
                        command_tx.send(ReportCommand::Export {
                            path: target.clone(),
                        })?;
                    }
                    ReportUpdate::Exported { path } => {
                        println!("Written → {}", path.display());
                        break;
                    }
                    ReportUpdate::Cleared => {}
                    ReportUpdate::Error { message } => bail!(message),
                }
            }
        }

        Commands::Summary { manifest, config } => {
            let options = load_options(config.as_deref()).await?;
            let (_, session) = load_report(&manifest, &options).await?;

            println!("Expense lines:");
            for (pos, line) in session.lines() {
                let distance = if line.category.is_travel() {
                    format!("{} km", line.distance_km.round() as i64)
                } else {
                    String::new()
                };
                println!(
                    "  {:>2}. {:<12} {:<32} {:>8} {:>10} €",
                    pos.0 + 1,
                    line.category.label(),
                    line.description,
                    distance,
                    format_eur(line.amount)
                );
            }
            println!("Total général : {} €", format_eur(session.total()));

            let attachments = session.ordered_attachments();
            if !attachments.is_empty() {
                println!("Attachments (merge order):");
                for (i, attachment) in attachments.iter().enumerate() {
                    let origin = match attachment.line_position() {
                        Some(pos) => format!("line {}", pos.0 + 1),
                        None => "added".to_string(),
                    };
                    println!(
                        "  {:>2}. {} ({}, {})",
                        i + 1,
                        attachment.name,
                        origin,
                        format_bytes(attachment.size)
                    );
                }
            }
        }
    }

    Ok(())
}

async fn load_options(config: Option<&Path>) -> Result<ReportOptions> {
    let options = match config {
        Some(path) => ReportOptions::load(path)
            .await
            .with_context(|| format!("Failed to load options {}", path.display()))?,
        None => ReportOptions::default(),
    };
    options.validate()?;
    Ok(options)
}

async fn load_report(
    manifest_path: &Path,
    options: &ReportOptions,
) -> Result<(ReportMetadata, ReportSession)> {
    let manifest = Manifest::load(manifest_path).await?;
    let metadata = manifest.metadata.clone();
    let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let session = manifest.into_session(base_dir, options.rate_per_km).await?;
    Ok((metadata, session))
}
