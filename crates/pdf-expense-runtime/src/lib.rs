use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

// Re-export types from the core crate
pub use pdf_expense::{GeneratedOutput, GenerationStep, ReportOptions, ReportSnapshot};

/// Commands sent from the form to the worker
#[derive(Debug)]
pub enum ReportCommand {
    /// Build the full report from a snapshot taken when the user asked for it
    Generate {
        snapshot: Box<ReportSnapshot>,
        options: ReportOptions,
    },
    /// Write the last generated report. A directory gets the derived filename.
    Export { path: PathBuf },
    /// Discard the generated report
    Reset,
}

/// Updates sent from the worker to the form
#[derive(Debug, Clone)]
pub enum ReportUpdate {
    Progress {
        operation: String,
        current: usize,
        total: usize,
    },
    Generated {
        output: Arc<GeneratedOutput>,
    },
    Exported {
        path: PathBuf,
    },
    Cleared,
    Error {
        message: String,
    },
}

/// Spawn [`worker_task`] on the current runtime
pub fn spawn_worker() -> (
    mpsc::UnboundedSender<ReportCommand>,
    mpsc::UnboundedReceiver<ReportUpdate>,
    JoinHandle<()>,
) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(worker_task(command_rx, update_tx));
    (command_tx, update_rx, handle)
}

/// Process report commands one at a time, keeping at most one generated
/// report around for export.
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<ReportCommand>,
    update_tx: mpsc::UnboundedSender<ReportUpdate>,
) {
    let mut current: Option<Arc<GeneratedOutput>> = None;

    while let Some(cmd) = command_rx.recv().await {
        match cmd {
            ReportCommand::Generate { snapshot, options } => {
                // A stale report must never be exported after a failed run
                current = None;
                handle_generate(&snapshot, &options, &mut current, &update_tx).await;
            }
            ReportCommand::Export { path } => {
                handle_export(path, current.as_deref(), &update_tx).await;
            }
            ReportCommand::Reset => {
                current = None;
                log::debug!("Generated report discarded");
                let _ = update_tx.send(ReportUpdate::Cleared);
            }
        }
    }
}

async fn handle_generate(
    snapshot: &ReportSnapshot,
    options: &ReportOptions,
    current: &mut Option<Arc<GeneratedOutput>>,
    update_tx: &mpsc::UnboundedSender<ReportUpdate>,
) {
    let result = pdf_expense::generate_with_progress(snapshot, options, |step| {
        let _ = update_tx.send(progress_update(&step));
    })
    .await;

    match result {
        Ok(output) => {
            let output = Arc::new(output);
            *current = Some(Arc::clone(&output));
            let _ = update_tx.send(ReportUpdate::Generated { output });
        }
        Err(e) => {
            log::error!("Report generation failed: {}", e);
            let _ = update_tx.send(ReportUpdate::Error {
                message: format!("Failed to generate report: {}", e),
            });
        }
    }
}

async fn handle_export(
    path: PathBuf,
    current: Option<&GeneratedOutput>,
    update_tx: &mpsc::UnboundedSender<ReportUpdate>,
) {
    let Some(output) = current else {
        let _ = update_tx.send(ReportUpdate::Error {
            message: "Nothing to export, generate the report first".to_string(),
        });
        return;
    };

    let target = resolve_target(&path, &output.filename).await;
    match tokio::fs::write(&target, &output.bytes).await {
        Ok(()) => {
            log::info!("Report written to {}", target.display());
            let _ = update_tx.send(ReportUpdate::Exported { path: target });
        }
        Err(e) => {
            let _ = update_tx.send(ReportUpdate::Error {
                message: format!("Failed to write {}: {}", target.display(), e),
            });
        }
    }
}

async fn resolve_target(path: &Path, filename: &str) -> PathBuf {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => path.join(filename),
        _ => path.to_path_buf(),
    }
}

fn progress_update(step: &GenerationStep) -> ReportUpdate {
    let (operation, current, total) = match step {
        GenerationStep::BuildingRecap => ("Building recap".to_string(), 0, 0),
        GenerationStep::AppendingAttachment { index, total, name } => {
            (format!("Appending {}", name), *index, *total)
        }
        GenerationStep::Finalizing => ("Finalizing".to_string(), 0, 0),
    };
    ReportUpdate::Progress {
        operation,
        current,
        total,
    }
}
