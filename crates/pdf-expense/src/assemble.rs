//! Report generation: recap first, then every attachment in order

use crate::format::output_filename;
use crate::merge::append_attachment;
use crate::options::ReportOptions;
use crate::ordering::order_attachments;
use crate::recap::build_recap;
use crate::render::{OutputDocument, copy_pages};
use crate::types::*;

/// Progress of a generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationStep {
    BuildingRecap,
    /// `index` counts from 1
    AppendingAttachment {
        index: usize,
        total: usize,
        name: String,
    },
    Finalizing,
}

/// Generate the complete report from a snapshot
pub async fn generate(snapshot: &ReportSnapshot, options: &ReportOptions) -> Result<GeneratedOutput> {
    generate_with_progress(snapshot, options, |_| {}).await
}

/// Generate the complete report, reporting each step as it starts.
///
/// Attachments are appended one after the other; a failure on any of them
/// other than an unsupported kind aborts the run and nothing is returned.
pub async fn generate_with_progress(
    snapshot: &ReportSnapshot,
    options: &ReportOptions,
    mut on_step: impl FnMut(GenerationStep),
) -> Result<GeneratedOutput> {
    ensure_runtime()?;
    options.validate()?;
    if (snapshot.rate_per_km - options.rate_per_km).abs() > f64::EPSILON {
        return Err(ReportError::Config(format!(
            "Report lines priced at {} €/km but the options print {} €/km",
            snapshot.rate_per_km, options.rate_per_km
        )));
    }

    on_step(GenerationStep::BuildingRecap);
    let total = snapshot.total();
    let recap = build_recap(&snapshot.metadata, &snapshot.lines, total, options).await?;
    let recap_page_count = recap.page_count();

    let mut output = OutputDocument::new();
    copy_pages(&mut output, recap.document())?;
    log::info!(
        "Recap built: {} lines, {} pages, total {:.2}",
        snapshot.lines.len(),
        recap_page_count,
        total
    );

    let ordered = order_attachments(&snapshot.attachments);
    let count = ordered.len();
    for (i, attachment) in ordered.into_iter().enumerate() {
        on_step(GenerationStep::AppendingAttachment {
            index: i + 1,
            total: count,
            name: attachment.name.clone(),
        });
        match append_attachment(&mut output, attachment).await {
            Ok(outcome) => log::info!(
                "Appended {} ({} pages)",
                attachment.name,
                outcome.pages_added()
            ),
            Err(e @ ReportError::UnsupportedAttachmentKind { .. }) => {
                log::warn!("Skipping attachment: {}", e);
            }
            Err(e) => return Err(e),
        }
    }

    on_step(GenerationStep::Finalizing);
    let page_count = output.page_count();
    let bytes = tokio::task::spawn_blocking(move || output.to_bytes()).await??;
    let filename = output_filename(&snapshot.metadata);
    log::info!("Generated {} ({} pages, {} bytes)", filename, page_count, bytes.len());

    Ok(GeneratedOutput {
        bytes,
        filename,
        page_count,
        recap_page_count,
    })
}

/// Every step below runs on tokio; refuse to start without it
fn ensure_runtime() -> Result<()> {
    tokio::runtime::Handle::try_current()
        .map(|_| ())
        .map_err(|e| ReportError::DependencyUnavailable(format!("no tokio runtime: {}", e)))
}
