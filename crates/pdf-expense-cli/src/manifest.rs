//! Report manifest: the JSON description of one expense report

use anyhow::{Context, Result};
use pdf_expense::{AttachmentFile, ExpenseCategory, ReportMetadata, ReportSession};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub metadata: ReportMetadata,
    pub lines: Vec<ManifestLine>,
    /// Files added independently of any line, in order
    pub attachments: Vec<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct ManifestLine {
    pub category: ExpenseCategory,
    #[serde(default)]
    pub description: String,
    /// Travel lines only
    pub distance_km: Option<f64>,
    /// Every category except travel
    pub amount: Option<f64>,
    /// Receipt linked to this line
    pub attachment: Option<PathBuf>,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid report manifest")
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Replay the manifest into a session, the way the form fills one in.
    /// Relative attachment paths resolve against `base_dir`.
    pub async fn into_session(self, base_dir: &Path, rate_per_km: f64) -> Result<ReportSession> {
        let mut session = ReportSession::new(rate_per_km);

        for (i, line) in self.lines.into_iter().enumerate() {
            let pos = session.add_line(line.category, line.description);

            if line.category.is_travel() {
                if line.amount.is_some() {
                    log::warn!("Line {}: travel amount is derived from the distance, ignoring amount", i + 1);
                }
                session.set_distance_km(pos, line.distance_km.unwrap_or(0.0))?;
            } else {
                if line.distance_km.is_some() {
                    log::warn!("Line {}: only travel lines carry a distance, ignoring it", i + 1);
                }
                session.set_amount(pos, line.amount.unwrap_or(0.0))?;
            }

            if let Some(path) = line.attachment {
                let file = attachment_file(base_dir, &path).await?;
                session.link_attachment(pos, file)?;
            }
        }

        let mut files = Vec::with_capacity(self.attachments.len());
        for path in &self.attachments {
            files.push(attachment_file(base_dir, path).await?);
        }
        session.add_attachments(files);

        Ok(session)
    }
}

async fn attachment_file(base_dir: &Path, path: &Path) -> Result<AttachmentFile> {
    let full = base_dir.join(path);
    AttachmentFile::from_path(&full)
        .await
        .with_context(|| format!("Cannot open attachment {}", full.display()))
}
