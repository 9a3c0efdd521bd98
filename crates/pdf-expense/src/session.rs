//! In-memory report session
//!
//! Owns the expense lines and attachments while a report is being filled
//! in. Line positions are slot indices and never shift: removing a line
//! leaves an empty slot so the positions used to order receipts stay valid.

use crate::ordering::order_attachments;
use crate::types::*;

#[derive(Debug, Clone)]
struct LineSlot {
    line: ExpenseLine,
    linked: Option<AttachmentId>,
}

#[derive(Debug, Clone)]
pub struct ReportSession {
    rate_per_km: f64,
    lines: Vec<Option<LineSlot>>,
    attachments: Vec<Attachment>,
    next_attachment_id: u64,
}

impl ReportSession {
    pub fn new(rate_per_km: f64) -> Self {
        Self {
            rate_per_km,
            lines: Vec::new(),
            attachments: Vec::new(),
            next_attachment_id: 1,
        }
    }

    pub fn rate_per_km(&self) -> f64 {
        self.rate_per_km
    }

    // =========================================================================
    // Lines
    // =========================================================================

    /// Append an empty line of the given category
    pub fn add_line(
        &mut self,
        category: ExpenseCategory,
        description: impl Into<String>,
    ) -> LinePosition {
        let line = if category.is_travel() {
            ExpenseLine::travel(description, 0.0, self.rate_per_km)
        } else {
            ExpenseLine::expense(category, description, 0.0)
        };
        self.lines.push(Some(LineSlot { line, linked: None }));
        LinePosition(self.lines.len() - 1)
    }

    pub fn line(&self, pos: LinePosition) -> Option<&ExpenseLine> {
        self.slot(pos).map(|s| &s.line)
    }

    /// Present lines in position order
    pub fn lines(&self) -> impl Iterator<Item = (LinePosition, &ExpenseLine)> {
        self.lines
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (LinePosition(i), &s.line)))
    }

    pub fn total(&self) -> f64 {
        self.lines().map(|(_, l)| l.amount).sum()
    }

    /// Switching to Travel prices the line from its distance; switching away
    /// clears both the distance and the derived amount.
    pub fn set_category(&mut self, pos: LinePosition, category: ExpenseCategory) -> Result<()> {
        let rate = self.rate_per_km;
        let line = &mut self.slot_mut(pos)?.line;
        let was_travel = line.category.is_travel();
        line.category = category;

        match (was_travel, category.is_travel()) {
            (false, true) => line.amount = derive_amount(line, rate),
            (true, false) => {
                line.distance_km = 0.0;
                line.amount = 0.0;
            }
            _ => {}
        }
        Ok(())
    }

    pub fn set_description(&mut self, pos: LinePosition, description: impl Into<String>) -> Result<()> {
        self.slot_mut(pos)?.line.description = description.into();
        Ok(())
    }

    /// Only Travel lines carry a distance; the amount follows it.
    pub fn set_distance_km(&mut self, pos: LinePosition, distance_km: f64) -> Result<()> {
        let rate = self.rate_per_km;
        let line = &mut self.slot_mut(pos)?.line;
        if !line.category.is_travel() {
            return Err(ReportError::InvalidEdit(format!(
                "line {} is not a travel line, its distance is fixed at 0",
                pos.0 + 1
            )));
        }
        line.distance_km = non_negative(distance_km);
        line.amount = derive_amount(line, rate);
        Ok(())
    }

    /// Only non-Travel lines take a manual amount.
    pub fn set_amount(&mut self, pos: LinePosition, amount: f64) -> Result<()> {
        let line = &mut self.slot_mut(pos)?.line;
        if line.category.is_travel() {
            return Err(ReportError::InvalidEdit(format!(
                "line {} is a travel line, its amount is derived from the distance",
                pos.0 + 1
            )));
        }
        line.amount = non_negative(amount);
        Ok(())
    }

    /// Remove a line together with its linked attachment
    pub fn remove_line(&mut self, pos: LinePosition) -> Result<()> {
        let slot = self
            .lines
            .get_mut(pos.0)
            .and_then(Option::take)
            .ok_or_else(|| missing_line(pos))?;
        if let Some(id) = slot.linked {
            self.attachments.retain(|a| a.id != id);
        }
        Ok(())
    }

    // =========================================================================
    // Attachments
    // =========================================================================

    /// Attach a receipt to a line, evicting any previous one
    pub fn link_attachment(&mut self, pos: LinePosition, file: AttachmentFile) -> Result<AttachmentId> {
        self.unlink_line(pos)?;
        let id = self.push_attachment(file, AttachmentSource::LineLinked { line: pos });
        self.slot_mut(pos)?.linked = Some(id);
        Ok(id)
    }

    /// Drop the attachment linked to a line, keeping the line
    pub fn unlink_line(&mut self, pos: LinePosition) -> Result<()> {
        if let Some(id) = self.slot_mut(pos)?.linked.take() {
            self.attachments.retain(|a| a.id != id);
        }
        Ok(())
    }

    pub fn linked_attachment(&self, pos: LinePosition) -> Option<&Attachment> {
        let id = self.slot(pos)?.linked?;
        self.attachments.iter().find(|a| a.id == id)
    }

    /// Add files from the generic picker
    pub fn add_attachments(&mut self, files: impl IntoIterator<Item = AttachmentFile>) -> Vec<AttachmentId> {
        files
            .into_iter()
            .map(|file| self.push_attachment(file, AttachmentSource::ListAdded))
            .collect()
    }

    /// Remove an attachment. A line-linked one also clears the line's link.
    pub fn remove_attachment(&mut self, id: AttachmentId) -> bool {
        let Some(index) = self.attachments.iter().position(|a| a.id == id) else {
            return false;
        };
        let removed = self.attachments.remove(index);
        if let Some(pos) = removed.line_position() {
            if let Some(Some(slot)) = self.lines.get_mut(pos.0) {
                if slot.linked == Some(id) {
                    slot.linked = None;
                }
            }
        }
        true
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Attachments in display and merge order
    pub fn ordered_attachments(&self) -> Vec<&Attachment> {
        order_attachments(&self.attachments)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Owned copy for a generation run; later edits do not reach it
    pub fn snapshot(&self, metadata: &ReportMetadata) -> ReportSnapshot {
        ReportSnapshot {
            metadata: metadata.clone(),
            lines: self.lines().map(|(_, l)| l.clone()).collect(),
            attachments: self.attachments.clone(),
            rate_per_km: self.rate_per_km,
        }
    }

    /// Empty every collection
    pub fn reset(&mut self) {
        self.lines.clear();
        self.attachments.clear();
    }

    fn push_attachment(&mut self, file: AttachmentFile, source: AttachmentSource) -> AttachmentId {
        let id = AttachmentId(self.next_attachment_id);
        self.next_attachment_id += 1;
        self.attachments.push(Attachment {
            id,
            name: file.name,
            media_type: file.media_type,
            size: file.size,
            source,
            data: file.data,
        });
        id
    }

    fn slot(&self, pos: LinePosition) -> Option<&LineSlot> {
        self.lines.get(pos.0).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, pos: LinePosition) -> Result<&mut LineSlot> {
        self.lines
            .get_mut(pos.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| missing_line(pos))
    }
}

impl Default for ReportSession {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_RATE_PER_KM)
    }
}

fn missing_line(pos: LinePosition) -> ReportError {
    ReportError::InvalidEdit(format!("line {} does not exist", pos.0 + 1))
}
