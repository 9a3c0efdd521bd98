//! Attachment ordering shared by the on-screen list and the merge step

use crate::types::{Attachment, AttachmentSource};

/// Line-linked attachments first, ascending by line position, then
/// list-added attachments in the order they were added.
pub fn order_attachments(attachments: &[Attachment]) -> Vec<&Attachment> {
    let mut linked: Vec<&Attachment> = attachments
        .iter()
        .filter(|a| matches!(a.source, AttachmentSource::LineLinked { .. }))
        .collect();
    // Stable, so equal positions keep their insertion order
    linked.sort_by_key(|a| a.line_position());

    let added = attachments
        .iter()
        .filter(|a| a.source == AttachmentSource::ListAdded);

    linked.into_iter().chain(added).collect()
}
