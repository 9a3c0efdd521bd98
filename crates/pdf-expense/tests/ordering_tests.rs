use pdf_expense::*;

fn attachment(id: u64, source: AttachmentSource) -> Attachment {
    Attachment {
        id: AttachmentId(id),
        name: format!("file{}.pdf", id),
        media_type: "application/pdf".to_string(),
        size: 0,
        source,
        data: AttachmentData::Bytes(Vec::<u8>::new().into()),
    }
}

fn linked(id: u64, line: usize) -> Attachment {
    attachment(id, AttachmentSource::LineLinked { line: LinePosition(line) })
}

fn added(id: u64) -> Attachment {
    attachment(id, AttachmentSource::ListAdded)
}

fn ids(attachments: &[&Attachment]) -> Vec<u64> {
    attachments.iter().map(|a| a.id.0).collect()
}

#[test]
fn test_linked_before_added() {
    let attachments = vec![added(1), linked(2, 3), added(3), linked(4, 0), linked(5, 1)];
    let ordered = order_attachments(&attachments);
    assert_eq!(ids(&ordered), vec![4, 5, 2, 1, 3]);
}

#[test]
fn test_added_keep_insertion_order() {
    let attachments = vec![added(7), added(2), added(5)];
    assert_eq!(ids(&order_attachments(&attachments)), vec![7, 2, 5]);
}

#[test]
fn test_ordering_is_idempotent() {
    let attachments = vec![linked(1, 9), added(2), linked(3, 2), added(4), linked(5, 4)];
    let once: Vec<Attachment> = order_attachments(&attachments)
        .into_iter()
        .cloned()
        .collect();
    let twice = order_attachments(&once);
    assert_eq!(ids(&twice), once.iter().map(|a| a.id.0).collect::<Vec<_>>());
}

#[test]
fn test_linked_strictly_ascending() {
    let attachments = vec![linked(1, 5), linked(2, 1), added(3), linked(4, 3)];
    let positions: Vec<usize> = order_attachments(&attachments)
        .iter()
        .filter_map(|a| a.line_position())
        .map(|p| p.0)
        .collect();
    assert_eq!(positions, vec![1, 3, 5]);
}

#[test]
fn test_empty() {
    assert!(order_attachments(&[]).is_empty());
}
