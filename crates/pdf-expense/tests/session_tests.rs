use pdf_expense::*;

fn receipt(name: &str) -> AttachmentFile {
    AttachmentFile::from_bytes(name, "application/pdf", b"%PDF-1.7".to_vec())
}

#[test]
fn test_travel_amount_follows_distance() {
    let mut session = ReportSession::new(0.30);
    let pos = session.add_line(ExpenseCategory::Travel, "Dijon - Besançon");
    session.set_distance_km(pos, 100.0).unwrap();

    let line = session.line(pos).unwrap();
    assert_eq!(line.amount, 30.0);
    assert_eq!(line.amount, derive_amount(line, 0.30));
}

#[test]
fn test_travel_amount_not_editable() {
    let mut session = ReportSession::new(0.30);
    let pos = session.add_line(ExpenseCategory::Travel, "");
    let err = session.set_amount(pos, 12.0).unwrap_err();
    assert!(matches!(err, ReportError::InvalidEdit(_)));
}

#[test]
fn test_expense_distance_not_editable() {
    let mut session = ReportSession::new(0.30);
    let pos = session.add_line(ExpenseCategory::Meal, "Repas");
    assert!(session.set_distance_km(pos, 10.0).is_err());
    session.set_amount(pos, 18.0).unwrap();

    let line = session.line(pos).unwrap();
    assert_eq!(line.distance_km, 0.0);
    assert_eq!(line.amount, 18.0);
}

#[test]
fn test_category_switch() {
    let mut session = ReportSession::new(0.30);
    let pos = session.add_line(ExpenseCategory::Travel, "");
    session.set_distance_km(pos, 42.0).unwrap();

    session.set_category(pos, ExpenseCategory::Toll).unwrap();
    let line = session.line(pos).unwrap();
    assert_eq!((line.distance_km, line.amount), (0.0, 0.0));

    session.set_amount(pos, 7.5).unwrap();
    session.set_category(pos, ExpenseCategory::Travel).unwrap();
    assert_eq!(session.line(pos).unwrap().amount, 0.0);
}

#[test]
fn test_negative_inputs_clamped() {
    let mut session = ReportSession::new(0.30);
    let travel = session.add_line(ExpenseCategory::Travel, "");
    let meal = session.add_line(ExpenseCategory::Meal, "");
    session.set_distance_km(travel, -5.0).unwrap();
    session.set_amount(meal, f64::NAN).unwrap();
    assert_eq!(session.total(), 0.0);
}

#[test]
fn test_total() {
    let mut session = ReportSession::new(0.30);
    let travel = session.add_line(ExpenseCategory::Travel, "");
    let meal = session.add_line(ExpenseCategory::Meal, "");
    session.set_distance_km(travel, 100.0).unwrap();
    session.set_amount(meal, 18.0).unwrap();
    assert_eq!(session.total(), 48.0);
    assert_eq!(format::format_eur(session.total()), "48,00");
}

#[test]
fn test_link_evicts_previous() {
    let mut session = ReportSession::default();
    let pos = session.add_line(ExpenseCategory::Toll, "A6");
    let first = session.link_attachment(pos, receipt("first.pdf")).unwrap();
    let second = session.link_attachment(pos, receipt("second.pdf")).unwrap();

    assert_ne!(first, second);
    assert_eq!(session.attachments().len(), 1);
    assert_eq!(session.linked_attachment(pos).unwrap().name, "second.pdf");
}

#[test]
fn test_remove_line_drops_linked_attachment() {
    let mut session = ReportSession::default();
    let a = session.add_line(ExpenseCategory::Toll, "");
    let b = session.add_line(ExpenseCategory::Hotel, "");
    session.link_attachment(a, receipt("a.pdf")).unwrap();
    session.link_attachment(b, receipt("b.pdf")).unwrap();
    session.add_attachments([receipt("extra.pdf")]);

    session.remove_line(a).unwrap();

    let names: Vec<&str> = session.attachments().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["b.pdf", "extra.pdf"]);
    // Positions stay stable after a removal
    assert_eq!(session.linked_attachment(b).unwrap().name, "b.pdf");
    assert!(session.line(a).is_none());
    assert!(session.remove_line(a).is_err());
}

#[test]
fn test_remove_attachment_clears_link() {
    let mut session = ReportSession::default();
    let pos = session.add_line(ExpenseCategory::Parking, "");
    let id = session.link_attachment(pos, receipt("ticket.pdf")).unwrap();

    assert!(session.remove_attachment(id));
    assert!(session.linked_attachment(pos).is_none());
    assert!(session.line(pos).is_some());
    assert!(!session.remove_attachment(id));
}

#[test]
fn test_ordered_attachments_match_merge_order() {
    let mut session = ReportSession::default();
    session.add_attachments([receipt("picker.pdf")]);
    let first = session.add_line(ExpenseCategory::Toll, "");
    let second = session.add_line(ExpenseCategory::Meal, "");
    session.link_attachment(second, receipt("second.pdf")).unwrap();
    session.link_attachment(first, receipt("first.pdf")).unwrap();

    let names: Vec<&str> = session
        .ordered_attachments()
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(names, vec!["first.pdf", "second.pdf", "picker.pdf"]);

    let snapshot = session.snapshot(&ReportMetadata::default());
    let merged: Vec<&str> = order_attachments(&snapshot.attachments)
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(merged, names);
}

#[test]
fn test_snapshot_is_detached() {
    let mut session = ReportSession::default();
    let pos = session.add_line(ExpenseCategory::Meal, "");
    session.set_amount(pos, 10.0).unwrap();
    let snapshot = session.snapshot(&ReportMetadata::default());

    session.set_amount(pos, 99.0).unwrap();
    session.reset();

    assert_eq!(snapshot.lines.len(), 1);
    assert_eq!(snapshot.total(), 10.0);
    assert_eq!(session.lines().count(), 0);
    assert!(session.attachments().is_empty());
}

#[test]
fn test_media_kind_detection() {
    assert_eq!(MediaKind::detect("application/pdf", "x"), MediaKind::Pdf);
    assert_eq!(MediaKind::detect("", "Scan.PDF"), MediaKind::Pdf);
    assert_eq!(MediaKind::detect("", "photo.jpeg"), MediaKind::Jpeg);
    assert_eq!(MediaKind::detect("image/png", "photo.jpg"), MediaKind::Png);
    assert_eq!(MediaKind::detect("image/webp", "photo.webp"), MediaKind::Unsupported);
    assert_eq!(MediaKind::detect("image/heic", "IMG_0001.heic"), MediaKind::Unsupported);
    assert_eq!(MediaKind::detect("image/svg+xml", "plan.svg"), MediaKind::Unsupported);
    assert_eq!(MediaKind::detect("text/plain", "notes.txt"), MediaKind::Unsupported);
}

#[test]
fn test_expense_constructor_with_travel_category() {
    let line = ExpenseLine::expense(ExpenseCategory::Travel, "Gare", 42.0);
    assert_eq!(line.category, ExpenseCategory::Travel);
    assert_eq!(line.distance_km, 0.0);
    assert_eq!(line.amount, 0.0);
    assert_eq!(derive_amount(&line, 0.30), line.amount);
}
