use pdf_expense::{AttachmentFile, ExpenseCategory, ReportMetadata, ReportSession};
use pdf_expense_runtime::*;
use tokio::sync::mpsc;

/// Receive updates until one that is not progress
async fn next_result(update_rx: &mut mpsc::UnboundedReceiver<ReportUpdate>) -> ReportUpdate {
    loop {
        match update_rx.recv().await.expect("worker stopped") {
            ReportUpdate::Progress { .. } => continue,
            other => return other,
        }
    }
}

fn snapshot_with_meal() -> Box<ReportSnapshot> {
    let mut session = ReportSession::default();
    let pos = session.add_line(ExpenseCategory::Meal, "Midi");
    session.set_amount(pos, 18.0).unwrap();
    let metadata = ReportMetadata {
        name: "Léa Martin".to_string(),
        mission_date: "2024-06-01".to_string(),
        ..ReportMetadata::default()
    };
    Box::new(session.snapshot(&metadata))
}

#[tokio::test]
async fn test_generate_then_export() {
    let (command_tx, mut update_rx, _handle) = spawn_worker();
    command_tx
        .send(ReportCommand::Generate {
            snapshot: snapshot_with_meal(),
            options: ReportOptions::default(),
        })
        .unwrap();

    let ReportUpdate::Generated { output } = next_result(&mut update_rx).await else {
        panic!("expected a generated report");
    };
    assert_eq!(output.filename, "L_a_Martin_2024-06-01_complet.pdf");
    assert_eq!(output.page_count, 1);

    let dir = tempfile::tempdir().unwrap();
    command_tx
        .send(ReportCommand::Export {
            path: dir.path().to_path_buf(),
        })
        .unwrap();

    let ReportUpdate::Exported { path } = next_result(&mut update_rx).await else {
        panic!("expected an export");
    };
    assert_eq!(path, dir.path().join(&output.filename));
    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, output.bytes);
}

#[tokio::test]
async fn test_progress_reported() {
    let (command_tx, mut update_rx, _handle) = spawn_worker();
    command_tx
        .send(ReportCommand::Generate {
            snapshot: Box::default(),
            options: ReportOptions::default(),
        })
        .unwrap();

    let mut operations = Vec::new();
    loop {
        match update_rx.recv().await.unwrap() {
            ReportUpdate::Progress { operation, .. } => operations.push(operation),
            ReportUpdate::Generated { .. } => break,
            other => panic!("unexpected update: {:?}", other),
        }
    }
    assert_eq!(operations, vec!["Building recap", "Finalizing"]);
}

#[tokio::test]
async fn test_reset_discards_output() {
    let (command_tx, mut update_rx, _handle) = spawn_worker();
    command_tx
        .send(ReportCommand::Generate {
            snapshot: snapshot_with_meal(),
            options: ReportOptions::default(),
        })
        .unwrap();
    assert!(matches!(
        next_result(&mut update_rx).await,
        ReportUpdate::Generated { .. }
    ));

    command_tx.send(ReportCommand::Reset).unwrap();
    assert!(matches!(next_result(&mut update_rx).await, ReportUpdate::Cleared));

    let dir = tempfile::tempdir().unwrap();
    command_tx
        .send(ReportCommand::Export {
            path: dir.path().join("report.pdf"),
        })
        .unwrap();
    assert!(matches!(
        next_result(&mut update_rx).await,
        ReportUpdate::Error { .. }
    ));
    assert!(!dir.path().join("report.pdf").exists());
}

#[tokio::test]
async fn test_failed_generation_clears_previous_output() {
    let (command_tx, mut update_rx, _handle) = spawn_worker();
    command_tx
        .send(ReportCommand::Generate {
            snapshot: snapshot_with_meal(),
            options: ReportOptions::default(),
        })
        .unwrap();
    assert!(matches!(
        next_result(&mut update_rx).await,
        ReportUpdate::Generated { .. }
    ));

    let mut session = ReportSession::default();
    session.add_attachments([AttachmentFile::from_bytes(
        "broken.pdf",
        "application/pdf",
        b"definitely not a pdf".to_vec(),
    )]);
    command_tx
        .send(ReportCommand::Generate {
            snapshot: Box::new(session.snapshot(&ReportMetadata::default())),
            options: ReportOptions::default(),
        })
        .unwrap();

    let ReportUpdate::Error { message } = next_result(&mut update_rx).await else {
        panic!("expected a generation failure");
    };
    assert!(message.contains("broken.pdf"));

    let dir = tempfile::tempdir().unwrap();
    command_tx
        .send(ReportCommand::Export {
            path: dir.path().to_path_buf(),
        })
        .unwrap();
    assert!(matches!(
        next_result(&mut update_rx).await,
        ReportUpdate::Error { .. }
    ));
}
