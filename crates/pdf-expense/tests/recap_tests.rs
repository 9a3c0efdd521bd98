use pdf_expense::*;

fn meal_lines(count: usize) -> Vec<ExpenseLine> {
    (0..count)
        .map(|i| ExpenseLine::expense(ExpenseCategory::Meal, format!("Repas {}", i + 1), 12.5))
        .collect()
}

fn expected_pages(rows: usize, first: usize, continuation: usize) -> usize {
    let overflow = rows.saturating_sub(first);
    1 + overflow.div_ceil(continuation)
}

fn page_text(recap: &RecapDocument, page_number: u32) -> Vec<u8> {
    let doc = recap.document();
    let page_id = doc.get_pages()[&page_number];
    doc.get_page_content(page_id).unwrap()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[tokio::test]
async fn test_empty_recap_is_one_page() {
    let recap = build_recap(&ReportMetadata::default(), &[], 0.0, &ReportOptions::default())
        .await
        .unwrap();
    assert_eq!(recap.page_count(), 1);
    assert_eq!(recap.document().get_pages().len(), 1);
    assert!(contains(&page_text(&recap, 1), b"0,00"));
}

#[tokio::test]
async fn test_first_page_capacity_is_smaller() {
    let recap = build_recap(&ReportMetadata::default(), &[], 0.0, &ReportOptions::default())
        .await
        .unwrap();
    assert!(recap.first_page_capacity() > 0);
    assert!(recap.first_page_capacity() < recap.continuation_capacity());
}

#[tokio::test]
async fn test_pagination_page_count() {
    let options = ReportOptions::default();
    let probe = build_recap(&ReportMetadata::default(), &[], 0.0, &options)
        .await
        .unwrap();
    let first = probe.first_page_capacity();
    let continuation = probe.continuation_capacity();

    for rows in [0, first, first + 1, first + continuation, first + 2 * continuation + 3] {
        let lines = meal_lines(rows);
        let recap = build_recap(&ReportMetadata::default(), &lines, 0.0, &options)
            .await
            .unwrap();
        assert_eq!(
            recap.page_count(),
            expected_pages(rows, first, continuation),
            "rows = {}",
            rows
        );
        assert_eq!(recap.document().get_pages().len(), recap.page_count());

        let drawn: usize = recap.page_rows().iter().map(|r| r.len()).sum();
        assert_eq!(drawn, rows);
    }
}

#[tokio::test]
async fn test_continuation_page_title() {
    let options = ReportOptions::default();
    let probe = build_recap(&ReportMetadata::default(), &[], 0.0, &options)
        .await
        .unwrap();
    let lines = meal_lines(probe.first_page_capacity() + 1);
    let recap = build_recap(&ReportMetadata::default(), &lines, 0.0, &options)
        .await
        .unwrap();

    assert_eq!(recap.page_count(), 2);
    let continuation = page_text(&recap, 2);
    assert!(contains(&continuation, b"ANNEXE I"));
    assert!(contains(&continuation, b"suite"));
    assert!(!contains(&continuation, b"Total g"));
}

#[tokio::test]
async fn test_recap_content() {
    let metadata = ReportMetadata {
        name: "Jean Dupont".to_string(),
        address: "3 rue des Lilas".to_string(),
        mission_reason: "Championnat".to_string(),
        mission_place: "Dijon".to_string(),
        mission_date: "2024-05-17".to_string(),
        waives_reimbursement: true,
    };
    let lines = vec![
        ExpenseLine::travel("Aller-retour", 100.0, 0.30),
        ExpenseLine::expense(ExpenseCategory::Meal, "Midi", 18.0),
    ];
    let recap = build_recap(&metadata, &lines, 48.0, &ReportOptions::default())
        .await
        .unwrap();

    let content = page_text(&recap, 1);
    assert!(contains(&content, b"Jean Dupont, 3 rue des Lilas"));
    assert!(contains(&content, b"17/05/2024"));
    assert!(contains(&content, b"48,00"));
    assert!(contains(&content, b"Je renonce"));
}

#[tokio::test]
async fn test_missing_logos_do_not_fail() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.png");
    std::fs::write(&broken, b"not a png").unwrap();

    let options = ReportOptions {
        logos: vec![dir.path().join("missing.png"), broken, dir.path().join("missing.svg")],
        ..ReportOptions::default()
    };
    let recap = build_recap(&ReportMetadata::default(), &[], 0.0, &options)
        .await
        .unwrap();
    assert_eq!(recap.page_count(), 1);
}

#[tokio::test]
async fn test_logo_is_embedded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logo.png");
    image::RgbImage::from_pixel(40, 20, image::Rgb([0, 80, 160]))
        .save(&path)
        .unwrap();

    let options = ReportOptions {
        logos: vec![path],
        ..ReportOptions::default()
    };
    let recap = build_recap(&ReportMetadata::default(), &[], 0.0, &options)
        .await
        .unwrap();
    assert!(contains(&page_text(&recap, 1), b"/Im1 Do"));
}

#[tokio::test]
async fn test_svg_logo_is_embedded() {
    let dir = tempfile::tempdir().unwrap();
    let svg = dir.path().join("logo.svg");
    std::fs::write(
        &svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="120" height="60">
            <circle cx="30" cy="30" r="25" fill="#c00000"/>
        </svg>"##,
    )
    .unwrap();
    let broken = dir.path().join("broken.svg");
    std::fs::write(&broken, "<svg").unwrap();

    let options = ReportOptions {
        logos: vec![broken, svg],
        ..ReportOptions::default()
    };
    let recap = build_recap(&ReportMetadata::default(), &[], 0.0, &options)
        .await
        .unwrap();

    let content = page_text(&recap, 1);
    assert!(contains(&content, b"/Im1 Do"));
    assert!(!contains(&content, b"/Im2 Do"));
}
