use pdf_expense::*;
use std::path::PathBuf;

#[test]
fn test_default_options_valid() {
    let options = ReportOptions::default();
    assert!(options.validate().is_ok());
    assert_eq!(options.rate_per_km, constants::DEFAULT_RATE_PER_KM);
    assert_eq!(options.header_lines.len(), 2);
}

#[test]
fn test_validate_rate() {
    for rate in [-0.1, f64::NAN, f64::INFINITY] {
        let options = ReportOptions {
            rate_per_km: rate,
            ..ReportOptions::default()
        };
        assert!(options.validate().is_err(), "rate {} accepted", rate);
    }
}

#[test]
fn test_validate_logo_slots() {
    let options = ReportOptions {
        logos: (0..5).map(|i| PathBuf::from(format!("logo{}.png", i))).collect(),
        ..ReportOptions::default()
    };
    assert!(matches!(options.validate(), Err(ReportError::Config(_))));
}

#[test]
fn test_validate_header_lines() {
    let options = ReportOptions {
        header_lines: vec!["a".into(), "b".into(), "c".into()],
        ..ReportOptions::default()
    };
    assert!(options.validate().is_err());
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.json");

    let options = ReportOptions {
        rate_per_km: 0.35,
        logos: vec![PathBuf::from("logos/club.png")],
        contact: Some(ContactBlock {
            title: "Trésorière".to_string(),
            lines: vec!["25000 Besançon".to_string()],
        }),
        ..ReportOptions::default()
    };
    options.save(&path).await.unwrap();

    let loaded = ReportOptions::load(&path).await.unwrap();
    assert_eq!(loaded, options);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_partial_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.json");
    std::fs::write(&path, r#"{ "rate_per_km": 0.4 }"#).unwrap();

    let loaded = ReportOptions::load(&path).await.unwrap();
    assert_eq!(loaded.rate_per_km, 0.4);
    assert_eq!(loaded.title, ReportOptions::default().title);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_invalid_json_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = ReportOptions::load(&path).await.unwrap_err();
    assert!(matches!(err, ReportError::Config(_)));
}
