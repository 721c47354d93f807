use std::{fs, path::PathBuf};

use calamine::{open_workbook, Reader, Xlsx};
use chrono::NaiveDate;
use finance_template::{generate, Config, ConfigManager, TemplateError};
use tempfile::tempdir;

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let manager = ConfigManager::new(dir.path().join("nested").join("config.json"));
    let config = Config {
        output_path: PathBuf::from("out/finance.xlsx"),
        title: "Household Budget".into(),
        author: Some("Finance Desk".into()),
        currency_symbol: "$".into(),
        currency_decimals: 0,
        document_date: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        freeze_headers: false,
    };

    manager.save(&config).unwrap();
    assert!(manager.exists());
    assert!(!manager.config_path().with_extension("json.tmp").exists());
    assert_eq!(manager.load().unwrap(), config);
}

#[test]
fn missing_file_loads_defaults_but_load_existing_fails() {
    let dir = tempdir().unwrap();
    let manager = ConfigManager::new(dir.path().join("absent.json"));
    assert_eq!(manager.load().unwrap(), Config::default());
    assert!(matches!(
        manager.load_existing(),
        Err(TemplateError::Io { .. })
    ));
}

#[test]
fn malformed_json_is_a_config_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();
    let err = ConfigManager::new(&path).load().unwrap_err();
    assert!(matches!(err, TemplateError::Config(_)));
    assert!(err.to_string().contains("config.json"));
}

#[test]
fn invalid_document_date_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"document_date": "2024-13-40"}"#).unwrap();
    assert!(matches!(
        ConfigManager::new(&path).load(),
        Err(TemplateError::Config(_))
    ));
}

#[test]
fn custom_currency_still_produces_a_readable_workbook() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dollars.xlsx");
    let config = Config {
        currency_symbol: "$".into(),
        currency_decimals: 0,
        author: Some("Finance Desk".into()),
        ..Config::default()
    };
    generate(&config, &path).unwrap();

    let workbook: Xlsx<_> = open_workbook(&path).unwrap();
    assert_eq!(workbook.sheet_names().len(), 8);
}

#[test]
fn document_date_and_currency_change_the_bytes() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("base.xlsx");
    let dated = dir.path().join("dated.xlsx");
    let euros = dir.path().join("euros.xlsx");

    generate(&Config::default(), &base).unwrap();
    generate(
        &Config {
            document_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            ..Config::default()
        },
        &dated,
    )
    .unwrap();
    generate(
        &Config {
            currency_symbol: "€".into(),
            ..Config::default()
        },
        &euros,
    )
    .unwrap();

    let base = fs::read(base).unwrap();
    assert_ne!(base, fs::read(dated).unwrap());
    assert_ne!(base, fs::read(euros).unwrap());
}
