// Loader, header validator and writer round-trip

use chrono::NaiveDate;
use hko_station_data::output::write_rainfall_csv;
use hko_station_data::rainfall_csv::{load_records, validate_header, HeaderCheck, LoadError};
use hko_station_data::StationRecord;
use tempfile::TempDir;

const SAMPLE: &str = "datetime,rainfall_mm,humidity_pct\n2023-01-01 00:00,1.5,60\n2023-01-01 01:00,,61\n2023-01-01 02:00,0.0,\nbadrow,abc,def\n";

#[test]
fn test_load_sample_skips_malformed_row() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rainfall.csv");
    std::fs::write(&path, SAMPLE).unwrap();

    assert_eq!(validate_header(&path).unwrap(), HeaderCheck::Valid);

    let rows = load_records(&path).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].rainfall_mm, Some(1.5));
    assert_eq!(rows[0].humidity_pct, Some(60.0));
    assert_eq!(rows[1].rainfall_mm, None);
    assert_eq!(rows[1].humidity_pct, Some(61.0));
    assert_eq!(rows[2].rainfall_mm, Some(0.0));
    assert_eq!(rows[2].humidity_pct, None);
    assert_eq!(
        rows[1].datetime,
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(1, 0, 0).unwrap()
    );
}

#[test]
fn test_header_missing_columns_are_named() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "datetime,rain\n2023-01-01 00:00,1\n").unwrap();

    match validate_header(&path).unwrap() {
        HeaderCheck::Invalid(msg) => {
            assert!(msg.contains("rainfall_mm"));
            assert!(msg.contains("humidity_pct"));
            assert!(!msg.contains("datetime"));
        }
        HeaderCheck::Valid => panic!("Expected invalid header"),
    }

    match load_records(&path) {
        Err(LoadError::MissingColumns(missing)) => {
            assert_eq!(missing, vec!["rainfall_mm".to_string(), "humidity_pct".to_string()]);
        }
        other => panic!("Expected MissingColumns, got {other:?}"),
    }
}

#[test]
fn test_written_rainfall_csv_loads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rainfall_processed.csv");
    let station = "Daily Total Rainfall - Kai Tak".to_string();
    let records = vec![
        StationRecord {
            date: NaiveDate::from_ymd_opt(2020, 7, 1).unwrap(),
            value: Some(12.4),
            station: station.clone(),
        },
        StationRecord {
            date: NaiveDate::from_ymd_opt(2020, 7, 2).unwrap(),
            value: None,
            station,
        },
    ];

    assert_eq!(write_rainfall_csv(&path, &records).unwrap(), 2);
    assert!(validate_header(&path).unwrap().is_valid());

    let rows = load_records(&path).unwrap();
    assert_eq!(rows.len(), 2);
    for (row, record) in rows.iter().zip(&records) {
        assert_eq!(row.datetime.date(), record.date);
        assert_eq!(row.rainfall_mm, record.value);
        assert_eq!(row.humidity_pct, None);
    }
}

#[test]
fn test_blank_header_line_names_every_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blank_header.csv");
    std::fs::write(&path, "\n2023-01-01 00:00,1.5,60\n").unwrap();

    match validate_header(&path).unwrap() {
        HeaderCheck::Invalid(msg) => {
            assert_eq!(msg, "Missing columns: datetime, rainfall_mm, humidity_pct");
        }
        HeaderCheck::Valid => panic!("Expected invalid header"),
    }
}

#[test]
fn test_zero_byte_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, "").unwrap();

    assert_eq!(
        validate_header(&path).unwrap(),
        HeaderCheck::Invalid("CSV is empty".to_string())
    );
}

#[test]
fn test_unparseable_numbers_are_absent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("noisy.csv");
    std::fs::write(
        &path,
        "datetime,rainfall_mm,humidity_pct\n2023-01-01 03:00,abc,1.2.3\n2023-01-01 04:00,0.2,65%\n",
    )
    .unwrap();

    let rows = load_records(&path).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].rainfall_mm, None);
    assert_eq!(rows[0].humidity_pct, None);
    assert_eq!(rows[1].rainfall_mm, Some(0.2));
    assert_eq!(rows[1].humidity_pct, Some(65.0));
}
