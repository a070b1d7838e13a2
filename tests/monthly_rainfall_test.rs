// Daily records through monthly aggregation to the monthly CSV

use chrono::NaiveDate;
use hko_station_data::aggregate::{aggregate_monthly, DailyValue};
use hko_station_data::output::write_monthly_rainfall_csv;
use tempfile::TempDir;

fn day(y: i32, m: u32, d: u32, value: Option<f64>) -> DailyValue {
    DailyValue::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), value)
}

#[test]
fn test_gap_months_are_written_as_zero() {
    let daily = vec![
        day(2020, 3, 1, Some(4.0)),
        day(2020, 3, 2, Some(1.5)),
        day(2020, 5, 10, Some(12.0)),
    ];

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("monthly.csv");
    let written = write_monthly_rainfall_csv(&path, &aggregate_monthly(&[], &daily)).unwrap();
    assert_eq!(written, 12);

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 13);
    assert_eq!(lines[0], "year,month,monthly_rainfall_mm");
    assert_eq!(lines[1], "2020,1,0.00");
    assert_eq!(lines[3], "2020,3,5.50");
    assert_eq!(lines[4], "2020,4,0.00");
    assert_eq!(lines[5], "2020,5,12.00");
    assert_eq!(lines[12], "2020,12,0.00");
}
