//! Readers for the daily CSVs written by the fetch tools
//!
//! These are lenient: a missing file is an empty series, rows with a bad date
//! are dropped and bad numbers become absent values.
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use crate::aggregate::DailyValue;
use crate::rainfall_csv::LoadError;

#[derive(Debug, Deserialize)]
struct WindRow {
    #[serde(default)]
    date: String,
    #[serde(default)]
    mean_wspd: String,
}

#[derive(Debug, Deserialize)]
struct RainRow {
    #[serde(default)]
    datetime: String,
    #[serde(default)]
    rainfall_mm: String,
}

/// `date,station,mean_wspd` → daily wind values
pub fn read_wind_csv(path: impl AsRef<Path>) -> Result<Vec<DailyValue>, LoadError> {
    read_series(path.as_ref(), |row: WindRow| (row.date, row.mean_wspd))
}

/// `datetime,rainfall_mm[,humidity_pct]` → daily rainfall values
pub fn read_rainfall_csv(path: impl AsRef<Path>) -> Result<Vec<DailyValue>, LoadError> {
    read_series(path.as_ref(), |row: RainRow| (row.datetime, row.rainfall_mm))
}

fn read_series<R, F>(path: &Path, fields: F) -> Result<Vec<DailyValue>, LoadError>
where
    R: for<'de> Deserialize<'de>,
    F: Fn(R) -> (String, String),
{
    if !path.exists() {
        info!("{} not found, treating as empty", path.display());
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut values = Vec::new();

    for result in reader.deserialize::<R>() {
        let (stamp, value) = match result {
            Ok(row) => fields(row),
            Err(e) => {
                debug!("Skipping undecodable row in {}: {}", path.display(), e);
                continue;
            }
        };

        let day: String = stamp.chars().take(10).collect();
        let Ok(date) = NaiveDate::parse_from_str(&day, "%Y-%m-%d") else {
            debug!("Skipping row with bad date '{}'", stamp);
            continue;
        };

        let value = value.trim();
        let value = if value.is_empty() { None } else { value.parse().ok() };
        values.push(DailyValue::new(date, value));
    }

    info!("Read {} daily values from {}", values.len(), path.display());
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let values = read_wind_csv(dir.path().join("nope.csv")).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_read_wind_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wind.csv");
        std::fs::write(
            &path,
            "date,station,mean_wspd\n2010-01-01,Kai Tak,12.3\n2010-01-02,Kai Tak,\nnot-a-date,Kai Tak,3\n2010-01-03,Kai Tak,n/a\n",
        )
        .unwrap();

        let values = read_wind_csv(&path).unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[0].value, Some(12.3));
        assert_eq!(values[1].value, None);
        assert_eq!(values[2].value, None);
    }

    #[test]
    fn test_read_rainfall_csv_uses_date_part() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rain.csv");
        std::fs::write(
            &path,
            "datetime,rainfall_mm,humidity_pct\n2010-01-01 00:00,1.5,\n2010-01-02 00:00,,\n",
        )
        .unwrap();

        let values = read_rainfall_csv(&path).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].date, NaiveDate::from_ymd_opt(2010, 1, 1).unwrap());
        assert_eq!(values[0].value, Some(1.5));
        assert_eq!(values[1].value, None);
    }
}
