/// Loader and header check for processed rainfall CSV files
///
/// Expected header (order and extra columns don't matter):
/// `datetime,rainfall_mm,humidity_pct`, with `datetime` as `YYYY-MM-DD HH:MM`.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::utils::parse_cleaned_value;

pub const REQUIRED_COLUMNS: [&str; 3] = ["datetime", "rainfall_mm", "humidity_pct"];

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV header missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Outcome of [`validate_header`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderCheck {
    Valid,
    Invalid(String),
}

impl HeaderCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, HeaderCheck::Valid)
    }

    /// Empty when valid
    pub fn message(&self) -> &str {
        match self {
            HeaderCheck::Valid => "",
            HeaderCheck::Invalid(msg) => msg,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RainfallRow {
    pub datetime: NaiveDateTime,
    pub rainfall_mm: Option<f64>,
    pub humidity_pct: Option<f64>,
}

/// Required columns absent from `header`, in canonical order
pub fn missing_columns<'a, I>(header: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: Vec<&str> = header.into_iter().collect();
    REQUIRED_COLUMNS
        .iter()
        .filter(|name| !present.contains(*name))
        .map(|name| name.to_string())
        .collect()
}

/// Inspect only the first line of `path` for the required columns.
///
/// I/O failures are errors; a bad or blank header is reported through
/// [`HeaderCheck::Invalid`] with a message naming the missing columns. Only a
/// file with no lines at all is reported as empty.
pub fn validate_header(path: impl AsRef<Path>) -> Result<HeaderCheck, LoadError> {
    let mut first_line = String::new();
    let read = BufReader::new(File::open(path.as_ref())?).read_line(&mut first_line)?;
    if read == 0 {
        return Ok(HeaderCheck::Invalid("CSV is empty".to_string()));
    }

    // A blank first line is an empty header: every required column is missing
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(first_line.as_bytes());
    let header = match reader.records().next() {
        Some(record) => record?,
        None => csv::StringRecord::new(),
    };

    let missing = missing_columns(header.iter());
    if missing.is_empty() {
        Ok(HeaderCheck::Valid)
    } else {
        Ok(HeaderCheck::Invalid(format!(
            "Missing columns: {}",
            missing.join(", ")
        )))
    }
}

/// Load every row with a usable timestamp.
///
/// Rows whose first 16 characters of `datetime` are not `YYYY-MM-DD HH:MM` are
/// dropped. Empty or unparseable numbers become `None`; humidity is stripped of
/// anything but digits, `.` and `-` first (so `65%` reads as 65).
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<RainfallRow>, LoadError> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let missing = missing_columns(headers.iter());
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    let index_of = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumns(vec![name.to_string()]))
    };
    let dt_idx = index_of("datetime")?;
    let rain_idx = index_of("rainfall_mm")?;
    let hum_idx = index_of("humidity_pct")?;

    let mut rows = Vec::new();
    let mut skipped = 0;

    for (line_idx, result) in reader.records().enumerate() {
        let record = result?;

        let stamp: String = record.get(dt_idx).unwrap_or("").chars().take(16).collect();
        let datetime = match NaiveDateTime::parse_from_str(&stamp, DATETIME_FORMAT) {
            Ok(dt) => dt,
            Err(e) => {
                debug!("Row {}: bad datetime '{}' ({}), skipping", line_idx + 2, stamp, e);
                skipped += 1;
                continue;
            }
        };

        rows.push(RainfallRow {
            datetime,
            rainfall_mm: parse_plain(record.get(rain_idx)),
            humidity_pct: record
                .get(hum_idx)
                .and_then(|v| parse_cleaned_value(v).ok().flatten()),
        });
    }

    if skipped > 0 {
        warn!("Skipped {} rows with unparseable datetimes in {}", skipped, path.display());
    }
    info!("Loaded {} records from {}", rows.len(), path.display());

    Ok(rows)
}

fn parse_plain(value: Option<&str>) -> Option<f64> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    value.parse().ok()
}
