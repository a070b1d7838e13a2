//! Writers for the derived CSV files
//!
//! Each writer replaces the file at `path` and returns the number of data rows.
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::aggregate::MonthlySummary;
use crate::station_block::StationRecord;
use crate::utils::format_optional;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// `date,station,mean_wspd`
pub fn write_wind_csv(path: &Path, records: &[StationRecord]) -> Result<usize, OutputError> {
    info!(path = %path.display(), rows = records.len(), "Writing wind CSV");

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["date", "station", "mean_wspd"])?;

    for record in records {
        wtr.write_record([
            record.date.format("%Y-%m-%d").to_string(),
            record.station.clone(),
            format_optional(record.value, 1),
        ])?;
    }

    wtr.flush()?;
    Ok(records.len())
}

/// `datetime,rainfall_mm,humidity_pct`, midnight timestamps and no humidity,
/// readable by [`crate::rainfall_csv::load_records`]
pub fn write_rainfall_csv(path: &Path, records: &[StationRecord]) -> Result<usize, OutputError> {
    info!(path = %path.display(), rows = records.len(), "Writing rainfall CSV");

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["datetime", "rainfall_mm", "humidity_pct"])?;

    for record in records {
        wtr.write_record([
            record.date.format("%Y-%m-%d 00:00").to_string(),
            format_optional(record.value, 1),
            String::new(),
        ])?;
    }

    wtr.flush()?;
    Ok(records.len())
}

/// `year,month,monthly_rainfall_mm`
pub fn write_monthly_rainfall_csv(
    path: &Path,
    months: &[MonthlySummary],
) -> Result<usize, OutputError> {
    info!(path = %path.display(), rows = months.len(), "Writing monthly rainfall CSV");

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["year", "month", "monthly_rainfall_mm"])?;

    for m in months {
        wtr.write_record([
            m.year.to_string(),
            m.month.to_string(),
            format!("{:.2}", m.rainfall_total_mm),
        ])?;
    }

    wtr.flush()?;
    Ok(months.len())
}

/// `year,month,monthly_rainfall_mm,mean_wspd`
pub fn write_monthly_wind_rain_csv(
    path: &Path,
    months: &[MonthlySummary],
) -> Result<usize, OutputError> {
    info!(path = %path.display(), rows = months.len(), "Writing monthly wind/rain CSV");

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["year", "month", "monthly_rainfall_mm", "mean_wspd"])?;

    for m in months {
        wtr.write_record([
            m.year.to_string(),
            m.month.to_string(),
            format!("{:.2}", m.rainfall_total_mm),
            format_optional(m.wind_mean, 2),
        ])?;
    }

    wtr.flush()?;
    Ok(months.len())
}
