//! Station-block extraction for HKO multi-station CSV dumps
//!
//! The daily SE dumps concatenate one block per station:
//!
//! ```text
//! Mean Wind Speed (km/h) - Kai Tak        <- title line
//! Year,Month,Day,Value,Completeness       <- header line (never parsed)
//! 2010,1,1,12.3,C                         <- data rows
//! 2010,1,2,10.0,C
//!                                         <- blank line ends the block
//! ```
//!
//! A block also ends at the first non-blank line that does not start with a
//! digit. Unlike the blank line, that line is not consumed: it is examined
//! again as a possible title for the next block.
use std::io::{self, BufRead};
use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::utils::{normalize_station_name, parse_cleaned_value};

/// Column positions of the fields read from each data row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    pub year: usize,
    pub month: usize,
    pub day: usize,
    pub value: usize,
}

impl Default for BlockLayout {
    /// `Year,Month,Day,Value[,Completeness]`
    fn default() -> Self {
        Self {
            year: 0,
            month: 1,
            day: 2,
            value: 3,
        }
    }
}

/// One daily observation taken from a station block
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub date: NaiveDate,
    /// `None` when the value field is missing or carries no digits (e.g. `***`)
    pub value: Option<f64>,
    /// Trimmed title line of the block the row came from
    pub station: String,
}

/// Result of a scan, with counters for the rows that did not make it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub records: Vec<StationRecord>,
    pub blocks_matched: usize,
    pub rows_read: usize,
    pub skipped_rows: usize,
    pub out_of_range_rows: usize,
}

impl Extraction {
    pub fn into_records(self) -> Vec<StationRecord> {
        self.records
    }
}

enum ScanState {
    SeekingTitle,
    SeekingHeader { station: String },
    ReadingRows { station: String },
}

/// Finds every block whose title matches a station query and reads its rows
#[derive(Debug, Clone)]
pub struct StationBlockExtractor {
    query: String,
    normalized_query: String,
    years: RangeInclusive<i32>,
    layout: BlockLayout,
}

impl StationBlockExtractor {
    pub fn new(station_query: impl Into<String>, start_year: i32, end_year: i32) -> Self {
        let query = station_query.into();
        Self {
            normalized_query: normalize_station_name(&query),
            query,
            years: start_year..=end_year,
            layout: BlockLayout::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.station_query.clone(), config.start_year, config.end_year)
    }

    pub fn with_layout(mut self, layout: BlockLayout) -> Self {
        self.layout = layout;
        self
    }

    /// A title matches when the normalized query is a substring of the normalized line.
    /// A query with nothing left after normalization matches no line.
    pub fn matches_title(&self, line: &str) -> bool {
        !self.normalized_query.is_empty()
            && normalize_station_name(line).contains(&self.normalized_query)
    }

    #[instrument(skip(self, lines), fields(query = %self.query))]
    pub fn extract<I, S>(&self, lines: I) -> Extraction
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut extraction = Extraction::default();
        let mut state = ScanState::SeekingTitle;

        for raw in lines {
            let line = raw.as_ref().trim();
            state = match state {
                ScanState::SeekingTitle => self.seek_title(line, &mut extraction),
                ScanState::SeekingHeader { station } => {
                    if line.is_empty() {
                        ScanState::SeekingHeader { station }
                    } else {
                        debug!("Skipping header line: {}", line);
                        ScanState::ReadingRows { station }
                    }
                }
                ScanState::ReadingRows { station } => {
                    if line.is_empty() {
                        ScanState::SeekingTitle
                    } else if !line.starts_with(|c: char| c.is_ascii_digit()) {
                        self.seek_title(line, &mut extraction)
                    } else {
                        self.read_row(line, &station, &mut extraction);
                        ScanState::ReadingRows { station }
                    }
                }
            };
        }

        if extraction.skipped_rows > 0 {
            warn!(
                "Skipped {} unparseable rows out of {}",
                extraction.skipped_rows, extraction.rows_read
            );
        }
        info!(
            "Extracted {} records from {} matching blocks ({} rows outside {}-{})",
            extraction.records.len(),
            extraction.blocks_matched,
            extraction.out_of_range_rows,
            self.years.start(),
            self.years.end()
        );

        extraction
    }

    /// Same as [`extract`](Self::extract) over a buffered reader; only I/O failures are errors
    pub fn extract_from_reader<R: BufRead>(&self, reader: R) -> io::Result<Extraction> {
        let lines = reader.lines().collect::<io::Result<Vec<String>>>()?;
        Ok(self.extract(lines))
    }

    fn seek_title(&self, line: &str, extraction: &mut Extraction) -> ScanState {
        if !line.is_empty() && self.matches_title(line) {
            debug!("Matched station block: {}", line);
            extraction.blocks_matched += 1;
            ScanState::SeekingHeader {
                station: line.to_string(),
            }
        } else {
            ScanState::SeekingTitle
        }
    }

    fn read_row(&self, line: &str, station: &str, extraction: &mut Extraction) {
        extraction.rows_read += 1;

        let Some((date, value)) = self.parse_row(line) else {
            debug!("Skipping malformed row: {}", line);
            extraction.skipped_rows += 1;
            return;
        };

        if !self.years.contains(&date.year()) {
            extraction.out_of_range_rows += 1;
            return;
        }

        extraction.records.push(StationRecord {
            date,
            value,
            station: station.to_string(),
        });
    }

    fn parse_row(&self, line: &str) -> Option<(NaiveDate, Option<f64>)> {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();

        let year: i32 = parts.get(self.layout.year)?.parse().ok()?;
        let month: u32 = parts.get(self.layout.month)?.parse().ok()?;
        let day: u32 = parts.get(self.layout.day)?.parse().ok()?;
        let value = match parts.get(self.layout.value) {
            Some(field) => parse_cleaned_value(field).ok()?,
            None => None,
        };

        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some((date, value))
    }
}

/// Extract the records of every block matching `station_query`, limited to
/// `start_year..=end_year`, in document order.
///
/// A query with no ASCII letters or digits (e.g. `""` or `"--"`) matches no
/// block and yields nothing.
pub fn extract<I, S>(lines: I, station_query: &str, start_year: i32, end_year: i32) -> Vec<StationRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    StationBlockExtractor::new(station_query, start_year, end_year)
        .extract(lines)
        .into_records()
}
