//! Tide table scraping
//!
//! Tide pages list one row per day: month, day, then alternating time/height
//! cells (`MM DD HHMM value HHMM value ...`). Times may drop the leading zero
//! (`630` for 06:30).
use chrono::{NaiveDate, NaiveDateTime};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Error, Debug)]
pub enum TideParseError {
    #[error("Invalid CSS selector '{selector}': {msg}")]
    InvalidSelector { selector: String, msg: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TideReading {
    pub datetime: NaiveDateTime,
    /// Height cell as printed on the page
    pub value: String,
}

fn parse_selector(selector: &str) -> Result<Selector, TideParseError> {
    Selector::parse(selector).map_err(|e| TideParseError::InvalidSelector {
        selector: selector.to_string(),
        msg: e.to_string(),
    })
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Parse every row matched by `row_selector`, reading cells with `col_selector`
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn parse_tide_table(
    html: &str,
    row_selector: &str,
    col_selector: &str,
    year: i32,
) -> Result<Vec<TideReading>, TideParseError> {
    let rows = parse_selector(row_selector)?;
    let cols = parse_selector(col_selector)?;
    let document = Html::parse_document(html);

    let mut readings = Vec::new();
    for row in document.select(&rows) {
        let cells: Vec<String> = row.select(&cols).map(cell_text).collect();
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        debug!("Row: {}", cells.join(" "));
        readings.extend(parse_row(&cells, year));
    }

    debug!("Parsed {} tide readings", readings.len());
    Ok(readings)
}

fn parse_row(cells: &[String], year: i32) -> Vec<TideReading> {
    let (Some(Ok(month)), Some(Ok(day))) = (
        cells.first().map(|c| c.parse::<u32>()),
        cells.get(1).map(|c| c.parse::<u32>()),
    ) else {
        return Vec::new();
    };

    let mut readings = Vec::new();
    for i in (2..cells.len()).step_by(2) {
        let Some(time) = parse_time(&cells[i]) else {
            continue;
        };
        let Some(datetime) = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(time.0, time.1, 0))
        else {
            continue;
        };
        readings.push(TideReading {
            datetime,
            value: cells.get(i + 1).cloned().unwrap_or_default(),
        });
    }
    readings
}

/// `HHMM` or `HMM` digits (anything else in the cell is ignored)
fn parse_time(cell: &str) -> Option<(u32, u32)> {
    let digits: String = cell.chars().filter(|c| c.is_ascii_digit()).collect();
    let digits = match digits.len() {
        3 => format!("0{digits}"),
        4 => digits,
        _ => return None,
    };
    let hour = digits[..2].parse().ok()?;
    let minute = digits[2..].parse().ok()?;
    Some((hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body><table id="tides">
          <tr><th>Month</th><th>Day</th><th>Time</th><th>Height</th></tr>
          <tr><td>01</td><td>02</td><td>0630</td><td>1.8</td><td>1245</td><td>0.6</td></tr>
          <tr><td>1</td><td>3</td><td>705</td><td>1.7</td><td></td><td></td><td>2515</td><td>0.1</td></tr>
          <tr><td>2</td><td>30</td><td>0800</td><td>1.2</td></tr>
          <tr><td></td><td></td></tr>
        </table></body></html>
    "#;

    #[test]
    fn test_parse_tide_table() {
        let readings = parse_tide_table(PAGE, "#tides tr", "td", 2024).unwrap();

        assert_eq!(readings.len(), 3);
        assert_eq!(
            readings[0].datetime,
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(6, 30, 0)
                .unwrap()
        );
        assert_eq!(readings[0].value, "1.8");
        assert_eq!(readings[1].value, "0.6");
        assert_eq!(readings[2].datetime.format("%Y-%m-%d %H:%M").to_string(), "2024-01-03 07:05");
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("0630"), Some((6, 30)));
        assert_eq!(parse_time("630"), Some((6, 30)));
        assert_eq!(parse_time("6:30"), Some((6, 30)));
        assert_eq!(parse_time("63"), None);
        assert_eq!(parse_time(""), None);
    }

    #[test]
    fn test_invalid_selector() {
        let result = parse_tide_table(PAGE, "tr[", "td", 2024);
        assert!(matches!(result, Err(TideParseError::InvalidSelector { .. })));
    }
}
