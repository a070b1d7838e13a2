use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::station_block::StationRecord;

/// A dated value with the station label dropped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyValue {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl DailyValue {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

impl From<&StationRecord> for DailyValue {
    fn from(record: &StationRecord) -> Self {
        Self::new(record.date, record.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    /// Sum of the month's rainfall, absent days counted as zero
    pub rainfall_total_mm: f64,
    /// Mean of the month's present wind values; `None` if there were none
    pub wind_mean: Option<f64>,
}

type MonthKey = (i32, u32);

fn month_key(date: NaiveDate) -> MonthKey {
    (date.year(), date.month())
}

/// Rainfall summed per month; only months that appear in `rain` get an entry
pub fn monthly_rainfall_totals(rain: &[DailyValue]) -> BTreeMap<MonthKey, f64> {
    let mut totals: BTreeMap<MonthKey, f64> = BTreeMap::new();
    for day in rain {
        *totals.entry(month_key(day.date)).or_default() += day.value.unwrap_or(0.0);
    }
    totals
}

/// Mean of present wind values per month; months with only absent values have no entry
pub fn monthly_wind_means(wind: &[DailyValue]) -> BTreeMap<MonthKey, f64> {
    let mut sums: BTreeMap<MonthKey, (f64, usize)> = BTreeMap::new();
    for day in wind {
        if let Some(v) = day.value {
            let entry = sums.entry(month_key(day.date)).or_default();
            entry.0 += v;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(key, (sum, count))| (key, sum / count as f64))
        .collect()
}

/// One row per calendar month from January of the earliest year to December of
/// the latest year seen in either input, gaps included.
pub fn aggregate_monthly(wind: &[DailyValue], rain: &[DailyValue]) -> Vec<MonthlySummary> {
    let years = wind.iter().chain(rain).map(|d| d.date.year());
    let (Some(first), Some(last)) = (years.clone().min(), years.max()) else {
        return Vec::new();
    };
    aggregate_monthly_over(wind, rain, first..=last)
}

/// Same as [`aggregate_monthly`] over a fixed span of years; values outside
/// `years` are ignored.
pub fn aggregate_monthly_over(
    wind: &[DailyValue],
    rain: &[DailyValue],
    years: RangeInclusive<i32>,
) -> Vec<MonthlySummary> {
    let wind_means = monthly_wind_means(wind);
    let rain_totals = monthly_rainfall_totals(rain);

    let summaries: Vec<MonthlySummary> = years
        .clone()
        .flat_map(|year| (1..=12).map(move |month| (year, month)))
        .map(|key| MonthlySummary {
            year: key.0,
            month: key.1,
            rainfall_total_mm: normalize_zero(rain_totals.get(&key).copied().unwrap_or(0.0)),
            wind_mean: wind_means.get(&key).copied(),
        })
        .collect();

    debug!(
        "Aggregated {} wind and {} rain days into {} months ({}-{})",
        wind.len(),
        rain.len(),
        summaries.len(),
        years.start(),
        years.end()
    );
    summaries
}

/// Whole-period figures for the summary image
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeriodSummary {
    pub mean_wind: Option<f64>,
    pub total_rain: Option<f64>,
}

impl PeriodSummary {
    pub fn from_series(wind: &[DailyValue], rain: &[DailyValue]) -> Self {
        let present: Vec<f64> = wind.iter().filter_map(|d| d.value).collect();
        let mean_wind = if present.is_empty() {
            None
        } else {
            Some(present.iter().sum::<f64>() / present.len() as f64)
        };

        let total_rain = if rain.is_empty() {
            None
        } else {
            Some(normalize_zero(rain.iter().map(|d| d.value.unwrap_or(0.0)).sum()))
        };

        Self {
            mean_wind,
            total_rain,
        }
    }
}

fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0 // Converts both 0.0 and -0.0 to 0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32, value: Option<f64>) -> DailyValue {
        DailyValue::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), value)
    }

    #[test]
    fn test_rainfall_totals_treat_absent_as_zero() {
        let rain = vec![
            day(2020, 1, 1, Some(1.5)),
            day(2020, 1, 2, None),
            day(2020, 1, 3, Some(2.0)),
            day(2020, 2, 1, Some(0.5)),
        ];
        let totals = monthly_rainfall_totals(&rain);
        assert_eq!(totals.get(&(2020, 1)), Some(&3.5));
        assert_eq!(totals.get(&(2020, 2)), Some(&0.5));
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn test_wind_means_exclude_absent() {
        let wind = vec![
            day(2020, 1, 1, Some(10.0)),
            day(2020, 1, 2, None),
            day(2020, 1, 3, Some(20.0)),
            day(2020, 2, 1, None),
        ];
        let means = monthly_wind_means(&wind);
        assert_eq!(means.get(&(2020, 1)), Some(&15.0));
        assert_eq!(means.get(&(2020, 2)), None);
    }

    #[test]
    fn test_aggregate_spans_full_years() {
        let wind = vec![day(2019, 6, 1, Some(8.0))];
        let rain = vec![day(2020, 3, 1, Some(4.0))];

        let months = aggregate_monthly(&wind, &rain);
        assert_eq!(months.len(), 24);
        assert_eq!((months[0].year, months[0].month), (2019, 1));
        assert_eq!((months[23].year, months[23].month), (2020, 12));

        let june = &months[5];
        assert_eq!(june.wind_mean, Some(8.0));
        assert_eq!(june.rainfall_total_mm, 0.0);

        let march = &months[14];
        assert_eq!((march.year, march.month), (2020, 3));
        assert_eq!(march.rainfall_total_mm, 4.0);
        assert_eq!(march.wind_mean, None);
    }

    #[test]
    fn test_absent_only_rows_still_extend_span() {
        let wind = vec![day(2018, 1, 1, None)];
        let rain = vec![day(2019, 1, 1, Some(1.0))];
        let months = aggregate_monthly(&wind, &rain);
        assert_eq!(months.first().map(|m| m.year), Some(2018));
        assert!(months.iter().all(|m| m.wind_mean.is_none()));
    }

    #[test]
    fn test_aggregate_over_config_years() {
        let rain = vec![day(2009, 12, 31, Some(9.0)), day(2011, 2, 1, Some(2.5))];
        let months = aggregate_monthly_over(&[], &rain, 2010..=2011);

        assert_eq!(months.len(), 24);
        assert!(months[..12].iter().all(|m| m.rainfall_total_mm == 0.0));
        assert_eq!((months[13].year, months[13].month), (2011, 2));
        assert_eq!(months[13].rainfall_total_mm, 2.5);
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate_monthly(&[], &[]).is_empty());
    }

    #[test]
    fn test_period_summary() {
        let wind = vec![day(2020, 1, 1, Some(10.0)), day(2020, 1, 2, None), day(2020, 1, 3, Some(14.0))];
        let rain = vec![day(2020, 1, 1, Some(1.0)), day(2020, 1, 2, None)];
        let summary = PeriodSummary::from_series(&wind, &rain);
        assert_eq!(summary.mean_wind, Some(12.0));
        assert_eq!(summary.total_rain, Some(1.0));
    }

    #[test]
    fn test_period_summary_without_data() {
        let summary = PeriodSummary::from_series(&[day(2020, 1, 1, None)], &[]);
        assert_eq!(summary, PeriodSummary::default());
    }
}
