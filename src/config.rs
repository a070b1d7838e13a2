use std::env;
use std::fmt;

pub const DEFAULT_START_YEAR: i32 = 2010;
pub const DEFAULT_END_YEAR: i32 = 2025;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Required configuration value {0} is not set")]
    Missing(&'static str),
    #[error("Invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
    #[error("Start year {start} is after end year {end}")]
    InvertedRange { start: i32, end: i32 },
    #[error("Station query '{0}' has no letters or digits to match on")]
    EmptyStationQuery(String),
}

/// Which HKO station-block dump a tool works on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Wind,
    Rainfall,
}

impl Dataset {
    pub fn url_var(self) -> &'static str {
        match self {
            Dataset::Wind => "WIND_URL",
            Dataset::Rainfall => "RAINFALL_URL",
        }
    }

    pub fn station_var(self) -> &'static str {
        match self {
            Dataset::Wind => "WIND_STATION_NAME",
            Dataset::Rainfall => "RAINFALL_STATION_NAME",
        }
    }

    pub fn default_url(self) -> &'static str {
        match self {
            Dataset::Wind => "https://data.weather.gov.hk/cis/csvfile/SE/ALL/daily_SE_WSPD_ALL.csv",
            Dataset::Rainfall => {
                "https://data.weather.gov.hk/weatherAPI/cis/csvfile/SE/ALL/daily_SE_RF_ALL.csv"
            }
        }
    }

    pub fn default_station(self) -> &'static str {
        match self {
            Dataset::Wind => "KaiTak",
            Dataset::Rainfall => "Kaitak",
        }
    }

    /// File name the raw dump is cached under
    pub fn cache_name(self) -> &'static str {
        match self {
            Dataset::Wind => "daily_SE_WSPD_ALL.csv",
            Dataset::Rainfall => "daily_SE_RF_ALL.csv",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Wind => write!(f, "wind"),
            Dataset::Rainfall => write!(f, "rainfall"),
        }
    }
}

/// Validated settings for one fetch → extract run
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub dataset: Dataset,
    pub source_url: String,
    pub station_query: String,
    pub start_year: i32,
    pub end_year: i32,
}

impl Config {
    pub fn new(
        dataset: Dataset,
        source_url: impl Into<String>,
        station_query: impl Into<String>,
        start_year: i32,
        end_year: i32,
    ) -> Result<Self, ConfigError> {
        let source_url = source_url.into();
        let station_query = station_query.into();

        if source_url.trim().is_empty() {
            return Err(ConfigError::Missing(dataset.url_var()));
        }
        if crate::utils::normalize_station_name(&station_query).is_empty() {
            return Err(ConfigError::EmptyStationQuery(station_query));
        }
        if start_year > end_year {
            return Err(ConfigError::InvertedRange {
                start: start_year,
                end: end_year,
            });
        }

        Ok(Config {
            dataset,
            source_url,
            station_query,
            start_year,
            end_year,
        })
    }

    /// Load from the process environment, falling back to the HKO default URL
    pub fn from_env(dataset: Dataset) -> Result<Self, ConfigError> {
        Self::from_lookup(dataset, false, |name| env::var(name).ok())
    }

    /// Load from the process environment; the source URL must be set explicitly
    pub fn from_env_strict(dataset: Dataset) -> Result<Self, ConfigError> {
        Self::from_lookup(dataset, true, |name| env::var(name).ok())
    }

    pub fn from_lookup<F>(dataset: Dataset, require_url: bool, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let source_url = match non_empty(dataset.url_var()) {
            Some(url) => url,
            None if require_url => return Err(ConfigError::Missing(dataset.url_var())),
            None => dataset.default_url().to_string(),
        };
        let station_query = non_empty(dataset.station_var())
            .unwrap_or_else(|| dataset.default_station().to_string());
        let start_year = parse_year("START_YEAR", non_empty("START_YEAR"), DEFAULT_START_YEAR)?;
        let end_year = parse_year("END_YEAR", non_empty("END_YEAR"), DEFAULT_END_YEAR)?;

        Self::new(dataset, source_url, station_query, start_year, end_year)
    }

    pub fn year_range(&self) -> std::ops::RangeInclusive<i32> {
        self.start_year..=self.end_year
    }
}

fn parse_year(name: &'static str, value: Option<String>, default: i32) -> Result<i32, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(Dataset::Wind, false, lookup_from(&[])).unwrap();
        assert_eq!(config.source_url, Dataset::Wind.default_url());
        assert_eq!(config.station_query, "KaiTak");
        assert_eq!(config.year_range(), 2010..=2025);
    }

    #[test]
    fn test_values_from_lookup() {
        let config = Config::from_lookup(
            Dataset::Rainfall,
            true,
            lookup_from(&[
                ("RAINFALL_URL", "http://example.test/rf.csv"),
                ("RAINFALL_STATION_NAME", "Sha Tin"),
                ("START_YEAR", "2015"),
                ("END_YEAR", " 2016 "),
            ]),
        )
        .unwrap();

        assert_eq!(config.source_url, "http://example.test/rf.csv");
        assert_eq!(config.station_query, "Sha Tin");
        assert_eq!(config.start_year, 2015);
        assert_eq!(config.end_year, 2016);
    }

    #[test]
    fn test_strict_requires_url() {
        let result = Config::from_lookup(Dataset::Rainfall, true, lookup_from(&[]));
        assert_eq!(result, Err(ConfigError::Missing("RAINFALL_URL")));
    }

    #[test]
    fn test_blank_url_counts_as_missing() {
        let result =
            Config::from_lookup(Dataset::Wind, true, lookup_from(&[("WIND_URL", "   ")]));
        assert_eq!(result, Err(ConfigError::Missing("WIND_URL")));
    }

    #[test]
    fn test_invalid_year() {
        let result =
            Config::from_lookup(Dataset::Wind, false, lookup_from(&[("START_YEAR", "twenty")]));
        assert_eq!(
            result,
            Err(ConfigError::Invalid {
                name: "START_YEAR",
                value: "twenty".to_string()
            })
        );
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = Config::new(Dataset::Wind, "http://x", "KaiTak", 2020, 2010);
        assert_eq!(
            result,
            Err(ConfigError::InvertedRange {
                start: 2020,
                end: 2010
            })
        );
    }

    #[test]
    fn test_query_without_alphanumerics_rejected() {
        let result = Config::new(Dataset::Wind, "http://x", " - ", 2010, 2010);
        assert!(matches!(result, Err(ConfigError::EmptyStationQuery(_))));
    }

    #[test]
    fn test_error_messages_name_variable() {
        assert!(ConfigError::Missing("RAINFALL_URL")
            .to_string()
            .contains("RAINFALL_URL"));
    }
}
