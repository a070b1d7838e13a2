/// Shared text helpers for station CSV dumps
///
/// Normalize a station label or query for fuzzy matching.
///
/// Every character that is not an ASCII letter or digit is removed and the rest
/// is lowercased, so "Kai Tak", "KAI-TAK" and "Kaitak" all compare equal.
///
/// # Examples
///
/// ```
/// use hko_station_data::utils::normalize_station_name;
///
/// assert_eq!(normalize_station_name("Kai Tak"), "kaitak");
/// assert_eq!(normalize_station_name("Mean Wind Speed (km/h) - Kai Tak"), "meanwindspeedkmhkaitak");
/// assert_eq!(normalize_station_name("  "), "");
/// ```
pub fn normalize_station_name(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Keep only the characters that can appear in a plain decimal number.
///
/// HKO dumps decorate values with flags (`"12.3#"`, `"***"`, `"Trace"`); the
/// cleaned string is what gets handed to the float parser.
///
/// # Examples
///
/// ```
/// use hko_station_data::utils::clean_numeric;
///
/// assert_eq!(clean_numeric("12.3#"), "12.3");
/// assert_eq!(clean_numeric("65%"), "65");
/// assert_eq!(clean_numeric("ND"), "");
/// ```
pub fn clean_numeric(value: &str) -> String {
    numeric_noise().replace_all(value, "").into_owned()
}

/// Clean a value field and parse it.
///
/// Returns `Ok(None)` when nothing numeric is left (absent value) and `Err`
/// when the cleaned text is still not a number (for example `"1.2.3"`).
///
/// # Examples
///
/// ```
/// use hko_station_data::utils::parse_cleaned_value;
///
/// assert_eq!(parse_cleaned_value("12.3 C").unwrap(), Some(12.3));
/// assert_eq!(parse_cleaned_value("***").unwrap(), None);
/// assert!(parse_cleaned_value("1.2.3").is_err());
/// ```
pub fn parse_cleaned_value(value: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let cleaned = clean_numeric(value);
    if cleaned.is_empty() {
        return Ok(None);
    }
    cleaned.parse::<f64>().map(Some)
}

fn numeric_noise() -> &'static regex::Regex {
    static NOISE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    NOISE.get_or_init(|| regex::Regex::new(r"[^0-9.\-]").expect("static pattern is valid"))
}

/// Format an optional value with fixed precision, empty string when absent.
pub fn format_optional(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{v:.precision$}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ignores_case_and_punctuation() {
        assert_eq!(normalize_station_name("Kai Tak"), normalize_station_name("KaiTak"));
        assert_eq!(normalize_station_name("kai-tak."), "kaitak");
    }

    #[test]
    fn test_normalize_drops_non_ascii() {
        assert_eq!(normalize_station_name("啟德 Kai Tak"), "kaitak");
    }

    #[test]
    fn test_clean_numeric_keeps_sign_and_decimal() {
        assert_eq!(clean_numeric(" -0.5 "), "-0.5");
        assert_eq!(clean_numeric("1,234"), "1234");
    }

    #[test]
    fn test_parse_cleaned_value_absent() {
        assert_eq!(parse_cleaned_value("").unwrap(), None);
        assert_eq!(parse_cleaned_value("Trace").unwrap(), None);
    }

    #[test]
    fn test_parse_cleaned_value_unparseable() {
        assert!(parse_cleaned_value("-").is_err());
        assert!(parse_cleaned_value("..").is_err());
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(Some(12.345), 1), "12.3");
        assert_eq!(format_optional(Some(10.0), 2), "10.00");
        assert_eq!(format_optional(None, 1), "");
    }
}
