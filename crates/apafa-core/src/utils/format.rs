use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Currency symbol used when none is given (Peruvian sol)
pub const DEFAULT_CURRENCY: &str = "S/";

const MONTHS: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio",
    "julio", "agosto", "septiembre", "octubre", "noviembre", "diciembre",
];

const WEEKDAYS: [&str; 7] = [
    "lunes", "martes", "miércoles", "jueves", "viernes", "sábado", "domingo",
];

/// A value that may or may not be a usable number.
///
/// JSON numbers and Rust numbers are numeric; strings, nulls and other JSON
/// values are not. NaN and infinities count as non-numeric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amount(Option<f64>);

impl Amount {
    pub fn value(self) -> Option<f64> {
        self.0.filter(|v| v.is_finite())
    }
}

macro_rules! amount_from_number {
    ($($t:ty),*) => {
        $(impl From<$t> for Amount {
            fn from(v: $t) -> Self {
                Amount(Some(v as f64))
            }
        })*
    };
}

amount_from_number!(f64, f32, i32, i64, u32, u64, usize);

impl From<Option<f64>> for Amount {
    fn from(v: Option<f64>) -> Self {
        Amount(v)
    }
}

impl From<&Value> for Amount {
    fn from(v: &Value) -> Self {
        match v {
            Value::String(s) => Amount::from(s.as_str()),
            other => Amount(other.as_f64()),
        }
    }
}

impl From<&str> for Amount {
    fn from(_: &str) -> Self {
        Amount(None)
    }
}

/// Decodes any JSON value; only JSON numbers are numeric
impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Amount::from(&value))
    }
}

/// Format an amount with the default currency symbol, e.g. `S/ 1,234.50`
pub fn format_currency(amount: impl Into<Amount>) -> String {
    format_currency_with(amount, DEFAULT_CURRENCY)
}

/// Format an amount with two decimals and comma thousands grouping
pub fn format_currency_with(amount: impl Into<Amount>, symbol: &str) -> String {
    match amount.into().value() {
        Some(v) => format!("{} {}", symbol, group_thousands(v, 2)),
        None => format!("{} 0.00", symbol),
    }
}

/// Format a percentage with one decimal, e.g. `12.3%`
pub fn format_percentage(value: impl Into<Amount>) -> String {
    match value.into().value() {
        Some(v) => format!("{:.1}%", round_half_up(v, 1)),
        None => "0.0%".to_string(),
    }
}

/// Round to `decimals` places with ties away from zero.
/// `format!` alone rounds exact ties to even (`1.125` -> `1.12`).
pub fn round_half_up(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

fn group_thousands(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, round_half_up(value, decimals as u32).abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    // Values that round to zero print without a sign
    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Parse the date formats found in the fixtures.
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` and RFC 3339 timestamps.
pub fn parse_date(date: &str) -> Option<NaiveDateTime> {
    let date = date.trim();
    if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    DateTime::parse_from_rfc3339(date).ok().map(|dt| dt.naive_local())
}

/// Long Spanish date, e.g. `15 de enero de 2026`.
/// Unparseable input is returned unchanged.
pub fn format_long_date(date: &str) -> String {
    match parse_date(date) {
        Some(dt) => format!("{} de {} de {}", dt.day(), MONTHS[dt.month0() as usize], dt.year()),
        None => date.to_string(),
    }
}

/// Long Spanish date with weekday, e.g. `jueves, 15 de enero de 2026`
pub fn format_weekday_date(date: &str) -> String {
    match parse_date(date) {
        Some(dt) => format!(
            "{}, {}",
            WEEKDAYS[dt.weekday().num_days_from_monday() as usize],
            format_long_date(date)
        ),
        None => date.to_string(),
    }
}

/// Day-first timestamp, e.g. `18/10/2026, 14:03:05`
pub fn format_timestamp(dt: NaiveDateTime) -> String {
    dt.format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// Escape text for interpolation into HTML content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Case-insensitive substring check
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.5), "S/ 1,234.50");
        assert_eq!(format_currency(0), "S/ 0.00");
        assert_eq!(format_currency(150), "S/ 150.00");
        assert_eq!(format_currency(1234567.891), "S/ 1,234,567.89");
        assert_eq!(format_currency(-42.5), "S/ -42.50");
        assert_eq!(format_currency_with(99.999, "$"), "$ 100.00");
    }

    #[test]
    fn test_format_currency_non_numeric() {
        assert_eq!(format_currency(f64::NAN), "S/ 0.00");
        assert_eq!(format_currency(f64::INFINITY), "S/ 0.00");
        assert_eq!(format_currency("150"), "S/ 0.00");
        assert_eq!(format_currency(&json!(null)), "S/ 0.00");
        assert_eq!(format_currency(&json!(25)), "S/ 25.00");
        assert_eq!(format_currency_with(None::<f64>, "US$"), "US$ 0.00");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(12.345), "12.3%");
        assert_eq!(format_percentage(100), "100.0%");
        assert_eq!(format_percentage(0.05), "0.1%");
        assert_eq!(format_percentage("x"), "0.0%");
        assert_eq!(format_percentage(f64::NAN), "0.0%");
        assert_eq!(format_percentage(&json!("12")), "0.0%");
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(format_percentage(62.25), "62.3%");
        assert_eq!(format_percentage(-62.25), "-62.3%");
        assert_eq!(format_currency(1.125), "S/ 1.13");
        assert_eq!(format_currency(2.5), "S/ 2.50");
        assert_eq!(format_currency(-1.125), "S/ -1.13");
        assert_eq!(round_half_up(12.5, 0), 13.0);
        assert_eq!(round_half_up(0.5, 0), 1.0);
        assert_eq!(round_half_up(f64::MAX, 2), f64::MAX);
    }

    #[test]
    fn test_amount_from_json() {
        let amounts: Vec<Amount> = serde_json::from_str(r#"[25, 1.5, "25", null, true]"#).unwrap();
        let values: Vec<Option<f64>> = amounts.into_iter().map(Amount::value).collect();
        assert_eq!(values, vec![Some(25.0), Some(1.5), None, None, None]);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(999.0, 2), "999.00");
        assert_eq!(group_thousands(1000.0, 2), "1,000.00");
        assert_eq!(group_thousands(100000.0, 0), "100,000");
        assert_eq!(group_thousands(-0.001, 2), "0.00");
    }

    #[test]
    fn test_parse_date() {
        let d = parse_date("2026-01-15").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2026, 1, 15));
        assert!(parse_date("2026-03-02T18:30:00").is_some());
        assert!(parse_date("2026-03-02T18:30:00-05:00").is_some());
        assert!(parse_date("mañana").is_none());
    }

    #[test]
    fn test_format_long_date() {
        assert_eq!(format_long_date("2026-01-15"), "15 de enero de 2026");
        assert_eq!(format_long_date("2025-12-01T10:00:00"), "1 de diciembre de 2025");
        assert_eq!(format_long_date("por definir"), "por definir");
        assert_eq!(format_weekday_date("2026-01-15"), "jueves, 15 de enero de 2026");
    }

    #[test]
    fn test_format_timestamp() {
        let dt = parse_date("2026-10-18T14:03:05").unwrap();
        assert_eq!(format_timestamp(dt), "18/10/2026, 14:03:05");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
        assert_eq!(escape_html("Comité APAFA"), "Comité APAFA");
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Cuota APAFA 2026", "apafa"));
        assert!(!contains_ignore_case("Biblioteca", "apafa"));
    }
}
