//! Utility functions for display formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{
    contains_ignore_case, escape_html, format_currency, format_currency_with, format_long_date,
    format_percentage, format_timestamp, format_weekday_date, parse_date, round_half_up, Amount,
    DEFAULT_CURRENCY,
};
