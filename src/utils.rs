// Utility functions
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

/// Parses a `YYYY-MM-DD` date as midnight in `tz`.
pub fn parse_iso_date(date_str: &str, tz: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    parse_date_in(date_str, "%Y-%m-%d", tz)
}

/// Parses a `2023年5月1日` style date as midnight in `tz`.
pub fn parse_cn_date(date_str: &str, tz: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    parse_date_in(date_str, "%Y年%m月%d日", tz)
}

fn parse_date_in(date_str: &str, fmt: &str, tz: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    let date = NaiveDate::parse_from_str(date_str.trim(), fmt).ok()?;
    tz.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).single()
}

/// Splits a metadata value into labels on ASCII space, dropping empty pieces.
pub fn split_labels(value: &str) -> Vec<String> {
    value
        .split(' ')
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collapses runs of whitespace left over from HTML text nodes.
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
