use chrono::{Datelike, Days, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use log::info;

use crate::errors::{DashboardError, Result};

// 日期转换工具

/// Proleptic Gregorian ordinal, 0001-01-01 is day 1.
pub fn date_to_ordinal(date: NaiveDate) -> i64 {
    date.num_days_from_ce() as i64
}

/// 日期加若干天，溢出时返回 `None`
pub fn add_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(days))
}

/// Calendar date of a unix timestamp in the exchange's local time.
///
/// The IANA zone name wins when it parses; otherwise the raw GMT offset is
/// applied, and UTC is the last resort.
pub fn timestamp_to_exchange_date(
    ts: i64,
    tz_name: Option<&str>,
    gmt_offset: Option<i64>,
) -> Result<NaiveDate> {
    let utc = Utc
        .timestamp_opt(ts, 0)
        .single()
        .ok_or_else(|| DashboardError::MarketData(format!("Invalid timestamp: {}", ts)))?;

    if let Some(tz) = tz_name.and_then(|name| name.parse::<Tz>().ok()) {
        return Ok(utc.with_timezone(&tz).date_naive());
    }

    let shifted = match gmt_offset {
        Some(offset) => utc + chrono::Duration::seconds(offset),
        None => utc,
    };
    Ok(shifted.date_naive())
}

// 限制新闻条数
pub fn limit_articles<T>(articles: &mut Vec<T>, max_articles: usize, ticker: &str) {
    if articles.len() > max_articles {
        info!("Limiting {} articles to {} for {}", articles.len(), max_articles, ticker);
        articles.truncate(max_articles);
    }
}

/// Formats with thousands separators and no decimals: `1234567.4` -> `1,234,567`.
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if negative {
        format!("-{}", out)
    } else {
        out
    }
}
