//! Price file loading.
//!
//! Reads a delimited file with a header row into a [`PriceSeries`]. Columns
//! are located by name, case-insensitively, so extra columns (volume, adjusted
//! close, ...) are ignored.

use crate::error::DataError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use pbt_domain::entities::price_candle::PriceCandle;
use pbt_domain::entities::price_series::PriceSeries;
use pbt_domain::value_objects::price::Price;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

const TIMESTAMP_HEADERS: [&str; 4] = ["date", "timestamp", "time", "datetime"];

const NAIVE_DATETIME_FORMATS: [&str; 3] =
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Loads the price series stored at `path`.
///
/// # Errors
/// Returns an error if the file cannot be opened or any row is malformed.
pub fn load_price_series(path: impl AsRef<Path>) -> Result<PriceSeries, DataError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let series = read_price_series(file)?;
    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        info!(
            path = %path.display(),
            observations = series.len(),
            from = %first.timestamp,
            to = %last.timestamp,
            "Loaded price series"
        );
    } else {
        warn!(path = %path.display(), "Price file has no observations");
    }
    Ok(series)
}

/// Reads a price series from any delimited source.
///
/// # Errors
/// Returns an error on a missing column, an unparsable field or unordered
/// timestamps.
pub fn read_price_series<R: Read>(reader: R) -> Result<PriceSeries, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = Columns::from_headers(csv_reader.headers()?)?;

    let mut candles = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        candles.push(columns.parse(&record, line)?);
    }
    debug!(rows = candles.len(), "Parsed price rows");

    Ok(PriceSeries::new(candles)?)
}

/// Column indices of the fields a candle needs.
struct Columns {
    timestamp: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, DataError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.eq_ignore_ascii_case(name))
        };

        let timestamp = TIMESTAMP_HEADERS
            .iter()
            .find_map(|&name| find(name))
            .ok_or(DataError::MissingColumn("date"))?;

        Ok(Self {
            timestamp,
            open: find("open").ok_or(DataError::MissingColumn("open"))?,
            high: find("high").ok_or(DataError::MissingColumn("high"))?,
            low: find("low").ok_or(DataError::MissingColumn("low"))?,
            close: find("close").ok_or(DataError::MissingColumn("close"))?,
        })
    }

    fn parse(&self, record: &csv::StringRecord, line: u64) -> Result<PriceCandle, DataError> {
        let raw = record.get(self.timestamp).unwrap_or_default();
        let timestamp = parse_timestamp(raw).ok_or_else(|| DataError::InvalidField {
            line,
            column: "date",
            value: raw.to_string(),
        })?;

        Ok(PriceCandle::new(
            timestamp,
            parse_price(record, self.open, "open", line)?,
            parse_price(record, self.high, "high", line)?,
            parse_price(record, self.low, "low", line)?,
            parse_price(record, self.close, "close", line)?,
        ))
    }
}

fn parse_price(
    record: &csv::StringRecord,
    index: usize,
    column: &'static str,
    line: u64,
) -> Result<Price, DataError> {
    let raw = record.get(index).unwrap_or_default();
    match Decimal::from_str(raw) {
        Ok(value) if !value.is_sign_negative() => Ok(Price::new(value)),
        _ => Err(DataError::InvalidField {
            line,
            column,
            value: raw.to_string(),
        }),
    }
}

/// Parses RFC 3339, `YYYY-MM-DD[ HH:MM[:SS]]` or Unix seconds, as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|ts| ts.and_utc());
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}
