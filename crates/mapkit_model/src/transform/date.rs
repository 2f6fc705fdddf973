use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Number, Value};

use super::Transform;

// -----------------------------------------------------------------------------
// DateTransform

/// Unix timestamps in seconds, possibly fractional.
///
/// Accepts numbers and numeric strings; encodes as a number.
///
/// ```
/// use mapkit_model::transform::{DateTransform, Transform};
/// use serde_json::json;
///
/// let date = DateTransform.from_document(&json!("1700000000.5")).unwrap();
/// assert_eq!(date.timestamp(), 1_700_000_000);
/// assert_eq!(DateTransform.to_document(&date), Some(json!(1700000000.5)));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTransform;

impl DateTransform {
    fn from_seconds(seconds: f64) -> Option<DateTime<Utc>> {
        if !seconds.is_finite() {
            return None;
        }
        let whole = seconds.floor();
        let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
        DateTime::from_timestamp(whole as i64, nanos)
    }
}

impl Transform for DateTransform {
    type Object = DateTime<Utc>;

    fn from_document(&self, value: &Value) -> Option<DateTime<Utc>> {
        let seconds = match value {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        Self::from_seconds(seconds)
    }

    fn to_document(&self, date: &DateTime<Utc>) -> Option<Value> {
        let seconds = date.timestamp() as f64 + f64::from(date.timestamp_subsec_nanos()) / 1e9;
        Number::from_f64(seconds).map(Value::Number)
    }
}

// -----------------------------------------------------------------------------
// DateFormatTransform

/// Dates as strings in a `chrono` format.
///
/// Decoding tries a full date-time with offset first, then a naive date-time
/// and finally a bare date, all read as UTC.
///
/// ```
/// use mapkit_model::transform::{DateFormatTransform, Transform};
/// use serde_json::json;
///
/// let t = DateFormatTransform::custom("%Y-%m-%d");
/// let date = t.from_document(&json!("2024-02-29")).unwrap();
/// assert_eq!(t.to_document(&date), Some(json!("2024-02-29")));
/// ```
#[derive(Debug, Clone)]
pub struct DateFormatTransform {
    format: Cow<'static, str>,
}

impl DateFormatTransform {
    pub const ISO8601: &'static str = "%Y-%m-%dT%H:%M:%S%:z";

    pub fn new(format: impl Into<Cow<'static, str>>) -> Self {
        Self {
            format: format.into(),
        }
    }

    /// `2024-05-01T12:30:00+00:00`.
    pub const fn iso8601() -> Self {
        Self {
            format: Cow::Borrowed(Self::ISO8601),
        }
    }

    pub fn custom(format: &str) -> Self {
        Self::new(String::from(format))
    }

    pub fn format(&self) -> &str {
        &self.format
    }
}

impl Transform for DateFormatTransform {
    type Object = DateTime<Utc>;

    fn from_document(&self, value: &Value) -> Option<DateTime<Utc>> {
        let text = value.as_str()?;
        let format = self.format.as_ref();

        if let Ok(date) = DateTime::parse_from_str(text, format) {
            return Some(date.with_timezone(&Utc));
        }
        if let Ok(date) = NaiveDateTime::parse_from_str(text, format) {
            return Some(date.and_utc());
        }
        NaiveDate::parse_from_str(text, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|date| date.and_utc())
    }

    fn to_document(&self, date: &DateTime<Utc>) -> Option<Value> {
        let mut out = String::new();
        // Invalid format strings fail here instead of panicking.
        write!(out, "{}", date.format(&self.format)).ok()?;
        Some(Value::String(out))
    }
}

// -----------------------------------------------------------------------------
// Tests
