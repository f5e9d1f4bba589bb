//! Date validation for caller-supplied filter values.
//!
//! Dates are accepted only in the zero-padded `YYYY-MM-DD` form. Stored sale
//! dates use the same form, so range filters can compare them as text.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::{QueryError, QueryResult};

/// Format accepted for every date parameter.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Check whether `value` is a real calendar date in `YYYY-MM-DD` form.
pub fn is_valid_date(value: &str) -> bool {
    parse_date(value).is_some()
}

/// Return `value` unchanged if it is a valid date.
pub fn require_valid_date(value: &str) -> QueryResult<&str> {
    if is_valid_date(value) {
        Ok(value)
    } else {
        Err(QueryError::InvalidDate {
            value: value.to_string(),
        })
    }
}

/// Parse a date parameter, keeping the original text alongside it.
pub(crate) fn parse_date_param(value: &str) -> QueryResult<DateParam> {
    let date = parse_date(value).ok_or_else(|| QueryError::InvalidDate {
        value: value.to_string(),
    })?;
    Ok(DateParam {
        text: value.to_string(),
        date,
    })
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if !DATE_SHAPE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// A validated date parameter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateParam {
    text: String,
    date: NaiveDate,
}

impl DateParam {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}
