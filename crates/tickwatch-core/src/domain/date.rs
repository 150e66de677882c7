use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

use crate::ValidationError;

const DATE_FORMAT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Calendar date serialized as `YYYY-MM-DD`.
///
/// Daily bars, watchlist entries, and the date pickers all deal in whole
/// days, so this wraps `time::Date` rather than a full timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(Date);

impl CalendarDate {
    pub fn today_utc() -> Self {
        Self(OffsetDateTime::now_utc().date())
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input.trim(), DATE_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    pub fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub fn into_inner(self) -> Date {
        self.0
    }

    /// 365 days earlier; the default trailing window start.
    pub fn one_year_earlier(self) -> Self {
        Self(self.0 - Duration::days(365))
    }

    pub fn next_day(self) -> Self {
        Self(self.0 + Duration::days(1))
    }

    /// Unix timestamp of midnight UTC on this date.
    pub fn unix_range_start(self) -> i64 {
        self.0.midnight().assume_utc().unix_timestamp()
    }

    /// Unix timestamp of midnight UTC the following day, so a
    /// `[start, end)` pair covers the whole final day.
    pub fn unix_range_end(self) -> i64 {
        self.next_day().unix_range_start()
    }

    pub fn format_iso(self) -> String {
        // Formatting a valid Date with a literal-only description cannot fail.
        self.0.format(DATE_FORMAT).unwrap_or_default()
    }
}

impl Display for CalendarDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
