use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The closed set of offices attendees can be grouped by.
///
/// Offices serialize as their bare names since they become object keys
/// in the request payload.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Office {
    London,
    Paris,
    Singapore,
    Mumbai,
    Dubai,
    Shanghai,
    Zurich,
    Geneva,
    Aarhus,
    Sydney,
    Budapest,
    Wroclaw,
}

impl Office {
    /// Every office, in the order the selection form lists them.
    pub const ALL: [Office; 12] = [
        Office::London,
        Office::Paris,
        Office::Singapore,
        Office::Mumbai,
        Office::Dubai,
        Office::Shanghai,
        Office::Zurich,
        Office::Geneva,
        Office::Aarhus,
        Office::Sydney,
        Office::Budapest,
        Office::Wroclaw,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Office::London => "London",
            Office::Paris => "Paris",
            Office::Singapore => "Singapore",
            Office::Mumbai => "Mumbai",
            Office::Dubai => "Dubai",
            Office::Shanghai => "Shanghai",
            Office::Zurich => "Zurich",
            Office::Geneva => "Geneva",
            Office::Aarhus => "Aarhus",
            Office::Sydney => "Sydney",
            Office::Budapest => "Budapest",
            Office::Wroclaw => "Wroclaw",
        }
    }
}

impl fmt::Display for Office {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Office {
    type Err = ValidationError;

    /// Parses the raw select-box value supplied by the form layer.
    ///
    /// # Examples
    /// ```
    /// use treffpunkt_libs::data::Office;
    ///
    /// assert_eq!("Paris".parse(), Ok(Office::Paris));
    /// assert!("Atlantis".parse::<Office>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Office::ALL
            .iter()
            .copied()
            .find(|office| office.name() == s.trim())
            .ok_or_else(|| ValidationError::UnknownOffice {
                found: s.to_string(),
            })
    }
}

#[derive(Error, Debug, Eq, PartialEq)]
pub enum ValidationError {
    #[error("Attendee count must be a positive number, got {found:?}")]
    InvalidCount { found: String },
    #[error("Office {found:?} is not one of the known offices")]
    UnknownOffice { found: String },
    #[error("Both start and end of the availability window are required")]
    MissingWindow,
    #[error("Availability window must end after it starts")]
    InvalidWindowOrder,
}

/// The caller-specified range a meeting must be scheduled within.
///
/// Only constructed by parsing the pair of raw timestamp strings the
/// form layer supplies; an instance always holds a well-ordered window.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    #[serde(serialize_with = "rfc3339_utc")]
    pub start: DateTime<Utc>,
    #[serde(serialize_with = "rfc3339_utc")]
    pub end: DateTime<Utc>,
}

impl AvailabilityWindow {
    /// Parses both window endpoints.
    ///
    /// Accepts RFC 3339 timestamps, the `datetime-local` shapes the form
    /// emits (`2030-01-01T09:00`, optionally with seconds), and bare
    /// dates, which become midnight. Inputs without an offset are taken
    /// as UTC.
    ///
    /// # Examples
    /// ```
    /// use treffpunkt_libs::data::{AvailabilityWindow, ValidationError};
    ///
    /// let window = AvailabilityWindow::parse("2030-01-01T09:00", "2030-01-01T17:00").unwrap();
    /// assert!(window.start < window.end);
    ///
    /// assert_eq!(
    ///     AvailabilityWindow::parse("", "2030-01-01T17:00"),
    ///     Err(ValidationError::MissingWindow)
    /// );
    /// ```
    pub fn parse(start: &str, end: &str) -> Result<AvailabilityWindow, ValidationError> {
        let start = parse_timestamp(start).ok_or(ValidationError::MissingWindow)?;
        let end = parse_timestamp(end).ok_or(ValidationError::MissingWindow)?;

        if end <= start {
            return Err(ValidationError::InvalidWindowOrder);
        }

        Ok(AvailabilityWindow { start, end })
    }
}

/// Normalizes a raw timestamp string to UTC. `None` for absent or
/// unparseable input.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Utc));
    }

    for format in &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
}

/// Whole-second RFC 3339 with the `Z` designator, the one canonical
/// textual format downstream consumers parse.
fn rfc3339_utc<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Requested meeting length in days plus hours.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct EventDuration {
    pub days: u32,
    pub hours: u32,
}

impl Default for EventDuration {
    fn default() -> EventDuration {
        EventDuration { days: 0, hours: 2 }
    }
}

impl EventDuration {
    /// Coerces the raw duration fields; never fails.
    ///
    /// Empty, non-numeric, and negative input all become 0, and
    /// fractional input truncates. The form layer relies on this being
    /// non-blocking.
    ///
    /// # Examples
    /// ```
    /// use treffpunkt_libs::data::EventDuration;
    ///
    /// assert_eq!(EventDuration::coerce("1", "6"), EventDuration { days: 1, hours: 6 });
    /// assert_eq!(EventDuration::coerce("", "-4"), EventDuration { days: 0, hours: 0 });
    /// assert_eq!(EventDuration::coerce("abc", "2.9"), EventDuration { days: 0, hours: 2 });
    /// ```
    pub fn coerce(days: &str, hours: &str) -> EventDuration {
        EventDuration {
            days: coerce_field(days),
            hours: coerce_field(hours),
        }
    }
}

fn coerce_field(raw: &str) -> u32 {
    let raw = raw.trim();

    raw.parse::<i64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().map(|value| value.trunc() as i64))
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(0)
}

/// Parses a raw attendee count into a positive integer. `None` for
/// absent, non-numeric, and non-positive input; fractional counts
/// truncate.
pub(crate) fn parse_count(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    raw.parse::<i64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().map(|value| value.trunc() as i64))
        .and_then(|value| u32::try_from(value).ok())
        .filter(|&count| count > 0)
}
