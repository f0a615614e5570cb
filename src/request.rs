use crate::data::{AvailabilityWindow, EventDuration, Office, ValidationError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder used when the request comment is blank.
pub const DEFAULT_COMMENT: &str = "No comment provided";

/// The canonical request payload handed back to the caller.
///
/// Field names and nesting are consumed downstream and must not change.
/// The value is assembled once per successful build and never persisted
/// by this crate.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MeetingRequest {
    #[serde(rename = "_comment")]
    pub comment: String,
    pub attendees: BTreeMap<Office, u32>,
    pub availability_window: AvailabilityWindow,
    pub event_duration: EventDuration,
}

/// The raw request fields as the form layer supplies them.
///
/// Everything is kept as the original strings; validation and coercion
/// happen in [`build`](RequestBuilder::build) so a rejected request
/// leaves nothing half-assembled.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestBuilder {
    #[serde(rename = "windowStart")]
    pub window_start: String,
    #[serde(rename = "windowEnd")]
    pub window_end: String,
    #[serde(rename = "durationDays")]
    pub duration_days: String,
    #[serde(rename = "durationHours")]
    pub duration_hours: String,
    pub comment: String,
}

impl Default for RequestBuilder {
    /// The form's initial values: no window, no comment, a two hour
    /// meeting.
    fn default() -> RequestBuilder {
        RequestBuilder {
            window_start: String::new(),
            window_end: String::new(),
            duration_days: "0".to_string(),
            duration_hours: "2".to_string(),
            comment: String::new(),
        }
    }
}

impl RequestBuilder {
    pub fn new(
        window_start: &str,
        window_end: &str,
        duration_days: &str,
        duration_hours: &str,
        comment: &str,
    ) -> RequestBuilder {
        RequestBuilder {
            window_start: window_start.to_string(),
            window_end: window_end.to_string(),
            duration_days: duration_days.to_string(),
            duration_hours: duration_hours.to_string(),
            comment: comment.to_string(),
        }
    }

    /// Validates the raw fields and assembles the payload around the
    /// supplied attendee aggregate.
    ///
    /// Checks run in order and the first failure wins: both window
    /// endpoints must parse (`MissingWindow`), the window must be
    /// well-ordered (`InvalidWindowOrder`), then the duration fields are
    /// coerced, which never fails. A blank or whitespace-only comment
    /// becomes [`DEFAULT_COMMENT`]. Offices never added do not appear in
    /// the payload.
    ///
    /// # Examples
    /// ```
    /// use treffpunkt_libs::attendee::AttendeeRegistry;
    /// use treffpunkt_libs::data::{Office, ValidationError};
    /// use treffpunkt_libs::request::RequestBuilder;
    ///
    /// let mut registry = AttendeeRegistry::new();
    /// registry.add(Office::London, "4").unwrap();
    ///
    /// let builder = RequestBuilder::new("2030-01-01T09:00", "2030-01-01T17:00", "0", "2", "");
    /// let request = builder.build(registry.aggregate()).unwrap();
    /// assert_eq!(request.attendees[&Office::London], 4);
    ///
    /// let incomplete = RequestBuilder::new("", "2030-01-01T17:00", "0", "2", "");
    /// assert_eq!(
    ///     incomplete.build(registry.aggregate()),
    ///     Err(ValidationError::MissingWindow)
    /// );
    /// ```
    pub fn build(
        &self,
        attendees: BTreeMap<Office, u32>,
    ) -> Result<MeetingRequest, ValidationError> {
        let availability_window = AvailabilityWindow::parse(&self.window_start, &self.window_end)?;
        let event_duration = EventDuration::coerce(&self.duration_days, &self.duration_hours);

        let comment = if self.comment.trim().is_empty() {
            DEFAULT_COMMENT.to_string()
        } else {
            self.comment.clone()
        };

        debug!(
            "built meeting request for {} offices, window {} to {}",
            attendees.len(),
            availability_window.start,
            availability_window.end
        );

        Ok(MeetingRequest {
            comment,
            attendees,
            availability_window,
            event_duration,
        })
    }
}
