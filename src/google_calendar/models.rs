use serde::{Deserialize, Serialize};

use crate::error::{validation_error, RelayResult};

/// Calendar targeted when the request leaves calendarId out
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// Inbound create-event request body
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start_date_time: String,
    #[serde(default)]
    pub end_date_time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
}

fn default_calendar_id() -> String {
    DEFAULT_CALENDAR_ID.to_string()
}

impl EventRequest {
    /// Reject the request unless title, startDateTime and endDateTime are
    /// all present and non-empty. Date ordering is not checked here; that
    /// is left to Google.
    pub fn validate(&self) -> RelayResult<()> {
        if self.title.trim().is_empty()
            || self.start_date_time.trim().is_empty()
            || self.end_date_time.trim().is_empty()
        {
            return Err(validation_error(
                "title, startDateTime and endDateTime are required",
            ));
        }
        Ok(())
    }
}

/// Event resource sent to the Google Calendar v3 insert endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResource {
    pub summary: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

/// start/end object of an event resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

impl EventResource {
    /// Build the provider payload from a validated request.
    ///
    /// The caller's timestamps are passed through verbatim; the configured
    /// zone label only tells Google how to display and recur the event. A
    /// timestamp carrying its own UTC offset keeps that instant.
    pub fn from_request(request: &EventRequest, timezone: &str) -> Self {
        Self {
            summary: request.title.clone(),
            description: request.description.clone(),
            start: EventDateTime {
                date_time: request.start_date_time.clone(),
                time_zone: timezone.to_string(),
            },
            end: EventDateTime {
                date_time: request.end_date_time.clone(),
                time_zone: timezone.to_string(),
            },
        }
    }
}

/// Fields we keep from Google's insert response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertedEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub html_link: String,
}

/// Normalized response returned to the caller
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub success: bool,
    pub message: String,
    pub event_id: String,
    pub event_link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in_missing_optional_fields() {
        let request: EventRequest = serde_json::from_str(
            r#"{"title":"Meeting","startDateTime":"2024-06-01T10:00:00+09:00","endDateTime":"2024-06-01T11:00:00+09:00"}"#,
        )
        .unwrap();

        assert_eq!(request.description, "");
        assert_eq!(request.calendar_id, DEFAULT_CALENDAR_ID);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn empty_required_field_fails_validation() {
        let request = EventRequest {
            title: "  ".to_string(),
            start_date_time: "2024-06-01T10:00:00+09:00".to_string(),
            end_date_time: "2024-06-01T11:00:00+09:00".to_string(),
            ..Default::default()
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn resource_carries_timestamps_verbatim() {
        let request = EventRequest {
            title: "Meeting".to_string(),
            start_date_time: "2024-06-01T10:00:00+09:00".to_string(),
            end_date_time: "2024-06-01T11:00:00+09:00".to_string(),
            ..Default::default()
        };

        let resource = EventResource::from_request(&request, "Asia/Tokyo");
        assert_eq!(resource.summary, "Meeting");
        assert_eq!(resource.start.date_time, "2024-06-01T10:00:00+09:00");
        assert_eq!(resource.end.date_time, "2024-06-01T11:00:00+09:00");
        assert_eq!(resource.start.time_zone, "Asia/Tokyo");
        assert_eq!(resource.end.time_zone, "Asia/Tokyo");
    }
}
