use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::info;
use url::Url;

use super::models::{EventResource, InsertedEvent};
use super::token;
use crate::config::Config;
use crate::error::{upstream_error, RelayResult};

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Build the insert URL for a calendar.
///
/// The calendar id is appended as a single path segment, so characters like
/// `/`, `?` or `#` are percent-encoded instead of rewriting the path.
pub fn events_url(calendar_id: &str) -> RelayResult<Url> {
    let mut url = Url::parse(CALENDAR_API_BASE)
        .map_err(|e| upstream_error(&format!("Failed to build events URL: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| upstream_error("Failed to build events URL"))?
        .extend(["calendars", calendar_id, "events"]);
    Ok(url)
}

/// Seam between the HTTP surface and the calendar provider.
///
/// The real implementation talks to Google; tests substitute a recording
/// mock so no network traffic happens.
#[async_trait]
pub trait EventInserter: Send + Sync {
    /// Create one event on the given calendar
    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &EventResource,
    ) -> RelayResult<InsertedEvent>;
}

/// Google Calendar v3 client backed by per-request service-account auth
pub struct GoogleCalendarClient {
    config: Arc<Config>,
    client: Client,
}

impl GoogleCalendarClient {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl EventInserter for GoogleCalendarClient {
    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &EventResource,
    ) -> RelayResult<InsertedEvent> {
        // Credentials are resolved and signed fresh for every call
        let key = token::resolve_key(self.config.credentials.as_ref()).await?;
        let access_token = token::fetch_access_token(&self.client, &key).await?;

        let url = events_url(calendar_id)?;

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .json(event)
            .send()
            .await
            .map_err(|e| upstream_error(&format!("Failed to create event: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(upstream_error(&format!(
                "Failed to create event: HTTP {} - {}",
                status, error_body
            )));
        }

        let inserted: InsertedEvent = response
            .json()
            .await
            .map_err(|e| upstream_error(&format!("Failed to parse event response: {}", e)))?;

        info!(event_id = %inserted.id, calendar_id, "Created calendar event");

        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_url_targets_the_given_calendar() {
        let url = events_url("team@group.calendar.google.com").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/calendar/v3/calendars/team@group.calendar.google.com/events"
        );
    }

    #[test]
    fn hostile_calendar_ids_stay_inside_one_path_segment() {
        let url = events_url("team#holidays").unwrap();
        assert_eq!(url.path(), "/calendar/v3/calendars/team%23holidays/events");
        assert_eq!(url.fragment(), None);

        let url = events_url("a?x=1").unwrap();
        assert_eq!(url.path(), "/calendar/v3/calendars/a%3Fx=1/events");
        assert_eq!(url.query(), None);

        let url = events_url("a/b").unwrap();
        assert_eq!(url.path(), "/calendar/v3/calendars/a%2Fb/events");
    }
}
