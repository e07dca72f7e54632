use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::error::Error;
use crate::google_calendar::client::EventInserter;
use crate::google_calendar::models::{EventRequest, EventResource, EventResponse};

/// Shared state passed to every handler
#[derive(Clone)]
pub struct AppState {
    /// Immutable configuration loaded at startup
    pub config: Arc<Config>,
    /// Calendar provider seam
    pub inserter: Arc<dyn EventInserter>,
}

/// Handler for POST /add-event
pub async fn add_event_handler(
    State(state): State<AppState>,
    Json(request): Json<EventRequest>,
) -> Result<Json<EventResponse>, Error> {
    request.validate()?;

    let event = EventResource::from_request(&request, &state.config.timezone);

    let inserted = state
        .inserter
        .insert_event(&request.calendar_id, &event)
        .await
        .map_err(|e| {
            error!("Failed to add event: {}", e);
            e
        })?;

    info!(event_id = %inserted.id, "Event added");

    Ok(Json(EventResponse {
        success: true,
        message: "Event created successfully".to_string(),
        event_id: inserted.id,
        event_link: inserted.html_link,
    }))
}

/// Handler for GET /health; static liveness, no dependency checks
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Calendar relay is running",
    }))
}

/// Handler for GET /, a static index of the endpoints
pub async fn index_handler() -> Json<Value> {
    Json(json!({
        "message": "Calendar Event Relay",
        "endpoints": {
            "health": "/health",
            "addEvent": "/add-event (POST)",
        },
    }))
}
