use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Event, EventStatus};

/// One volunteer's participation in one event. `status` is the event's
/// status when the record was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerHistory {
    pub id: Uuid,
    pub volunteer_id: Uuid,
    pub event_id: Uuid,
    pub status: EventStatus,
    pub participated_at: DateTime<Utc>,
}

impl VolunteerHistory {
    pub fn record(volunteer_id: Uuid, event: &Event) -> Self {
        Self {
            id: Uuid::new_v4(),
            volunteer_id,
            event_id: event.id,
            status: event.status,
            participated_at: Utc::now(),
        }
    }
}

/// A history record with its event attached.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub volunteer_id: Uuid,
    pub status: EventStatus,
    pub participated_at: DateTime<Utc>,
    pub event: Event,
}

impl HistoryEntry {
    pub fn new(record: VolunteerHistory, event: Event) -> Self {
        Self {
            id: record.id,
            volunteer_id: record.volunteer_id,
            status: record.status,
            participated_at: record.participated_at,
            event,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewHistory {
    pub volunteer_id: Uuid,
    pub event_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkHistory {
    pub records: Vec<NewHistory>,
}
