//! In-app notifications derived from event state.
//!
//! Nothing is stored: each request recomputes the list from the events
//! assigned to the caller.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Event, EventStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Assigned,
    Cancelled,
    NoShow,
    Reminder,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub event_id: Uuid,
    pub title: String,
    pub message: String,
    pub date: DateTime<Utc>,
    pub urgent: bool,
}

/// Status notices for the volunteer's events, followed by reminders for
/// pending events starting within `window` of `now`.
pub fn notifications_for(
    events: &[Event],
    volunteer_id: Uuid,
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<Notification> {
    let assigned: Vec<&Event> = events
        .iter()
        .filter(|e| e.volunteer_id == Some(volunteer_id))
        .collect();

    let status_notices = assigned.iter().filter_map(|event| status_notice(event));

    let horizon = now + window;
    let reminders = assigned
        .iter()
        .filter(|e| e.status == EventStatus::Pending && e.date > now && e.date < horizon)
        .map(|event| Notification {
            kind: NotificationKind::Reminder,
            event_id: event.id,
            title: "Upcoming Event Reminder".to_string(),
            message: format!(
                "Don't forget your upcoming event: {} on {} at {}",
                event.name,
                event.date.format("%Y-%m-%d"),
                event.zip_code
            ),
            date: event.date,
            urgent: false,
        });

    status_notices.chain(reminders).collect()
}

fn status_notice(event: &Event) -> Option<Notification> {
    let day = event.date.format("%Y-%m-%d");

    let (kind, title, message, urgent) = match event.status {
        EventStatus::Pending => (
            NotificationKind::Assigned,
            "New Event",
            format!("You have been assigned to: {} on {}", event.name, day),
            event.urgency.is_urgent(),
        ),
        EventStatus::Cancelled => (
            NotificationKind::Cancelled,
            "Event Cancelled",
            format!(
                "The event \"{}\" scheduled for {} has been cancelled.",
                event.name, day
            ),
            true,
        ),
        EventStatus::NoShow => (
            NotificationKind::NoShow,
            "Missed Event",
            format!("You were marked as \"No Show\" for: {} on {}", event.name, day),
            true,
        ),
        EventStatus::Completed => return None,
    };

    Some(Notification {
        kind,
        event_id: event.id,
        title: title.to_string(),
        message,
        date: event.date,
        urgent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewEvent, Urgency, ZipCode};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 10, 12, 0, 0).unwrap()
    }

    fn event(
        name: &str,
        status: EventStatus,
        urgency: Urgency,
        date: DateTime<Utc>,
        volunteer: Option<Uuid>,
    ) -> Event {
        let mut event = NewEvent {
            name: name.to_string(),
            description: String::new(),
            zip_code: ZipCode::parse("77004").unwrap(),
            required_skills: vec![],
            urgency,
            date,
            volunteer_id: volunteer,
        }
        .into_event();
        event.status = status;
        event
    }

    #[test]
    fn test_status_notices_for_assigned_events_only() {
        let me = Uuid::new_v4();
        let someone_else = Uuid::new_v4();
        let far = now() + Duration::days(30);

        let events = vec![
            event("Mine", EventStatus::Pending, Urgency::Low, far, Some(me)),
            event("Theirs", EventStatus::Pending, Urgency::Low, far, Some(someone_else)),
            event("Nobody", EventStatus::Pending, Urgency::Low, far, None),
            event("Gone", EventStatus::Cancelled, Urgency::Low, far, Some(me)),
            event("Missed", EventStatus::NoShow, Urgency::Low, far, Some(me)),
            event("Done", EventStatus::Completed, Urgency::Low, far, Some(me)),
        ];

        let notes = notifications_for(&events, me, now(), Duration::days(2));
        let kinds: Vec<_> = notes.iter().map(|n| n.kind).collect();

        assert_eq!(
            kinds,
            vec![
                NotificationKind::Assigned,
                NotificationKind::Cancelled,
                NotificationKind::NoShow,
            ]
        );
    }

    #[test]
    fn test_high_urgency_assignments_are_flagged() {
        let me = Uuid::new_v4();
        let far = now() + Duration::days(30);
        let events = vec![
            event("Calm", EventStatus::Pending, Urgency::Medium, far, Some(me)),
            event("Pressing", EventStatus::Pending, Urgency::Critical, far, Some(me)),
        ];

        let notes = notifications_for(&events, me, now(), Duration::days(2));

        assert!(!notes[0].urgent);
        assert!(notes[1].urgent);
    }

    #[test]
    fn test_reminders_cover_open_window() {
        let me = Uuid::new_v4();
        let events = vec![
            event("Tomorrow", EventStatus::Pending, Urgency::Low, now() + Duration::days(1), Some(me)),
            event("Past", EventStatus::Pending, Urgency::Low, now() - Duration::hours(1), Some(me)),
            event("Edge", EventStatus::Pending, Urgency::Low, now() + Duration::days(2), Some(me)),
            event(
                "Cancelled soon",
                EventStatus::Cancelled,
                Urgency::Low,
                now() + Duration::hours(5),
                Some(me),
            ),
        ];

        let notes = notifications_for(&events, me, now(), Duration::days(2));
        let reminders: Vec<_> = notes
            .iter()
            .filter(|n| n.kind == NotificationKind::Reminder)
            .collect();

        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].event_id, events[0].id);
        assert_eq!(notes.last().unwrap().kind, NotificationKind::Reminder);
    }

    #[test]
    fn test_no_events_no_notifications() {
        assert!(notifications_for(&[], Uuid::new_v4(), now(), Duration::days(2)).is_empty());
    }
}
