//! Event and volunteer-history exports.
//!
//! Rows are assembled once and rendered to either CSV or PDF.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::models::{Event, VolunteerHistory, VolunteerProfile};

pub mod csv;
pub mod pdf;

pub use self::csv::to_csv;
pub use self::pdf::to_pdf;

const UNASSIGNED: &str = "Unassigned";
const UNKNOWN: &str = "Unknown";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// A table a report can render.
pub trait Report {
    fn title(&self) -> &str;
    fn headers(&self) -> &[&'static str];
    fn rows(&self) -> Vec<Vec<String>>;
}

pub struct EventReport {
    rows: Vec<Vec<String>>,
}

impl EventReport {
    pub fn build(events: &[Event], profiles: &[VolunteerProfile]) -> Self {
        let names = names_by_id(profiles);

        let rows = events
            .iter()
            .map(|event| {
                vec![
                    event.name.clone(),
                    event.description.clone(),
                    event.zip_code.clone(),
                    event.urgency.to_string(),
                    event.date.format(DATE_FORMAT).to_string(),
                    event.status.to_string(),
                    event.required_skills.join(", "),
                    event
                        .volunteer_id
                        .map(|id| names.get(&id).copied().unwrap_or(UNKNOWN))
                        .unwrap_or(UNASSIGNED)
                        .to_string(),
                ]
            })
            .collect();

        Self { rows }
    }
}

impl Report for EventReport {
    fn title(&self) -> &str {
        "Event Report"
    }

    fn headers(&self) -> &[&'static str] {
        &[
            "Event Name",
            "Description",
            "Location",
            "Urgency",
            "Date",
            "Status",
            "Required Skills",
            "Volunteer",
        ]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.rows.clone()
    }
}

pub struct HistoryReport {
    rows: Vec<Vec<String>>,
}

impl HistoryReport {
    pub fn build(
        history: &[VolunteerHistory],
        events: &[Event],
        profiles: &[VolunteerProfile],
    ) -> Self {
        let names = names_by_id(profiles);
        let events: HashMap<Uuid, &Event> = events.iter().map(|e| (e.id, e)).collect();

        let rows = history
            .iter()
            .map(|record| {
                let event = events.get(&record.event_id);
                vec![
                    names
                        .get(&record.volunteer_id)
                        .copied()
                        .unwrap_or(UNKNOWN)
                        .to_string(),
                    event.map_or(UNKNOWN.to_string(), |e| e.name.clone()),
                    event.map_or(String::new(), |e| e.date.format(DATE_FORMAT).to_string()),
                    record.status.to_string(),
                    record.participated_at.format(DATE_FORMAT).to_string(),
                ]
            })
            .collect();

        Self { rows }
    }
}

impl Report for HistoryReport {
    fn title(&self) -> &str {
        "Volunteer History Report"
    }

    fn headers(&self) -> &[&'static str] {
        &[
            "Volunteer",
            "Event Name",
            "Event Date",
            "Status",
            "Participation Date",
        ]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.rows.clone()
    }
}

/// How many events each volunteer has on record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participation {
    pub volunteer_id: Uuid,
    pub name: String,
    pub events: usize,
}

/// One entry per volunteer in profile order, including volunteers with no history.
pub fn participation(
    history: &[VolunteerHistory],
    profiles: &[VolunteerProfile],
) -> Vec<Participation> {
    let mut counts: HashMap<Uuid, usize> = HashMap::new();
    for record in history {
        *counts.entry(record.volunteer_id).or_default() += 1;
    }

    profiles
        .iter()
        .map(|profile| Participation {
            volunteer_id: profile.id,
            name: profile.full_name.clone(),
            events: counts.get(&profile.id).copied().unwrap_or(0),
        })
        .collect()
}

fn names_by_id(profiles: &[VolunteerProfile]) -> HashMap<Uuid, &str> {
    profiles
        .iter()
        .map(|p| (p.id, p.full_name.as_str()))
        .collect()
}
