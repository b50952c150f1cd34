use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::matching::MatchTarget;
use crate::models::volunteer::{dedup_labels, VolunteerProfile};
use crate::models::ZipCode;
use crate::utils::error::AppError;

const MAX_EVENT_NAME_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// How pressing an event is. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub const ALL: [Urgency; 4] = [
        Urgency::Low,
        Urgency::Medium,
        Urgency::High,
        Urgency::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "Low",
            Urgency::Medium => "Medium",
            Urgency::High => "High",
            Urgency::Critical => "Critical",
        }
    }

    pub fn is_urgent(&self) -> bool {
        *self >= Urgency::High
    }
}

impl FromStr for Urgency {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Urgency::ALL
            .into_iter()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "urgency",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot move a {from} event to {to}")]
pub struct InvalidTransition {
    pub from: EventStatus,
    pub to: EventStatus,
}

/// Event lifecycle. `Pending` is initial; every other state is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
    #[serde(rename = "No Show")]
    NoShow,
}

impl EventStatus {
    pub const ALL: [EventStatus; 4] = [
        EventStatus::Pending,
        EventStatus::Completed,
        EventStatus::Cancelled,
        EventStatus::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "Pending",
            EventStatus::Completed => "Completed",
            EventStatus::Cancelled => "Cancelled",
            EventStatus::NoShow => "No Show",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, EventStatus::Pending)
    }

    /// Re-applying the current status is a no-op; terminal states never change.
    pub fn transition(self, to: EventStatus) -> Result<EventStatus, InvalidTransition> {
        if self == to || !self.is_terminal() {
            Ok(to)
        } else {
            Err(InvalidTransition { from: self, to })
        }
    }
}

impl FromStr for EventStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "status",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub zip_code: String,
    pub required_skills: Vec<String>,
    pub urgency: Urgency,
    pub status: EventStatus,
    pub date: DateTime<Utc>,
    pub volunteer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Applies `changes`, enforcing the status state machine.
    pub fn apply(&mut self, changes: EventChanges) -> Result<(), InvalidTransition> {
        if let Some(status) = changes.status {
            self.status = self.status.transition(status)?;
        }
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(zip) = changes.zip_code {
            self.zip_code = zip.into();
        }
        if let Some(skills) = changes.required_skills {
            self.required_skills = skills;
        }
        if let Some(urgency) = changes.urgency {
            self.urgency = urgency;
        }
        if let Some(date) = changes.date {
            self.date = date;
        }
        if let Some(volunteer_id) = changes.volunteer_id {
            self.volunteer_id = volunteer_id;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

impl MatchTarget for Event {
    fn required_skills(&self) -> &[String] {
        &self.required_skills
    }

    fn scheduled_day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    fn zip_code(&self) -> &str {
        &self.zip_code
    }
}

/// An event together with its assigned volunteer, if any.
#[derive(Debug, Clone, Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub volunteer: Option<VolunteerProfile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub zip_code: ZipCode,
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub urgency: Urgency,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub volunteer_id: Option<Uuid>,
}

impl NewEvent {
    pub fn normalize(mut self) -> Result<Self, AppError> {
        self.name = event_name(self.name)?;
        self.description = self.description.trim().to_string();
        self.required_skills = dedup_labels(self.required_skills);
        Ok(self)
    }

    pub fn into_event(self) -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            name: self.name,
            description: self.description,
            zip_code: self.zip_code.into(),
            required_skills: self.required_skills,
            urgency: self.urgency,
            status: EventStatus::Pending,
            date: self.date,
            volunteer_id: self.volunteer_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial event update. `volunteer_id: null` unassigns, an absent key leaves it alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub zip_code: Option<ZipCode>,
    pub required_skills: Option<Vec<String>>,
    pub urgency: Option<Urgency>,
    pub status: Option<EventStatus>,
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub volunteer_id: Option<Option<Uuid>>,
}

impl EventChanges {
    pub fn normalize(mut self) -> Result<Self, AppError> {
        if let Some(name) = self.name.take() {
            self.name = Some(event_name(name)?);
        }
        self.description = self.description.map(|d| d.trim().to_string());
        self.required_skills = self.required_skills.map(dedup_labels);
        Ok(self)
    }
}

fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn event_name(name: String) -> Result<String, AppError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::ValidationError("Event name is required".to_string()));
    }
    if name.chars().count() > MAX_EVENT_NAME_LEN {
        return Err(AppError::ValidationError(format!(
            "Event name must be at most {} characters",
            MAX_EVENT_NAME_LEN
        )));
    }
    Ok(name)
}

/// An unsaved event as edited in the event form, used for live match suggestions.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchDraft {
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub date: DateTime<Utc>,
    pub zip_code: ZipCode,
}

impl MatchTarget for MatchDraft {
    fn required_skills(&self) -> &[String] {
        &self.required_skills
    }

    fn scheduled_day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    fn zip_code(&self) -> &str {
        self.zip_code.as_str()
    }
}
