use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::MatchCandidate;
use crate::models::ZipCode;
use crate::utils::error::AppError;

/// USPS codes accepted for a volunteer's address, including DC and territories.
pub const STATE_CODES: [&str; 59] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "AS", "DC", "FM", "GU", "MH", "MP", "PW", "PR", "VI",
];

const MAX_NAME_LEN: usize = 50;
const MAX_ADDRESS_LEN: usize = 100;

/// A volunteer's profile. `id` is the owning user's id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VolunteerProfile {
    pub id: Uuid,
    pub full_name: String,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub skills: Vec<String>,
    pub preferences: Vec<String>,
    pub availability: Vec<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MatchCandidate for VolunteerProfile {
    fn skills(&self) -> &[String] {
        &self.skills
    }

    fn available_days(&self) -> &[NaiveDate] {
        &self.availability
    }

    fn zip_code(&self) -> &str {
        &self.zip_code
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInput {
    pub full_name: String,
    pub address1: String,
    #[serde(default)]
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: ZipCode,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default)]
    pub availability: Vec<NaiveDate>,
}

impl ProfileInput {
    /// Trims text fields, checks lengths and the state code, and drops
    /// duplicate skills, preferences and dates.
    pub fn normalize(self) -> Result<Self, AppError> {
        let full_name = required_text("full_name", self.full_name, MAX_NAME_LEN)?;
        let address1 = required_text("address1", self.address1, MAX_ADDRESS_LEN)?;
        let city = required_text("city", self.city, MAX_ADDRESS_LEN)?;

        let address2 = match self.address2.map(|a| a.trim().to_string()) {
            Some(a) if a.is_empty() => None,
            Some(a) if a.chars().count() > MAX_ADDRESS_LEN => {
                return Err(AppError::ValidationError(format!(
                    "address2 must be at most {} characters",
                    MAX_ADDRESS_LEN
                )));
            }
            other => other,
        };

        let state = self.state.trim().to_uppercase();
        if !STATE_CODES.contains(&state.as_str()) {
            return Err(AppError::ValidationError(format!(
                "'{}' is not a recognised state code",
                self.state
            )));
        }

        let mut availability = self.availability;
        availability.sort_unstable();
        availability.dedup();

        Ok(Self {
            full_name,
            address1,
            address2,
            city,
            state,
            zip_code: self.zip_code,
            skills: dedup_labels(self.skills),
            preferences: dedup_labels(self.preferences),
            availability,
        })
    }
}

fn required_text(field: &str, value: String, max: usize) -> Result<String, AppError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::ValidationError(format!("{} is required", field)));
    }
    if value.chars().count() > max {
        return Err(AppError::ValidationError(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(value)
}

/// Trims labels and removes blanks and repeats, keeping first occurrences.
pub fn dedup_labels(labels: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim().to_string();
        if !label.is_empty() && !seen.contains(&label) {
            seen.push(label);
        }
    }
    seen
}
