use std::collections::HashSet;

use serde::Serialize;

use super::{MatchCandidate, MatchTarget};

pub const SKILL_WEIGHT: f64 = 10.0;
pub const EXACT_ZIP_POINTS: f64 = 5.0;
pub const REGIONAL_ZIP_POINTS: f64 = 3.0;

const REGIONAL_PREFIX_LEN: usize = 3;

/// Additive parts of a match score. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub skill: f64,
    pub location: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.skill + self.location
    }
}

/// Share of the required skills the volunteer covers, scaled to `[0, 10]`.
pub fn skill_term(required: &[String], offered: &[String]) -> f64 {
    let required: HashSet<&str> = required.iter().map(String::as_str).collect();
    if required.is_empty() {
        return 0.0;
    }

    let offered: HashSet<&str> = offered.iter().map(String::as_str).collect();
    let covered = required.intersection(&offered).count();

    covered as f64 / required.len() as f64 * SKILL_WEIGHT
}

pub fn location_term(event_zip: &str, volunteer_zip: &str) -> f64 {
    if event_zip.is_empty() || volunteer_zip.is_empty() {
        return 0.0;
    }

    if event_zip == volunteer_zip {
        EXACT_ZIP_POINTS
    } else if regional_prefix(event_zip) == regional_prefix(volunteer_zip) {
        REGIONAL_ZIP_POINTS
    } else {
        0.0
    }
}

fn regional_prefix(zip: &str) -> &str {
    match zip.char_indices().nth(REGIONAL_PREFIX_LEN) {
        Some((idx, _)) => &zip[..idx],
        None => zip,
    }
}

pub fn score<T, C>(target: &T, candidate: &C) -> ScoreBreakdown
where
    T: MatchTarget + ?Sized,
    C: MatchCandidate + ?Sized,
{
    ScoreBreakdown {
        skill: skill_term(target.required_skills(), candidate.skills()),
        location: location_term(target.zip_code(), candidate.zip_code()),
    }
}
