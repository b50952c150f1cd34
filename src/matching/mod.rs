//! Volunteer-to-event matching.
//!
//! A single synchronous pass over the volunteer pool:
//!
//! 1. [`filter`] drops volunteers who are not available on the event's day.
//! 2. [`scorer`] rates each remaining volunteer by skill overlap (up to 10
//!    points) and zip-code proximity (5 for the same zip, 3 for the same
//!    three-digit prefix).
//! 3. [`selector`] keeps the highest score, the earliest candidate winning ties.
//!
//! Nothing here performs I/O or holds state, so callers may re-run it on
//! every edit of an event's skills, date or location.
//!
//! Event timestamps are reduced to a calendar day in UTC before comparison
//! with availability dates.

use chrono::NaiveDate;

pub mod filter;
pub mod scorer;
pub mod selector;

pub use filter::available_on;
pub use scorer::{location_term, score, skill_term, ScoreBreakdown};
pub use selector::{select_best, Scored};

/// The event side of a match.
pub trait MatchTarget {
    fn required_skills(&self) -> &[String];
    fn scheduled_day(&self) -> NaiveDate;
    fn zip_code(&self) -> &str;
}

/// The volunteer side of a match.
pub trait MatchCandidate {
    fn skills(&self) -> &[String];
    fn available_days(&self) -> &[NaiveDate];
    fn zip_code(&self) -> &str;
}

impl<C: MatchCandidate + ?Sized> MatchCandidate for &C {
    fn skills(&self) -> &[String] {
        (**self).skills()
    }

    fn available_days(&self) -> &[NaiveDate] {
        (**self).available_days()
    }

    fn zip_code(&self) -> &str {
        (**self).zip_code()
    }
}

pub type Match<'a, C> = Scored<'a, C>;

/// Suggests a volunteer for `target`, or `None` when nobody is available that day.
pub fn best_match<'a, T, C>(target: &T, pool: &'a [C]) -> Option<Match<'a, C>>
where
    T: MatchTarget + ?Sized,
    C: MatchCandidate,
{
    let candidates = available_on(target.scheduled_day(), pool);

    let best = select_best(candidates.into_iter().map(|candidate| Scored {
        candidate,
        breakdown: score(target, candidate),
    }));

    match &best {
        Some(found) => tracing::debug!(score = found.total(), "Matched volunteer"),
        None => tracing::debug!(day = %target.scheduled_day(), "No volunteer available"),
    }

    best
}
