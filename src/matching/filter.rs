use chrono::NaiveDate;

use super::MatchCandidate;

/// Keeps the candidates that listed `day` as available, preserving input order.
pub fn available_on<'a, C>(day: NaiveDate, candidates: &'a [C]) -> Vec<&'a C>
where
    C: MatchCandidate,
{
    candidates
        .iter()
        .filter(|candidate| candidate.available_days().contains(&day))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::tests::{day, volunteer};

    #[test]
    fn test_empty_pool_yields_empty_result() {
        let pool: Vec<crate::matching::tests::TestVolunteer> = Vec::new();
        assert!(available_on(day(2024, 6, 1), &pool).is_empty());
    }

    #[test]
    fn test_keeps_only_volunteers_available_that_day() {
        let pool = vec![
            volunteer(&["Cooking"], "12345", &[day(2024, 6, 1)]),
            volunteer(&["Cooking"], "12345", &[day(2024, 6, 2)]),
            volunteer(&["Driving"], "54321", &[day(2024, 5, 30), day(2024, 6, 1)]),
        ];

        let available = available_on(day(2024, 6, 1), &pool);

        assert_eq!(available.len(), 2);
        assert!(std::ptr::eq(available[0], &pool[0]));
        assert!(std::ptr::eq(available[1], &pool[2]));
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let pool = vec![
            volunteer(&[], "11111", &[day(2024, 1, 10)]),
            volunteer(&[], "22222", &[day(2024, 1, 11)]),
            volunteer(&[], "33333", &[day(2024, 1, 10), day(2024, 1, 11)]),
        ];

        let once = available_on(day(2024, 1, 10), &pool);
        let twice = available_on(day(2024, 1, 10), &once);

        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert!(std::ptr::eq(*a, **b));
        }
    }
}
