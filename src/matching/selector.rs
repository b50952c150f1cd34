use super::ScoreBreakdown;

/// A candidate paired with its score.
#[derive(Debug, Clone, Copy)]
pub struct Scored<'a, C: ?Sized> {
    pub candidate: &'a C,
    pub breakdown: ScoreBreakdown,
}

impl<C: ?Sized> Scored<'_, C> {
    pub fn total(&self) -> f64 {
        self.breakdown.total()
    }
}

/// Picks the strictly highest score. Ties keep the earliest candidate.
pub fn select_best<'a, C, I>(scored: I) -> Option<Scored<'a, C>>
where
    C: ?Sized,
    I: IntoIterator<Item = Scored<'a, C>>,
{
    scored.into_iter().fold(None, |best, current| match best {
        Some(best) if best.total() >= current.total() => Some(best),
        _ => Some(current),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored<'a>(name: &'a str, skill: f64, location: f64) -> Scored<'a, str> {
        Scored {
            candidate: name,
            breakdown: ScoreBreakdown { skill, location },
        }
    }

    #[test]
    fn test_empty_input_selects_nothing() {
        assert!(select_best::<str, _>(Vec::new()).is_none());
    }

    #[test]
    fn test_highest_total_wins() {
        let best = select_best(vec![
            scored("a", 5.0, 5.0),
            scored("b", 10.0, 3.0),
            scored("c", 0.0, 5.0),
        ])
        .unwrap();

        assert_eq!(best.candidate, "b");
        assert_eq!(best.total(), 13.0);
    }

    #[test]
    fn test_tie_keeps_first_encountered() {
        let best = select_best(vec![
            scored("first", 5.0, 5.0),
            scored("second", 10.0, 0.0),
            scored("third", 7.0, 3.0),
        ])
        .unwrap();

        assert_eq!(best.candidate, "first");
    }

    #[test]
    fn test_all_zero_scores_still_select_first() {
        let best = select_best(vec![scored("x", 0.0, 0.0), scored("y", 0.0, 0.0)]).unwrap();
        assert_eq!(best.candidate, "x");
    }
}
