//! Truncation of the ranked or deduplicated list to the display window.

use serde::Serialize;

use crate::types::{Place, RankedPlace};

/// Keep the first `max_count` entries, preserving order.
#[must_use]
pub fn select<T>(mut items: Vec<T>, max_count: usize) -> Vec<T> {
    items.truncate(max_count);
    items
}

/// The bounded list handed to display for one discovery attempt.
///
/// `Ranked` when the backend supplied ratings and distances, `Unranked`
/// otherwise (input order is kept as-is).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "places", rename_all = "lowercase")]
pub enum ResultSet {
    Ranked(Vec<RankedPlace>),
    Unranked(Vec<Place>),
}

impl ResultSet {
    #[must_use]
    pub fn empty() -> Self {
        ResultSet::Unranked(Vec::new())
    }

    #[must_use]
    pub fn ranked(places: Vec<RankedPlace>, max_count: usize) -> Self {
        ResultSet::Ranked(select(places, max_count))
    }

    #[must_use]
    pub fn unranked(places: Vec<Place>, max_count: usize) -> Self {
        ResultSet::Unranked(select(places, max_count))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ResultSet::Ranked(v) => v.len(),
            ResultSet::Unranked(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Places in display order, paired with their score when ranked.
    #[must_use]
    pub fn entries(&self) -> Vec<(&Place, Option<f64>)> {
        match self {
            ResultSet::Ranked(v) => v.iter().map(|r| (&r.place, Some(r.score))).collect(),
            ResultSet::Unranked(v) => v.iter().map(|p| (p, None)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;

    fn place(id: &str) -> Place {
        Place {
            id: id.to_string(),
            name: id.to_string(),
            coordinates: Location::new(0.0, 0.0).unwrap(),
            rating: None,
            distance_meters: None,
            closed: None,
        }
    }

    #[test]
    fn window_larger_than_input_returns_input_unchanged() {
        let input = vec![1, 2, 3];
        assert_eq!(select(input.clone(), 10), input);
        assert_eq!(select(input.clone(), 3), input);
    }

    #[test]
    fn window_smaller_than_input_keeps_prefix() {
        assert_eq!(select(vec![5, 4, 3, 2, 1], 2), vec![5, 4]);
    }

    #[test]
    fn zero_window_is_empty() {
        assert!(select(vec![1, 2], 0).is_empty());
    }

    #[test]
    fn result_set_reports_len_and_entries() {
        let set = ResultSet::unranked(vec![place("a"), place("b"), place("c")], 2);
        assert_eq!(set.len(), 2);
        let ids: Vec<&str> = set.entries().iter().map(|(p, _)| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(set.entries().iter().all(|(_, s)| s.is_none()));
    }

    #[test]
    fn ranked_entries_carry_scores() {
        let set = ResultSet::ranked(
            vec![RankedPlace {
                place: place("a"),
                score: 0.9,
            }],
            10,
        );
        assert_eq!(set.entries()[0].1, Some(0.9));
    }

    #[test]
    fn empty_result_set() {
        assert!(ResultSet::empty().is_empty());
    }
}
