use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::models::AdmissionScheduleItem;

/// An exam counts as completed once its countdown target is at or before
/// `now`. Undated exams are never completed.
pub fn is_completed(item: &AdmissionScheduleItem, now: DateTime<Utc>) -> bool {
    item.countdown_date().is_some_and(|target| target <= now)
}

/// Order schedule items for display.
///
/// Favorites come first. Within each group, upcoming and undated exams come
/// before completed ones; then dated exams ascend by countdown date and
/// undated exams go last. The sort is stable, so anything the keys do not
/// separate keeps its catalog position.
pub fn rank_schedule<'a, I, F>(
    items: I,
    is_favorite: F,
    now: DateTime<Utc>,
) -> Vec<&'a AdmissionScheduleItem>
where
    I: IntoIterator<Item = &'a AdmissionScheduleItem>,
    F: Fn(&str) -> bool,
{
    let mut keyed: Vec<(RankKey, &AdmissionScheduleItem)> = items
        .into_iter()
        .map(|item| (RankKey::new(item, is_favorite(&item.id), now), item))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    keyed.into_iter().map(|(_, item)| item).collect()
}

#[derive(Debug, PartialEq, Eq)]
struct RankKey {
    favorite: bool,
    completed: bool,
    target: Option<DateTime<Utc>>,
}

impl RankKey {
    fn new(item: &AdmissionScheduleItem, favorite: bool, now: DateTime<Utc>) -> Self {
        Self {
            favorite,
            completed: is_completed(item, now),
            target: item.countdown_date(),
        }
    }
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .favorite
            .cmp(&self.favorite)
            .then(self.completed.cmp(&other.completed))
            .then_with(|| match (self.target, other.target) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeDelta;

    use super::*;
    use crate::models::{Department, ExamDetails};

    fn now() -> DateTime<Utc> {
        "2026-10-17T12:00:00Z".parse().unwrap()
    }

    fn item(id: &str, offset_ms: Option<i64>, date: Option<&str>) -> AdmissionScheduleItem {
        AdmissionScheduleItem {
            id: id.to_string(),
            university_name_and_unit: id.to_uppercase(),
            department: Department::Mixed,
            exam_details: ExamDetails {
                date: date.map(str::to_string),
                exam_countdown_date: offset_ms.map(|ms| now() + TimeDelta::milliseconds(ms)),
            },
        }
    }

    fn ids(ranked: &[&AdmissionScheduleItem]) -> Vec<String> {
        ranked.iter().map(|item| item.id.clone()).collect()
    }

    #[test]
    fn favorite_then_upcoming_then_completed() {
        let items = vec![
            item("a", Some(1_000), None),
            item("b", Some(-1_000), None),
            item("c", Some(5_000), None),
        ];
        let favorites: HashSet<&str> = ["a"].into();
        let ranked = rank_schedule(&items, |id| favorites.contains(id), now());
        assert_eq!(ids(&ranked), ["a", "c", "b"]);
    }

    #[test]
    fn favorites_beat_every_other_key() {
        let items = vec![
            item("soon", Some(1_000), None),
            item("done-fav", Some(-60_000), None),
            item("undated-fav", None, Some("TBA")),
        ];
        let favorites: HashSet<&str> = ["done-fav", "undated-fav"].into();
        let ranked = rank_schedule(&items, |id| favorites.contains(id), now());
        assert_eq!(ids(&ranked), ["undated-fav", "done-fav", "soon"]);
    }

    #[test]
    fn undated_items_follow_dated_upcoming_but_precede_completed() {
        let items = vec![
            item("tba", None, Some("March")),
            item("done-late", Some(-1_000), None),
            item("later", Some(20_000), None),
            item("done-early", Some(-50_000), None),
            item("sooner", Some(10_000), None),
            item("tba-2", None, Some("April")),
        ];
        let ranked = rank_schedule(&items, |_| false, now());
        assert_eq!(
            ids(&ranked),
            ["sooner", "later", "tba", "tba-2", "done-early", "done-late"]
        );
    }

    #[test]
    fn target_exactly_now_is_completed() {
        let on_the_dot = item("now", Some(0), None);
        assert!(is_completed(&on_the_dot, now()));
        assert!(!is_completed(&item("tba", None, Some("TBA")), now()));
    }

    #[test]
    fn ranking_is_idempotent() {
        let items = vec![
            item("e", Some(-3_000), None),
            item("d", None, Some("TBA")),
            item("c", Some(7_000), None),
            item("b", Some(7_000), None),
            item("a", Some(-3_000), None),
        ];
        let favorites: HashSet<&str> = ["b", "d"].into();
        let once = rank_schedule(&items, |id| favorites.contains(id), now());
        let twice = rank_schedule(once.iter().copied(), |id| favorites.contains(id), now());
        assert_eq!(ids(&once), ids(&twice));
        assert_eq!(ids(&once), ["b", "d", "c", "e", "a"]);
    }
}
