//! Exercises the library the way `main` wires it: the bundled catalog, a
//! file-backed preference store, and the ranking engine on top.

use std::fs;
use std::path::PathBuf;

use admission_board::engine::{countdown, format_countdown, rank_schedule};
use admission_board::preferences::{SCHEDULE_FAVORITES_KEY, SUBJECT_BOOKMARKS_KEY};
use admission_board::{
    Catalog, KeyValueStore, PreferenceSet, Preferences, SeatTable, SqliteStore, Toggle,
};
use chrono::{DateTime, TimeDelta, Utc};

fn scratch_db(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "admission-board-test-{}-{name}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    dir.join("preferences.sqlite")
}

#[test]
fn preferences_survive_reopening_the_store() {
    let path = scratch_db("reopen");

    {
        let mut store = SqliteStore::open(&path).unwrap();
        let mut prefs = Preferences::load(&store);
        assert_eq!(prefs.bookmarks.toggle(&mut store, "CSE").unwrap(), Toggle::Added);
        assert_eq!(prefs.favorites.toggle(&mut store, "buet").unwrap(), Toggle::Added);
        assert_eq!(prefs.favorites.toggle(&mut store, "du-a").unwrap(), Toggle::Added);
    }

    let store = SqliteStore::open(&path).unwrap();
    let prefs = Preferences::load(&store);
    assert_eq!(prefs.bookmarks.ids(), ["CSE"]);
    assert_eq!(prefs.favorites.ids(), ["buet", "du-a"]);
    assert_eq!(
        store.get(SCHEDULE_FAVORITES_KEY).unwrap().as_deref(),
        Some(r#"["buet","du-a"]"#)
    );

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn double_toggle_persists_original_state() {
    let path = scratch_db("double");
    let mut store = SqliteStore::open(&path).unwrap();
    store.set(SUBJECT_BOOKMARKS_KEY, r#"["ME"]"#).unwrap();

    let mut bookmarks = PreferenceSet::load(&store, SUBJECT_BOOKMARKS_KEY);
    bookmarks.toggle(&mut store, "ME").unwrap();
    assert_eq!(store.get(SUBJECT_BOOKMARKS_KEY).unwrap().as_deref(), Some("[]"));
    bookmarks.toggle(&mut store, "ME").unwrap();
    assert_eq!(store.get(SUBJECT_BOOKMARKS_KEY).unwrap().as_deref(), Some(r#"["ME"]"#));

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn bundled_catalog_ranks_favorites_and_hides_undated() {
    let catalog = Catalog::bundled().unwrap();
    let now: DateTime<Utc> = "2026-10-17T12:00:00Z".parse().unwrap();

    let visible = catalog.visible_schedule();
    assert!(visible.iter().all(|item| item.id != "ju"));

    let ranked = rank_schedule(visible.iter().copied(), |id| id == "du-c", now);
    let ids: Vec<&str> = ranked.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids.first(), Some(&"du-c"));
    assert_eq!(ids.last(), Some(&"ru-a"), "completed exams sink to the bottom");

    let gst = ids.iter().position(|id| *id == "gst").unwrap();
    let du_b = ids.iter().position(|id| *id == "du-b").unwrap();
    assert!(du_b < gst, "undated exams follow dated upcoming ones");
}

#[test]
fn bundled_catalog_has_mist_seats() {
    let catalog = Catalog::bundled().unwrap();
    match catalog.seat_table("mist", "unitA") {
        SeatTable::Subjects { subjects, .. } => {
            assert!(subjects.iter().any(|s| s.short_code == "CSE"));
        }
        SeatTable::NoData { .. } => panic!("bundled catalog should list MIST subjects"),
    }
}

#[test]
fn countdown_renders_with_bengali_digits() {
    let now: DateTime<Utc> = "2026-10-17T12:00:00Z".parse().unwrap();
    let left = countdown(Some(now + TimeDelta::milliseconds(90_061_000)), now);
    assert_eq!(format_countdown(&left, false), "০১দিন ০১ঘণ্টা ০১মিনিট ০১সেকেন্ড");

    let done = countdown(Some(now - TimeDelta::milliseconds(1_000)), now);
    assert_eq!(format_countdown(&done, true), "পরীক্ষা হয়ে গেছে");
}
