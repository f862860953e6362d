//! Per-profile bookmark and favorite sets. Each set is loaded once at
//! startup and written back in full after every toggle, serialized as a JSON
//! array of strings under a fixed key.

use anyhow::{Context, Result};
use log::{info, warn};

use crate::store::KeyValueStore;

/// Store key for bookmarked subject short codes.
pub const SUBJECT_BOOKMARKS_KEY: &str = "subjectBookmarks";
/// Store key for favorite schedule item ids.
pub const SCHEDULE_FAVORITES_KEY: &str = "admissionFavorites";

/// Outcome of flipping one id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

impl Toggle {
    /// Confirmation shown after bookmarking a subject.
    pub fn bookmark_message(self) -> &'static str {
        match self {
            Toggle::Added => "বিষয়টি বুকমার্ক করা হয়েছে",
            Toggle::Removed => "বুকমার্ক সরানো হয়েছে",
        }
    }

    /// Confirmation shown after changing a schedule favorite.
    pub fn favorite_message(self) -> &'static str {
        match self {
            Toggle::Added => "পছন্দের তালিকায় যুক্ত হয়েছে",
            Toggle::Removed => "পছন্দের তালিকা থেকে সরানো হয়েছে",
        }
    }
}

/// An insertion-ordered set of ids mirrored to one store key.
#[derive(Debug, Clone)]
pub struct PreferenceSet {
    key: &'static str,
    ids: Vec<String>,
}

impl PreferenceSet {
    pub fn empty(key: &'static str) -> Self {
        Self {
            key,
            ids: Vec::new(),
        }
    }

    /// Read the set stored under `key`. Missing, unreadable or malformed
    /// values all load as an empty set.
    pub fn load(store: &dyn KeyValueStore, key: &'static str) -> Self {
        let raw = match store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::empty(key),
            Err(err) => {
                warn!("could not read {key}: {err:#}");
                return Self::empty(key);
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => {
                info!("loaded {} entries from {key}", ids.len());
                Self { key, ids }
            }
            Err(err) => {
                warn!("ignoring malformed {key}: {err}");
                Self::empty(key)
            }
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Flip membership of `id` and persist the whole set. The in-memory set
    /// only changes once the store accepted the write.
    pub fn toggle(&mut self, store: &mut dyn KeyValueStore, id: &str) -> Result<Toggle> {
        let (next, outcome) = if self.contains(id) {
            let next = self
                .ids
                .iter()
                .filter(|existing| existing.as_str() != id)
                .cloned()
                .collect::<Vec<_>>();
            (next, Toggle::Removed)
        } else {
            let mut next = self.ids.clone();
            next.push(id.to_string());
            (next, Toggle::Added)
        };

        let encoded = serde_json::to_string(&next).context("failed to encode preferences")?;
        store.set(self.key, &encoded)?;
        self.ids = next;
        info!("{:?} {id} in {}", outcome, self.key);
        Ok(outcome)
    }
}

/// Both preference sets the board keeps.
#[derive(Debug, Clone)]
pub struct Preferences {
    pub bookmarks: PreferenceSet,
    pub favorites: PreferenceSet,
}

impl Preferences {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self {
            bookmarks: PreferenceSet::load(store, SUBJECT_BOOKMARKS_KEY),
            favorites: PreferenceSet::load(store, SCHEDULE_FAVORITES_KEY),
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;
    use crate::store::MemoryStore;

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("disk on fire"))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("disk on fire"))
        }
    }

    #[test]
    fn toggle_twice_restores_original_contents() {
        let mut store = MemoryStore::new();
        store.set(SUBJECT_BOOKMARKS_KEY, r#"["CSE","ME"]"#).unwrap();
        let mut bookmarks = PreferenceSet::load(&store, SUBJECT_BOOKMARKS_KEY);

        assert_eq!(bookmarks.toggle(&mut store, "ARCH").unwrap(), Toggle::Added);
        assert_eq!(
            store.get(SUBJECT_BOOKMARKS_KEY).unwrap().as_deref(),
            Some(r#"["CSE","ME","ARCH"]"#)
        );

        assert_eq!(bookmarks.toggle(&mut store, "ARCH").unwrap(), Toggle::Removed);
        assert_eq!(bookmarks.ids(), ["CSE", "ME"]);
        assert_eq!(
            store.get(SUBJECT_BOOKMARKS_KEY).unwrap().as_deref(),
            Some(r#"["CSE","ME"]"#)
        );
    }

    #[test]
    fn malformed_values_load_as_empty() {
        let mut store = MemoryStore::new();
        for raw in ["not json", r#"{"a":1}"#, "[1,2]", ""] {
            store.set(SCHEDULE_FAVORITES_KEY, raw).unwrap();
            let favorites = PreferenceSet::load(&store, SCHEDULE_FAVORITES_KEY);
            assert!(favorites.is_empty(), "raw value {raw:?}");
        }
    }

    #[test]
    fn unreadable_store_loads_as_empty() {
        let prefs = Preferences::load(&FailingStore);
        assert!(prefs.bookmarks.is_empty());
        assert!(prefs.favorites.is_empty());
    }

    #[test]
    fn failed_write_leaves_set_untouched() {
        let mut favorites = PreferenceSet::empty(SCHEDULE_FAVORITES_KEY);
        assert!(favorites.toggle(&mut FailingStore, "du-a").is_err());
        assert!(!favorites.contains("du-a"));
    }

    #[test]
    fn confirmation_messages_distinguish_outcomes() {
        assert_ne!(Toggle::Added.bookmark_message(), Toggle::Removed.bookmark_message());
        assert_ne!(Toggle::Added.favorite_message(), Toggle::Removed.favorite_message());
    }
}
