//! Local key-value persistence for user preferences, split across the
//! SQLite-backed store used at runtime and an in-memory one for tests and
//! throwaway sessions.

mod memory;
mod sqlite;

use anyhow::Result;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Minimal string-to-string store scoped to the current user profile.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}
